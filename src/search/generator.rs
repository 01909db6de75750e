//! Search space generation
//!
//! Builds the worklist from the cross product of zip codes and last names,
//! keeping every search already on the worklist untouched.

use crate::search::{SearchKey, SearchTask};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Canonical worklist order
///
/// `completed_at` descending, then zip code descending, then last name
/// descending. Pending searches therefore sit at the tail, with the
/// lexicographically smallest pair last.
pub fn worklist_order(a: &SearchTask, b: &SearchTask) -> Ordering {
    b.completed_at
        .cmp(&a.completed_at)
        .then_with(|| b.key.zip_code.cmp(&a.key.zip_code))
        .then_with(|| b.key.last_name.cmp(&a.key.last_name))
}

/// Merges the reference tables into the existing worklist
///
/// Every `(zip code, last name)` pair not yet on the worklist is added as a
/// pending search, regardless of whether the existing entry for a pair is
/// pending or completed. Existing entries keep their completion time. The
/// result is sorted with [`worklist_order`].
///
/// # Arguments
///
/// * `zip_codes` - Zip codes from the cities table
/// * `last_names` - Names from the last names table
/// * `existing` - The worklist loaded from the previous run
///
/// # Example
///
/// ```
/// use people_sweep::search::generate_worklist;
///
/// let zips = vec!["90001".to_string()];
/// let names = vec!["Smith".to_string()];
/// let worklist = generate_worklist(&zips, &names, Vec::new());
///
/// assert_eq!(worklist.len(), 1);
/// assert!(worklist[0].is_pending());
/// ```
pub fn generate_worklist(
    zip_codes: &[String],
    last_names: &[String],
    existing: Vec<SearchTask>,
) -> Vec<SearchTask> {
    let mut positions: HashMap<SearchKey, usize> = HashMap::with_capacity(existing.len());
    let mut worklist: Vec<SearchTask> = Vec::with_capacity(existing.len());

    for task in existing {
        match positions.get(&task.key) {
            Some(&pos) => {
                tracing::warn!(
                    "Worklist lists {} more than once; keeping the most recent entry",
                    task.key
                );
                if task.completed_at > worklist[pos].completed_at {
                    worklist[pos] = task;
                }
            }
            None => {
                positions.insert(task.key.clone(), worklist.len());
                worklist.push(task);
            }
        }
    }

    let before = worklist.len();
    for zip_code in zip_codes {
        for last_name in last_names {
            let key = SearchKey::new(zip_code.as_str(), last_name.as_str());
            if !positions.contains_key(&key) {
                positions.insert(key.clone(), worklist.len());
                worklist.push(SearchTask::pending(key));
            }
        }
    }

    tracing::debug!(
        "Added {} new searches to a worklist of {}",
        worklist.len() - before,
        before
    );

    worklist.sort_by(worklist_order);
    worklist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;
    use std::collections::HashSet;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn task(zip: &str, name: &str, completed_at: i64) -> SearchTask {
        SearchTask {
            key: SearchKey::new(zip, name),
            completed_at,
            extra: Row::new(),
        }
    }

    fn assert_unique(worklist: &[SearchTask]) {
        let keys: HashSet<_> = worklist.iter().map(|t| &t.key).collect();
        assert_eq!(keys.len(), worklist.len());
    }

    #[test]
    fn test_single_pair() {
        let worklist = generate_worklist(&strings(&["90001"]), &strings(&["Smith"]), vec![]);
        assert_eq!(worklist, vec![task("90001", "Smith", 0)]);
    }

    #[test]
    fn test_full_cross_product() {
        let zips = strings(&["90001", "10001", "60601"]);
        let names = strings(&["Smith", "Jones"]);
        let worklist = generate_worklist(&zips, &names, vec![]);

        assert_eq!(worklist.len(), 6);
        assert!(worklist.iter().all(SearchTask::is_pending));
        assert_unique(&worklist);
    }

    #[test]
    fn test_duplicate_reference_values() {
        let zips = strings(&["90001", "90001"]);
        let names = strings(&["Smith", "Smith", "Jones"]);
        let worklist = generate_worklist(&zips, &names, vec![]);

        assert_eq!(worklist.len(), 2);
        assert_unique(&worklist);
    }

    #[test]
    fn test_empty_reference_table() {
        let existing = vec![task("90001", "Smith", 5)];
        let worklist = generate_worklist(&[], &strings(&["Jones"]), existing.clone());
        assert_eq!(worklist, existing);
    }

    #[test]
    fn test_existing_entries_kept_unchanged() {
        let existing = vec![task("90001", "Smith", 1_000), task("99999", "Other", 0)];
        let worklist = generate_worklist(
            &strings(&["90001", "10001"]),
            &strings(&["Smith"]),
            existing.clone(),
        );

        assert_eq!(worklist.len(), 3);
        for entry in &existing {
            assert!(worklist.contains(entry));
        }
        assert_unique(&worklist);
    }

    #[test]
    fn test_duplicate_existing_keeps_latest() {
        let existing = vec![
            task("90001", "Smith", 0),
            task("90001", "Smith", 2_000),
            task("90001", "Smith", 1_000),
        ];
        let worklist = generate_worklist(&[], &[], existing);
        assert_eq!(worklist, vec![task("90001", "Smith", 2_000)]);
    }

    #[test]
    fn test_sort_order() {
        let existing = vec![task("10001", "Adams", 100), task("20001", "Baker", 300)];
        let worklist = generate_worklist(
            &strings(&["10001", "20001"]),
            &strings(&["Adams", "Baker"]),
            existing,
        );

        assert_eq!(
            worklist,
            vec![
                task("20001", "Baker", 300),
                task("10001", "Adams", 100),
                task("20001", "Adams", 0),
                task("10001", "Baker", 0),
            ]
        );
    }

    #[test]
    fn test_order_is_total() {
        let a = task("10001", "Adams", 0);
        let b = task("10001", "Baker", 0);
        let c = task("20001", "Adams", 0);
        let d = task("10001", "Adams", 7);

        assert_eq!(worklist_order(&a, &b), Ordering::Greater);
        assert_eq!(worklist_order(&a, &c), Ordering::Greater);
        assert_eq!(worklist_order(&d, &a), Ordering::Less);
        assert_eq!(worklist_order(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_tail_is_smallest_pending_pair() {
        let worklist = generate_worklist(
            &strings(&["90001", "10001"]),
            &strings(&["Smith", "Jones"]),
            vec![task("00001", "Aaron", 9)],
        );

        assert_eq!(worklist.first(), Some(&task("00001", "Aaron", 9)));
        assert_eq!(worklist.last(), Some(&task("10001", "Jones", 0)));
    }

    #[test]
    fn test_idempotent() {
        let zips = strings(&["90001", "10001"]);
        let names = strings(&["Smith", "Jones", "Lee"]);
        let once = generate_worklist(&zips, &names, vec![task("90001", "Lee", 42)]);
        let twice = generate_worklist(&zips, &names, once.clone());
        assert_eq!(once, twice);
    }
}
