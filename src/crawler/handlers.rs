//! Index and detail page handlers
//!
//! Handlers work on already-interpreted pages: the index handler decides
//! which pages to fetch next, the detail handler turns a person's page into
//! result records.

use crate::crawler::markup::{DetailPage, IndexPage};
use crate::crawler::task::PageTask;
use crate::search::{ResultRecord, SearchKey};
use crate::site::SiteUrls;
use crate::table::Row;
use url::Url;

/// Number of matches the site lists per page
pub const PAGE_SIZE: u32 = 10;

/// Number of entries of `page_number` that belong to the reported matches
///
/// Zero or negative once the reported matches are exhausted.
pub fn max_on_page(exact_matches: u32, page_number: u32) -> i64 {
    let page_offset = i64::from(page_number.saturating_sub(1)) * i64::from(PAGE_SIZE);
    i64::from(exact_matches) - page_offset
}

/// Whether the reported matches continue past `page_number`
pub fn has_next_page(exact_matches: u32, page_number: u32) -> bool {
    i64::from(exact_matches) > i64::from(page_number) * i64::from(PAGE_SIZE)
}

/// Expands a listing page into the tasks that follow it
///
/// Returns one detail task per phone-bearing entry among the first
/// [`max_on_page`] entries, in page order, followed by the task for the next
/// listing page when the reported matches continue past this one.
///
/// # Arguments
///
/// * `site` - URL builder for the next listing page
/// * `task` - The index task that fetched this page
/// * `page_url` - Final URL of the page, used to resolve entry links
/// * `page` - The interpreted page
pub fn expand_index(
    site: &SiteUrls,
    task: &PageTask,
    page_url: &Url,
    page: &IndexPage,
) -> Vec<PageTask> {
    let cap = max_on_page(page.exact_matches, task.page_number).max(0) as usize;
    let mut tasks = Vec::new();

    for entry in page.entries.iter().take(cap) {
        if !entry.has_phone {
            continue;
        }
        let Some(href) = entry.href.as_deref() else {
            continue;
        };

        match site.detail_url(page_url, href) {
            Ok(url) => tasks.push(PageTask::detail(task.search.clone(), url, task.page_number)),
            Err(e) => tracing::warn!("Skipping match with bad link '{}': {}", href, e),
        }
    }

    if has_next_page(page.exact_matches, task.page_number) {
        let next = task.page_number + 1;
        tasks.push(PageTask::index(
            task.search.clone(),
            site.index_url(&task.search, next),
            next,
        ));
    }

    tasks
}

/// Builds one result record per contact number on a detail page
pub fn detail_records(search: &SearchKey, page: &DetailPage, found_at: i64) -> Vec<ResultRecord> {
    page.phones
        .iter()
        .map(|phone| ResultRecord {
            full_name: page.full_name.clone(),
            phone: phone.number.clone(),
            address1: page.address1.clone(),
            address2: page.address2.clone(),
            city: page.city.clone(),
            state: page.state.clone(),
            zip_code: search.zip_code.clone(),
            last_name: search.last_name.clone(),
            found_at,
            extra: Row::new(),
        })
        .collect()
}
