//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop, including:
//! - Loading the tables and merging the reference tables into the worklist
//! - Running one search at a time through a FIFO of page tasks
//! - Routing fetched pages to the index and detail handlers
//! - Checkpointing the worklist and results after every search
//!
//! The worklist tail is always the current search. When its page queue runs
//! dry the search is stamped, moved to the head of the worklist, and both
//! tables are checkpointed.

use crate::config::Config;
use crate::crawler::handlers::{detail_records, expand_index};
use crate::crawler::loader::{HttpLoader, PageLoader};
use crate::crawler::markup::{DirectoryMarkup, PageInterpreter};
use crate::crawler::task::{PageKind, PageTask};
use crate::search::{generate_worklist, ResultRecord, SearchTask};
use crate::site::SiteUrls;
use crate::table::{CsvTableStore, TableStore};
use crate::SweepError;
use std::collections::VecDeque;
use std::time::Instant;

/// Outer state of the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Between searches
    Idle,
    /// The worklist tail is being crawled
    SearchInProgress,
    /// Nothing left to do, or the run was aborted
    Done,
}

/// Totals for one call to [`Coordinator::run`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub searches_completed: usize,
    pub pages_fetched: usize,
    pub results_added: usize,

    /// True when the worklist was exhausted, false when the search limit
    /// stopped the run
    pub exhausted: bool,
}

/// Main crawler coordinator structure
pub struct Coordinator<S, L, I> {
    store: S,
    loader: L,
    interpreter: I,
    site: SiteUrls,
    worklist: Vec<SearchTask>,
    results: Vec<ResultRecord>,
    queue: VecDeque<PageTask>,
    state: RunState,
    search_limit: Option<usize>,
    checkpoint_pending: bool,
    summary: RunSummary,
}

impl<S, L, I> Coordinator<S, L, I>
where
    S: TableStore,
    L: PageLoader,
    I: PageInterpreter,
{
    /// Creates a new coordinator instance
    ///
    /// Loads and validates all four tables, then merges the reference tables
    /// into the worklist. Any table problem is reported here, before a single
    /// page is fetched.
    ///
    /// # Arguments
    ///
    /// * `store` - Backend holding the four tables
    /// * `loader` - Page loader used for every fetch
    /// * `interpreter` - Reads listing and detail pages
    /// * `site` - URL builder for listing pages
    pub fn new(store: S, loader: L, interpreter: I, site: SiteUrls) -> Result<Self, SweepError> {
        let zip_codes = store.load_zip_codes()?;
        let last_names = store.load_last_names()?;
        let existing = store.load_worklist()?;
        let results = store.load_results()?;

        tracing::info!(
            "Loaded {} zip codes, {} last names, {} searches and {} results",
            zip_codes.len(),
            last_names.len(),
            existing.len(),
            results.len()
        );

        let worklist = generate_worklist(&zip_codes, &last_names, existing);
        let pending = worklist.iter().filter(|t| t.is_pending()).count();
        tracing::info!(
            "Worklist holds {} searches, {} pending",
            worklist.len(),
            pending
        );

        Ok(Self {
            store,
            loader,
            interpreter,
            site,
            worklist,
            results,
            queue: VecDeque::new(),
            state: RunState::Idle,
            search_limit: None,
            checkpoint_pending: false,
            summary: RunSummary::default(),
        })
    }

    /// Stops the run after `limit` completed searches
    pub fn with_search_limit(mut self, limit: Option<usize>) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn worklist(&self) -> &[SearchTask] {
        &self.worklist
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    /// Pending page tasks of the current search, head first
    pub fn queue(&self) -> &VecDeque<PageTask> {
        &self.queue
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// The search the scheduler works on next: the worklist tail
    pub fn current_search(&self) -> Option<&SearchTask> {
        self.worklist.last()
    }

    /// Moves from `Idle` to `SearchInProgress`
    ///
    /// Seeds the queue with the first listing page of the worklist tail.
    /// Returns false and moves to `Done` when the worklist is empty or its
    /// tail is already completed, which after generation means nothing is
    /// pending.
    pub fn start_next_search(&mut self) -> bool {
        if self.state == RunState::SearchInProgress {
            return true;
        }

        let search = match self.worklist.last() {
            Some(task) if task.is_pending() => task.key.clone(),
            _ => {
                self.state = RunState::Done;
                return false;
            }
        };

        tracing::info!("Doing search: {}", search);
        let url = self.site.index_url(&search, 1);
        self.queue.push_back(PageTask::index(search, url, 1));
        self.state = RunState::SearchInProgress;
        true
    }

    /// Runs searches until the worklist is exhausted or the limit is hit
    ///
    /// A page without its expected landmark, or a failed fetch, aborts the
    /// run at once: the queue is dropped and no checkpoint is written, so the
    /// search restarts from its first page on the next run.
    ///
    /// A failed checkpoint is returned as [`SweepError::Checkpoint`] with all
    /// in-memory state intact; [`Coordinator::checkpoint`] retries it, and
    /// calling `run` again retries it before starting the next search.
    pub async fn run(&mut self) -> Result<RunSummary, SweepError> {
        self.summary = RunSummary::default();

        loop {
            if self.checkpoint_pending {
                self.checkpoint()?;
            }

            if let Some(limit) = self.search_limit {
                if self.summary.searches_completed >= limit {
                    tracing::info!("Search limit of {} reached", limit);
                    break;
                }
            }

            if !self.start_next_search() {
                tracing::info!("No pending searches left");
                self.summary.exhausted = true;
                break;
            }

            let started = Instant::now();
            while let Some(task) = self.queue.pop_front() {
                if let Err(e) = self.process_task(task).await {
                    self.queue.clear();
                    self.state = RunState::Done;
                    tracing::error!("Ending searches: {}", e);
                    return Err(e);
                }
            }

            let finished = self.complete_search()?;
            tracing::info!("Finished search {} in {:?}", finished, started.elapsed());
        }

        Ok(self.summary.clone())
    }

    /// Persists the worklist and results
    pub fn checkpoint(&mut self) -> Result<(), SweepError> {
        match self.store.checkpoint(&self.worklist, &self.results) {
            Ok(()) => {
                self.checkpoint_pending = false;
                Ok(())
            }
            Err(e) => {
                self.checkpoint_pending = true;
                tracing::error!("Checkpoint failed: {}", e);
                Err(SweepError::Checkpoint(e))
            }
        }
    }

    /// Fetches one page and hands it to its handler
    async fn process_task(&mut self, task: PageTask) -> Result<(), SweepError> {
        let page = self
            .loader
            .fetch(&task.url)
            .await
            .map_err(|e| SweepError::Load {
                url: task.url.to_string(),
                message: e.to_string(),
            })?;
        self.summary.pages_fetched += 1;

        let unexpected = || SweepError::UnexpectedPage {
            kind: task.kind,
            url: page.final_url.to_string(),
        };

        match task.kind {
            PageKind::Index => {
                let listing = self
                    .interpreter
                    .read_index(&page.body)
                    .map_err(|_| unexpected())?;
                let next = expand_index(&self.site, &task, &page.final_url, &listing);

                let details = next.iter().filter(|t| t.kind == PageKind::Detail).count();
                tracing::info!(
                    "Page {} for {} reports {} exact matches and lists {} to visit",
                    task.page_number,
                    task.search,
                    listing.exact_matches,
                    details
                );

                self.queue.extend(next);
            }
            PageKind::Detail => {
                let person = self
                    .interpreter
                    .read_detail(&page.body)
                    .map_err(|_| unexpected())?;

                for phone in &person.phones {
                    if let Some(label) = &phone.label {
                        tracing::trace!("{} is listed with {}", phone.number, label);
                    }
                }

                let records = detail_records(&task.search, &person, now_millis());
                for record in &records {
                    tracing::debug!("Added {} {}", record.full_name, record.phone);
                }

                self.summary.results_added += records.len();
                self.results.extend(records);
            }
        }

        Ok(())
    }

    /// Moves from `SearchInProgress` back to `Idle`
    ///
    /// Stamps the worklist tail, reinserts it at the head without re-sorting
    /// and checkpoints.
    fn complete_search(&mut self) -> Result<String, SweepError> {
        let mut search = match self.worklist.pop() {
            Some(search) => search,
            None => {
                self.state = RunState::Done;
                return Ok(String::new());
            }
        };

        search.completed_at = now_millis();
        let finished = search.key.to_string();
        self.worklist.insert(0, search);
        self.summary.searches_completed += 1;
        self.state = RunState::Idle;

        self.checkpoint()?;
        Ok(finished)
    }
}

/// Current time in epoch milliseconds
fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Coordinator wired to the CSV tables, the HTTP loader and the site markup
pub type SiteCoordinator = Coordinator<CsvTableStore, HttpLoader, DirectoryMarkup>;

/// Builds a coordinator from configuration
pub fn build_coordinator(config: &Config) -> Result<SiteCoordinator, SweepError> {
    let site = SiteUrls::new(&config.site.base_url)?;
    let loader = HttpLoader::new(&config.loader).map_err(|e| SweepError::Load {
        url: config.site.base_url.clone(),
        message: format!("failed to build HTTP client: {}", e),
    })?;
    let store = CsvTableStore::new(config.tables.clone());

    Coordinator::new(store, loader, DirectoryMarkup::new(), site)
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `search_limit` - Stop after this many completed searches
///
/// # Example
///
/// ```no_run
/// use people_sweep::config::load_config;
/// use people_sweep::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sweep.toml"))?;
/// run_crawl(&config, None).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    search_limit: Option<usize>,
) -> Result<RunSummary, SweepError> {
    let mut coordinator = build_coordinator(config)?.with_search_limit(search_limit);
    coordinator.run().await
}
