//! Crawler module for walking the directory site
//!
//! This module contains the core crawling logic, including:
//! - Page tasks and the single-flight page loader
//! - Interpretation of listing and detail pages
//! - Expansion of listing pages into follow-up tasks
//! - Overall crawl coordination and checkpointing

mod coordinator;
mod handlers;
mod loader;
mod markup;
mod task;

pub use coordinator::{build_coordinator, run_crawl, Coordinator, RunState, RunSummary, SiteCoordinator};
pub use handlers::{detail_records, expand_index, has_next_page, max_on_page, PAGE_SIZE};
pub use loader::{build_http_client, HttpLoader, LoadError, LoadedPage, PageLoader};
pub use markup::{
    ContactNumber, DetailPage, DirectoryMarkup, IndexPage, MatchEntry, PageInterpreter,
    ShapeMismatch,
};
pub use task::{PageKind, PageTask};
