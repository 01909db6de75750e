//! Page fetch tasks

use crate::search::SearchKey;
use std::fmt;
use url::Url;

/// Kind of page a task fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// A page of the match listing for a search
    Index,
    /// A person's detail page
    Detail,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("index"),
            Self::Detail => f.write_str("detail"),
        }
    }
}

/// A queued page fetch
///
/// Tasks only live in memory: an interrupted search is redone from its first
/// listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTask {
    pub kind: PageKind,

    /// The search this page belongs to
    pub search: SearchKey,

    pub url: Url,

    /// 1-based listing page number; detail tasks carry the number of the
    /// listing page they were found on
    pub page_number: u32,
}

impl PageTask {
    pub fn index(search: SearchKey, url: Url, page_number: u32) -> Self {
        Self {
            kind: PageKind::Index,
            search,
            url,
            page_number,
        }
    }

    pub fn detail(search: SearchKey, url: Url, page_number: u32) -> Self {
        Self {
            kind: PageKind::Detail,
            search,
            url,
            page_number,
        }
    }
}
