//! URL construction for the directory site
//!
//! Listing pages live under the configured base URL as
//! `<base>/<last name>/<zip code>` for the first page and
//! `<base>/<last name>/<zip code>/<n>` for later pages.

use crate::search::SearchKey;
use url::{ParseError, Url};

/// Builds listing and detail URLs relative to a base URL
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    /// Creates a URL builder for `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use people_sweep::{SearchKey, SiteUrls};
    ///
    /// let site = SiteUrls::new("https://www.whitepages.com/name/").unwrap();
    /// let key = SearchKey::new("90001", "Smith");
    ///
    /// assert_eq!(
    ///     site.index_url(&key, 1).as_str(),
    ///     "https://www.whitepages.com/name/Smith/90001"
    /// );
    /// assert_eq!(
    ///     site.index_url(&key, 3).as_str(),
    ///     "https://www.whitepages.com/name/Smith/90001/3"
    /// );
    /// ```
    pub fn new(base_url: &str) -> Result<Self, ParseError> {
        Ok(Self {
            base: Url::parse(base_url)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of listing page `page_number` (1-based) for a search
    pub fn index_url(&self, key: &SearchKey, page_number: u32) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&key.last_name)
                .push(&key.zip_code);
            if page_number > 1 {
                segments.push(&page_number.to_string());
            }
        }

        url
    }

    /// Resolves a match entry's link against the page it was found on
    pub fn detail_url(&self, page_url: &Url, href: &str) -> Result<Url, ParseError> {
        page_url.join(href.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SearchKey {
        SearchKey::new("90001", "Smith")
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let site = SiteUrls::new("https://www.whitepages.com/name").unwrap();
        assert_eq!(
            site.index_url(&key(), 1).as_str(),
            "https://www.whitepages.com/name/Smith/90001"
        );
    }

    #[test]
    fn test_page_numbers() {
        let site = SiteUrls::new("http://localhost:8080/name/").unwrap();
        assert_eq!(
            site.index_url(&key(), 1).as_str(),
            "http://localhost:8080/name/Smith/90001"
        );
        assert_eq!(
            site.index_url(&key(), 2).as_str(),
            "http://localhost:8080/name/Smith/90001/2"
        );
    }

    #[test]
    fn test_names_are_path_encoded() {
        let site = SiteUrls::new("https://www.whitepages.com/name/").unwrap();
        let key = SearchKey::new("90001", "De La Cruz");
        assert_eq!(
            site.index_url(&key, 1).as_str(),
            "https://www.whitepages.com/name/De%20La%20Cruz/90001"
        );
    }

    #[test]
    fn test_detail_url_resolves_relative_link() {
        let site = SiteUrls::new("https://www.whitepages.com/name/").unwrap();
        let page = site.index_url(&key(), 2);

        let detail = site.detail_url(&page, "/name/John-Smith/Los-Angeles-CA/abc123").unwrap();
        assert_eq!(
            detail.as_str(),
            "https://www.whitepages.com/name/John-Smith/Los-Angeles-CA/abc123"
        );

        let absolute = site
            .detail_url(&page, "https://other.example.com/p/1")
            .unwrap();
        assert_eq!(absolute.as_str(), "https://other.example.com/p/1");
    }
}
