//! Page loading
//!
//! This module handles fetching pages for the crawler:
//! - The `PageLoader` trait the coordinator awaits on
//! - An HTTP implementation with the configured user agent
//! - A settle delay before the page is handed over
//!
//! There is no retry and no request timeout: a failed fetch ends the run,
//! and a stalled fetch stalls it.

use crate::config::LoaderConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A fetched document
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// Document text
    pub body: String,

    /// URL after redirects
    pub final_url: Url,
}

/// Transport failures while loading a page
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("page unavailable: {0}")]
    Unavailable(String),
}

/// Source of rendered pages
///
/// `fetch` takes `&mut self`, so a loader can only ever have one request in
/// flight.
#[async_trait]
pub trait PageLoader {
    async fn fetch(&mut self, url: &Url) -> Result<LoadedPage, LoadError>;
}

/// Builds an HTTP client with the configured user agent
///
/// # Example
///
/// ```no_run
/// use people_sweep::config::LoaderConfig;
/// use people_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&LoaderConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &LoaderConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Loads pages over HTTP
pub struct HttpLoader {
    client: Client,
    settle_delay: Duration,
}

impl HttpLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            settle_delay: Duration::from_millis(config.settle_delay),
        })
    }
}

#[async_trait]
impl PageLoader for HttpLoader {
    async fn fetch(&mut self, url: &Url) -> Result<LoadedPage, LoadError> {
        tracing::trace!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            // The page handlers decide whether the body is usable
            tracing::warn!("{} answered HTTP {}", final_url, status.as_u16());
        }

        let body = response.text().await?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(LoadedPage { body, final_url })
    }
}
