use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for People-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub tables: TablesConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Locations of the four tables the crawl reads and writes
#[derive(Debug, Clone, Deserialize)]
pub struct TablesConfig {
    /// Reference table of cities (`Zip Code` column)
    pub cities: PathBuf,

    /// Reference table of last names (`Last Name` column)
    #[serde(rename = "last-names")]
    pub last_names: PathBuf,

    /// Search worklist, rewritten at every checkpoint
    pub searches: PathBuf,

    /// Results log, rewritten at every checkpoint
    pub results: PathBuf,
}

/// Directory site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL that listing paths are appended to
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Page loader configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Time to wait after a page arrives before handing it over (milliseconds)
    #[serde(rename = "settle-delay", default = "default_settle_delay")]
    pub settle_delay: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            settle_delay: default_settle_delay(),
        }
    }
}

fn default_user_agent() -> String {
    format!("people-sweep/{}", env!("CARGO_PKG_VERSION"))
}

fn default_settle_delay() -> u64 {
    1000
}
