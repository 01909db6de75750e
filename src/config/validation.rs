use crate::config::types::{Config, LoaderConfig, SiteConfig, TablesConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for the loader settle delay (milliseconds)
const MAX_SETTLE_DELAY: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_tables_config(&config.tables)?;
    validate_site_config(&config.site)?;
    validate_loader_config(&config.loader)?;
    Ok(())
}

/// Validates table paths: each present and no two tables sharing a file
fn validate_tables_config(config: &TablesConfig) -> Result<(), ConfigError> {
    let named = [
        ("cities", &config.cities),
        ("last-names", &config.last_names),
        ("searches", &config.searches),
        ("results", &config.results),
    ];

    for (name, path) in &named {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "tables.{} cannot be empty",
                name
            )));
        }
    }

    for (i, (name_a, path_a)) in named.iter().enumerate() {
        for (name_b, path_b) in &named[i + 1..] {
            if path_a == path_b {
                return Err(ConfigError::Validation(format!(
                    "tables.{} and tables.{} point to the same file '{}'",
                    name_a,
                    name_b,
                    path_a.display()
                )));
            }
        }
    }

    Ok(())
}

/// Validates the site base URL
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot have paths appended",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates loader configuration
fn validate_loader_config(config: &LoaderConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.settle_delay > MAX_SETTLE_DELAY {
        return Err(ConfigError::Validation(format!(
            "settle-delay must be <= {}ms, got {}ms",
            MAX_SETTLE_DELAY, config.settle_delay
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tables() -> TablesConfig {
        TablesConfig {
            cities: PathBuf::from("cities.csv"),
            last_names: PathBuf::from("names.csv"),
            searches: PathBuf::from("searches.csv"),
            results: PathBuf::from("results.csv"),
        }
    }

    #[test]
    fn test_validate_tables() {
        assert!(validate_tables_config(&tables()).is_ok());

        let mut shared = tables();
        shared.results = shared.searches.clone();
        assert!(validate_tables_config(&shared).is_err());

        let mut blank = tables();
        blank.cities = PathBuf::new();
        assert!(validate_tables_config(&blank).is_err());
    }

    #[test]
    fn test_validate_site() {
        let ok = SiteConfig {
            base_url: "https://www.whitepages.com/name/".to_string(),
        };
        assert!(validate_site_config(&ok).is_ok());

        let ftp = SiteConfig {
            base_url: "ftp://example.com/".to_string(),
        };
        assert!(validate_site_config(&ftp).is_err());

        let junk = SiteConfig {
            base_url: "not a url".to_string(),
        };
        assert!(matches!(
            validate_site_config(&junk),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_loader() {
        assert!(validate_loader_config(&LoaderConfig::default()).is_ok());

        let slow = LoaderConfig {
            settle_delay: 120_000,
            ..LoaderConfig::default()
        };
        assert!(validate_loader_config(&slow).is_err());

        let anonymous = LoaderConfig {
            user_agent: "  ".to_string(),
            ..LoaderConfig::default()
        };
        assert!(validate_loader_config(&anonymous).is_err());
    }
}
