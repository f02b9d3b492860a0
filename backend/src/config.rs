//! Service configuration read from the environment once at startup.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use common::listing_const::PAGE_SIZE;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchIndexCredentials {
    pub app_id: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen_addr: String,
    pub search_index_url: Option<String>,
    pub search_index_name: String,
    pub credentials: Option<SearchIndexCredentials>,
    pub cache_ttl: Duration,
    pub search_timeout: Duration,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            search_index_url: None,
            search_index_name: "machines".to_string(),
            credentials: None,
            cache_ttl: Duration::from_secs(300),
            search_timeout: Duration::from_millis(10_000),
            page_size: PAGE_SIZE,
        }
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} is not a valid number: {raw:?}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let lookup = move |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let credentials = match (lookup("SEARCH_INDEX_APP_ID"), lookup("SEARCH_INDEX_API_KEY")) {
            (Some(app_id), Some(api_key)) => Some(SearchIndexCredentials { app_id, api_key }),
            _ => None,
        };

        Ok(Config {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            search_index_url: lookup("SEARCH_INDEX_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            search_index_name: lookup("SEARCH_INDEX_NAME").unwrap_or(defaults.search_index_name),
            credentials,
            cache_ttl: Duration::from_secs(parse_var(
                &lookup,
                "SEARCH_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )?),
            search_timeout: Duration::from_millis(parse_var(
                &lookup,
                "SEARCH_TIMEOUT_MS",
                10_000_u64,
            )?),
            page_size: parse_var(&lookup, "LISTING_PAGE_SIZE", defaults.page_size)?.max(1),
        })
    }

    pub fn is_search_configured(&self) -> bool {
        self.search_index_url.is_some() && self.credentials.is_some()
    }
}
