//! Retrieval settings.

use serde::Deserialize;

use crate::psl::PUBLIC_SUFFIX_LIST_URL;

/// Where and how to fetch the Public Suffix List.
///
/// Every field is optional when deserializing; missing ones take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SuffixListConfig {
    /// List location. Defaults to [`PUBLIC_SUFFIX_LIST_URL`].
    pub url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SuffixListConfig {
    fn default() -> Self {
        Self {
            url: PUBLIC_SUFFIX_LIST_URL.to_string(),
            timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SuffixListConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}
