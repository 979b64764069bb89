//! Registrable domain (eTLD+1) resolution against the Public Suffix List.

mod list;
mod matcher;

pub use list::{
    fetch_suffix_list, load_suffix_list, HttpSuffixListSource, SuffixListSource, SuffixRules,
    PUBLIC_SUFFIX_LIST_URL,
};
pub use matcher::resolve_registrable_domain;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PslError {
    #[error("no eTLD+1 found for domain: {0}")]
    NotFound(String),
    #[error("failed to fetch public suffix list: {0}")]
    Fetch(String),
}
