//! Domain policy interpreters for email authentication tooling.
//!
//! - [`psl`]: registrable domain (eTLD+1) resolution against a Public Suffix List.
//! - [`dmarc`]: DMARC record parsing (RFC 7489 §6.3) and `_dmarc` discovery.
//!
//! DNS and HTTP retrieval sit behind the [`common::dns::DnsResolver`] and
//! [`psl::SuffixListSource`] traits. Caching is the caller's responsibility.

pub mod common;
pub mod config;
pub mod dmarc;
pub mod psl;

pub use config::SuffixListConfig;
pub use dmarc::{lookup, lookup_dmarc_record, parse_dmarc_record, DmarcError, DmarcRecord};
pub use psl::{fetch_suffix_list, resolve_registrable_domain, PslError, SuffixRules};
