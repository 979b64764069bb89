//! DMARC (Domain-based Message Authentication, Reporting, and Conformance) per RFC 7489.

mod discovery;
mod parser;
mod types;

pub use discovery::{lookup, lookup_dmarc_record, DMARC_RECORD_PREFIX};
pub use parser::{parse_dmarc_record, RFC_SUPPORTED_TAGS};
pub use types::{
    AlignmentMode, DmarcRecord, FailureOptions, Policy, ReportFormat, DEFAULT_REPORT_INTERVAL,
};

use thiserror::Error;

/// Why a TXT value was rejected as a DMARC record. The record is never
/// partially accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DmarcParseError {
    #[error("dmarc: duplicate parameter '{0}'")]
    DuplicateTag(String),
    #[error("dmarc: unsupported DMARC version")]
    UnsupportedVersion,
    #[error("dmarc: record is missing a 'p' parameter")]
    MissingPolicy,
    #[error("dmarc: invalid policy for parameter '{tag}'")]
    InvalidPolicy { tag: &'static str },
    #[error("dmarc: invalid alignment mode for parameter '{tag}'")]
    InvalidAlignment { tag: &'static str },
    #[error("dmarc: invalid failure option '{0}' in parameter 'fo'")]
    InvalidFailureOption(String),
    #[error("dmarc: invalid parameter 'pct': value {0} out of bounds")]
    PercentOutOfRange(i64),
    #[error("dmarc: invalid report format '{0}' in parameter 'rf'")]
    InvalidReportFormat(String),
    #[error("dmarc: invalid parameter 'ri': {0} is not a positive duration")]
    NonPositiveInterval(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DmarcError {
    /// The domain publishes no DMARC record.
    #[error("dmarc: no policy found for domain")]
    NoPolicy,
    /// More than one `v=DMARC1` record; policy discovery fails.
    #[error("dmarc: multiple DMARC records found for domain")]
    MultipleRecords,
    /// DNS failure other than "name not found". Worth retrying.
    #[error("dmarc: failed to lookup TXT record: {0}")]
    TempFail(String),
    #[error(transparent)]
    Syntax(#[from] DmarcParseError),
}

impl DmarcError {
    /// True if the error is a temporary failure and the lookup may succeed later.
    pub fn is_temp_fail(&self) -> bool {
        matches!(self, DmarcError::TempFail(_))
    }
}
