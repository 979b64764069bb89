use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::time::Duration;

/// DMARC policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// No action, monitoring only.
    None,
    /// Treat as suspicious (spam folder).
    Quarantine,
    /// Reject the message.
    Reject,
}

impl Policy {
    /// Parse an already lower-cased policy literal.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Policy::None),
            "quarantine" => Some(Policy::Quarantine),
            "reject" => Some(Policy::Reject),
            _ => Option::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::None => "none",
            Policy::Quarantine => "quarantine",
            Policy::Reject => "reject",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alignment mode for DKIM/SPF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlignmentMode {
    /// Exact domain match.
    Strict,
    /// Organizational domain match.
    #[default]
    Relaxed,
}

impl AlignmentMode {
    /// Parse alignment mode: "r" → Relaxed, "s" → Strict.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "r" => Some(AlignmentMode::Relaxed),
            "s" => Some(AlignmentMode::Strict),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentMode::Strict => "s",
            AlignmentMode::Relaxed => "r",
        }
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reporting options (fo= tag) as a bit set.
///
/// An empty set means the tag was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FailureOptions(u8);

impl FailureOptions {
    /// `0`: report when all underlying mechanisms fail to align.
    pub const ALL: FailureOptions = FailureOptions(1);
    /// `1`: report when any mechanism fails to align.
    pub const ANY: FailureOptions = FailureOptions(1 << 1);
    /// `d`: report on any DKIM signature failure.
    pub const DKIM: FailureOptions = FailureOptions(1 << 2);
    /// `s`: report on any SPF failure.
    pub const SPF: FailureOptions = FailureOptions(1 << 3);

    pub const fn empty() -> Self {
        FailureOptions(0)
    }

    /// Map a single fo= token to its flag.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "0" => Some(Self::ALL),
            "1" => Some(Self::ANY),
            "d" => Some(Self::DKIM),
            "s" => Some(Self::SPF),
            _ => None,
        }
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: FailureOptions) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: FailureOptions) {
        self.0 |= other.0;
    }
}

impl BitOr for FailureOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        FailureOptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for FailureOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

/// Failure report format (rf= tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Authentication Failure Reporting Format (RFC 6591).
    Afrf,
    /// Incident Object Description Exchange Format (RFC 5070). Not in RFC 7489
    /// but still published by some domains.
    Iodef,
}

impl ReportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "afrf" => Some(ReportFormat::Afrf),
            "iodef" => Some(ReportFormat::Iodef),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Afrf => "afrf",
            ReportFormat::Iodef => "iodef",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate report interval used when ri= is absent or unparseable.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(86_400);

/// Parsed DMARC record (RFC 7489 §6.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcRecord {
    /// DKIM alignment mode (adkim= tag, default: Relaxed).
    pub dkim_alignment: AlignmentMode,
    /// SPF alignment mode (aspf= tag, default: Relaxed).
    pub spf_alignment: AlignmentMode,
    /// Failure reporting options (fo= tag, default: empty).
    pub failure_options: FailureOptions,
    /// Policy for the domain itself (p= tag).
    pub policy: Policy,
    /// Percentage of messages the policy applies to (pct= tag).
    pub percent: Option<u8>,
    /// Failure report formats (rf= tag).
    pub report_format: Vec<ReportFormat>,
    /// Aggregate report interval (ri= tag, default: 86400s).
    pub report_interval: Duration,
    /// Aggregate report URIs (rua= tag).
    pub report_uri_aggregate: Vec<String>,
    /// Failure report URIs (ruf= tag).
    pub report_uri_failure: Vec<String>,
    /// Subdomain policy (sp= tag, defaults to p=).
    pub subdomain_policy: Policy,
}

impl DmarcRecord {
    /// A record carrying `policy` and RFC defaults everywhere else.
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            dkim_alignment: AlignmentMode::Relaxed,
            spf_alignment: AlignmentMode::Relaxed,
            failure_options: FailureOptions::empty(),
            policy,
            percent: None,
            report_format: Vec::new(),
            report_interval: DEFAULT_REPORT_INTERVAL,
            report_uri_aggregate: Vec::new(),
            report_uri_failure: Vec::new(),
            subdomain_policy: policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_round_trips_literals() {
        for literal in ["none", "quarantine", "reject"] {
            assert_eq!(Policy::parse(literal).unwrap().as_str(), literal);
        }
        assert_eq!(Policy::parse("Reject"), None);
        assert_eq!(Policy::parse(""), None);
    }

    #[test]
    fn alignment_parse() {
        assert_eq!(AlignmentMode::parse("s"), Some(AlignmentMode::Strict));
        assert_eq!(AlignmentMode::parse("r"), Some(AlignmentMode::Relaxed));
        assert_eq!(AlignmentMode::parse("relaxed"), None);
        assert_eq!(AlignmentMode::default(), AlignmentMode::Relaxed);
    }

    #[test]
    fn failure_options_bits() {
        let mut fo = FailureOptions::empty();
        assert!(fo.is_empty());
        fo |= FailureOptions::DKIM;
        fo.insert(FailureOptions::SPF);
        assert!(fo.contains(FailureOptions::DKIM));
        assert!(fo.contains(FailureOptions::SPF));
        assert!(!fo.contains(FailureOptions::ALL));
        assert_eq!(fo.bits(), 0b1100);
        assert_eq!(FailureOptions::ALL | FailureOptions::ANY, FailureOptions(0b11));
    }

    #[test]
    fn failure_option_tokens() {
        assert_eq!(FailureOptions::from_token("0"), Some(FailureOptions::ALL));
        assert_eq!(FailureOptions::from_token("1"), Some(FailureOptions::ANY));
        assert_eq!(FailureOptions::from_token("d"), Some(FailureOptions::DKIM));
        assert_eq!(FailureOptions::from_token("s"), Some(FailureOptions::SPF));
        assert_eq!(FailureOptions::from_token("x"), None);
    }

    #[test]
    fn display_uses_record_literals() {
        assert_eq!(Policy::Quarantine.to_string(), "quarantine");
        assert_eq!(AlignmentMode::Strict.to_string(), "s");
        assert_eq!(ReportFormat::Iodef.to_string(), "iodef");
    }

    #[test]
    fn with_policy_defaults() {
        let r = DmarcRecord::with_policy(Policy::Reject);
        assert_eq!(r.subdomain_policy, Policy::Reject);
        assert_eq!(r.report_interval, Duration::from_secs(86400));
        assert_eq!(r.percent, None);
        assert!(r.failure_options.is_empty());
    }
}
