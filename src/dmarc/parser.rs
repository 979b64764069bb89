use std::collections::HashMap;
use std::time::Duration;

use super::types::{
    AlignmentMode, DmarcRecord, FailureOptions, Policy, ReportFormat, DEFAULT_REPORT_INTERVAL,
};
use super::DmarcParseError;

/// Tags defined by RFC 7489 §6.3. Only these take part in duplicate detection.
pub const RFC_SUPPORTED_TAGS: &[&str] = &[
    "v", "p", "adkim", "aspf", "fo", "pct", "rf", "ri", "rua", "ruf", "sp",
];

impl DmarcRecord {
    /// Parse a DMARC TXT record string into a DmarcRecord.
    ///
    /// Tag names and values are lower-cased before interpretation, URIs
    /// included. Syntax noise is tolerated where RFC 7489 prefers defaults:
    /// segments without `=`, a non-numeric `pct` or `ri`, and an invalid `sp`.
    pub fn parse(txt: &str) -> Result<Self, DmarcParseError> {
        let tags = parse_tags(txt)?;

        if !tags.get("v").is_some_and(|v| v.eq_ignore_ascii_case("DMARC1")) {
            return Err(DmarcParseError::UnsupportedVersion);
        }

        let policy = match tags.get("p") {
            Some(p) => parse_policy(p, "p")?,
            None => return Err(DmarcParseError::MissingPolicy),
        };

        let mut record = DmarcRecord::with_policy(policy);

        if let Some(adkim) = tags.get("adkim") {
            record.dkim_alignment = parse_alignment(adkim, "adkim")?;
        }
        if let Some(aspf) = tags.get("aspf") {
            record.spf_alignment = parse_alignment(aspf, "aspf")?;
        }
        if let Some(fo) = tags.get("fo") {
            record.failure_options = parse_failure_options(fo)?;
        }
        if let Some(pct) = tags.get("pct") {
            record.percent = Some(parse_pct(pct)?);
        }
        if let Some(rf) = tags.get("rf") {
            record.report_format = parse_report_formats(rf)?;
        }
        if let Some(ri) = tags.get("ri") {
            record.report_interval = parse_ri(ri)?;
        }
        if let Some(rua) = tags.get("rua") {
            record.report_uri_aggregate = parse_uri_list(rua);
        }
        if let Some(ruf) = tags.get("ruf") {
            record.report_uri_failure = parse_uri_list(ruf);
        }

        // Empty or non-standard sp= is treated as absent: inherit p=.
        if let Some(sp) = tags.get("sp") {
            record.subdomain_policy = Policy::parse(sp).unwrap_or(policy);
        }

        Ok(record)
    }
}

/// Parse a raw DMARC TXT value. Same as [`DmarcRecord::parse`].
pub fn parse_dmarc_record(txt: &str) -> Result<DmarcRecord, DmarcParseError> {
    DmarcRecord::parse(txt)
}

/// Build the tag map. Splits on `;`, then on the first `=` only, so URI
/// values may contain `=`.
fn parse_tags(txt: &str) -> Result<HashMap<String, String>, DmarcParseError> {
    let mut tags: HashMap<String, String> = HashMap::new();

    for part in txt.split(';') {
        let Some((tag, value)) = part.split_once('=') else {
            continue;
        };
        let tag = tag.trim().to_lowercase();
        let value = value.trim().to_lowercase();

        if let Some(existing) = tags.get(&tag) {
            if RFC_SUPPORTED_TAGS.contains(&tag.as_str()) && *existing != value {
                return Err(DmarcParseError::DuplicateTag(tag));
            }
        }

        tags.insert(tag, value);
    }

    Ok(tags)
}

fn parse_policy(value: &str, tag: &'static str) -> Result<Policy, DmarcParseError> {
    Policy::parse(value).ok_or(DmarcParseError::InvalidPolicy { tag })
}

fn parse_alignment(value: &str, tag: &'static str) -> Result<AlignmentMode, DmarcParseError> {
    AlignmentMode::parse(value).ok_or(DmarcParseError::InvalidAlignment { tag })
}

/// Colon-separated `0`, `1`, `d`, `s`. One bad token rejects the record.
fn parse_failure_options(value: &str) -> Result<FailureOptions, DmarcParseError> {
    let mut opts = FailureOptions::empty();
    for token in value.split(':') {
        let token = token.trim();
        let flag = FailureOptions::from_token(token)
            .ok_or_else(|| DmarcParseError::InvalidFailureOption(token.to_string()))?;
        opts |= flag;
    }
    Ok(opts)
}

/// Non-numeric → 100. A number outside 0..=100 is an error.
fn parse_pct(value: &str) -> Result<u8, DmarcParseError> {
    let pct = value.parse::<i64>().unwrap_or(100);
    u8::try_from(pct)
        .ok()
        .filter(|pct| *pct <= 100)
        .ok_or(DmarcParseError::PercentOutOfRange(pct))
}

fn parse_report_formats(value: &str) -> Result<Vec<ReportFormat>, DmarcParseError> {
    value
        .split(':')
        .map(|format| {
            ReportFormat::parse(format)
                .ok_or_else(|| DmarcParseError::InvalidReportFormat(format.to_string()))
        })
        .collect()
}

/// Non-numeric → 86400 seconds. Zero or negative is an error.
fn parse_ri(value: &str) -> Result<Duration, DmarcParseError> {
    match value.parse::<i64>() {
        Err(_) => Ok(DEFAULT_REPORT_INTERVAL),
        Ok(secs) if secs <= 0 => Err(DmarcParseError::NonPositiveInterval(secs)),
        Ok(secs) => Ok(Duration::from_secs(secs.unsigned_abs())),
    }
}

fn parse_uri_list(value: &str) -> Vec<String> {
    value.split(',').map(|uri| uri.trim().to_string()).collect()
}
