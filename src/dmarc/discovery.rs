use tracing::{debug, warn};

use super::types::DmarcRecord;
use super::DmarcError;
use crate::common::dns::{DnsResolver, HickoryResolver};

/// Literal prefix that marks a TXT value as a DMARC record candidate.
pub const DMARC_RECORD_PREFIX: &str = "v=DMARC1";

/// Query `_dmarc.<domain>`, select the single DMARC record and parse it.
///
/// - NXDOMAIN or no TXT records → `Err(DmarcError::NoPolicy)`
/// - No TXT value starting with `v=DMARC1` → `Err(DmarcError::NoPolicy)`
/// - More than one such value → `Err(DmarcError::MultipleRecords)`
/// - Any other DNS failure → `Err(DmarcError::TempFail)`
/// - A candidate that fails to parse → `Err(DmarcError::Syntax)`
pub async fn lookup_dmarc_record<R: DnsResolver>(
    resolver: &R,
    domain: &str,
) -> Result<DmarcRecord, DmarcError> {
    let name = format!("_dmarc.{domain}");
    debug!(%name, "querying DMARC record");

    let txt_records = match resolver.query_txt(&name).await {
        Ok(records) => records,
        Err(e) if e.is_not_found() => return Err(DmarcError::NoPolicy),
        Err(e) => {
            warn!(%name, error = %e, "DMARC TXT lookup failed");
            return Err(DmarcError::TempFail(e.to_string()));
        }
    };

    let mut records = Vec::new();
    for txt in txt_records.iter().filter(|txt| txt.starts_with(DMARC_RECORD_PREFIX)) {
        records.push(DmarcRecord::parse(txt)?);
    }
    debug!(%name, txt = txt_records.len(), dmarc = records.len(), "filtered TXT records");

    match records.len() {
        0 => Err(DmarcError::NoPolicy),
        1 => Ok(records.remove(0)),
        _ => Err(DmarcError::MultipleRecords),
    }
}

/// [`lookup_dmarc_record`] through the host's configured DNS resolver.
pub async fn lookup(domain: &str) -> Result<DmarcRecord, DmarcError> {
    let resolver =
        HickoryResolver::from_system_conf().map_err(|e| DmarcError::TempFail(e.to_string()))?;
    lookup_dmarc_record(&resolver, domain).await
}
