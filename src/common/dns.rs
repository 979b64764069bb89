use std::future::Future;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::{ResolveError, TokioResolver};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    #[error("NXDOMAIN: domain does not exist")]
    NxDomain,
    #[error("no records of the requested type")]
    NoRecords,
    #[error("SERVFAIL: server failure")]
    ServFail,
    #[error("timeout")]
    Timeout,
    #[error("DNS error: {0}")]
    Other(String),
}

impl DnsError {
    /// True when the name (or the record type) definitively does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DnsError::NxDomain | DnsError::NoRecords)
    }
}

/// TXT lookup capability. Implement it to substitute canned or cached answers.
pub trait DnsResolver: Send + Sync {
    fn query_txt(&self, domain: &str) -> impl Future<Output = Result<Vec<String>, DnsError>> + Send;
}

/// Hickory DNS resolver implementation
#[derive(Clone)]
pub struct HickoryResolver {
    resolver: TokioResolver,
}

impl HickoryResolver {
    /// Resolver using hickory's built-in upstream defaults.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default(), ResolverOpts::default())
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build();
        Self { resolver }
    }

    /// Resolver configured from the host (`/etc/resolv.conf` or the platform equivalent).
    pub fn from_system_conf() -> Result<Self, DnsError> {
        let (config, opts) = hickory_resolver::system_conf::read_system_conf()
            .map_err(|e| DnsError::Other(format!("reading system resolver config: {e}")))?;
        Ok(Self::with_config(config, opts))
    }

    fn classify_error(e: &ResolveError) -> DnsError {
        if let Some(proto) = e.proto() {
            match proto.kind() {
                ProtoErrorKind::NoRecordsFound { response_code, .. } => {
                    return classify_response_code(*response_code);
                }
                ProtoErrorKind::Timeout => return DnsError::Timeout,
                _ => {}
            }
        }
        DnsError::Other(e.to_string())
    }
}

/// Hickory reports every empty answer as `NoRecordsFound`, whatever the rcode.
/// Only NXDOMAIN and NOERROR/NODATA mean the record is absent.
fn classify_response_code(code: ResponseCode) -> DnsError {
    match code {
        ResponseCode::NXDomain => DnsError::NxDomain,
        ResponseCode::NoError => DnsError::NoRecords,
        ResponseCode::ServFail => DnsError::ServFail,
        other => DnsError::Other(format!("response code {other}")),
    }
}

impl Default for HickoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsResolver for HickoryResolver {
    async fn query_txt(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        match self.resolver.txt_lookup(domain).await {
            // A TXT record may be split into several character-strings; join them.
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|txt| {
                    txt.iter()
                        .map(|part| String::from_utf8_lossy(part))
                        .collect::<String>()
                })
                .collect()),
            Err(e) => Err(Self::classify_error(&e)),
        }
    }
}

pub mod mock {
    use std::collections::HashMap;

    use super::{DnsError, DnsResolver};

    /// Canned TXT answers keyed by lower-cased name. Unknown names answer NXDOMAIN.
    #[derive(Debug, Clone, Default)]
    pub struct MockResolver {
        txt: HashMap<String, Result<Vec<String>, DnsError>>,
    }

    impl MockResolver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_txt(&mut self, domain: &str, records: Vec<String>) {
            self.txt.insert(domain.to_lowercase(), Ok(records));
        }

        pub fn add_txt_err(&mut self, domain: &str, err: DnsError) {
            self.txt.insert(domain.to_lowercase(), Err(err));
        }
    }

    impl DnsResolver for MockResolver {
        async fn query_txt(&self, domain: &str) -> Result<Vec<String>, DnsError> {
            self.txt
                .get(&domain.to_lowercase())
                .cloned()
                .unwrap_or(Err(DnsError::NxDomain))
        }
    }
}
