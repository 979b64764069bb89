use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::{matcher, PslError};
use crate::config::SuffixListConfig;

/// Canonical location of the Public Suffix List.
pub const PUBLIC_SUFFIX_LIST_URL: &str = "https://publicsuffix.org/list/public_suffix_list.dat";

/// Public Suffix List rules, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixRules {
    /// Exact rules (`com`, `co.uk`).
    pub suffixes: Vec<String>,
    /// Wildcard rules with the leading `*.` removed.
    pub wildcards: Vec<String>,
    /// Exception rules with the leading `!` removed.
    pub exceptions: Vec<String>,
}

impl SuffixRules {
    /// Tokenize a list body. Never fails: every non-blank, non-comment line
    /// becomes a rule.
    pub fn parse(body: &str) -> Self {
        let mut rules = SuffixRules::default();

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if let Some(wildcard) = line.strip_prefix("*.") {
                rules.wildcards.push(wildcard.to_string());
            } else if let Some(exception) = line.strip_prefix('!') {
                rules.exceptions.push(exception.to_string());
            } else {
                rules.suffixes.push(line.to_string());
            }
        }

        rules
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty() && self.wildcards.is_empty() && self.exceptions.is_empty()
    }

    /// See [`resolve_registrable_domain`](super::resolve_registrable_domain).
    pub fn registrable_domain(&self, domain: &str) -> Result<String, PslError> {
        matcher::resolve_registrable_domain(domain, &self.suffixes, &self.wildcards, &self.exceptions)
    }
}

/// Retrieval of a raw list body.
pub trait SuffixListSource: Send + Sync {
    fn fetch_body(&self) -> impl Future<Output = Result<String, PslError>> + Send;
}

/// Fetches the list over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSuffixListSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSuffixListSource {
    pub fn from_config(config: &SuffixListConfig) -> Result<Self, PslError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PslError::Fetch(format!("building HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SuffixListSource for HttpSuffixListSource {
    async fn fetch_body(&self) -> Result<String, PslError> {
        debug!(url = %self.url, "fetching public suffix list");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "public suffix list request failed");
                PslError::Fetch(e.to_string())
            })?;

        response.text().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "reading public suffix list body failed");
            PslError::Fetch(e.to_string())
        })
    }
}

/// Fetch a list body from `source` and tokenize it.
pub async fn load_suffix_list<S: SuffixListSource>(source: &S) -> Result<SuffixRules, PslError> {
    let body = source.fetch_body().await?;
    let rules = SuffixRules::parse(&body);
    debug!(
        suffixes = rules.suffixes.len(),
        wildcards = rules.wildcards.len(),
        exceptions = rules.exceptions.len(),
        "loaded public suffix list"
    );
    Ok(rules)
}

/// Fetch and tokenize the list at `url` with default HTTP settings.
pub async fn fetch_suffix_list(url: &str) -> Result<SuffixRules, PslError> {
    let source = HttpSuffixListSource::from_config(&SuffixListConfig::with_url(url))?;
    load_suffix_list(&source).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE: &str = "\
// ===BEGIN ICANN DOMAINS===

// ac : https://en.wikipedia.org/wiki/.ac
ac
com.ac

// ck : https://en.wikipedia.org/wiki/.ck
*.ck
!www.ck

  uk
co.uk
";

    struct StaticSource(&'static str);

    impl SuffixListSource for StaticSource {
        async fn fetch_body(&self) -> Result<String, PslError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSource;

    impl SuffixListSource for FailingSource {
        async fn fetch_body(&self) -> Result<String, PslError> {
            Err(PslError::Fetch("connection refused".into()))
        }
    }

    #[test]
    fn parse_splits_rule_kinds() {
        let rules = SuffixRules::parse(SAMPLE);
        assert_eq!(rules.suffixes, vec!["ac", "com.ac", "uk", "co.uk"]);
        assert_eq!(rules.wildcards, vec!["ck"]);
        assert_eq!(rules.exceptions, vec!["www.ck"]);
    }

    #[test]
    fn parse_skips_blank_and_comment_lines() {
        let rules = SuffixRules::parse("\n   \n// comment\n\t\n");
        assert!(rules.is_empty());
    }

    #[test]
    fn parse_keeps_unrecognized_lines_verbatim() {
        let rules = SuffixRules::parse("*foo\n!\n*.\nxn--p1ai\n");
        assert_eq!(rules.suffixes, vec!["*foo", "xn--p1ai"]);
        assert_eq!(rules.exceptions, vec![""]);
        assert_eq!(rules.wildcards, vec![""]);
    }

    #[test]
    fn parse_handles_crlf() {
        let rules = SuffixRules::parse("com\r\n*.kh\r\n");
        assert_eq!(rules.suffixes, vec!["com"]);
        assert_eq!(rules.wildcards, vec!["kh"]);
    }

    #[test]
    fn registrable_domain_uses_parsed_rules() {
        let rules = SuffixRules::parse(SAMPLE);
        assert_eq!(rules.registrable_domain("mail.example.co.uk").unwrap(), "example.co.uk");
        assert_eq!(rules.registrable_domain("www.ck").unwrap(), "www.ck");
        assert!(matches!(
            rules.registrable_domain("example.test"),
            Err(PslError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn load_from_injected_source() {
        let rules = load_suffix_list(&StaticSource("com\n*.ck\n")).await.unwrap();
        assert_eq!(rules.suffixes, vec!["com"]);
        assert_eq!(rules.wildcards, vec!["ck"]);
    }

    #[tokio::test]
    async fn load_propagates_source_error() {
        let err = load_suffix_list(&FailingSource).await.unwrap_err();
        assert!(matches!(err, PslError::Fetch(_)));
    }

    #[tokio::test]
    async fn fetch_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list/public_suffix_list.dat"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
            .mount(&server)
            .await;

        let url = format!("{}/list/public_suffix_list.dat", server.uri());
        let rules = fetch_suffix_list(&url).await.unwrap();
        assert_eq!(rules, SuffixRules::parse(SAMPLE));
    }

    #[tokio::test]
    async fn fetch_http_error_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.dat", server.uri());
        let err = fetch_suffix_list(&url).await.unwrap_err();
        assert!(matches!(err, PslError::Fetch(_)));
    }

    #[tokio::test]
    async fn fetch_unreachable_host_fails() {
        // Reserve a free port, then release it so nothing is listening there.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let err = fetch_suffix_list(&format!("http://{addr}/list.dat"))
            .await
            .unwrap_err();
        assert!(matches!(err, PslError::Fetch(_)));
    }

    #[test]
    fn http_source_from_config() {
        let source = HttpSuffixListSource::from_config(&SuffixListConfig::default()).unwrap();
        assert_eq!(source.url(), PUBLIC_SUFFIX_LIST_URL);
    }
}
