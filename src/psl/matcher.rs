use super::PslError;

/// Determine the registrable domain (public suffix plus one label).
///
/// Candidates are tried from the whole domain down to its last label, so the
/// first hit is the longest matching suffix. At each position an exact rule is
/// tried first (ASCII case-insensitive), then wildcard rules.
///
/// Wildcard rules match by raw string suffix, so `ck` also matches `tick`, and
/// exceptions match by substring. Both comparisons are case-sensitive; callers
/// that need case-insensitive wildcard handling should lower-case the domain
/// first.
///
/// A matching exception is returned verbatim. Otherwise the label before the
/// matched suffix is prepended, unless the match covers the whole domain, in
/// which case the domain is returned unchanged.
pub fn resolve_registrable_domain<S: AsRef<str>>(
    domain: &str,
    suffixes: &[S],
    wildcards: &[S],
    exceptions: &[S],
) -> Result<String, PslError> {
    let labels: Vec<&str> = domain.split('.').collect();

    for i in 0..labels.len() {
        let candidate = labels[i..].join(".");

        if suffixes
            .iter()
            .any(|suffix| candidate.eq_ignore_ascii_case(suffix.as_ref()))
        {
            return Ok(plus_one(domain, &labels, i));
        }

        if wildcards
            .iter()
            .any(|wildcard| candidate.ends_with(AsRef::<str>::as_ref(wildcard)))
        {
            for exception in exceptions {
                let exception: &str = exception.as_ref();
                if candidate.contains(exception) {
                    return Ok(exception.to_string());
                }
            }
            return Ok(plus_one(domain, &labels, i));
        }
    }

    Err(PslError::NotFound(domain.to_string()))
}

fn plus_one(domain: &str, labels: &[&str], matched_at: usize) -> String {
    if matched_at == 0 {
        domain.to_string()
    } else {
        labels[matched_at - 1..].join(".")
    }
}
