use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Checks that a candidate is a structurally well-formed absolute URI
///
/// Strings carrying unescaped whitespace or control characters are rejected
/// outright, even though a lenient parser would percent-encode them.
///
/// # Examples
///
/// ```
/// use pdf_gather::url::is_url_valid;
///
/// assert!(is_url_valid("https://example.com/manual.pdf"));
/// assert!(!is_url_valid("not a url"));
/// assert!(!is_url_valid("/relative/path.pdf"));
/// ```
pub fn is_url_valid(candidate: &str) -> bool {
    parse_strict(candidate).is_ok()
}

/// Checks that a candidate parses and names a non-empty host
///
/// # Examples
///
/// ```
/// use pdf_gather::url::has_domain;
///
/// assert!(has_domain("https://example.com/manual.pdf"));
/// assert!(!has_domain("mailto:docs@example.com"));
/// ```
pub fn has_domain(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => url.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}

/// Applies both predicates in order and returns the parsed URL
///
/// # Returns
///
/// * `Ok(Url)` - The candidate is safe to hand to the downloader
/// * `Err(UrlError::Malformed)` - The candidate is not a well-formed URI
/// * `Err(UrlError::MissingDomain)` - The candidate is relative or has no host
pub fn validate_candidate(candidate: &str) -> UrlResult<Url> {
    let url = parse_strict(candidate)?;

    if !url.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

fn parse_strict(candidate: &str) -> UrlResult<Url> {
    if candidate.is_empty() {
        return Err(UrlError::Malformed("empty string".to_string()));
    }

    if let Some(c) = candidate
        .chars()
        .find(|c| c.is_whitespace() || c.is_control())
    {
        return Err(UrlError::Malformed(format!(
            "unescaped character {:?} in '{}'",
            c, candidate
        )));
    }

    Url::parse(candidate).map_err(|e| match e {
        // A bare path parses fine against a base; what it lacks is the host
        ParseError::RelativeUrlWithoutBase => UrlError::MissingDomain,
        e => UrlError::Malformed(format!("{}: {}", candidate, e)),
    })
}
