// URL canonicalization: equivalent URLs must compare equal as strings.
//
// Scheme and host case are folded by the `url` parser itself; on top of that
// we drop default ports, trailing slashes, tracking parameters and fragments,
// and sort whatever query pairs remain.

use url::{form_urlencoded, ParseError, Url};

/// Query keys that never identify content.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid"];

/// Query key prefixes that never identify content.
const TRACKING_PREFIXES: &[&str] = &["utm_"];

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    TRACKING_PARAMS.contains(&key.as_str())
        || TRACKING_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Parse `raw`, assuming `https` when no scheme is given.
fn parse_lenient(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}")).ok(),
        Err(_) => None,
    }
}

/// Canonicalize a URL so that trivially different spellings collapse.
///
/// `HTTP://Example.com/Path/?b=2&utm_source=x&a=1#frag` becomes
/// `http://example.com/Path?a=1&b=2`. Path case is preserved. Input that
/// cannot be parsed as a hierarchical URL is returned trimmed.
pub fn canonicalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut url = match parse_lenient(trimmed) {
        Some(url) if !url.cannot_be_a_base() => url,
        _ => return trimmed.to_string(),
    };

    // Special schemes already elide their own default port; this catches
    // :80/:443 spelled out on everything else.
    if matches!(url.port(), Some(80) | Some(443)) {
        let _ = url.set_port(None);
    }

    let path = url.path().to_string();
    if path != "/" {
        url.set_path(path.trim_end_matches('/'));
    }

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    pairs.sort();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter())
            .finish();
        url.set_query(Some(&query));
    }

    url.set_fragment(None);
    url.to_string()
}

/// The host of a URL, lowercased, without port.
pub fn host_of(raw: &str) -> Option<String> {
    let url = parse_lenient(raw.trim())?;
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_ascii_lowercase)
}

/// The `host[:port]` part of a URL, lowercased. `None` when there is no host.
pub fn domain_of(raw: &str) -> Option<String> {
    let url = parse_lenient(raw.trim())?;
    let host = url.host_str()?.to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}
