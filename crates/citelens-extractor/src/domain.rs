//! Domain resolution for cited URLs

use url::Url;

/// Resolve a URL to its bare hostname, without a leading `www.`.
///
/// Unparsable input falls back to the third `/`-separated segment (the
/// authority of `scheme://host/...`); input with no `//` is read as if it
/// were prefixed with `http://`, so its first segment is the host. When
/// neither yields a host the input is returned unchanged.
pub fn resolve_domain(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) if !host.is_empty() => strip_www(host).to_string(),
            _ => raw.to_string(),
        },
        Err(_) => fallback_host(raw)
            .map(|host| strip_www(host).to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

fn fallback_host(raw: &str) -> Option<&str> {
    let segment = if raw.contains("//") {
        raw.split('/').nth(2)
    } else {
        raw.split('/').next()
    };

    segment.map(str::trim).filter(|s| !s.is_empty())
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
