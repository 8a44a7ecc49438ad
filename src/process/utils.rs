use anyhow::{anyhow, Result};
use tracing::warn;
use url::{ParseError, Url};

/// Reduce a backlink URL to the domain used as the comparison key.
///
/// 1) trim + lowercase
/// 2) keep only the network location (host, plus port when present)
/// 3) drop every `www.` substring, wherever it occurs in the host
///
/// Never fails: input that doesn't yield a host comes back trimmed and
/// lowercased, with a warning.
pub fn normalize_url(raw: impl AsRef<str>) -> String {
    let raw = raw.as_ref();
    let cleaned = raw.trim().to_lowercase();
    if cleaned.is_empty() {
        return cleaned;
    }

    match extract_netloc(&cleaned) {
        // Not anchored to the start: "foowww.bar.com" becomes "foobar.com".
        Ok(netloc) => netloc.replace("www.", ""),
        Err(e) => {
            warn!("could not normalize URL '{}': {}", raw, e);
            cleaned
        }
    }
}

/// `host[:port]` of `s`. Scheme-less input ("example.com/path",
/// "www.x.com:8080/p") is read as an http URL so that bare domains map onto
/// themselves.
fn extract_netloc(s: &str) -> Result<String> {
    let url = match Url::parse(s) {
        Ok(u) if u.host_str().is_none() && is_bare_host_port(s) => {
            Url::parse(&format!("http://{}", s))?
        }
        Ok(u) => u,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{}", s))?,
        Err(e) => return Err(e.into()),
    };

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow!("no host in '{}'", s))?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// `host:port...` with no `://`: the URL parser reads the host as a scheme.
/// `mailto:x@y.com` doesn't qualify: no port digits follow the colon.
fn is_bare_host_port(s: &str) -> bool {
    if s.contains("://") {
        return false;
    }
    s.split_once(':')
        .map(|(_, rest)| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(false)
}
