//! Browser cookie store access
//!
//! Reads the cookies a browser holds on disk and assembles the `Cookie`
//! header it would send to a given URL.

use crate::config::{Browser, BrowserCookieConfig};
use crate::error::{CsrfError, Result};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

pub mod firefox;

/// Represents a browser cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub expires: Option<i64>,
    /// Creation time in microseconds since the Unix epoch, 0 when unknown
    pub creation_time: i64,
}

/// Cookies grouped by the host they were stored for
pub type CookieStore = HashMap<String, Vec<Cookie>>;

/// Main interface for reading browser cookies
pub struct BrowserCookieExtractor {
    config: BrowserCookieConfig,
}

impl BrowserCookieExtractor {
    /// Create a new cookie extractor with the given configuration
    pub fn new(config: BrowserCookieConfig) -> Self {
        Self { config }
    }

    /// Read every cookie from the configured browser
    pub fn extract_cookies(&self) -> Result<CookieStore> {
        match self.config.browser {
            Browser::Firefox => firefox::extract_cookies(&self.config),
        }
    }

    /// Build the `Cookie` header the browser would send to `url`
    pub fn header_for_url(&self, url: &Url) -> Result<Option<String>> {
        let store = self.extract_cookies()?;
        let cookies = cookies_for_url(&store, url, unix_now());
        log::debug!(
            "{} of the browser's cookies apply to {}",
            cookies.len(),
            url.as_str()
        );
        if cookies.is_empty() {
            return Ok(None);
        }
        Ok(Some(cookies_to_header(&cookies)))
    }
}

/// Select the cookies a browser would attach to a request for `url`.
///
/// Cookies with longer paths come first and, among equal paths, older
/// cookies first (RFC 6265 section 5.4). Host, name and value break any
/// remaining tie so the result never depends on the store's hash order.
pub fn cookies_for_url(store: &CookieStore, url: &Url, now: i64) -> Vec<Cookie> {
    let host = match url.host_str() {
        Some(host) => host.to_ascii_lowercase(),
        None => return Vec::new(),
    };
    let is_https = url.scheme() == "https";
    let request_path = url.path();

    let mut selected: Vec<Cookie> = store
        .values()
        .flatten()
        .filter(|cookie| domain_matches(&host, &cookie.domain))
        .filter(|cookie| path_matches(request_path, &cookie.path))
        .filter(|cookie| is_https || !cookie.secure)
        .filter(|cookie| cookie.expires.is_none_or(|expires| expires > now))
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        b.path
            .len()
            .cmp(&a.path.len())
            .then(a.creation_time.cmp(&b.creation_time))
            .then_with(|| a.domain.cmp(&b.domain))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.value.cmp(&b.value))
    });
    selected
}

/// Convert cookies to HTTP header format
pub fn cookies_to_header(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn domain_matches(host: &str, cookie_domain: &str) -> bool {
    let cookie_domain = cookie_domain.to_ascii_lowercase();
    match cookie_domain.strip_prefix('.') {
        Some(base) => {
            host == base
                || host
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => host == cookie_domain,
    }
}

fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    if cookie_path.is_empty() || request_path == cookie_path {
        return true;
    }
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

pub(crate) fn map_cookie_io_error(context: &str, path: &Path, err: std::io::Error) -> CsrfError {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => {
            CsrfError::PermissionDenied(format!("{} {:?}: {}", context, path, err))
        }
        std::io::ErrorKind::NotFound => {
            CsrfError::FileNotFound(format!("{} {:?}: {}", context, path, err))
        }
        _ => CsrfError::BrowserCookie(format!("{} {:?}: {}", context, path, err)),
    }
}
