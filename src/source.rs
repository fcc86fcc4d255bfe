//! Cookie header sources
//!
//! A source produces the raw `Cookie` header text the extractor scans. All of
//! them report "nothing there" as `Ok(None)` and only genuine read failures
//! as errors.

use std::path::PathBuf;

use crate::browser::BrowserCookieExtractor;
use crate::config::BrowserCookieConfig;
use crate::error::Result;
use crate::utils::{FileUtils, UrlUtils};

/// Where the cookie header comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieSource {
    /// Literal header text
    Header(String),
    /// Name of an environment variable holding the header
    Env(String),
    /// File containing the header, optionally prefixed with `Cookie:`
    File(PathBuf),
    /// Cookies a browser would send to `url`
    Browser {
        config: BrowserCookieConfig,
        url: String,
    },
}

impl CookieSource {
    /// Read the raw cookie header from this source
    pub fn read_header(&self) -> Result<Option<String>> {
        match self {
            CookieSource::Header(header) => Ok(Some(header.clone())),
            CookieSource::Env(var) => Ok(std::env::var(var).ok()),
            CookieSource::File(path) => {
                FileUtils::check_file_readable(path)?;
                let contents = std::fs::read_to_string(path)?;
                Ok(Some(strip_header_prefix(&contents).to_string()))
            }
            CookieSource::Browser { config, url } => {
                let url = UrlUtils::validate_url(url)?;
                BrowserCookieExtractor::new(config.clone()).header_for_url(&url)
            }
        }
    }

    /// Short human readable description for diagnostics
    pub fn describe(&self) -> String {
        match self {
            CookieSource::Header(_) => "command line header".to_string(),
            CookieSource::Env(var) => format!("environment variable {}", var),
            CookieSource::File(path) => format!("file {:?}", path),
            CookieSource::Browser { config, url } => {
                format!("{:?} cookies for {}", config.browser, url)
            }
        }
    }
}

fn strip_header_prefix(contents: &str) -> &str {
    let trimmed = contents.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("cookie:") => trimmed[7..].trim_start(),
        _ => trimmed,
    }
}
