//! Prepared CSRF token
//!
//! [`CsrfToken`] is the result of looking the CSRF cookie up once. It is
//! meant to be built at startup and handed by reference to whatever issues
//! requests. For code that cannot take it as a parameter, [`install`] keeps a
//! single process-wide copy that is written at most once.

use std::sync::OnceLock;

use serde::Serialize;

use crate::cookie::get_cookie;
use crate::source::CookieSource;

static GLOBAL_TOKEN: OnceLock<CsrfToken> = OnceLock::new();

/// CSRF cookie value read once from a cookie header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsrfToken {
    cookie_name: String,
    value: Option<String>,
}

impl CsrfToken {
    /// Look `cookie_name` up in `header` and log the outcome.
    ///
    /// Never fails; a missing cookie yields a token without a value.
    pub fn prepare(header: Option<&str>, cookie_name: &str) -> Self {
        let token = CsrfToken {
            cookie_name: cookie_name.to_string(),
            value: get_cookie(header, cookie_name),
        };
        token.log_outcome();
        token
    }

    /// Read the cookie header from `source` and prepare the token.
    ///
    /// A source that cannot be read counts as having no cookies.
    pub fn load(source: &CookieSource, cookie_name: &str) -> Self {
        let header = match source.read_header() {
            Ok(header) => header,
            Err(err) => {
                log::warn!("Could not read cookies from {}: {}", source.describe(), err);
                None
            }
        };
        if header.is_none() {
            log::debug!("No cookie header available from {}", source.describe());
        }
        Self::prepare(header.as_deref(), cookie_name)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// The decoded cookie value, if the cookie was found
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// Whether the value has the shape Django issues: 32 or 64 ASCII
    /// alphanumerics (unmasked secret or masked token).
    pub fn is_well_formed(&self) -> bool {
        self.value.as_deref().is_some_and(|value| {
            matches!(value.len(), 32 | 64) && value.bytes().all(|b| b.is_ascii_alphanumeric())
        })
    }

    /// Header name/value pair carrying the token on a request
    pub fn header(&self, header_name: &str) -> Option<(String, String)> {
        self.value
            .as_ref()
            .map(|value| (header_name.to_string(), value.clone()))
    }

    fn log_outcome(&self) {
        if !self.is_present() {
            log::warn!(
                "CSRF cookie '{}' not found; requests needing CSRF protection will be rejected",
                self.cookie_name
            );
            return;
        }
        log::info!("CSRF token prepared from cookie '{}'", self.cookie_name);
        if !self.is_well_formed() {
            log::warn!(
                "CSRF cookie '{}' does not look like a Django token",
                self.cookie_name
            );
        }
    }
}

/// Store `token` as the process-wide CSRF token.
///
/// Only the first call stores anything; later calls return the token that is
/// already installed.
pub fn install(token: CsrfToken) -> &'static CsrfToken {
    let mut stored = false;
    let installed = GLOBAL_TOKEN.get_or_init(|| {
        stored = true;
        token
    });
    if !stored {
        log::debug!("CSRF token already installed; keeping the first one");
    }
    installed
}

/// The process-wide CSRF token, if [`install`] has run
pub fn global() -> Option<&'static CsrfToken> {
    GLOBAL_TOKEN.get()
}

/// Load the token for `cookie_name` from `source` and install it process-wide.
pub fn init(source: &CookieSource, cookie_name: &str) -> &'static CsrfToken {
    if let Some(existing) = global() {
        return existing;
    }
    install(CsrfToken::load(source, cookie_name))
}
