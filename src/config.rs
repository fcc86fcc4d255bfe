//! Configuration management for csrf-cookie

use std::fmt;
use std::str::FromStr;

use crate::error::{CsrfError, Result};
use crate::source::CookieSource;

/// Cookie name Django uses for its CSRF token by default
pub const DEFAULT_COOKIE_NAME: &str = "csrftoken";

/// Request header Django reads the CSRF token from by default
pub const DEFAULT_HEADER_NAME: &str = "X-CSRFToken";

/// Environment variable holding the request's cookie header (CGI convention)
pub const DEFAULT_COOKIE_ENV: &str = "HTTP_COOKIE";

/// Browsers whose cookie stores can be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Browser {
    Firefox,
}

impl FromStr for Browser {
    type Err = CsrfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(Browser::Firefox),
            // Chromium-family and Safari stores are encrypted or binary formats.
            "chrome" | "chromium" | "edge" | "brave" | "opera" | "vivaldi" | "safari" => Err(
                CsrfError::Unsupported(format!("Reading {} cookies is not supported", s)),
            ),
            _ => Err(CsrfError::Config(format!("Unsupported browser: {}", s))),
        }
    }
}

/// Browser cookie configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookieConfig {
    pub browser: Browser,
    pub profile: Option<String>,
    /// Firefox container: a container name, `all`, or `None` for the
    /// default (no container) cookies
    pub container: Option<String>,
}

impl BrowserCookieConfig {
    /// Parse from `BROWSER[:PROFILE][::CONTAINER]`
    ///
    /// `PROFILE` is either a profile directory name or a path to a profile
    /// directory or cookie database.
    pub fn parse(input: &str) -> Result<Self> {
        let (browser_part, container) = match input.split_once("::") {
            Some((browser_part, container)) => (browser_part, non_empty(container)),
            None => (input, None),
        };
        let (browser_str, profile) = match browser_part.split_once(':') {
            Some((browser, profile)) => (browser, non_empty(profile)),
            None => (browser_part, None),
        };

        Ok(BrowserCookieConfig {
            browser: browser_str.parse()?,
            profile,
            container,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// How the prepared token is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The decoded value alone
    #[default]
    Value,
    /// A `Header-Name: value` line
    Header,
    /// A JSON object describing the lookup
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self {
            OutputFormat::Value => "value",
            OutputFormat::Header => "header",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", format)
    }
}

impl FromStr for OutputFormat {
    type Err = CsrfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "value" => Ok(OutputFormat::Value),
            "header" => Ok(OutputFormat::Header),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CsrfError::Config(format!(
                "Unknown output format: '{}'. Expected value, header or json",
                s
            ))),
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub cookie_name: String,
    pub header_name: String,
    pub source: CookieSource,
    pub format: OutputFormat,
    pub output_file: Option<std::path::PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            header_name: DEFAULT_HEADER_NAME.to_string(),
            source: CookieSource::Env(DEFAULT_COOKIE_ENV.to_string()),
            format: OutputFormat::default(),
            output_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Browser, BrowserCookieConfig, Config, OutputFormat};
    use crate::error::CsrfError;
    use crate::source::CookieSource;

    #[test]
    fn browser_config_parses_profile() {
        let config = BrowserCookieConfig::parse("firefox:default-release").expect("config");
        assert_eq!(config.browser, Browser::Firefox);
        assert_eq!(config.profile.as_deref(), Some("default-release"));

        let config = BrowserCookieConfig::parse("Firefox").expect("config");
        assert_eq!(config.profile, None);
    }

    #[test]
    fn browser_config_keeps_windows_paths_whole() {
        let config = BrowserCookieConfig::parse("firefox:C:\\Profiles\\x").expect("config");
        assert_eq!(config.profile.as_deref(), Some("C:\\Profiles\\x"));
    }

    #[test]
    fn browser_config_parses_container() {
        let config = BrowserCookieConfig::parse("firefox:work-profile::Work").expect("config");
        assert_eq!(config.profile.as_deref(), Some("work-profile"));
        assert_eq!(config.container.as_deref(), Some("Work"));

        let config = BrowserCookieConfig::parse("firefox::all").expect("config");
        assert_eq!(config.profile, None);
        assert_eq!(config.container.as_deref(), Some("all"));

        let config = BrowserCookieConfig::parse("firefox:/tmp/p").expect("config");
        assert_eq!(config.container, None);
    }

    #[test]
    fn browser_config_rejects_other_browsers() {
        let err = BrowserCookieConfig::parse("chrome").expect_err("unsupported");
        assert!(matches!(err, CsrfError::Unsupported(_)));
        let err = BrowserCookieConfig::parse("netscape").expect_err("unknown");
        assert!(matches!(err, CsrfError::Config(_)));
    }

    #[test]
    fn output_format_round_trips_names() {
        for format in [OutputFormat::Value, OutputFormat::Header, OutputFormat::Json] {
            assert_eq!(format.to_string().parse::<OutputFormat>().expect("format"), format);
        }
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn default_config_reads_django_cookie_from_env() {
        let config = Config::default();
        assert_eq!(config.cookie_name, "csrftoken");
        assert_eq!(config.header_name, "X-CSRFToken");
        assert_eq!(config.source, CookieSource::Env("HTTP_COOKIE".to_string()));
    }
}
