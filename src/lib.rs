//! csrf-cookie - read a CSRF token from a cookie header
//!
//! This crate looks up a single named cookie (Django's `csrftoken` by
//! default) in a `Cookie` header taken from the command line, the
//! environment, a file, or a browser's cookie store, so that other tools can
//! echo it back on requests protected against cross-site request forgery.

pub mod browser;
pub mod cli;
pub mod config;
pub mod cookie;
pub mod error;
pub mod exit_code;
pub mod logging;
pub mod output;
pub mod source;
pub mod token;
pub mod utils;

pub use cookie::get_cookie;
pub use error::{CsrfError, Result};
pub use token::CsrfToken;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
