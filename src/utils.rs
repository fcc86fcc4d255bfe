//! Utility functions and helpers

use crate::error::{CsrfError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize URL
    pub fn validate_url(input: &str) -> Result<Url> {
        // Add http:// if no scheme is provided
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        let url = Url::parse(&url_str)
            .map_err(|e| CsrfError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))?;
        if url.host_str().is_none() {
            return Err(CsrfError::InvalidUrl(format!("URL '{}' has no host", input)));
        }
        Ok(url)
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand a leading `~` or `~/` to the home directory
    ///
    /// `~user` forms are left unchanged.
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        let rest = match path.strip_prefix('~') {
            Some("") => "",
            Some(rest) if rest.starts_with(['/', '\\']) => rest.trim_start_matches(['/', '\\']),
            _ => return Ok(PathBuf::from(path)),
        };
        let home_dir = dirs::home_dir()
            .ok_or_else(|| CsrfError::Config("Cannot determine home directory".to_string()))?;
        if rest.is_empty() {
            Ok(home_dir)
        } else {
            Ok(home_dir.join(rest))
        }
    }

    /// Check if file exists and is readable
    pub fn check_file_readable(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(CsrfError::FileNotFound(format!(
                "File not found: {:?}",
                path
            )));
        }

        if !path.is_file() {
            return Err(CsrfError::Config(format!("Path is not a file: {:?}", path)));
        }

        std::fs::File::open(path).map_err(|e| {
            CsrfError::PermissionDenied(format!("Cannot read file {:?}: {}", path, e))
        })?;

        Ok(())
    }
}
