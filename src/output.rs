//! Output formatting and display utilities

use crate::config::OutputFormat;
use crate::error::Result;
use crate::token::CsrfToken;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct JsonReport<'a> {
    cookie_name: &'a str,
    value: Option<&'a str>,
    present: bool,
    well_formed: bool,
}

/// Render `token` in the requested format.
///
/// Returns `None` when there is nothing to print, which only happens for the
/// value and header formats when the cookie is absent.
pub fn render(
    token: &CsrfToken,
    header_name: &str,
    format: OutputFormat,
) -> Result<Option<String>> {
    match format {
        OutputFormat::Value => Ok(token.value().map(str::to_string)),
        OutputFormat::Header => Ok(token
            .header(header_name)
            .map(|(name, value)| format!("{}: {}", name, value))),
        OutputFormat::Json => {
            let report = JsonReport {
                cookie_name: token.cookie_name(),
                value: token.value(),
                present: token.is_present(),
                well_formed: token.is_well_formed(),
            };
            Ok(Some(serde_json::to_string(&report)?))
        }
    }
}

/// Output writer that handles file vs stdout
pub struct OutputWriter {
    file: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    /// Write one line of content to the configured output
    pub fn write_line(&self, content: &str) -> Result<()> {
        let line = format!("{}\n", content);
        match &self.file {
            Some(file_path) => self.write_to_file(&line, file_path),
            None => self.write_to_stdout(&line),
        }
    }

    fn write_to_file(&self, content: &str, file_path: &Path) -> Result<()> {
        let mut file = File::create(file_path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_to_stdout(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
