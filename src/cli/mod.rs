//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry point.

use crate::config::{
    BrowserCookieConfig, Config, OutputFormat, DEFAULT_COOKIE_ENV, DEFAULT_COOKIE_NAME,
    DEFAULT_HEADER_NAME,
};
use crate::error::{CsrfError, Result};
use crate::exit_code::exit_code_for_error;
use crate::output::{render, OutputWriter};
use crate::source::CookieSource;
use crate::token;
use crate::utils::FileUtils;
use clap::{Arg, ArgAction, ArgMatches, Command};

/// Main entry point for the CLI application
pub fn run() {
    let matches = create_app().get_matches();
    let silent = matches.get_flag("silent");
    crate::logging::init(log_level(&matches));

    if let Err(e) = run_with_args(&matches) {
        if !silent {
            eprintln!("csrf-cookie: error: {}", e);
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn log_level(matches: &ArgMatches) -> &'static str {
    if matches.get_flag("silent") {
        "error"
    } else if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    }
}

/// Run csrf-cookie with parsed command line arguments
fn run_with_args(matches: &ArgMatches) -> Result<()> {
    let config = build_config_from_args(matches)?;
    log::debug!("Reading cookies from {}", config.source.describe());

    let token = token::init(&config.source, &config.cookie_name);
    let writer = OutputWriter::new(config.output_file.clone());
    if let Some(rendered) = render(token, &config.header_name, config.format)? {
        writer.write_line(&rendered)?;
    }

    if token.is_present() || config.format == OutputFormat::Json {
        Ok(())
    } else {
        Err(CsrfError::TokenNotFound(config.cookie_name))
    }
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("csrf-cookie")
        .version(crate::VERSION)
        .about("Read a CSRF token from a cookie header or browser cookie store")
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .env("CSRF_COOKIE_NAME")
                .help("Name of the cookie holding the token")
                .default_value(DEFAULT_COOKIE_NAME),
        )
        .arg(
            Arg::new("cookie")
                .short('b')
                .long("cookie")
                .value_name("HEADER")
                .help("Cookie header to read, e.g. 'sessionid=1; csrftoken=abc'")
                .conflicts_with_all(["cookie-file", "cookies-from-browser"]),
        )
        .arg(
            Arg::new("cookie-file")
                .long("cookie-file")
                .value_name("FILE")
                .help("Read the cookie header from a file")
                .conflicts_with("cookies-from-browser"),
        )
        .arg(
            Arg::new("env")
                .long("env")
                .value_name("VAR")
                .help("Environment variable holding the cookie header")
                .default_value(DEFAULT_COOKIE_ENV),
        )
        .arg(
            Arg::new("cookies-from-browser")
                .long("cookies-from-browser")
                .value_name("BROWSER[:PROFILE][::CONTAINER]")
                .help("Read cookies from a browser's cookie store")
                .requires("url"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Site whose browser cookies are used")
                .requires("cookies-from-browser"),
        )
        .arg(
            Arg::new("header-name")
                .long("header-name")
                .value_name("NAME")
                .help("Request header name used by --format header")
                .default_value(DEFAULT_HEADER_NAME),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format: value, header or json")
                .default_value("value"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write output to file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Silent mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

/// Build configuration from command line arguments
pub fn build_config_from_args(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::default();

    if let Some(name) = matches.get_one::<String>("name") {
        if name.is_empty() || name.contains(['=', ';']) {
            return Err(CsrfError::Config(format!("Invalid cookie name: '{}'", name)));
        }
        config.cookie_name = name.clone();
    }

    // Select the cookie source
    config.source = if let Some(header) = matches.get_one::<String>("cookie") {
        CookieSource::Header(header.clone())
    } else if let Some(file) = matches.get_one::<String>("cookie-file") {
        CookieSource::File(FileUtils::expand_path(file)?)
    } else if let Some(browser_str) = matches.get_one::<String>("cookies-from-browser") {
        let url = matches
            .get_one::<String>("url")
            .ok_or_else(|| CsrfError::Config("--cookies-from-browser needs --url".to_string()))?;
        CookieSource::Browser {
            config: BrowserCookieConfig::parse(browser_str)?,
            url: url.clone(),
        }
    } else {
        let var = matches
            .get_one::<String>("env")
            .map(String::as_str)
            .unwrap_or(DEFAULT_COOKIE_ENV);
        CookieSource::Env(var.to_string())
    };

    if let Some(header_name) = matches.get_one::<String>("header-name") {
        config.header_name = header_name.clone();
    }

    if let Some(format) = matches.get_one::<String>("format") {
        config.format = format.parse()?;
    }

    if let Some(output_file) = matches.get_one::<String>("output") {
        config.output_file = Some(FileUtils::expand_path(output_file)?);
    }

    Ok(config)
}
