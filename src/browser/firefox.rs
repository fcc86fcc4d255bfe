//! Firefox cookie database reader
//!
//! Firefox keeps cookies unencrypted in `cookies.sqlite` inside each profile
//! directory. The live database is locked while the browser runs, so it is
//! copied to a temporary directory and the copy is read.

use crate::browser::{Cookie, CookieStore};
use crate::config::BrowserCookieConfig;
use crate::error::{CsrfError, Result};
use crate::utils::FileUtils;
use rusqlite::{params_from_iter, Connection, Row};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const COOKIE_DB_NAME: &str = "cookies.sqlite";
const MAX_SUPPORTED_DB_SCHEMA_VERSION: i64 = 17;

/// Which `originAttributes` rows of `moz_cookies` are read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerFilter {
    /// Cookies outside any container and outside partitioned storage
    Default,
    /// Every row, whatever container or partition it belongs to
    All,
    /// Unpartitioned cookies of one container, by `userContextId`
    Specific(i64),
}

/// Read every cookie from the newest Firefox profile database
pub fn extract_cookies(config: &BrowserCookieConfig) -> Result<CookieStore> {
    let search_roots = firefox_search_roots(config.profile.as_deref())?;
    let cookie_db = newest_path(find_cookie_dbs(&search_roots))
        .ok_or_else(|| CsrfError::FileNotFound("Firefox cookies database not found".to_string()))?;
    log::debug!("Reading Firefox cookies from {:?}", cookie_db);

    let temp_dir = tempdir()
        .map_err(|e| CsrfError::BrowserCookie(format!("Failed to create temp dir: {}", e)))?;
    let temp_db = temp_dir.path().join(COOKIE_DB_NAME);
    fs::copy(&cookie_db, &temp_db).map_err(|e| {
        crate::browser::map_cookie_io_error("Failed to copy cookies DB", &cookie_db, e)
    })?;
    // Recent writes may still sit in the write-ahead log.
    let wal = cookie_db.with_file_name(format!("{}-wal", COOKIE_DB_NAME));
    if wal.is_file() {
        fs::copy(&wal, temp_dir.path().join(format!("{}-wal", COOKIE_DB_NAME))).map_err(|e| {
            crate::browser::map_cookie_io_error("Failed to copy cookies WAL", &wal, e)
        })?;
    }

    let filter = resolve_container(&cookie_db, config.container.as_deref())?;
    let conn = Connection::open(&temp_db)
        .map_err(|e| CsrfError::BrowserCookie(format!("Failed to open cookies DB: {}", e)))?;
    read_cookies(&conn, &filter)
}

/// Read cookies from an already opened `cookies.sqlite` connection
pub fn read_cookies(conn: &Connection, filter: &ContainerFilter) -> Result<CookieStore> {
    let schema_version = read_schema_version(conn);
    if schema_version > MAX_SUPPORTED_DB_SCHEMA_VERSION {
        log::warn!(
            "Firefox cookie DB schema version {} may be unsupported",
            schema_version
        );
    }

    let columns = cookie_columns(conn)?;
    let (condition, params) = container_condition(filter, columns.has_origin_attributes)?;
    let query = format!(
        "SELECT host, name, value, path, {}, {}, {} FROM moz_cookies{}",
        columns.expiry, columns.secure, columns.creation_time, condition
    );

    let mut stmt = conn
        .prepare(&query)
        .map_err(|e| CsrfError::BrowserCookie(format!("Failed to prepare Firefox query: {}", e)))?;
    let mut rows = stmt
        .query(params_from_iter(params.iter()))
        .map_err(|e| CsrfError::BrowserCookie(format!("Failed to query Firefox cookies: {}", e)))?;

    let mut store = CookieStore::new();
    while let Some(row) = rows.next().map_err(|e| {
        CsrfError::BrowserCookie(format!("Failed to read Firefox cookie row: {}", e))
    })? {
        let cookie = row_to_cookie(row, schema_version)?;
        store.entry(cookie.domain.clone()).or_default().push(cookie);
    }

    Ok(store)
}

fn container_condition(
    filter: &ContainerFilter,
    has_origin_attributes: bool,
) -> Result<(String, Vec<String>)> {
    if !has_origin_attributes {
        // Databases this old predate containers and partitioning.
        return match filter {
            ContainerFilter::Specific(_) => Err(CsrfError::BrowserCookie(
                "Firefox cookie DB has no container information".to_string(),
            )),
            _ => Ok((String::new(), Vec::new())),
        };
    }

    let unpartitioned = "NOT INSTR(originAttributes, 'partitionKey=')";
    Ok(match filter {
        ContainerFilter::All => (String::new(), Vec::new()),
        ContainerFilter::Default => (
            format!(
                " WHERE NOT INSTR(originAttributes, 'userContextId=') AND {}",
                unpartitioned
            ),
            Vec::new(),
        ),
        ContainerFilter::Specific(id) => (
            format!(
                " WHERE (originAttributes LIKE ?1 OR originAttributes LIKE ?2) AND {}",
                unpartitioned
            ),
            vec![
                format!("%userContextId={}", id),
                format!("%userContextId={}&%", id),
            ],
        ),
    })
}

fn firefox_search_roots(profile: Option<&str>) -> Result<Vec<PathBuf>> {
    if let Some(profile) = profile.filter(|p| is_path_like(p)) {
        return Ok(vec![FileUtils::expand_path(profile)?]);
    }

    let bases = default_profile_roots()?;
    match profile {
        Some(profile) => Ok(bases.into_iter().map(|base| base.join(profile)).collect()),
        None => Ok(bases),
    }
}

#[cfg(target_os = "macos")]
fn default_profile_roots() -> Result<Vec<PathBuf>> {
    let home = home_dir()?;
    Ok(vec![home.join("Library/Application Support/Firefox/Profiles")])
}

#[cfg(target_os = "windows")]
fn default_profile_roots() -> Result<Vec<PathBuf>> {
    let appdata = dirs::data_dir()
        .ok_or_else(|| CsrfError::Config("Cannot determine APPDATA directory".to_string()))?;
    Ok(vec![appdata.join("Mozilla/Firefox/Profiles")])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_profile_roots() -> Result<Vec<PathBuf>> {
    let home = home_dir()?;
    Ok(vec![
        home.join(".mozilla/firefox"),
        home.join("snap/firefox/common/.mozilla/firefox"),
        home.join(".var/app/org.mozilla.firefox/.mozilla/firefox"),
    ])
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| CsrfError::Config("Cannot determine home directory".to_string()))
}

fn is_path_like(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || value.starts_with('~')
}

fn find_cookie_dbs(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut results = Vec::new();
    for root in roots {
        if root.is_file() && root.ends_with(COOKIE_DB_NAME) {
            results.push(root.clone());
            continue;
        }
        if root.exists() {
            results.extend(find_files(root, COOKIE_DB_NAME));
        }
    }
    results
}

fn find_files(root: &Path, filename: &str) -> Vec<PathBuf> {
    let mut matches = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.file_name().and_then(|name| name.to_str()) == Some(filename) {
                matches.push(path);
            }
        }
    }
    matches
}

fn newest_path(paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths
        .into_iter()
        .filter_map(|path| {
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

fn read_schema_version(conn: &Connection) -> i64 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap_or(0)
}

struct CookieColumns {
    expiry: &'static str,
    secure: &'static str,
    creation_time: &'static str,
    has_origin_attributes: bool,
}

fn cookie_columns(conn: &Connection) -> Result<CookieColumns> {
    let schema_err =
        |e: rusqlite::Error| CsrfError::BrowserCookie(format!("Failed to read cookie schema: {}", e));
    let mut stmt = conn
        .prepare("PRAGMA table_info(moz_cookies)")
        .map_err(schema_err)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(schema_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(schema_err)?;

    if columns.is_empty() {
        return Err(CsrfError::BrowserCookie(
            "Firefox cookies table moz_cookies not found".to_string(),
        ));
    }
    let has = |name: &str| columns.iter().any(|c| c == name);

    let expiry = if has("expiry") {
        "expiry"
    } else if has("expires") {
        "expires"
    } else {
        return Err(CsrfError::BrowserCookie(
            "Firefox cookies table missing expiry column".to_string(),
        ));
    };
    let secure = if has("is_secure") { "is_secure" } else { "isSecure" };
    let creation_time = if has("creationTime") { "creationTime" } else { "0" };

    Ok(CookieColumns {
        expiry,
        secure,
        creation_time,
        has_origin_attributes: has("originAttributes"),
    })
}

fn resolve_container(cookie_db: &Path, container: Option<&str>) -> Result<ContainerFilter> {
    let container = match container {
        Some(container) => container,
        None => return Ok(ContainerFilter::Default),
    };
    match container {
        "none" => return Ok(ContainerFilter::Default),
        "all" => return Ok(ContainerFilter::All),
        _ => {}
    }

    let containers_path = cookie_db
        .parent()
        .map(|path| path.join("containers.json"))
        .ok_or_else(|| CsrfError::BrowserCookie("Firefox profile path not found".to_string()))?;
    if !containers_path.is_file() {
        return Err(CsrfError::FileNotFound(
            "Firefox containers.json not found".to_string(),
        ));
    }

    let data = fs::read_to_string(&containers_path).map_err(|e| {
        crate::browser::map_cookie_io_error("Failed to read containers.json", &containers_path, e)
    })?;
    let value: Value = serde_json::from_str(&data)?;
    let identities = value
        .get("identities")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();

    identities
        .iter()
        .find_map(|identity| {
            let name = identity.get("name").and_then(|v| v.as_str());
            let l10n_id = identity.get("l10nID").and_then(|v| v.as_str());
            let matches = name == Some(container) || l10n_matches(container, l10n_id);
            matches
                .then(|| identity.get("userContextId").and_then(|v| v.as_i64()))
                .flatten()
        })
        .map(ContainerFilter::Specific)
        .ok_or_else(|| {
            CsrfError::BrowserCookie(format!("Firefox container '{}' not found", container))
        })
}

/// Built-in containers carry `userContext<Name>.label` instead of a name.
fn l10n_matches(container: &str, l10n_id: Option<&str>) -> bool {
    l10n_id
        .and_then(|id| id.strip_prefix("userContext"))
        .and_then(|id| id.strip_suffix(".label"))
        == Some(container)
}

fn row_to_cookie(row: &Row<'_>, schema_version: i64) -> Result<Cookie> {
    let field_err = |field: &str, e: rusqlite::Error| {
        CsrfError::BrowserCookie(format!("Failed to read cookie {}: {}", field, e))
    };
    let domain: String = row.get(0).map_err(|e| field_err("host", e))?;
    let name: String = row.get(1).map_err(|e| field_err("name", e))?;
    let value: String = row.get(2).map_err(|e| field_err("value", e))?;
    let path: String = row.get(3).map_err(|e| field_err("path", e))?;
    let expiry: Option<i64> = row.get(4).map_err(|e| field_err("expiry", e))?;
    let secure: i64 = row.get(5).map_err(|e| field_err("secure flag", e))?;
    let creation_time: Option<i64> = row.get(6).map_err(|e| field_err("creation time", e))?;

    // Schema 16 switched expiry to milliseconds.
    let expires = expiry
        .map(|expiry| {
            if schema_version >= 16 {
                expiry / 1000
            } else {
                expiry
            }
        })
        .filter(|seconds| *seconds > 0);

    Ok(Cookie {
        name,
        value,
        domain,
        path,
        secure: secure != 0,
        expires,
        creation_time: creation_time.unwrap_or(0),
    })
}
