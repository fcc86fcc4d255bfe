//! Cookie header value extraction
//!
//! Looks up a single named entry in a `Cookie` header string of the form
//! `name1=value1; name2=value2`. Lookup never fails: a missing header, an
//! empty header and a header without the requested name all yield `None`.

use std::borrow::Cow;

/// Return the percent-decoded value of the first cookie called `name`.
///
/// Entries are split on `;` and trimmed, then matched against the literal
/// prefix `name=`, so searching for `foo` never matches `foobar=` or `xfoo=`.
/// When the same name appears more than once the first occurrence wins.
pub fn get_cookie(header: Option<&str>, name: &str) -> Option<String> {
    let header = header.filter(|h| !h.is_empty())?;

    header
        .split(';')
        .map(str::trim)
        .find_map(|entry| strip_name(entry, name))
        .map(decode_value)
}

/// Percent-decode a raw cookie value.
///
/// Values that are not valid percent-encoded UTF-8 are returned verbatim:
/// every `%` must start a two-hex-digit escape and the decoded bytes must be
/// UTF-8, otherwise nothing is decoded.
pub fn decode_value(raw: &str) -> String {
    if !raw.contains('%') || !has_only_valid_escapes(raw) {
        return raw.to_string();
    }
    urlencoding::decode(raw)
        .unwrap_or(Cow::Borrowed(raw))
        .into_owned()
}

fn has_only_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}

fn strip_name<'a>(entry: &'a str, name: &str) -> Option<&'a str> {
    entry.strip_prefix(name)?.strip_prefix('=')
}
