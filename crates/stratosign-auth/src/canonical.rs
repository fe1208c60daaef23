//! Canonical strings that signatures are computed over.
//!
//! Two families live here:
//!
//! - The header-auth canonical string for storage services:
//!
//!   ```text
//!   HTTP-Verb + "\n" +
//!   Content-MD5 + "\n" +
//!   Content-Type + "\n" +
//!   Date + "\n" +
//!   CanonicalizedVendorHeaders +
//!   CanonicalizedResource
//!   ```
//!
//! - Query strings for the query-signature versions. Versions 0 and 1 sort
//!   parameters case-insensitively and quote only values; version 2 sorts by
//!   raw byte order and quotes keys and values with stricter safe sets.
//!
//! Escaping follows classic URL quoting: ASCII letters, digits and `_.-` are
//! never escaped, and everything else is percent-encoded as UTF-8 with
//! upper-case hex digits.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use stratosign_core::Provider;

/// Characters escaped when no extra safe characters are given.
const QUOTE_STRICT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-');

/// Default quoting: `/` is kept as-is.
const QUOTE_PATH: &AsciiSet = &QUOTE_STRICT.remove(b'/');

/// RFC 3986 unreserved characters kept as-is, used for version 2 values.
const QUOTE_UNRESERVED: &AsciiSet = &QUOTE_STRICT.remove(b'~');

/// Query parameters that are part of the canonicalized resource.
const SUB_RESOURCES: &[&str] = &[
    "acl",
    "compose",
    "cors",
    "defaultObjectAcl",
    "delete",
    "lifecycle",
    "location",
    "logging",
    "partNumber",
    "policy",
    "requestPayment",
    "response-cache-control",
    "response-content-disposition",
    "response-content-encoding",
    "response-content-language",
    "response-content-type",
    "response-expires",
    "restore",
    "storageClass",
    "tagging",
    "torrent",
    "uploadId",
    "uploads",
    "versionId",
    "versioning",
    "versions",
    "website",
    "websiteConfig",
];

/// Quote `input`, keeping `/` unescaped.
///
/// # Examples
///
/// ```
/// use stratosign_auth::canonical::quote;
///
/// assert_eq!(quote("a b/c~d"), "a%20b/c%7Ed");
/// assert_eq!(quote("abc+/="), "abc%2B/%3D");
/// ```
#[must_use]
pub fn quote(input: &str) -> String {
    utf8_percent_encode(input, QUOTE_PATH).to_string()
}

/// Quote `input` with no extra safe characters, so `/` is escaped too.
#[must_use]
pub fn quote_strict(input: &str) -> String {
    utf8_percent_encode(input, QUOTE_STRICT).to_string()
}

/// Quote `input` keeping the RFC 3986 unreserved characters `-_.~`.
#[must_use]
pub fn quote_unreserved(input: &str) -> String {
    utf8_percent_encode(input, QUOTE_UNRESERVED).to_string()
}

/// Order two keys ignoring ASCII case, falling back to byte order on ties.
fn cmp_case_insensitive(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Parameters sorted by key, ignoring case.
#[must_use]
pub fn sort_case_insensitive(params: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
    let mut sorted: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    sorted.sort_by(|a, b| cmp_case_insensitive(a.0, b.0));
    sorted
}

/// Build the query string used by signature versions 0 and 1.
///
/// Keys are sorted case-insensitively and kept raw; values are quoted.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use stratosign_auth::canonical::build_case_insensitive_query;
///
/// let params = BTreeMap::from([
///     ("Z".to_owned(), "1".to_owned()),
///     ("a".to_owned(), "x y".to_owned()),
/// ]);
/// assert_eq!(build_case_insensitive_query(&params), "a=x%20y&Z=1");
/// ```
#[must_use]
pub fn build_case_insensitive_query(params: &BTreeMap<String, String>) -> String {
    sort_case_insensitive(params)
        .iter()
        .map(|(k, v)| format!("{k}={}", quote(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical query string used by signature version 2.
///
/// Keys are sorted by raw byte order; keys are quoted strictly and values keep
/// only the unreserved characters.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use stratosign_auth::canonical::build_ordinal_query;
///
/// let params = BTreeMap::from([
///     ("a".to_owned(), "x~y/z".to_owned()),
///     ("Z".to_owned(), "1".to_owned()),
/// ]);
/// assert_eq!(build_ordinal_query(&params), "Z=1&a=x~y%2Fz");
/// ```
#[must_use]
pub fn build_ordinal_query(params: &BTreeMap<String, String>) -> String {
    // BTreeMap<String, _> iterates in byte order already.
    params
        .iter()
        .map(|(k, v)| format!("{}={}", quote_strict(k), quote_unreserved(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the header-auth canonical string for `method`, `path` and `headers`.
///
/// `expires`, when given, replaces the date line (query-string authentication
/// for storage services signs the expiry instead of the date).
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use stratosign_auth::canonical::canonical_string;
/// use stratosign_core::Provider;
///
/// let headers = BTreeMap::from([
///     ("Date".to_owned(), "Tue, 27 Mar 2007 19:36:42 +0000".to_owned()),
/// ]);
/// let c = canonical_string("GET", "/johnsmith/photos/puppy.jpg", &headers, None, &Provider::aws());
/// assert_eq!(c, "GET\n\n\nTue, 27 Mar 2007 19:36:42 +0000\n/johnsmith/photos/puppy.jpg");
/// ```
#[must_use]
pub fn canonical_string(
    method: &str,
    path: &str,
    headers: &BTreeMap<String, String>,
    expires: Option<&str>,
    provider: &Provider,
) -> String {
    let mut interesting: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let lower = name.to_ascii_lowercase();
        if matches!(lower.as_str(), "content-md5" | "content-type" | "date")
            || lower.starts_with(&provider.header_prefix)
        {
            interesting.insert(lower, value.trim().to_owned());
        }
    }

    interesting.entry("content-type".to_owned()).or_default();
    interesting.entry("content-md5".to_owned()).or_default();

    // The vendor date header is signed as a vendor header; the Date line stays empty.
    if interesting.contains_key(&provider.date_header) {
        interesting.insert("date".to_owned(), String::new());
    }

    if let Some(expires) = expires {
        interesting.insert("date".to_owned(), expires.to_owned());
    }

    let mut buf = format!("{method}\n");
    for (name, value) in &interesting {
        if name.starts_with(&provider.header_prefix) {
            buf.push_str(name);
            buf.push(':');
        }
        buf.push_str(value);
        buf.push('\n');
    }

    buf.push_str(&canonical_resource(path));
    buf
}

/// The path up to the first `?`, followed by the sorted sub-resources.
fn canonical_resource(path: &str) -> String {
    let Some((base, query)) = path.split_once('?') else {
        return path.to_owned();
    };

    let mut sub_resources: Vec<(&str, Option<String>)> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k, Some(percent_decode_str(v).decode_utf8_lossy().into_owned())),
            None => (pair, None),
        })
        .filter(|(k, _)| SUB_RESOURCES.contains(k))
        .collect();

    if sub_resources.is_empty() {
        return base.to_owned();
    }

    sub_resources.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sub_resources
        .iter()
        .map(|(k, v)| match v {
            Some(v) => format!("{k}={v}"),
            None => (*k).to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{base}?{joined}")
}
