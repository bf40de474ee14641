//! Request path normalization.
//!
//! Endpoint keys are compared against two renderings of the request path,
//! one with and one without a trailing slash, so a key matches either way it
//! is requested. Only the path component is rewritten; the query string is
//! carried over untouched.

/// Path segment rewritten to [`API_SEGMENT`] before matching.
const MOCK_API_SEGMENT: &str = "mapi";
const API_SEGMENT: &str = "api";

/// Canonical forms of a request path used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// Path exactly as received, for display and logging.
    pub original: String,
    /// Cleaned path without a trailing slash (the root stays `/`).
    pub no_trailing: String,
    /// Cleaned path ending with a single `/`.
    pub trailing: String,
}

impl NormalizedUrl {
    pub fn new(raw_path: &str) -> Self {
        let (path, query) = match raw_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw_path, None),
        };

        let cleaned = rewrite_mock_segments(&collapse_slashes(path));
        let stripped = cleaned.trim_end_matches('/');

        let (no_trailing, trailing) = if stripped.is_empty() {
            ("/".to_string(), "/".to_string())
        } else {
            (stripped.to_string(), format!("{stripped}/"))
        };

        Self {
            original: raw_path.to_string(),
            no_trailing: with_query(no_trailing, query),
            trailing: with_query(trailing, query),
        }
    }

    /// Both matchable renderings, without-slash first.
    pub fn forms(&self) -> [&str; 2] {
        [&self.no_trailing, &self.trailing]
    }
}

/// Normalize a raw request path. Never fails; `""` normalizes to `/`.
pub fn normalize(raw_path: &str) -> NormalizedUrl {
    NormalizedUrl::new(raw_path)
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !previous_slash {
                out.push(c);
            }
            previous_slash = true;
        } else {
            out.push(c);
            previous_slash = false;
        }
    }
    out
}

/// Serve `/mapi/...` from endpoints declared as `/api/...`.
fn rewrite_mock_segments(path: &str) -> String {
    path.split('/')
        .enumerate()
        .map(|(i, segment)| {
            if i > 0 && segment == MOCK_API_SEGMENT {
                API_SEGMENT
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn with_query(mut path: String, query: Option<&str>) -> String {
    if let Some(query) = query {
        path.push('?');
        path.push_str(query);
    }
    path
}
