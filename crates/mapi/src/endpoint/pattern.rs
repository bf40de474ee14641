//! Compilation of endpoint keys into matchers.
//!
//! Three key forms are supported:
//! - literal keys, compared by exact string equality
//! - wildcard keys containing `*`, where each `*` matches one path segment
//!   or part of one (never a `/`)
//! - regex keys starting with `:`, where the rest of the key is a regular
//!   expression matched anywhere in the path

use super::types::PatternError;
use regex::{Regex, RegexBuilder};

const REGEX_PREFIX: char = ':';
const WILDCARD: char = '*';

/// Non-greedy capture of anything up to the next `/`.
const SEGMENT_CAPTURE: &str = "([^/]*?)";

/// Compiled endpoint key.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Literal(String),
    Wildcard(Regex),
    Regex(Regex),
}

impl CompiledPattern {
    /// Compile an endpoint key. Regex keys take precedence over wildcards, so
    /// `:` keys may use `*` as a regex quantifier.
    pub fn compile(key: &str) -> Result<Self, PatternError> {
        if let Some(pattern) = key.strip_prefix(REGEX_PREFIX) {
            return build(key, pattern).map(Self::Regex);
        }
        if key.contains(WILDCARD) {
            return build(key, &wildcard_source(key)).map(Self::Wildcard);
        }
        Ok(Self::Literal(key.to_string()))
    }

    /// Whether this key has to be scanned rather than looked up.
    pub fn is_pattern(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Literal(text) => text == path,
            Self::Wildcard(regex) | Self::Regex(regex) => regex.is_match(path),
        }
    }

    /// Text captured by each `*` of a wildcard key.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        match self {
            Self::Literal(text) => (text == path).then(Vec::new),
            Self::Wildcard(regex) | Self::Regex(regex) => regex.captures(path).map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|m| m.map_or("", |m| m.as_str()))
                    .collect()
            }),
        }
    }
}

/// Anchored regex source for a wildcard key: literal runs are escaped and
/// joined by a single-segment capture.
fn wildcard_source(key: &str) -> String {
    let body = key
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(SEGMENT_CAPTURE);
    format!(r"\A{body}\z")
}

fn build(key: &str, source: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .map_err(|source| PatternError::InvalidRegex {
            key: key.to_string(),
            source,
        })
}
