//! Load-time analysis of the endpoint map.
//!
//! Resolution silently applies exact-first, then first-declared-pattern
//! semantics. This module points out keys that those rules make unreachable
//! or ambiguous. Findings are advisory and never stop the server.

use super::normalize::normalize;
use super::pattern::CompiledPattern;
use super::resolver::EndpointTable;
use super::types::ALL_METHODS;
use hyper::Method;

/// Paths answered by built-in routes when no endpoint matches.
const RESERVED_PATHS: [&str; 2] = ["/_mapi", "/favicon.ico"];

/// Stand-in for a `*` when probing whether a wildcard key is shadowed.
const SAMPLE_SEGMENT: &str = "sample";

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointWarning {
    pub warning_type: WarningType,
    pub message: String,
    /// Endpoint key the warning is about
    pub key: String,
    /// Earlier key that takes precedence (for shadow warnings)
    pub shadowed_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningType {
    /// Entry declares no methods and can never answer
    EmptyEndpoint,
    /// Method name that no request method will ever equal
    UnknownMethod,
    /// Literal key differing from another only by a trailing slash
    TrailingSlashDuplicate,
    /// Wildcard key whose paths are already taken by an earlier pattern
    PotentiallyShadowed,
    /// Key overriding a built-in route
    ReservedPath,
    /// Literal key containing a `/mapi` segment, which requests never carry
    RewrittenSegment,
}

/// Analyze a compiled endpoint table for unreachable or ambiguous keys.
pub fn analyze_endpoints(table: &EndpointTable) -> Vec<EndpointWarning> {
    let mut warnings = Vec::new();
    let map = table.map();

    for (key, details) in map.iter() {
        if details.is_empty() {
            warnings.push(warning(
                WarningType::EmptyEndpoint,
                key,
                format!("Endpoint '{key}' has no methods and will never match"),
            ));
        }

        for method in details.methods() {
            if !is_matchable_method(method) {
                warnings.push(warning(
                    WarningType::UnknownMethod,
                    key,
                    format!(
                        "Endpoint '{key}' declares method '{method}' which never matches; \
                         methods are case-sensitive (use upper case or {ALL_METHODS})"
                    ),
                ));
            }
        }

        if CompiledPattern::compile(key).is_ok_and(|p| p.is_pattern()) {
            continue;
        }

        if key.len() > 1 && key.ends_with('/') {
            let bare = key.trim_end_matches('/');
            if map.contains_key(bare) {
                warnings.push(EndpointWarning {
                    shadowed_by: Some(bare.to_string()),
                    ..warning(
                        WarningType::TrailingSlashDuplicate,
                        key,
                        format!("Endpoint '{key}' is never used; '{bare}' answers both forms"),
                    )
                });
            }
        }

        let normalized = normalize(key);
        if RESERVED_PATHS.contains(&normalized.no_trailing.as_str()) {
            warnings.push(warning(
                WarningType::ReservedPath,
                key,
                format!("Endpoint '{key}' replaces the built-in route"),
            ));
        } else if !normalized.forms().contains(&key) {
            warnings.push(warning(
                WarningType::RewrittenSegment,
                key,
                format!(
                    "Endpoint '{key}' is never matched; requests are normalized to '{}'",
                    normalized.no_trailing
                ),
            ));
        }
    }

    let patterns: Vec<_> = table.patterns().collect();
    for (index, (key, pattern)) in patterns.iter().enumerate() {
        if !matches!(pattern, CompiledPattern::Wildcard(_)) {
            continue;
        }
        let sample = normalize(&key.replace('*', SAMPLE_SEGMENT));
        let shadowing = patterns[..index].iter().find(|(_, earlier)| {
            sample
                .forms()
                .into_iter()
                .any(|form| earlier.matches(form))
        });
        if let Some((earlier_key, _)) = shadowing {
            warnings.push(EndpointWarning {
                shadowed_by: Some((*earlier_key).to_string()),
                ..warning(
                    WarningType::PotentiallyShadowed,
                    key,
                    format!(
                        "Endpoint '{key}' may be shadowed by earlier pattern '{earlier_key}'"
                    ),
                )
            });
        }
    }

    warnings
}

fn warning(warning_type: WarningType, key: &str, message: String) -> EndpointWarning {
    EndpointWarning {
        warning_type,
        message,
        key: key.to_string(),
        shadowed_by: None,
    }
}

/// Request methods arrive upper-case, so only upper-case tokens can match.
fn is_matchable_method(method: &str) -> bool {
    method == ALL_METHODS
        || (Method::from_bytes(method.as_bytes()).is_ok()
            && !method.chars().any(|c| c.is_ascii_lowercase()))
}
