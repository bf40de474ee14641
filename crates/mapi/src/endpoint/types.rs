//! Type definitions for the endpoint map.
//!
//! The map is deserialized straight from the mapping document. Key order is
//! kept as declared, since it decides which pattern wins when several match.

use hyper::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reserved key holding the fallback response for unmatched requests.
pub const DEFAULT_404_KEY: &str = "default404";

/// Method name matching any request method.
pub const ALL_METHODS: &str = "ALL";

/// Status used when a response omits `status` or sets it to zero.
pub const DEFAULT_STATUS: u16 = 200;

// ============================================================================
// Endpoint Map
// ============================================================================

/// Canned response for one method of an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointResponse {
    /// Fixture served as the response body. Older mapping files call it `response`.
    #[serde(default, alias = "response")]
    pub body: serde_json::Value,
    #[serde(
        default,
        deserialize_with = "deserialize_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<u16>,
}

/// Accept the status as a number or a numeric string (`"201"`).
/// `null` and `""` count as absent.
fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid status number: {n}"))),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid status string: {s}"))),
        _ => Err(D::Error::custom("status must be a number or string")),
    }
}

impl EndpointResponse {
    /// Status to send, applying the 200 default for absent or zero values.
    pub fn status_code(&self) -> u16 {
        match self.status {
            None | Some(0) => DEFAULT_STATUS,
            Some(status) => status,
        }
    }
}

/// Per-method responses of a single endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointDetails(IndexMap<String, EndpointResponse>);

impl EndpointDetails {
    /// Response registered for `method`, falling back to the `ALL` entry.
    pub fn response_for(&self, method: &str) -> Option<&EndpointResponse> {
        self.0.get(method).or_else(|| self.0.get(ALL_METHODS))
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EndpointResponse)> {
        self.0.iter().map(|(method, response)| (method.as_str(), response))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, EndpointResponse)> for EndpointDetails {
    fn from_iter<I: IntoIterator<Item = (String, EndpointResponse)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Endpoint keys mapped to their per-method responses, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointMap(IndexMap<String, EndpointDetails>);

impl EndpointMap {
    /// Parse and validate a mapping document.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let map: Self = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// Read a mapping document from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Reject status codes that cannot be written on the wire.
    pub fn validate(&self) -> Result<(), LoadError> {
        for (key, details) in self.iter() {
            for (method, response) in details.iter() {
                let status = response.status_code();
                if StatusCode::from_u16(status).is_err() {
                    return Err(LoadError::InvalidStatus {
                        key: key.to_string(),
                        method: method.to_string(),
                        status,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&EndpointDetails> {
        self.0.get(key)
    }

    pub fn get_key_value(&self, key: &str) -> Option<(&str, &EndpointDetails)> {
        self.0
            .get_key_value(key)
            .map(|(key, details)| (key.as_str(), details))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EndpointDetails)> {
        self.0.iter().map(|(key, details)| (key.as_str(), details))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, EndpointDetails)> for EndpointMap {
    fn from_iter<I: IntoIterator<Item = (String, EndpointDetails)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error compiling an endpoint key into a matcher
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern in endpoint key '{key}': {source}")]
    InvalidRegex {
        key: String,
        #[source]
        source: regex::Error,
    },
}

/// Error loading an endpoint map
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid endpoint map: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid status {status} for {method} {key}")]
    InvalidStatus {
        key: String,
        method: String,
        status: u16,
    },
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_map_preserves_declaration_order() {
        let map = EndpointMap::from_json_str(
            r#"{
                "/z": {"GET": {"body": 1}},
                "/a": {"GET": {"body": 2}},
                "/m/*": {"GET": {"body": 3}}
            }"#,
        )
        .unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["/z", "/a", "/m/*"]);
    }

    #[test]
    fn test_status_defaults_to_200() {
        let map = EndpointMap::from_json_str(
            r#"{
                "/missing": {"GET": {"body": {"ok": true}}},
                "/zero": {"GET": {"body": null, "status": 0}},
                "/created": {"POST": {"body": null, "status": 201}}
            }"#,
        )
        .unwrap();
        let status = |key: &str, method: &str| {
            map.get(key)
                .and_then(|d| d.response_for(method))
                .map(EndpointResponse::status_code)
        };
        assert_eq!(status("/missing", "GET"), Some(200));
        assert_eq!(status("/zero", "GET"), Some(200));
        assert_eq!(status("/created", "POST"), Some(201));
    }

    #[test]
    fn test_status_as_numeric_string() {
        let map = EndpointMap::from_json_str(
            r#"{
                "/created": {"POST": {"body": null, "status": "201"}},
                "/blank": {"GET": {"body": null, "status": ""}},
                "/null": {"GET": {"body": null, "status": null}}
            }"#,
        )
        .unwrap();
        let status = |key: &str, method: &str| {
            map.get(key)
                .and_then(|d| d.response_for(method))
                .map(EndpointResponse::status_code)
        };
        assert_eq!(status("/created", "POST"), Some(201));
        assert_eq!(status("/blank", "GET"), Some(200));
        assert_eq!(status("/null", "GET"), Some(200));
    }

    #[test]
    fn test_non_numeric_status_rejected() {
        for status in [r#""created""#, "-1", "70000", "true"] {
            let json = format!(r#"{{"/x": {{"GET": {{"status": {status}}}}}}}"#);
            assert!(
                matches!(EndpointMap::from_json_str(&json), Err(LoadError::Json(_))),
                "status {status}"
            );
        }
    }

    #[test]
    fn test_legacy_response_field() {
        let map =
            EndpointMap::from_json_str(r#"{"/legacy": {"GET": {"response": {"id": 7}}}}"#).unwrap();
        let response = map.get("/legacy").and_then(|d| d.response_for("GET")).unwrap();
        assert_eq!(response.body, json!({"id": 7}));
    }

    #[test]
    fn test_missing_body_is_null() {
        let map = EndpointMap::from_json_str(r#"{"/empty": {"DELETE": {"status": 204}}}"#).unwrap();
        let response = map.get("/empty").and_then(|d| d.response_for("DELETE")).unwrap();
        assert_eq!(response.body, serde_json::Value::Null);
    }

    #[test]
    fn test_response_for_falls_back_to_all() {
        let map = EndpointMap::from_json_str(
            r#"{"/x": {"GET": {"body": "get"}, "ALL": {"body": "any"}}}"#,
        )
        .unwrap();
        let details = map.get("/x").unwrap();
        assert_eq!(details.response_for("GET").unwrap().body, json!("get"));
        assert_eq!(details.response_for("PATCH").unwrap().body, json!("any"));
        assert_eq!(details.response_for("get").unwrap().body, json!("any"));
    }

    #[test]
    fn test_invalid_status_rejected() {
        let err = EndpointMap::from_json_str(r#"{"/bad": {"GET": {"status": 42}}}"#).unwrap_err();
        match err {
            LoadError::InvalidStatus {
                key,
                method,
                status,
            } => {
                assert_eq!(key, "/bad");
                assert_eq!(method, "GET");
                assert_eq!(status, 42);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_object_document_rejected() {
        assert!(matches!(
            EndpointMap::from_json_str("[1, 2, 3]"),
            Err(LoadError::Json(_))
        ));
        assert!(matches!(
            EndpointMap::from_json_str(r#"{"/x": "not an endpoint"}"#),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"/api/ping": {{"GET": {{"body": {{"ok": true}}}}}}}}"#).unwrap();

        let map = EndpointMap::from_file(file.path()).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("/api/ping"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = EndpointMap::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().starts_with("Could not read /definitely/not/here.json"));
    }
}
