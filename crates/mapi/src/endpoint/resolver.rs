//! Compiled endpoint table and request resolution.

use super::normalize::NormalizedUrl;
use super::pattern::CompiledPattern;
use super::types::{
    EndpointDetails, EndpointMap, EndpointResponse, LoadError, PatternError, ALL_METHODS,
    DEFAULT_404_KEY,
};
use std::path::Path;
use tracing::debug;

/// Endpoint map together with its compiled pattern keys.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug)]
pub struct EndpointTable {
    map: EndpointMap,
    /// Wildcard and regex keys in declaration order.
    patterns: Vec<(String, CompiledPattern)>,
}

/// Outcome of resolving a request against the table.
#[derive(Debug, Clone, PartialEq)]
pub enum MapSearchResult<'a> {
    Found(EndpointMatch<'a>),
    NotFound,
}

/// A matched endpoint and the response selected for the request method.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointMatch<'a> {
    /// Request path as received.
    pub url: String,
    /// Endpoint key that matched.
    pub key: &'a str,
    pub body: &'a serde_json::Value,
    pub status: u16,
}

impl MapSearchResult<'_> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl EndpointTable {
    /// Compile every pattern key of `map`. Fails on the first invalid key.
    pub fn compile(map: EndpointMap) -> Result<Self, PatternError> {
        let mut patterns = Vec::new();
        for key in map.keys() {
            let compiled = CompiledPattern::compile(key)?;
            if compiled.is_pattern() {
                patterns.push((key.to_string(), compiled));
            }
        }
        debug!(
            "Compiled endpoint table: {} keys, {} patterns",
            map.len(),
            patterns.len()
        );
        Ok(Self { map, patterns })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(Self::compile(EndpointMap::from_json_str(json)?)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Ok(Self::compile(EndpointMap::from_file(path)?)?)
    }

    pub fn map(&self) -> &EndpointMap {
        &self.map
    }

    /// All registered keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys()
    }

    /// Compiled wildcard and regex keys in scan order.
    pub fn patterns(&self) -> impl Iterator<Item = (&str, &CompiledPattern)> {
        self.patterns
            .iter()
            .map(|(key, pattern)| (key.as_str(), pattern))
    }

    /// The `ALL` response of the `default404` entry, if configured.
    pub fn default_not_found(&self) -> Option<&EndpointResponse> {
        self.map
            .get(DEFAULT_404_KEY)
            .and_then(|details| details.response_for(ALL_METHODS))
    }

    /// Find the endpoint for a path regardless of method.
    ///
    /// Exact keys are tried first, without and then with the trailing slash.
    /// Otherwise the first pattern key, in declaration order, that accepts
    /// either form wins.
    pub fn find_endpoint(&self, url: &NormalizedUrl) -> Option<(&str, &EndpointDetails)> {
        for form in url.forms() {
            if let Some(found) = self.map.get_key_value(form) {
                return Some(found);
            }
        }

        let (key, pattern) = self
            .patterns
            .iter()
            .find(|(_, pattern)| url.forms().into_iter().any(|form| pattern.matches(form)))?;

        if let Some(captures) = pattern.captures(&url.no_trailing) {
            debug!("{} matched {} with {:?}", url.no_trailing, key, captures);
        }
        self.map.get_key_value(key)
    }

    /// Resolve a request to its fixture.
    ///
    /// A path match whose entry has neither `method` nor `ALL` resolves to
    /// [`MapSearchResult::NotFound`], same as an unknown path.
    pub fn resolve(&self, url: &NormalizedUrl, method: &str) -> MapSearchResult<'_> {
        let Some((key, details)) = self.find_endpoint(url) else {
            return MapSearchResult::NotFound;
        };
        let Some(response) = details.response_for(method) else {
            debug!("{} matched {} but has no {} response", url.original, key, method);
            return MapSearchResult::NotFound;
        };

        MapSearchResult::Found(EndpointMatch {
            url: url.original.clone(),
            key,
            body: &response.body,
            status: response.status_code(),
        })
    }
}
