//! Endpoint map loading, compilation and resolution.
//!
//! ## Module Structure
//!
//! - `types`: endpoint map data model and error types
//! - `normalize`: request path canonicalization
//! - `pattern`: compilation of endpoint keys into matchers
//! - `resolver`: compiled endpoint table and request resolution
//! - `analysis`: load-time warnings about unreachable or ambiguous keys

mod analysis;
mod normalize;
mod pattern;
mod resolver;
mod types;

pub use analysis::{analyze_endpoints, EndpointWarning, WarningType};
pub use normalize::{normalize, NormalizedUrl};
pub use pattern::CompiledPattern;
pub use resolver::{EndpointMatch, EndpointTable, MapSearchResult};
pub use types::{
    EndpointDetails, EndpointMap, EndpointResponse, LoadError, PatternError, ALL_METHODS,
    DEFAULT_404_KEY, DEFAULT_STATUS,
};
