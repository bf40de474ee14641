//! Mapi: a mock HTTP server driven by a JSON endpoint map.
//!
//! The endpoint map is loaded and compiled once at startup into an
//! [`EndpointTable`]. Every request is normalized, resolved against the
//! table and turned into a [`Dispatch`] decision that the server writes back.

// ===== Matching engine =====
pub mod dispatch;
pub mod endpoint;
pub mod logger;

// ===== Transport =====
pub mod server;

pub use dispatch::{select, Dispatch, Reply};
pub use endpoint::{
    analyze_endpoints, normalize, CompiledPattern, EndpointDetails, EndpointMap, EndpointMatch,
    EndpointResponse, EndpointTable, EndpointWarning, LoadError, MapSearchResult, NormalizedUrl,
    PatternError, WarningType,
};
pub use logger::{ConsoleLogger, RequestLogger};
pub use server::{FaviconSource, MockServer};
