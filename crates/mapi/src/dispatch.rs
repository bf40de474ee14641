//! Response selection for resolved and unresolved requests.
//!
//! Built-in routes are consulted only after resolution fails, so a mapping
//! can override any of them.

use crate::endpoint::{EndpointTable, MapSearchResult, NormalizedUrl};
use serde_json::json;

/// Introspection route listing every registered key.
pub const INTROSPECTION_PATH: &str = "/_mapi";
pub const FAVICON_PATH: &str = "/favicon.ico";

pub const LABEL_SHOW_ALL: &str = "show all urls";
pub const LABEL_DEFAULT_404: &str = "default 404";
pub const LABEL_NOT_MAPPED: &str = "url not mapped";

const NOT_FOUND_STATUS: u16 = 404;

/// What the transport should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// JSON response with a log label.
    Reply(Reply),
    /// Serve the favicon from the static-file collaborator.
    Favicon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    /// Serialized JSON body.
    pub body: String,
    pub label: String,
}

/// Turn a resolution result into an outgoing response.
pub fn select(table: &EndpointTable, result: MapSearchResult<'_>, url: &NormalizedUrl) -> Dispatch {
    if let MapSearchResult::Found(found) = result {
        return Dispatch::Reply(Reply {
            status: found.status,
            body: to_json(found.body),
            label: found.key.to_string(),
        });
    }

    match url.no_trailing.as_str() {
        FAVICON_PATH => Dispatch::Favicon,
        INTROSPECTION_PATH => {
            let keys: Vec<&str> = table.keys().collect();
            Dispatch::Reply(Reply {
                status: 200,
                body: to_json(&keys),
                label: LABEL_SHOW_ALL.to_string(),
            })
        }
        _ => Dispatch::Reply(not_found(table, url)),
    }
}

fn not_found(table: &EndpointTable, url: &NormalizedUrl) -> Reply {
    if let Some(fallback) = table.default_not_found() {
        return Reply {
            status: fallback.status_code(),
            body: to_json(&fallback.body),
            label: LABEL_DEFAULT_404.to_string(),
        };
    }

    Reply {
        status: NOT_FOUND_STATUS,
        body: to_json(&json!({ "error": format!("Could not find {}", url.original) })),
        label: LABEL_NOT_MAPPED.to_string(),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
