//! Static favicon serving.

use super::response::{content_response, CONTENT_TYPE_ICON, CONTENT_TYPE_TEXT};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use std::path::PathBuf;
use tracing::debug;

static BUNDLED_FAVICON: &[u8] = include_bytes!("../../assets/favicon.ico");

/// Where `/favicon.ico` is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FaviconSource {
    /// Icon compiled into the binary
    #[default]
    Bundled,
    /// Icon read from disk on every request
    File(PathBuf),
}

impl FaviconSource {
    /// Respond with the icon, or a plain-text 404 when the file is unreadable.
    pub async fn respond(&self) -> Response<Full<Bytes>> {
        match self {
            Self::Bundled => content_response(
                StatusCode::OK,
                CONTENT_TYPE_ICON,
                Bytes::from_static(BUNDLED_FAVICON),
            ),
            Self::File(path) => match tokio::fs::read(path).await {
                Ok(bytes) => content_response(StatusCode::OK, CONTENT_TYPE_ICON, bytes),
                Err(e) => {
                    debug!("Favicon {} unavailable: {}", path.display(), e);
                    content_response(StatusCode::NOT_FOUND, CONTENT_TYPE_TEXT, "404 Not Found\n")
                }
            },
        }
    }
}
