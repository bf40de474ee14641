//! Request handling: normalize, resolve, dispatch, log.

use super::response::json_response;
use super::ServerState;
use crate::dispatch::{select, Dispatch};
use crate::endpoint::normalize;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

/// Handle a request to the mock server.
///
/// Request bodies are never read; only the method and path take part in
/// matching.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let url = normalize(req.uri().path_and_query().map_or("/", |pq| pq.as_str()));
    let dispatch = {
        let result = state.table.resolve(&url, req.method().as_str());
        select(&state.table, result, &url)
    };

    match dispatch {
        Dispatch::Favicon => {
            debug!("Serving favicon for {}", url.original);
            Ok(state.favicon.respond().await)
        }
        Dispatch::Reply(reply) => {
            state.logger.record(reply.status, &url.original, &reply.label);
            Ok(json_response(reply.status, reply.body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointTable;
    use crate::logger::RequestLogger;
    use crate::server::FaviconSource;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingLogger {
        lines: Mutex<Vec<(u16, String, String)>>,
    }

    impl RequestLogger for CapturingLogger {
        fn record(&self, status: u16, path: &str, message: &str) {
            self.lines
                .lock()
                .unwrap()
                .push((status, path.to_string(), message.to_string()));
        }
    }

    fn state(json: &str, logger: Arc<CapturingLogger>) -> Arc<ServerState> {
        Arc::new(ServerState {
            table: EndpointTable::from_json_str(json).unwrap(),
            logger,
            favicon: FaviconSource::Bundled,
        })
    }

    fn request(method: &str, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    #[tokio::test]
    async fn test_handle_found_request() {
        let logger = Arc::new(CapturingLogger::default());
        let state = state(
            r#"{"/api/ping": {"GET": {"status": 200, "body": {"ok": true}}}}"#,
            Arc::clone(&logger),
        );

        let response = handle_request(request("GET", "/mapi/ping/"), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"ok":true}"#);

        let lines = logger.lines.lock().unwrap();
        assert_eq!(
            lines.as_slice(),
            &[(200, "/mapi/ping/".to_string(), "/api/ping".to_string())]
        );
    }

    #[tokio::test]
    async fn test_handle_not_mapped_request() {
        let logger = Arc::new(CapturingLogger::default());
        let state = state(r#"{}"#, Arc::clone(&logger));

        let response = handle_request(request("POST", "/nowhere?x=1"), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Could not find /nowhere?x=1"}));

        let lines = logger.lines.lock().unwrap();
        assert_eq!(lines[0].2, "url not mapped");
    }

    #[tokio::test]
    async fn test_favicon_not_logged() {
        let logger = Arc::new(CapturingLogger::default());
        let state = state(r#"{}"#, Arc::clone(&logger));

        let response = handle_request(request("GET", "/favicon.ico"), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(logger.lines.lock().unwrap().is_empty());
    }
}
