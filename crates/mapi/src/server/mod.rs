//! HTTP transport for the endpoint table.
//!
//! - `handler`: per-request normalization, resolution and dispatch
//! - `response`: response builders with the CORS and content-type headers
//! - `favicon`: static favicon serving

mod favicon;
mod handler;
mod response;

pub use favicon::FaviconSource;
pub use handler::handle_request;

use crate::endpoint::EndpointTable;
use crate::logger::RequestLogger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Pause after a failed `accept`, so persistent errors such as `EMFILE` do
/// not spin the loop.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// State shared by every connection.
pub struct ServerState {
    pub table: EndpointTable,
    pub logger: Arc<dyn RequestLogger>,
    pub favicon: FaviconSource,
}

/// Mock server answering requests from a compiled endpoint table.
pub struct MockServer {
    table: EndpointTable,
    logger: Arc<dyn RequestLogger>,
    favicon: FaviconSource,
}

impl MockServer {
    pub fn new(table: EndpointTable, logger: Arc<dyn RequestLogger>) -> Self {
        Self {
            table,
            logger,
            favicon: FaviconSource::default(),
        }
    }

    /// Serve the favicon from `source` instead of the bundled icon.
    pub fn with_favicon(mut self, source: FaviconSource) -> Self {
        self.favicon = source;
        self
    }

    /// Accept connections from `listener` until `shutdown` completes.
    ///
    /// Connections already accepted keep running to completion.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), anyhow::Error>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        info!("Mock server listening on http://{}", local_addr);
        let state = Arc::new(ServerState {
            table: self.table,
            logger: self.logger,
            favicon: self.favicon,
        });
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            debug!("Accepted connection from {}", peer);
                            let state = Arc::clone(&state);
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| {
                                    let state = Arc::clone(&state);
                                    async move { handle_request(req, state).await }
                                });
                                if let Err(e) = http1::Builder::new()
                                    .serve_connection(io, service)
                                    .await
                                {
                                    debug!("Connection error from {}: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error on {}: {}", local_addr, e);
                            accept_backoff().await;
                        }
                    }
                }
                () = &mut shutdown => {
                    info!("Mock server on {} shutting down", local_addr);
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn accept_backoff() {
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}
