//! Response builders.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_ICON: &str = "image/x-icon";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Fixture responses can be fetched from any origin.
const CORS_HEADER: (&str, &str) = ("Access-Control-Allow-Origin", "*");

/// Build a JSON response. Status codes were validated when the map was loaded.
pub fn json_response(status: u16, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    build_response_with_headers(
        status,
        [("Content-Type", CONTENT_TYPE_JSON), CORS_HEADER],
        body,
    )
}

/// Build a response with the given content type.
pub fn content_response(
    status: StatusCode,
    content_type: &str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    build_response_with_headers(status, [("Content-Type", content_type), CORS_HEADER], body)
}

/// Build an HTTP response with headers.
///
/// Falls back to a bare 500 response if the builder rejects the inputs.
pub fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder.body(Full::new(body.into())).unwrap_or_else(|_| {
        let mut response = Response::new(Full::new(Bytes::from("Internal Server Error")));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}
