//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full text is logged at the `debug` level. Export files and
/// receipts are logged by size only.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match buffer_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    tracing::info!(
        "Received request: {parts:#?}\nbody: {}",
        body_summary(&parts.headers, &body)
    );
    log_full_body(&parts.headers, &body);

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let body = match buffer_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    tracing::info!(
        "Sending response: {parts:#?}\nbody: {}",
        body_summary(&parts.headers, &body)
    );
    log_full_body(&parts.headers, &body);

    Response::from_parts(parts, Body::from(body))
}

async fn buffer_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn is_text(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return true;
    };

    content_type.starts_with("text/html")
        || content_type.starts_with("application/x-www-form-urlencoded")
        || content_type.starts_with("text/plain")
}

fn body_summary(headers: &HeaderMap, body: &[u8]) -> String {
    if !is_text(headers) {
        return format!("<{} bytes>", body.len());
    }

    let text = String::from_utf8_lossy(body);

    if text.len() > LOG_BODY_LENGTH_LIMIT {
        let end = (0..=LOG_BODY_LENGTH_LIMIT)
            .rev()
            .find(|&index| text.is_char_boundary(index))
            .unwrap_or(0);
        format!("{}...", &text[..end])
    } else {
        format!("{text:?}")
    }
}

fn log_full_body(headers: &HeaderMap, body: &[u8]) {
    if is_text(headers) && body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full body: {:?}", String::from_utf8_lossy(body));
    }
}
