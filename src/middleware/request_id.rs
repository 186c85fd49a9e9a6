//! # Request ID Middleware
//!
//! Every request gets a correlation ID: an inbound `X-Request-ID` header is
//! trusted and reused, otherwise a fresh UUIDv4 is minted. The ID rides the
//! request headers upstream and is echoed on the response, so one value
//! traces a request across the gateway and every backend hop.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation ID attached to request extensions for handlers and logging
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

pub async fn propagate_request_id(mut request: Request, next: Next) -> Response {
    let header_name = HeaderName::from_static(REQUEST_ID_HEADER);

    let request_id = request
        .headers()
        .get(&header_name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // `request_id` is either a valid inbound header value or a UUID
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        request.headers_mut().insert(header_name.clone(), value.clone());
        request.extensions_mut().insert(RequestId(request_id));

        let mut response = next.run(request).await;
        response.headers_mut().insert(header_name, value);
        return response;
    }

    next.run(request).await
}
