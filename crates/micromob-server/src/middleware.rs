use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::api::ApiError;

/// Header every `/scooters` caller must send, e.g. `"Acme - Journey planner"`.
pub const CLIENT_NAME_HEADER: HeaderName = HeaderName::from_static("et-client-name");

/// Entur's own clients are too chatty to log.
const INTERNAL_CLIENT_PREFIX: &str = "entur-client";

const MISSING_CLIENT_NAME: &str = "ET-Client-Name header missing. Please include a header \
     'ET-Client-Name' with a value on the form 'Organization - Usecase'.";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Rejects requests without a non-empty `ET-Client-Name` header.
pub async fn require_client_name(req: Request, next: Next) -> Response {
    let client = req
        .headers()
        .get(&CLIENT_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    let Some(client) = client else {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(|r| r.0.clone())
            .unwrap_or_default();
        tracing::info!("ET-Client-Name missing");
        return ApiError::new(request_id, "bad_request", MISSING_CLIENT_NAME).into_response();
    };

    if !client.starts_with(INTERNAL_CLIENT_PREFIX) {
        tracing::info!(client = %client, "ET-Client-Name");
    }

    next.run(req).await
}
