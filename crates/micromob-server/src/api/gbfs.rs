use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Extension, Json,
};
use micromob_operators::gbfs::{FeedName, GbfsDocument};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Serves one GBFS v2.1 feed re-published from Bolt Oslo.
///
/// Unknown feeds, a missing Bolt configuration and upstream failures all
/// answer 404; the cause is only logged.
pub(super) async fn bolt_feed(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(feed): Path<String>,
    headers: HeaderMap,
) -> Result<Json<GbfsDocument>, ApiError> {
    let not_found = || {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("feed {feed} not found"),
        )
    };

    let Ok(name) = feed.parse::<FeedName>() else {
        return Err(not_found());
    };
    let Some(gbfs) = state.gbfs.as_ref() else {
        tracing::debug!(feed = %name, "bolt gbfs requested but bolt is not configured");
        return Err(not_found());
    };

    match gbfs.feed(name, &base_url(&headers)).await {
        Ok(document) => Ok(Json(document)),
        Err(e) => {
            tracing::warn!(
                feed = %name,
                status = ?e.status(),
                error = %e,
                "bolt gbfs feed failed"
            );
            Err(not_found())
        }
    }
}

/// Public URL prefix of the bolt feeds as seen by the caller.
fn base_url(headers: &HeaderMap) -> String {
    let proto = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{proto}://{host}/gbfs/bolt")
}
