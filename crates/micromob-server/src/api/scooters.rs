use axum::{
    extract::{Query, State},
    Extension, Json,
};
use micromob_core::{Operator, Vehicle};
use micromob_operators::ScooterQuery;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) const DEFAULT_RANGE_M: f64 = 200.0;
pub(super) const MAX_RANGE_M: f64 = 30_000.0;
pub(super) const DEFAULT_MAX: usize = 20;

const COORDINATES_MISSING: &str = "Coordinates missing (lat and lon)";

/// Raw query string; every field is text so bad values can be handled per
/// field instead of failing the whole extraction.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawScooterQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub range: Option<String>,
    pub max: Option<String>,
    pub operators: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) struct Rejection {
    code: &'static str,
    message: String,
}

impl Rejection {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "bad_request",
            message: message.into(),
        }
    }

    fn validation(message: impl Into<String>) -> Self {
        Self {
            code: "validation_error",
            message: message.into(),
        }
    }

    fn into_api_error(self, request_id: String) -> ApiError {
        ApiError::new(request_id, self.code, self.message)
    }
}

pub(super) async fn list_scooters(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(raw): Query<RawScooterQuery>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let query = parse_query(&raw).map_err(|rejection| {
        tracing::info!(message = %rejection.message, "rejected scooter query");
        rejection.into_api_error(req_id.0)
    })?;

    Ok(Json(state.aggregator.get_scooters(&query).await))
}

pub(super) fn parse_query(raw: &RawScooterQuery) -> Result<ScooterQuery, Rejection> {
    let operators = parse_operators(raw.operators.as_deref())?;

    let (Some(lat), Some(lon)) = (
        parse_finite(raw.lat.as_deref()),
        parse_finite(raw.lon.as_deref()),
    ) else {
        return Err(Rejection::bad_request(COORDINATES_MISSING));
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(Rejection::validation(format!(
            "Coordinates out of range: lat={lat}, lon={lon}"
        )));
    }

    Ok(ScooterQuery {
        lat,
        lon,
        range: parse_range(raw.range.as_deref()),
        max: parse_max(raw.max.as_deref())?,
        operators,
    })
}

fn parse_finite(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Unusable ranges fall back to the default; large ones are capped.
fn parse_range(value: Option<&str>) -> f64 {
    match parse_finite(value) {
        Some(range) if range > 0.0 => range.min(MAX_RANGE_M),
        _ => DEFAULT_RANGE_M,
    }
}

fn parse_max(value: Option<&str>) -> Result<usize, Rejection> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_MAX);
    };
    value
        .parse::<usize>()
        .map_err(|_| Rejection::validation(format!("Invalid max: {value}")))
}

/// Parses a comma-separated, case-insensitive operator list.
///
/// Returns `None` when no names are given. Duplicates are dropped, keeping
/// the first occurrence. Every unknown name is reported at once.
fn parse_operators(value: Option<&str>) -> Result<Option<Vec<Operator>>, Rejection> {
    let Some(value) = value else {
        return Ok(None);
    };

    let mut operators = Vec::new();
    let mut invalid = Vec::new();
    for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match name.parse::<Operator>() {
            Ok(op) if !operators.contains(&op) => operators.push(op),
            Ok(_) => {}
            Err(err) => invalid.push(err.0),
        }
    }

    if !invalid.is_empty() {
        return Err(Rejection::bad_request(format!(
            "Invalid operator names passed: {}",
            invalid.join(", ")
        )));
    }

    Ok((!operators.is_empty()).then_some(operators))
}
