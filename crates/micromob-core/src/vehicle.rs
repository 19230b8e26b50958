use serde::{Serialize, Serializer};

use crate::operator::Operator;

/// Placeholder written for absent string fields at the JSON boundary.
pub const MISSING_TEXT: &str = "-";
/// Placeholder written for an absent numeric battery at the JSON boundary.
pub const MISSING_BATTERY: i64 = -1;

/// A normalized, available vehicle from any operator.
///
/// Optional fields stay `None` in memory; existing consumers expect the
/// `"-"` / `-1` placeholders on the wire, so those are only produced during
/// serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// `<codespace>:Scooter:<provider id>`, unique across operators.
    pub id: String,
    pub operator: Operator,
    pub lat: f64,
    pub lon: f64,
    #[serde(serialize_with = "text_or_placeholder")]
    pub code: Option<String>,
    #[serde(serialize_with = "battery_or_placeholder")]
    pub battery: Option<i64>,
    #[serde(serialize_with = "text_or_placeholder")]
    pub battery_level: Option<String>,
}

impl Vehicle {
    /// Creates a vehicle with a namespaced id and no optional attributes.
    #[must_use]
    pub fn new(operator: Operator, raw_id: &str, lat: f64, lon: f64) -> Self {
        Self {
            id: operator.vehicle_id(raw_id),
            operator,
            lat,
            lon,
            code: None,
            battery: None,
            battery_level: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code.filter(|c| !c.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_battery(mut self, battery: Option<i64>) -> Self {
        self.battery = battery;
        self
    }

    #[must_use]
    pub fn with_battery_level(mut self, level: Option<String>) -> Self {
        self.battery_level = level.filter(|l| !l.trim().is_empty());
        self
    }
}

#[allow(clippy::ref_option)]
fn text_or_placeholder<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.as_deref().unwrap_or(MISSING_TEXT))
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn battery_or_placeholder<S: Serializer>(value: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(value.unwrap_or(MISSING_BATTERY))
}
