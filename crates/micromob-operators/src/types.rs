//! Raw response shapes as the operators send them.
//!
//! Providers disagree on whether ids and coordinates are numbers or strings
//! and whether flags are booleans or `0`/`1`, so those fields use the lenient
//! [`Scalar`] and [`Flag`] types. Coordinates are optional here so a single
//! malformed record does not fail deserialization of the whole feed.

use serde::Deserialize;

/// A JSON value that may arrive as either a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Finite `f64`, parsing strings if needed.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }

    /// Integer value; fractional numbers are rounded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Scalar::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.round() as i64))
            }
        }
    }

    /// Textual form; numbers are rendered without quotes.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// A boolean flag sent either as `true`/`false` or as `1`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Bool(false)
    }
}

impl Flag {
    #[must_use]
    pub fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Common GBFS envelope; `last_updated`/`ttl` are kept for re-publishing.
#[derive(Debug, Deserialize)]
pub struct GbfsEnvelope<T> {
    #[serde(default)]
    pub last_updated: Option<i64>,
    #[serde(default)]
    pub ttl: Option<i64>,
    pub data: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct BikesData {
    #[serde(default)]
    pub bikes: Vec<RawGbfsBike>,
}

pub type FreeBikeStatusResponse = GbfsEnvelope<BikesData>;

/// A `free_bike_status` record covering the VOI, ZVIPP, LIME and BOLT variants.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGbfsBike {
    #[serde(default)]
    pub bike_id: Option<Scalar>,
    #[serde(default)]
    pub lat: Option<Scalar>,
    #[serde(default)]
    pub lon: Option<Scalar>,
    #[serde(default)]
    pub is_reserved: Flag,
    #[serde(default)]
    pub is_disabled: Flag,
    #[serde(default, rename = "qr-code")]
    pub qr_code: Option<Scalar>,
    #[serde(default)]
    pub battery: Option<Scalar>,
    #[serde(default)]
    pub battery_level: Option<Scalar>,
}

impl RawGbfsBike {
    /// Neither reserved nor disabled.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.is_reserved.is_set() && !self.is_disabled.is_set()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TierResponse {
    #[serde(default)]
    pub data: Vec<RawTierVehicle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTierVehicle {
    pub id: Scalar,
    pub attributes: TierAttributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAttributes {
    #[serde(default)]
    pub lat: Option<Scalar>,
    #[serde(default)]
    pub lng: Option<Scalar>,
    #[serde(default)]
    pub code: Option<Scalar>,
    #[serde(default)]
    pub battery_level: Option<Scalar>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_accepts_numbers_and_strings() {
        let n: Scalar = serde_json::from_str("59.91").unwrap();
        let s: Scalar = serde_json::from_str("\"59.91\"").unwrap();
        assert_eq!(n.as_f64(), Some(59.91));
        assert_eq!(s.as_f64(), Some(59.91));
    }

    #[test]
    fn scalar_rejects_garbage_coordinates() {
        let s: Scalar = serde_json::from_str("\"north\"").unwrap();
        assert_eq!(s.as_f64(), None);
    }

    #[test]
    fn scalar_text_renders_numbers_plainly() {
        let n: Scalar = serde_json::from_str("1234").unwrap();
        assert_eq!(n.to_text(), "1234");
        assert_eq!(n.as_i64(), Some(1234));
    }

    #[test]
    fn flag_accepts_bools_and_integers() {
        let bike: RawGbfsBike = serde_json::from_str(
            r#"{"bike_id": "b", "lat": 1, "lon": 2, "is_reserved": 1, "is_disabled": false}"#,
        )
        .unwrap();
        assert!(bike.is_reserved.is_set());
        assert!(!bike.is_disabled.is_set());
        assert!(!bike.is_available());
    }

    #[test]
    fn missing_flags_mean_available() {
        let bike: RawGbfsBike =
            serde_json::from_str(r#"{"bike_id": 7, "lat": "1", "lon": "2"}"#).unwrap();
        assert!(bike.is_available());
    }
}
