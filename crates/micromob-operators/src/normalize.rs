//! Maps each raw provider shape into a [`Vehicle`].
//!
//! Mapping is renaming and coercion only. Records whose id or coordinates
//! cannot be read are skipped and logged at debug level.

use micromob_core::{Operator, Vehicle};

use crate::types::{RawGbfsBike, RawTierVehicle, Scalar};

/// Applies `map` to every record, dropping those it rejects.
pub fn normalize_all<'a, T: 'a>(
    records: impl IntoIterator<Item = &'a T>,
    map: impl Fn(&T) -> Option<Vehicle>,
) -> Vec<Vehicle> {
    records.into_iter().filter_map(map).collect()
}

fn coordinates(
    operator: Operator,
    id: &str,
    lat: Option<&Scalar>,
    lon: Option<&Scalar>,
) -> Option<(f64, f64)> {
    let lat = lat.and_then(Scalar::as_f64);
    let lon = lon.and_then(Scalar::as_f64);
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => {
            tracing::debug!(
                operator = %operator,
                id,
                "skipping vehicle with unreadable coordinates"
            );
            None
        }
    }
}

fn gbfs_base(operator: Operator, bike: &RawGbfsBike) -> Option<Vehicle> {
    let Some(raw_id) = bike.bike_id.as_ref().map(Scalar::to_text) else {
        tracing::debug!(operator = %operator, "skipping vehicle without bike_id");
        return None;
    };
    let (lat, lon) = coordinates(operator, &raw_id, bike.lat.as_ref(), bike.lon.as_ref())?;
    Some(Vehicle::new(operator, &raw_id, lat, lon))
}

/// VOI: numeric `battery`, no display code.
#[must_use]
pub fn from_voi(bike: &RawGbfsBike) -> Option<Vehicle> {
    gbfs_base(Operator::Voi, bike)
        .map(|v| v.with_battery(bike.battery.as_ref().and_then(Scalar::as_i64)))
}

/// ZVIPP: numeric id, string coordinates, `qr-code` as display code.
#[must_use]
pub fn from_zvipp(bike: &RawGbfsBike) -> Option<Vehicle> {
    gbfs_base(Operator::Zvipp, bike).map(|v| {
        v.with_code(bike.qr_code.as_ref().map(Scalar::to_text))
            .with_battery(bike.battery.as_ref().and_then(Scalar::as_i64))
    })
}

/// LIME: qualitative `battery_level` string.
#[must_use]
pub fn from_lime(bike: &RawGbfsBike) -> Option<Vehicle> {
    gbfs_base(Operator::Lime, bike)
        .map(|v| v.with_battery_level(bike.battery_level.as_ref().map(Scalar::to_text)))
}

#[must_use]
pub fn from_bolt(bike: &RawGbfsBike) -> Option<Vehicle> {
    gbfs_base(Operator::Bolt, bike)
        .map(|v| v.with_battery(bike.battery.as_ref().and_then(Scalar::as_i64)))
}

/// TIER: `lat`/`lng` attributes, numeric `code` and `batteryLevel`.
#[must_use]
pub fn from_tier(vehicle: &RawTierVehicle) -> Option<Vehicle> {
    let raw_id = vehicle.id.to_text();
    let attrs = &vehicle.attributes;
    let (lat, lon) = coordinates(
        Operator::Tier,
        &raw_id,
        attrs.lat.as_ref(),
        attrs.lng.as_ref(),
    )?;
    Some(
        Vehicle::new(Operator::Tier, &raw_id, lat, lon)
            .with_code(attrs.code.as_ref().map(Scalar::to_text))
            .with_battery(attrs.battery_level.as_ref().and_then(Scalar::as_i64)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FreeBikeStatusResponse, TierResponse};

    fn bikes(json: &str) -> Vec<RawGbfsBike> {
        serde_json::from_str::<FreeBikeStatusResponse>(json)
            .unwrap()
            .data
            .bikes
    }

    #[test]
    fn voi_maps_battery_and_namespaces_id() {
        let raw = bikes(
            r#"{"data": {"bikes": [{"bike_id": "abc", "lat": 59.9, "lon": 10.7,
                "is_reserved": false, "is_disabled": false, "battery": 64}]}}"#,
        );
        let vehicles = normalize_all(&raw, from_voi);
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, "YVO:Scooter:abc");
        assert_eq!(vehicles[0].battery, Some(64));
        assert_eq!(vehicles[0].code, None);
    }

    #[test]
    fn zvipp_parses_string_coordinates_and_numeric_id() {
        let raw = bikes(
            r#"{"data": {"bikes": [{"bike_id": 1234, "lat": "59.74", "lon": "10.20",
                "qr-code": "ZV-77", "battery": 90}]}}"#,
        );
        let vehicles = normalize_all(&raw, from_zvipp);
        assert_eq!(vehicles[0].id, "YZV:Scooter:1234");
        assert!((vehicles[0].lat - 59.74).abs() < 1e-9);
        assert_eq!(vehicles[0].code.as_deref(), Some("ZV-77"));
        assert_eq!(vehicles[0].battery, Some(90));
    }

    #[test]
    fn lime_keeps_battery_level_text() {
        let raw = bikes(
            r#"{"data": {"bikes": [{"bike_id": "l1", "lat": "59.91", "lon": "10.75",
                "battery_level": "high"}]}}"#,
        );
        let vehicles = normalize_all(&raw, from_lime);
        assert_eq!(vehicles[0].battery_level.as_deref(), Some("high"));
        assert_eq!(vehicles[0].battery, None);
    }

    #[test]
    fn unreadable_coordinates_skip_only_that_record() {
        let raw = bikes(
            r#"{"data": {"bikes": [
                {"bike_id": "bad", "lat": "n/a", "lon": "10.7"},
                {"bike_id": "missing"},
                {"bike_id": "good", "lat": 59.9, "lon": 10.7}
            ]}}"#,
        );
        let vehicles = normalize_all(&raw, from_lime);
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, "YLI:Scooter:good");
    }

    #[test]
    fn tier_maps_code_and_battery_level() {
        let raw: TierResponse = serde_json::from_str(
            r#"{"data": [{"id": "t-1", "attributes":
                {"lat": 59.92, "lng": 10.76, "code": 4321, "batteryLevel": 55}}]}"#,
        )
        .unwrap();
        let vehicles = normalize_all(&raw.data, from_tier);
        assert_eq!(vehicles[0].id, "YTI:Scooter:t-1");
        assert!((vehicles[0].lon - 10.76).abs() < 1e-9);
        assert_eq!(vehicles[0].code.as_deref(), Some("4321"));
        assert_eq!(vehicles[0].battery, Some(55));
    }
}
