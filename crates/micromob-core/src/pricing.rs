//! Localized price descriptions for scooters and city bikes.

use std::collections::BTreeMap;

use serde::Serialize;

/// Unlock fee and per-minute rate, both in NOK.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScooterPrice {
    pub start_price: f64,
    pub price_per_minute: f64,
}

impl ScooterPrice {
    #[must_use]
    pub const fn new(start_price: f64, price_per_minute: f64) -> Self {
        Self {
            start_price,
            price_per_minute,
        }
    }
}

pub const DEFAULT_SCOOTER_PRICE: ScooterPrice = ScooterPrice::new(10.0, 2.5);
pub const BOLT_OSLO_PRICE: ScooterPrice = ScooterPrice::new(0.0, 3.5);
pub const BOLT_LILLESTROM_PRICE: ScooterPrice = ScooterPrice::new(5.0, 2.5);
pub const BOLT_FREDRIKSTAD_PRICE: ScooterPrice = ScooterPrice::new(10.0, 2.5);
pub const LIME_PRICE: ScooterPrice = ScooterPrice::new(10.0, 3.0);
pub const ZVIPP_PRICE: ScooterPrice = ScooterPrice::new(10.0, 3.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Norwegian,
}

/// One text per supported language: Bokmål, Nynorsk and English.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceText {
    pub nob: String,
    pub nno: String,
    pub eng: String,
}

impl PriceText {
    fn fixed(nob: &str, nno: &str, eng: &str) -> Self {
        Self {
            nob: nob.to_string(),
            nno: nno.to_string(),
            eng: eng.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceList {
    pub scooters: BTreeMap<&'static str, PriceText>,
    pub city_bikes: BTreeMap<&'static str, PriceText>,
}

/// Formats an amount with a two-digit fraction, or none when the fraction is zero.
///
/// `2.5` becomes `"2,50"` in Norwegian and `"2.50"` in English; `3.0` becomes `"3"`.
#[must_use]
pub fn format_decimals(price: f64, locale: Locale) -> String {
    let rendered = price.to_string();
    let (integer, fraction) = rendered.split_once('.').unwrap_or((&rendered, ""));
    if fraction.chars().all(|c| c == '0') {
        return integer.to_string();
    }
    let separator = match locale {
        Locale::English => '.',
        Locale::Norwegian => ',',
    };
    format!("{integer}{separator}{fraction:0<2}")
}

#[must_use]
pub fn format_price_to_text(price: ScooterPrice) -> PriceText {
    let start_no = format_decimals(price.start_price, Locale::Norwegian);
    let minute_no = format_decimals(price.price_per_minute, Locale::Norwegian);
    let start_en = format_decimals(price.start_price, Locale::English);
    let minute_en = format_decimals(price.price_per_minute, Locale::English);

    let norwegian = format!("{start_no} kr i oppstart + {minute_no} kr per min");
    PriceText {
        nob: norwegian.clone(),
        nno: norwegian,
        eng: format!("NOK {start_en} to unlock + NOK {minute_en} per min"),
    }
}

#[must_use]
pub fn scooter_prices() -> BTreeMap<&'static str, PriceText> {
    [
        ("voi", DEFAULT_SCOOTER_PRICE),
        ("tier", DEFAULT_SCOOTER_PRICE),
        ("zvipp", ZVIPP_PRICE),
        ("bolt_oslo", BOLT_OSLO_PRICE),
        ("bolt_lillestrom", BOLT_LILLESTROM_PRICE),
        ("bolt_fredrikstad", BOLT_FREDRIKSTAD_PRICE),
        ("lime", LIME_PRICE),
    ]
    .into_iter()
    .map(|(key, price)| (key, format_price_to_text(price)))
    .collect()
}

#[must_use]
pub fn city_bike_prices() -> BTreeMap<&'static str, PriceText> {
    let big_cities = PriceText::fixed(
        "399 kr for sesongpass / 49 kr for dagspass",
        "399 kr for sesongpass / 49 kr for dagspass",
        "NOK 399 for season pass / NOK 49 for day pass",
    );

    BTreeMap::from([
        ("oslo", big_cities.clone()),
        ("bergen", big_cities.clone()),
        ("trondheim", big_cities),
        (
            "drammen",
            PriceText::fixed(
                "130 kr for sesongpass",
                "130 kr for sesongpass",
                "NOK 130 for season pass",
            ),
        ),
        (
            "lillestrom",
            PriceText::fixed(
                "50 kr for sesongpass / 10 kr for 3-dagerskort",
                "50 kr for sesongpass / 10 kr for 3-dagarskort",
                "NOK 50 for season pass / NOK 10 for 3-day pass",
            ),
        ),
        (
            "kolumbus",
            PriceText::fixed(
                "Gratis i én time med gyldig billett",
                "Gratis i éin time med gyldig billett",
                "Free for one hour with a valid ticket",
            ),
        ),
    ])
}

#[must_use]
pub fn price_list() -> PriceList {
    PriceList {
        scooters: scooter_prices(),
        city_bikes: city_bike_prices(),
    }
}
