use serde::{Deserialize, Serialize};

/// Envelope shared by every GBFS document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document<T> {
    pub last_updated: i64,
    pub ttl: i64,
    pub version: String,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedList {
    pub feeds: Vec<Feed>,
}

/// Discovery data keyed by language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryData {
    pub en: FeedList,
}

/// Upstream `system_information` fields the re-publisher carries over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInformation {
    pub system_id: String,
    pub language: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleType {
    pub vehicle_type_id: String,
    pub form_factor: String,
    pub propulsion_type: String,
    pub max_range_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleTypes {
    pub vehicle_types: Vec<VehicleType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bike {
    pub bike_id: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub is_reserved: bool,
    pub is_disabled: bool,
    pub vehicle_type_id: String,
    pub current_range_meters: f64,
    pub pricing_plan_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeBikeStatus {
    pub bikes: Vec<Bike>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub region_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemRegions {
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingSegment {
    pub start: f64,
    pub rate: f64,
    pub interval: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingPlan {
    pub plan_id: String,
    pub name: String,
    pub currency: String,
    pub price: f64,
    pub is_taxable: bool,
    pub description: String,
    pub per_min_pricing: Vec<PricingSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemPricingPlans {
    pub plans: Vec<PricingPlan>,
}

/// Any document the re-publisher can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GbfsDocument {
    Discovery(Document<DiscoveryData>),
    SystemInformation(Document<SystemInformation>),
    VehicleTypes(Document<VehicleTypes>),
    FreeBikeStatus(Document<FreeBikeStatus>),
    SystemRegions(Document<SystemRegions>),
    SystemPricingPlans(Document<SystemPricingPlans>),
}
