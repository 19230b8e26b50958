use std::sync::Arc;

use micromob_core::pricing::BOLT_OSLO_PRICE;
use micromob_core::Operator;

use super::types::{
    Bike, DiscoveryData, Document, Feed, FeedList, FreeBikeStatus, GbfsDocument, PricingPlan,
    PricingSegment, Region, SystemInformation, SystemPricingPlans, SystemRegions, VehicleType,
    VehicleTypes,
};
use super::{FeedName, GBFS_VERSION};
use crate::error::OperatorError;
use crate::sources::BoltSource;
use crate::types::{BikesData, GbfsEnvelope};

const VEHICLE_TYPE_ID: &str = "YBO:VehicleType:Scooter";
const PRICING_PLAN_ID: &str = "YBO:PricingPlan:Basic";
const REGION_ID: &str = "YBO:Region:Oslo";

/// Re-publishes Bolt Oslo's feed as GBFS v2.1 with namespaced ids.
///
/// Static feeds (vehicle types, regions, pricing plans) still hit the
/// upstream discovery document so `last_updated` and `ttl` stay current.
#[derive(Clone)]
pub struct BoltGbfs {
    source: Arc<BoltSource>,
}

impl BoltGbfs {
    #[must_use]
    pub fn new(source: Arc<BoltSource>) -> Self {
        Self { source }
    }

    /// Builds `feed`, using `base_url` (no trailing slash) for feed links.
    ///
    /// # Errors
    ///
    /// Returns the upstream [`OperatorError`] when Bolt cannot be reached or
    /// answers with an unexpected shape.
    pub async fn feed(
        &self,
        feed: FeedName,
        base_url: &str,
    ) -> Result<GbfsDocument, OperatorError> {
        let document = match feed {
            FeedName::Gbfs => {
                let upstream = self.discovery().await?;
                GbfsDocument::Discovery(wrap(&upstream, discovery(base_url)))
            }
            FeedName::SystemInformation => {
                let upstream: GbfsEnvelope<SystemInformation> = self
                    .source
                    .fetch_feed(FeedName::SystemInformation.as_str())
                    .await?;
                let info = system_information(upstream.data.clone());
                GbfsDocument::SystemInformation(wrap(&upstream, info))
            }
            FeedName::VehicleTypes => {
                let upstream = self.discovery().await?;
                GbfsDocument::VehicleTypes(wrap(&upstream, vehicle_types()))
            }
            FeedName::FreeBikeStatus => {
                let upstream: GbfsEnvelope<BikesData> = self
                    .source
                    .fetch_feed(FeedName::FreeBikeStatus.as_str())
                    .await?;
                let status = free_bike_status(&upstream.data);
                GbfsDocument::FreeBikeStatus(wrap(&upstream, status))
            }
            FeedName::SystemRegions => {
                let upstream = self.discovery().await?;
                GbfsDocument::SystemRegions(wrap(&upstream, system_regions()))
            }
            FeedName::SystemPricingPlans => {
                let upstream = self.discovery().await?;
                GbfsDocument::SystemPricingPlans(wrap(&upstream, system_pricing_plans()))
            }
        };
        Ok(document)
    }

    async fn discovery(&self) -> Result<GbfsEnvelope<serde_json::Value>, OperatorError> {
        self.source.fetch_feed(FeedName::Gbfs.as_str()).await
    }
}

fn wrap<U, T>(upstream: &GbfsEnvelope<U>, data: T) -> Document<T> {
    Document {
        last_updated: upstream.last_updated.unwrap_or_default(),
        ttl: upstream.ttl.unwrap_or_default(),
        version: GBFS_VERSION.to_string(),
        data,
    }
}

fn discovery(base_url: &str) -> DiscoveryData {
    DiscoveryData {
        en: FeedList {
            feeds: FeedName::LISTED
                .into_iter()
                .map(|feed| Feed {
                    name: feed.as_str().to_string(),
                    url: format!("{base_url}/{feed}"),
                })
                .collect(),
        },
    }
}

fn system_information(upstream: SystemInformation) -> SystemInformation {
    SystemInformation {
        system_id: format!(
            "{}:System:{}Oslo",
            Operator::Bolt.codespace(),
            upstream.system_id
        ),
        ..upstream
    }
}

fn vehicle_types() -> VehicleTypes {
    VehicleTypes {
        vehicle_types: vec![VehicleType {
            vehicle_type_id: VEHICLE_TYPE_ID.to_string(),
            form_factor: "scooter".to_string(),
            propulsion_type: "electric".to_string(),
            max_range_meters: 0.0,
        }],
    }
}

fn free_bike_status(upstream: &BikesData) -> FreeBikeStatus {
    FreeBikeStatus {
        bikes: upstream
            .bikes
            .iter()
            .filter_map(|bike| {
                let raw_id = bike.bike_id.as_ref()?.to_text();
                Some(Bike {
                    bike_id: Operator::Bolt.vehicle_id(&raw_id),
                    lat: bike.lat.as_ref().and_then(|v| v.as_f64()),
                    lon: bike.lon.as_ref().and_then(|v| v.as_f64()),
                    is_reserved: bike.is_reserved.is_set(),
                    is_disabled: bike.is_disabled.is_set(),
                    vehicle_type_id: VEHICLE_TYPE_ID.to_string(),
                    current_range_meters: 0.0,
                    pricing_plan_id: PRICING_PLAN_ID.to_string(),
                })
            })
            .collect(),
    }
}

fn system_regions() -> SystemRegions {
    SystemRegions {
        regions: vec![Region {
            region_id: REGION_ID.to_string(),
            name: "Oslo".to_string(),
        }],
    }
}

fn system_pricing_plans() -> SystemPricingPlans {
    SystemPricingPlans {
        plans: vec![PricingPlan {
            plan_id: PRICING_PLAN_ID.to_string(),
            name: "Basic".to_string(),
            currency: "NOK".to_string(),
            price: 0.0,
            is_taxable: false,
            description: "Start NOK 0, Per minute 3,50 NOK".to_string(),
            per_min_pricing: vec![PricingSegment {
                start: BOLT_OSLO_PRICE.start_price,
                rate: BOLT_OSLO_PRICE.price_per_minute,
                interval: 1,
            }],
        }],
    }
}
