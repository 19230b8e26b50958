//! GBFS v2.1 documents and the Bolt feed re-publisher.

mod bolt;
mod types;

use std::str::FromStr;

pub use bolt::BoltGbfs;
pub use types::*;

pub const GBFS_VERSION: &str = "2.1";

/// Feeds the re-publisher serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedName {
    Gbfs,
    SystemInformation,
    VehicleTypes,
    FreeBikeStatus,
    SystemRegions,
    SystemPricingPlans,
}

impl FeedName {
    /// Every feed listed in the discovery document (all but `gbfs` itself).
    pub const LISTED: [FeedName; 5] = [
        FeedName::SystemInformation,
        FeedName::VehicleTypes,
        FeedName::FreeBikeStatus,
        FeedName::SystemRegions,
        FeedName::SystemPricingPlans,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FeedName::Gbfs => "gbfs",
            FeedName::SystemInformation => "system_information",
            FeedName::VehicleTypes => "vehicle_types",
            FeedName::FreeBikeStatus => "free_bike_status",
            FeedName::SystemRegions => "system_regions",
            FeedName::SystemPricingPlans => "system_pricing_plans",
        }
    }
}

impl std::fmt::Display for FeedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        std::iter::once(FeedName::Gbfs)
            .chain(FeedName::LISTED)
            .find(|feed| feed.as_str() == s)
            .ok_or_else(|| format!("unknown GBFS feed: {s}"))
    }
}
