use async_trait::async_trait;
use micromob_core::{Operator, TierConfig, Vehicle};
use reqwest::Client;

use super::{SearchArea, VehicleSource};
use crate::client::read_json;
use crate::error::OperatorError;
use crate::normalize::{from_tier, normalize_all};
use crate::types::TierResponse;

/// TIER's radius search. Results depend on the query area, so they are never cached.
pub struct TierSource {
    client: Client,
    config: TierConfig,
}

impl TierSource {
    #[must_use]
    pub fn new(client: Client, config: TierConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl VehicleSource for TierSource {
    fn operator(&self) -> Operator {
        Operator::Tier
    }

    async fn fetch(&self, area: &SearchArea) -> Result<Vec<Vehicle>, OperatorError> {
        let response = self
            .client
            .get(&self.config.url)
            .header("x-api-key", &self.config.api_key)
            .query(&[
                ("lat", area.lat.to_string()),
                ("lng", area.lon.to_string()),
                ("radius", area.range.to_string()),
            ])
            .send()
            .await?;
        let body: TierResponse = read_json(response, "TIER vehicles").await?;
        Ok(normalize_all(&body.data, from_tier))
    }
}
