use async_trait::async_trait;
use micromob_core::{LimeConfig, Operator, Vehicle};
use reqwest::Client;

use super::{SearchArea, VehicleSource};
use crate::client::read_json;
use crate::error::OperatorError;
use crate::normalize::{from_lime, normalize_all};
use crate::types::FreeBikeStatusResponse;

/// LIME Oslo with a static bearer token.
pub struct LimeSource {
    client: Client,
    config: LimeConfig,
}

impl LimeSource {
    #[must_use]
    pub fn new(client: Client, config: LimeConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl VehicleSource for LimeSource {
    fn operator(&self) -> Operator {
        Operator::Lime
    }

    async fn fetch(&self, _area: &SearchArea) -> Result<Vec<Vehicle>, OperatorError> {
        let response = self
            .client
            .get(&self.config.url_oslo)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;
        let feed: FreeBikeStatusResponse = read_json(response, "LIME free_bike_status").await?;
        Ok(normalize_all(
            feed.data.bikes.iter().filter(|b| b.is_available()),
            from_lime,
        ))
    }
}
