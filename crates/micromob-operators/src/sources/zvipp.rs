use async_trait::async_trait;
use micromob_core::{Operator, Vehicle, ZvippConfig};
use reqwest::Client;

use super::{SearchArea, VehicleSource};
use crate::client::read_json;
use crate::error::OperatorError;
use crate::normalize::{from_zvipp, normalize_all};
use crate::types::FreeBikeStatusResponse;

/// ZVIPP Drammen; the feed is public.
pub struct ZvippSource {
    client: Client,
    config: ZvippConfig,
}

impl ZvippSource {
    #[must_use]
    pub fn new(client: Client, config: ZvippConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl VehicleSource for ZvippSource {
    fn operator(&self) -> Operator {
        Operator::Zvipp
    }

    async fn fetch(&self, _area: &SearchArea) -> Result<Vec<Vehicle>, OperatorError> {
        let response = self.client.get(&self.config.url_drammen).send().await?;
        let feed: FreeBikeStatusResponse = read_json(response, "ZVIPP free_bike_status").await?;
        Ok(normalize_all(
            feed.data.bikes.iter().filter(|b| b.is_available()),
            from_zvipp,
        ))
    }
}
