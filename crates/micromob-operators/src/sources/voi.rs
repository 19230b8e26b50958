use std::sync::Arc;

use async_trait::async_trait;
use micromob_core::{Operator, Vehicle, VoiConfig};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use super::{SearchArea, VehicleSource, MDS_ACCEPT};
use crate::client::read_json;
use crate::error::OperatorError;
use crate::normalize::{from_voi, normalize_all};
use crate::token::TokenStore;
use crate::types::{FreeBikeStatusResponse, RawGbfsBike, TokenResponse};

/// VOI Oslo and Trondheim, authenticated with a client-credentials session key.
pub struct VoiSource {
    client: Client,
    config: VoiConfig,
    token: Arc<TokenStore>,
}

impl VoiSource {
    #[must_use]
    pub fn new(client: Client, config: VoiConfig) -> Self {
        Self {
            client,
            config,
            token: Arc::new(TokenStore::new(Operator::Voi)),
        }
    }

    #[must_use]
    pub fn with_token_store(mut self, token: Arc<TokenStore>) -> Self {
        self.token = token;
        self
    }

    async fn refresh_session_key(&self) -> Result<String, OperatorError> {
        let response = self
            .client
            .post(&self.config.url_session_key)
            .basic_auth(&self.config.api_user, Some(&self.config.api_pass))
            .header(ACCEPT, MDS_ACCEPT)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;
        let body: TokenResponse = read_json(response, "VOI session key").await?;
        Ok(body.access_token)
    }

    async fn fetch_city(&self, url: &str, token: &str) -> Result<Vec<RawGbfsBike>, OperatorError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("X-Voigbfs-Ext", "Battery")
            .header(ACCEPT, MDS_ACCEPT)
            .send()
            .await?;
        let feed: FreeBikeStatusResponse = read_json(response, "VOI free_bike_status").await?;
        Ok(feed.data.bikes)
    }

    async fn fetch_cities(&self, token: String) -> Result<Vec<RawGbfsBike>, OperatorError> {
        let (mut oslo, trondheim) = tokio::try_join!(
            self.fetch_city(&self.config.url_oslo, &token),
            self.fetch_city(&self.config.url_trondheim, &token),
        )?;
        oslo.extend(trondheim);
        Ok(oslo)
    }
}

#[async_trait]
impl VehicleSource for VoiSource {
    fn operator(&self) -> Operator {
        Operator::Voi
    }

    async fn fetch(&self, _area: &SearchArea) -> Result<Vec<Vehicle>, OperatorError> {
        let bikes = self
            .token
            .with_retry(
                || self.refresh_session_key(),
                |token| self.fetch_cities(token),
            )
            .await?;
        Ok(normalize_all(
            bikes.iter().filter(|b| b.is_available()),
            from_voi,
        ))
    }
}
