use std::sync::Arc;

use async_trait::async_trait;
use micromob_core::{BoltConfig, Operator, Vehicle};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{SearchArea, VehicleSource};
use crate::client::read_json;
use crate::error::OperatorError;
use crate::normalize::{from_bolt, normalize_all};
use crate::token::TokenStore;
use crate::types::{FreeBikeStatusResponse, GbfsEnvelope, TokenResponse};

#[derive(Serialize)]
struct Credentials<'a> {
    user_name: &'a str,
    user_pass: &'a str,
}

/// Bolt Oslo. Also serves as the upstream of the GBFS re-publisher, sharing
/// one token between both uses.
pub struct BoltSource {
    client: Client,
    config: BoltConfig,
    token: Arc<TokenStore>,
}

impl BoltSource {
    #[must_use]
    pub fn new(client: Client, config: BoltConfig) -> Self {
        Self {
            client,
            config,
            token: Arc::new(TokenStore::new(Operator::Bolt)),
        }
    }

    #[must_use]
    pub fn with_token_store(mut self, token: Arc<TokenStore>) -> Self {
        self.token = token;
        self
    }

    async fn refresh_token(&self) -> Result<String, OperatorError> {
        let response = self
            .client
            .post(&self.config.url_auth)
            .json(&Credentials {
                user_name: &self.config.api_user,
                user_pass: &self.config.api_pass,
            })
            .send()
            .await?;
        let body: TokenResponse = read_json(response, "BOLT auth").await?;
        Ok(body.access_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        context: &str,
    ) -> Result<T, OperatorError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        read_json(response, context).await
    }

    /// Fetches one feed of Bolt's GBFS tree, e.g. `system_information`.
    ///
    /// # Errors
    ///
    /// Returns an [`OperatorError`] when the token cannot be obtained, the
    /// upstream answers with a non-2xx status, or the body does not match `T`.
    pub async fn fetch_feed<T: DeserializeOwned>(
        &self,
        feed: &str,
    ) -> Result<GbfsEnvelope<T>, OperatorError> {
        let url = format!("{}/{feed}", self.config.url_gbfs);
        let context = format!("BOLT {feed}");
        self.token
            .with_retry(
                || self.refresh_token(),
                |token| {
                    let url = url.clone();
                    let context = context.clone();
                    async move { self.get_json(&url, &token, &context).await }
                },
            )
            .await
    }
}

#[async_trait]
impl VehicleSource for BoltSource {
    fn operator(&self) -> Operator {
        Operator::Bolt
    }

    async fn fetch(&self, _area: &SearchArea) -> Result<Vec<Vehicle>, OperatorError> {
        let feed: FreeBikeStatusResponse = self
            .token
            .with_retry(
                || self.refresh_token(),
                |token| async move {
                    self.get_json(&self.config.url_oslo, &token, "BOLT free_bike_status")
                        .await
                },
            )
            .await?;
        Ok(normalize_all(
            feed.data.bikes.iter().filter(|b| b.is_available()),
            from_bolt,
        ))
    }
}
