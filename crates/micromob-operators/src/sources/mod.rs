//! One [`VehicleSource`] per operator plus the registry that selects them.

mod bolt;
mod lime;
mod tier;
mod voi;
mod zvipp;

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use micromob_core::{OperatorsConfig, Operator, Vehicle};
use reqwest::Client;

use crate::error::OperatorError;

pub use bolt::BoltSource;
pub use lime::LimeSource;
pub use tier::TierSource;
pub use voi::VoiSource;
pub use zvipp::ZvippSource;

/// Media type VOI requires on both the session-key and feed endpoints.
pub(crate) const MDS_ACCEPT: &str = "application/vnd.mds.provider+json;version=0.3";

/// Centre and radius of a vehicle search, in degrees and meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub lat: f64,
    pub lon: f64,
    pub range: f64,
}

/// Fetches the currently available vehicles of one operator.
///
/// Sources return errors; degrading them to an empty list is the caller's job
/// (see [`log_fetch_error`]). Sources that ignore `area` return the operator's
/// whole fleet and can be cached.
#[async_trait]
pub trait VehicleSource: Send + Sync {
    fn operator(&self) -> Operator;

    async fn fetch(&self, area: &SearchArea) -> Result<Vec<Vehicle>, OperatorError>;
}

/// Logs an operator failure with its status and detail.
pub fn log_fetch_error(operator: Operator, error: &OperatorError) {
    tracing::warn!(
        operator = operator.display_name(),
        status = ?error.status(),
        error = %error,
        "vehicle fetch failed"
    );
}

/// Awaits one operator fetch, degrading errors and panics to an empty list.
pub(crate) async fn fetch_or_empty<Fut>(operator: Operator, fetch: Fut) -> Vec<Vehicle>
where
    Fut: Future<Output = Result<Vec<Vehicle>, OperatorError>>,
{
    match AssertUnwindSafe(fetch).catch_unwind().await {
        Ok(Ok(vehicles)) => {
            tracing::debug!(
                operator = operator.display_name(),
                count = vehicles.len(),
                "fetched vehicles"
            );
            vehicles
        }
        Ok(Err(e)) => {
            log_fetch_error(operator, &e);
            Vec::new()
        }
        Err(_) => {
            tracing::error!(operator = operator.display_name(), "vehicle fetch panicked");
            Vec::new()
        }
    }
}

/// Maps each configured operator to its source.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<Operator, Arc<dyn VehicleSource>>,
    bolt: Option<Arc<BoltSource>>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a source for every operator that has configuration.
    #[must_use]
    pub fn from_config(client: &Client, config: &OperatorsConfig) -> Self {
        let mut registry = Self::new();
        if let Some(voi) = &config.voi {
            registry.insert(Arc::new(VoiSource::new(client.clone(), voi.clone())));
        }
        if let Some(tier) = &config.tier {
            registry.insert(Arc::new(TierSource::new(client.clone(), tier.clone())));
        }
        if let Some(zvipp) = &config.zvipp {
            registry.insert(Arc::new(ZvippSource::new(client.clone(), zvipp.clone())));
        }
        if let Some(lime) = &config.lime {
            registry.insert(Arc::new(LimeSource::new(client.clone(), lime.clone())));
        }
        if let Some(bolt) = &config.bolt {
            registry.insert_bolt(Arc::new(BoltSource::new(client.clone(), bolt.clone())));
        }
        for operator in Operator::ALL {
            if !registry.sources.contains_key(&operator) {
                tracing::warn!(operator = operator.display_name(), "operator is not configured");
            }
        }
        registry
    }

    /// Registers `source` under its own operator, replacing any previous one.
    pub fn insert(&mut self, source: Arc<dyn VehicleSource>) {
        self.sources.insert(source.operator(), source);
    }

    /// Registers Bolt both as a vehicle source and as the GBFS upstream.
    pub fn insert_bolt(&mut self, source: Arc<BoltSource>) {
        self.bolt = Some(Arc::clone(&source));
        self.insert(source);
    }

    #[must_use]
    pub fn get(&self, operator: Operator) -> Option<Arc<dyn VehicleSource>> {
        self.sources.get(&operator).cloned()
    }

    #[must_use]
    pub fn bolt(&self) -> Option<Arc<BoltSource>> {
        self.bolt.clone()
    }

    #[must_use]
    pub fn configured(&self) -> Vec<Operator> {
        let mut operators: Vec<_> = self.sources.keys().copied().collect();
        operators.sort_unstable();
        operators
    }
}
