//! Fan-out over operators, then filter, sort and truncate by proximity.

use std::sync::Arc;

use futures::future::join_all;
use micromob_core::{distance, Operator, Toggles, Vehicle};

use crate::cache::FetchCache;
use crate::sources::{fetch_or_empty, SearchArea, SourceRegistry};

/// A validated `/scooters` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScooterQuery {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in meters.
    pub range: f64,
    pub max: usize,
    /// Restricts the search to these operators; `None` means all of them.
    pub operators: Option<Vec<Operator>>,
}

pub struct Aggregator {
    sources: SourceRegistry,
    cache: FetchCache,
    toggles: Toggles,
}

impl Aggregator {
    #[must_use]
    pub fn new(sources: SourceRegistry, cache: FetchCache, toggles: Toggles) -> Self {
        Self {
            sources,
            cache,
            toggles,
        }
    }

    #[must_use]
    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    /// Vehicles near the query point, closest first, at most `query.max`.
    ///
    /// Operators are queried concurrently. A failing, unconfigured or
    /// toggled-off operator contributes nothing and never affects the others.
    pub async fn get_scooters(&self, query: &ScooterQuery) -> Vec<Vehicle> {
        let operators = query
            .operators
            .clone()
            .unwrap_or_else(|| Operator::ALL.to_vec());
        let area = SearchArea {
            lat: query.lat,
            lon: query.lon,
            range: query.range,
        };

        let per_operator = join_all(operators.iter().map(|&op| self.vehicles_for(op, area))).await;

        let mut nearby: Vec<(f64, &Vehicle)> = per_operator
            .iter()
            .flat_map(|vehicles| vehicles.iter())
            .map(|v| (distance(query.lat, query.lon, v.lat, v.lon), v))
            .filter(|(meters, v)| {
                v.operator.capabilities().server_side_radius || *meters <= query.range
            })
            .collect();

        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
        nearby.truncate(query.max);

        tracing::info!(
            lat = query.lat,
            lon = query.lon,
            range = query.range,
            max = query.max,
            count = nearby.len(),
            "scooters nearby"
        );

        nearby.into_iter().map(|(_, v)| v.clone()).collect()
    }

    async fn vehicles_for(&self, operator: Operator, area: SearchArea) -> Arc<Vec<Vehicle>> {
        if !self.toggles.is_enabled(operator) {
            tracing::info!(operator = operator.display_name(), "operator is toggled off");
            return Arc::default();
        }

        let Some(source) = self.sources.get(operator) else {
            tracing::warn!(operator = operator.display_name(), "operator is not configured");
            return Arc::default();
        };

        if operator.capabilities().cacheable {
            self.cache
                .get_vehicles(operator, move || async move { source.fetch(&area).await })
                .await
        } else {
            Arc::new(fetch_or_empty(operator, source.fetch(&area)).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::OperatorError;
    use crate::sources::VehicleSource;

    const OSLO: (f64, f64) = (59.9139, 10.7522);

    struct FakeSource {
        operator: Operator,
        result: Result<Vec<Vehicle>, u16>,
        panics: bool,
        calls: AtomicU32,
    }

    impl FakeSource {
        fn ok(operator: Operator, vehicles: Vec<Vehicle>) -> Arc<Self> {
            Arc::new(Self {
                operator,
                result: Ok(vehicles),
                panics: false,
                calls: AtomicU32::new(0),
            })
        }

        fn failing(operator: Operator, status: u16) -> Arc<Self> {
            Arc::new(Self {
                operator,
                result: Err(status),
                panics: false,
                calls: AtomicU32::new(0),
            })
        }

        fn panicking(operator: Operator) -> Arc<Self> {
            Arc::new(Self {
                operator,
                result: Ok(Vec::new()),
                panics: true,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VehicleSource for FakeSource {
        fn operator(&self) -> Operator {
            self.operator
        }

        async fn fetch(&self, _area: &SearchArea) -> Result<Vec<Vehicle>, OperatorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(!self.panics, "{} upstream handler blew up", self.operator);
            self.result
                .clone()
                .map_err(|status| OperatorError::UnexpectedStatus {
                    status,
                    url: format!("http://{}.test", self.operator),
                })
        }
    }

    /// A vehicle `north_m` meters north of central Oslo.
    fn near(operator: Operator, id: &str, north_m: f64) -> Vehicle {
        let lat = OSLO.0 + north_m / 111_195.0;
        Vehicle::new(operator, id, lat, OSLO.1)
    }

    fn query(range: f64, max: usize, operators: Option<Vec<Operator>>) -> ScooterQuery {
        ScooterQuery {
            lat: OSLO.0,
            lon: OSLO.1,
            range,
            max,
            operators,
        }
    }

    fn aggregator(sources: Vec<Arc<dyn VehicleSource>>, toggles: Toggles) -> Aggregator {
        let mut registry = SourceRegistry::new();
        for source in sources {
            registry.insert(source);
        }
        Aggregator::new(registry, FetchCache::new(Duration::from_secs(10)), toggles)
    }

    #[tokio::test]
    async fn one_failing_operator_does_not_affect_the_others() {
        let voi = FakeSource::failing(Operator::Voi, 503);
        let zvipp = FakeSource::ok(Operator::Zvipp, vec![near(Operator::Zvipp, "z1", 50.0)]);
        let agg = aggregator(vec![voi.clone(), zvipp.clone()], Toggles::all_enabled());

        let result = agg.get_scooters(&query(200.0, 20, None)).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "YZV:Scooter:z1");
        assert_eq!(voi.calls(), 1);
    }

    #[tokio::test]
    async fn panicking_direct_fetch_does_not_affect_the_others() {
        let tier = FakeSource::panicking(Operator::Tier);
        let lime = FakeSource::ok(Operator::Lime, vec![near(Operator::Lime, "l1", 30.0)]);
        let agg = aggregator(vec![tier.clone(), lime], Toggles::all_enabled());

        let result = agg.get_scooters(&query(200.0, 20, None)).await;

        assert_eq!(tier.calls(), 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "YLI:Scooter:l1");
    }

    #[tokio::test]
    async fn panicking_cached_fetch_does_not_affect_the_others() {
        let voi = FakeSource::panicking(Operator::Voi);
        let zvipp = FakeSource::ok(Operator::Zvipp, vec![near(Operator::Zvipp, "z1", 30.0)]);
        let agg = aggregator(vec![voi, zvipp], Toggles::all_enabled());

        let result = agg.get_scooters(&query(200.0, 20, None)).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "YZV:Scooter:z1");
    }

    #[tokio::test]
    async fn radius_filter_skips_server_filtered_operators() {
        let tier = FakeSource::ok(Operator::Tier, vec![near(Operator::Tier, "far", 5_000.0)]);
        let lime = FakeSource::ok(
            Operator::Lime,
            vec![
                near(Operator::Lime, "far", 5_000.0),
                near(Operator::Lime, "close", 100.0),
            ],
        );
        let agg = aggregator(vec![tier, lime], Toggles::all_enabled());

        let result = agg.get_scooters(&query(200.0, 20, None)).await;
        let ids: Vec<_> = result.iter().map(|v| v.id.as_str()).collect();

        assert_eq!(ids, vec!["YLI:Scooter:close", "YTI:Scooter:far"]);
    }

    #[tokio::test]
    async fn results_are_sorted_by_distance_and_truncated() {
        let voi = FakeSource::ok(
            Operator::Voi,
            vec![
                near(Operator::Voi, "mid", 120.0),
                near(Operator::Voi, "closest", 10.0),
            ],
        );
        let lime = FakeSource::ok(Operator::Lime, vec![near(Operator::Lime, "far", 180.0)]);
        let agg = aggregator(vec![voi, lime], Toggles::all_enabled());

        let all = agg.get_scooters(&query(200.0, 20, None)).await;
        let ids: Vec<_> = all.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["YVO:Scooter:closest", "YVO:Scooter:mid", "YLI:Scooter:far"]
        );

        let one = agg.get_scooters(&query(200.0, 1, None)).await;
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "YVO:Scooter:closest");
    }

    #[tokio::test]
    async fn toggled_off_operator_is_never_called() {
        let voi = FakeSource::ok(Operator::Voi, vec![near(Operator::Voi, "v", 10.0)]);
        let lime = FakeSource::ok(Operator::Lime, vec![near(Operator::Lime, "l", 20.0)]);
        let agg = aggregator(
            vec![voi.clone(), lime.clone()],
            Toggles::with_disabled([Operator::Voi]),
        );

        let result = agg.get_scooters(&query(200.0, 20, None)).await;

        assert_eq!(voi.calls(), 0);
        assert_eq!(lime.calls(), 1);
        assert!(result.iter().all(|v| v.operator == Operator::Lime));
    }

    #[tokio::test]
    async fn operator_filter_limits_the_fan_out() {
        let voi = FakeSource::ok(Operator::Voi, vec![near(Operator::Voi, "v", 10.0)]);
        let lime = FakeSource::ok(Operator::Lime, vec![near(Operator::Lime, "l", 20.0)]);
        let agg = aggregator(vec![voi.clone(), lime.clone()], Toggles::all_enabled());

        let result = agg
            .get_scooters(&query(200.0, 20, Some(vec![Operator::Lime])))
            .await;

        assert_eq!(voi.calls(), 0);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].operator, Operator::Lime);
    }

    #[tokio::test]
    async fn cacheable_operators_are_fetched_once_within_ttl() {
        let voi = FakeSource::ok(Operator::Voi, vec![near(Operator::Voi, "v", 10.0)]);
        let tier = FakeSource::ok(Operator::Tier, vec![near(Operator::Tier, "t", 10.0)]);
        let agg = aggregator(vec![voi.clone(), tier.clone()], Toggles::all_enabled());

        agg.get_scooters(&query(200.0, 20, None)).await;
        agg.get_scooters(&query(200.0, 20, None)).await;

        assert_eq!(voi.calls(), 1);
        assert_eq!(tier.calls(), 2, "request-scoped operators bypass the cache");
    }

    #[tokio::test]
    async fn unconfigured_operators_contribute_nothing() {
        let agg = aggregator(Vec::new(), Toggles::all_enabled());
        assert!(agg.get_scooters(&query(200.0, 20, None)).await.is_empty());
    }
}
