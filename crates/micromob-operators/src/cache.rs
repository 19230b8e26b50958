//! Per-operator, request-deduplicating vehicle cache with time-based expiry.
//!
//! Each operator has one slot. The first caller that finds the slot stale
//! spawns the fetch; every caller, including those arriving while the fetch
//! is in flight, awaits the same shared handle. Within the TTL the completed
//! handle is handed out again without touching the network.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use micromob_core::{Operator, Vehicle};

use crate::error::OperatorError;
use crate::sources::fetch_or_empty;

pub const DEFAULT_TTL: Duration = Duration::from_millis(10_000);

/// Source of the current instant; injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

type SharedFetch = Shared<BoxFuture<'static, Arc<Vec<Vehicle>>>>;

#[derive(Default)]
struct CacheSlot {
    /// Completion time of the last refresh, successful or not.
    last_fetched: Option<Instant>,
    is_fetching: bool,
    in_flight: Option<SharedFetch>,
}

impl CacheSlot {
    fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        self.last_fetched
            .is_none_or(|at| now.saturating_duration_since(at) >= ttl)
    }
}

pub struct FetchCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slots: HashMap<Operator, Arc<Mutex<CacheSlot>>>,
}

impl FetchCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates one slot for every known operator.
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let slots = Operator::ALL
            .into_iter()
            .map(|op| (op, Arc::new(Mutex::new(CacheSlot::default()))))
            .collect();
        Self { ttl, clock, slots }
    }

    /// Returns the operator's vehicles, refreshing through `fetch` when stale.
    ///
    /// `fetch` is only invoked by the caller that triggers a refresh. Failures
    /// and panics inside the fetch are logged and resolve to an empty list.
    pub async fn get_vehicles<F, Fut>(&self, operator: Operator, fetch: F) -> Arc<Vec<Vehicle>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Vehicle>, OperatorError>> + Send + 'static,
    {
        let Some(slot) = self.slots.get(&operator) else {
            return Arc::default();
        };

        let handle = {
            let mut state = lock(slot);
            if !state.is_fetching && state.is_stale(self.clock.now(), self.ttl) {
                state.is_fetching = true;
                let handle = self.spawn_refresh(operator, Arc::clone(slot), fetch());
                state.in_flight = Some(handle.clone());
                Some(handle)
            } else {
                state.in_flight.clone()
            }
        };

        match handle {
            Some(handle) => handle.await,
            None => Arc::default(),
        }
    }

    fn spawn_refresh<Fut>(
        &self,
        operator: Operator,
        slot: Arc<Mutex<CacheSlot>>,
        fetch: Fut,
    ) -> SharedFetch
    where
        Fut: Future<Output = Result<Vec<Vehicle>, OperatorError>> + Send + 'static,
    {
        let clock = Arc::clone(&self.clock);

        // Bookkeeping lives inside the task so it runs even if every caller
        // stops awaiting the shared handle.
        let task = tokio::spawn(async move {
            let vehicles = fetch_or_empty(operator, fetch).await;

            let mut state = lock(&slot);
            state.is_fetching = false;
            state.last_fetched = Some(clock.now());
            Arc::new(vehicles)
        });

        async move {
            task.await.unwrap_or_else(|e| {
                tracing::error!(
                    operator = operator.display_name(),
                    error = %e,
                    "vehicle fetch task failed"
                );
                Arc::default()
            })
        }
        .boxed()
        .shared()
    }
}

fn lock(slot: &Mutex<CacheSlot>) -> MutexGuard<'_, CacheSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock that only moves when told to.
#[cfg(test)]
pub(crate) struct ManualClock {
    now: Mutex<Instant>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}
