use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::api::metals::models::CurrentPrices;
use crate::api::metals::{ApiError, PriceSnapshot, PriceSource};
use crate::models::Commodity;

/// How often current prices are refetched
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    TickInFlight,
}

/// Handle to a running price poller
///
/// Dropping the handle without calling `shutdown` also stops the poller.
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    ticks: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
}

impl PollerHandle {
    /// Number of ticks fired so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> PollerState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            PollerState::TickInFlight
        } else {
            PollerState::Idle
        }
    }

    /// Stop ticking and cancel any request still in flight
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!("Price poller ended abnormally: {}", e);
        }
    }
}

/// Fetch current prices once and log the outcome
pub async fn refresh_prices<S>(source: &S) -> Result<PriceSnapshot, ApiError>
where
    S: PriceSource + ?Sized,
{
    match source.current_prices().await {
        Ok(snapshot) => {
            info!(
                "💰 Prices updated at {} ({} metals): {}",
                snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
                snapshot.prices.len(),
                snapshot.prices
            );
            if snapshot.prices.is_empty() {
                warn!("Price snapshot contained no prices");
            } else {
                for commodity in missing_quotes(&snapshot.prices) {
                    warn!("Price snapshot has no {} quote", commodity);
                }
            }
            Ok(snapshot)
        }
        Err(e) => {
            error!("Error refreshing prices: {}", e);
            Err(e)
        }
    }
}

/// Charted commodities the snapshot has no price for
pub fn missing_quotes(prices: &CurrentPrices) -> Vec<Commodity> {
    Commodity::ALL
        .iter()
        .copied()
        .filter(|&commodity| prices.get(commodity).is_none())
        .collect()
}

/// Start refetching current prices every `period`
///
/// The first request goes out one full period after start. Every tick
/// issues its own request, so a slow or hung request never delays the
/// next one, and a failure is logged without affecting later ticks.
pub fn start_price_refresh<S>(source: Arc<S>, period: Duration) -> PollerHandle
where
    S: PriceSource + ?Sized + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let ticks = Arc::new(AtomicU64::new(0));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let first_tick = Instant::now() + period;

    let task = {
        let ticks = Arc::clone(&ticks);
        let in_flight = Arc::clone(&in_flight);

        tokio::spawn(async move {
            let mut interval = time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut requests = JoinSet::new();

            info!("🔄 Price refresh every {}s", period.as_secs());

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let tick = ticks.fetch_add(1, Ordering::SeqCst) + 1;
                        debug!("Price refresh tick #{}", tick);

                        let source = Arc::clone(&source);
                        let in_flight = Arc::clone(&in_flight);
                        in_flight.fetch_add(1, Ordering::SeqCst);
                        requests.spawn(async move {
                            let _ = refresh_prices(source.as_ref()).await;
                            in_flight.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                    Some(_) = requests.join_next(), if !requests.is_empty() => {}
                    _ = shutdown_rx.changed() => break,
                }
            }

            requests.shutdown().await;
            info!("Price refresh stopped");
        })
    };

    PollerHandle {
        shutdown_tx,
        task,
        ticks,
        in_flight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use async_trait::async_trait;
    use chrono::Utc;

    /// Counts price requests; fails every `fail_every`-th one, or hangs forever
    struct CountingSource {
        calls: AtomicUsize,
        fail_every: usize,
        hang: bool,
    }

    impl CountingSource {
        fn new(fail_every: usize) -> Self {
            CountingSource {
                calls: AtomicUsize::new(0),
                fail_every,
                hang: false,
            }
        }

        fn hanging() -> Self {
            CountingSource {
                calls: AtomicUsize::new(0),
                fail_every: 0,
                hang: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceSource for CountingSource {
        async fn historical(&self, _commodity: Commodity) -> Result<Vec<PricePoint>, ApiError> {
            Ok(Vec::new())
        }

        async fn current_prices(&self) -> Result<PriceSnapshot, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail_every > 0 && call % self.fail_every == 0 {
                return Err(ApiError::ServerError(503, "unavailable".to_string()));
            }
            Ok(PriceSnapshot {
                prices: [("gold".to_string(), 2050.0), ("silver".to_string(), 25.5)]
                    .into_iter()
                    .collect::<CurrentPrices>(),
                fetched_at: Utc::now(),
            })
        }
    }

    const PERIOD: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn test_one_request_per_period_despite_failures() {
        let source = Arc::new(CountingSource::new(2));
        let handle = start_price_refresh(Arc::clone(&source), PERIOD);

        time::sleep(PERIOD - Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 0);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(source.calls(), 1);

        time::sleep(PERIOD * 4).await;
        assert_eq!(source.calls(), 5);
        assert_eq!(handle.ticks(), 5);
        assert_eq!(handle.state(), PollerState::Idle);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_request_does_not_delay_next_tick() {
        let source = Arc::new(CountingSource::hanging());
        let handle = start_price_refresh(Arc::clone(&source), PERIOD);

        time::sleep(PERIOD * 3 + Duration::from_secs(1)).await;

        assert_eq!(source.calls(), 3);
        assert_eq!(handle.state(), PollerState::TickInFlight);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticking() {
        let source = Arc::new(CountingSource::new(0));
        let handle = start_price_refresh(Arc::clone(&source), PERIOD);

        time::sleep(PERIOD + Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);

        handle.shutdown().await;
        time::sleep(PERIOD * 3).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_prices_returns_snapshot_or_error() {
        let source = CountingSource::new(2);

        let snapshot = refresh_prices(&source).await.unwrap();
        assert_eq!(snapshot.prices.get(Commodity::Gold), Some(2050.0));

        let result = refresh_prices(&source).await;
        assert!(matches!(result, Err(ApiError::ServerError(503, _))));
    }

    #[test]
    fn test_missing_quotes() {
        let both: CurrentPrices = [("gold".to_string(), 2050.0), ("silver".to_string(), 25.5)]
            .into_iter()
            .collect();
        assert!(missing_quotes(&both).is_empty());

        let gold_only: CurrentPrices = [("gold".to_string(), 2050.0), ("platinum".to_string(), 950.0)]
            .into_iter()
            .collect();
        assert_eq!(missing_quotes(&gold_only), vec![Commodity::Silver]);

        assert_eq!(
            missing_quotes(&CurrentPrices::default()),
            vec![Commodity::Gold, Commodity::Silver]
        );
    }
}
