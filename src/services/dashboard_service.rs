use futures::future::join_all;
use tracing::{debug, error, info};

use crate::api::metals::PriceSource;
use crate::models::{ChartConfig, Commodity};
use crate::utils::{ChartError, ChartSurface};

/// Region whose presence marks a page that wants charts
pub const ANCHOR_REGION: &str = "goldChart";

/// Which charts were drawn when the page was bootstrapped
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChartsOutcome {
    pub drawn: Vec<Commodity>,
    pub failed: Vec<Commodity>,
}

/// Fetch one commodity's history and draw it into its region
pub async fn create_price_chart<S, C>(
    source: &S,
    surface: &C,
    commodity: Commodity,
) -> Result<(), ChartError>
where
    S: PriceSource + ?Sized,
    C: ChartSurface + ?Sized,
{
    let points = source.historical(commodity).await?;
    if points.is_empty() {
        debug!("{} series is empty, drawing bare axes", commodity);
    }

    let config = ChartConfig::price_line(commodity, &points);
    surface.draw(commodity.region_id(), &config)
}

/// Draw every commodity chart the page has room for
///
/// Returns `None` without touching the network when the anchor region is
/// absent. Otherwise all charts are requested concurrently; a failure is
/// logged with its commodity and never affects the other charts.
pub async fn init_charts<S, C>(source: &S, surface: &C) -> Option<ChartsOutcome>
where
    S: PriceSource + ?Sized,
    C: ChartSurface + ?Sized,
{
    if !surface.has_region(ANCHOR_REGION) {
        debug!("No '{}' region on this page, skipping charts", ANCHOR_REGION);
        return None;
    }

    let results = join_all(Commodity::ALL.iter().map(|&commodity| async move {
        (commodity, create_price_chart(source, surface, commodity).await)
    }))
    .await;

    let mut outcome = ChartsOutcome::default();
    for (commodity, result) in results {
        match result {
            Ok(()) => {
                info!("📈 {} chart drawn", commodity);
                outcome.drawn.push(commodity);
            }
            Err(e) => {
                error!("Error creating {} chart: {}", commodity, e);
                outcome.failed.push(commodity);
            }
        }
    }

    Some(outcome)
}
