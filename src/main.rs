use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;
mod utils;

use api::metals::MetalsClient;
use config::Config;
use services::{dashboard_service, price_service};
use utils::ChartPage;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metals_tracker=debug,reqwest=warn")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("{}", "=".repeat(50));
    info!("📊 Starting Precious Metals Tracker");
    info!("{}", "=".repeat(50));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    info!("Charts: {} ({})", config.output_dir.display(), config.regions.join(", "));

    let client = match config.request_timeout {
        Some(timeout) => match MetalsClient::with_timeout(config.api_base_url.clone(), timeout) {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to create API client: {}", e);
                return;
            }
        },
        None => MetalsClient::with_base_url(config.api_base_url.clone()),
    };
    let client = Arc::new(client);
    info!("Backend: {}", client.base_url());

    let page = ChartPage::from_config(&config);
    if let Err(e) = page.prepare() {
        error!("Failed to create {}: {}", page.output_dir().display(), e);
        return;
    }

    let poller = price_service::start_price_refresh(Arc::clone(&client), config.poll_interval);

    match dashboard_service::init_charts(client.as_ref(), &page).await {
        Some(outcome) => info!(
            "Charts ready: {} drawn, {} failed",
            outcome.drawn.len(),
            outcome.failed.len()
        ),
        None => info!(
            "Region '{}' not configured, no charts drawn",
            dashboard_service::ANCHOR_REGION
        ),
    }

    info!("Press Ctrl-C to stop");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    info!("Shutting down...");
    if poller.state() == price_service::PollerState::TickInFlight {
        info!("Cancelling in-flight price refresh");
    }
    let ticks = poller.ticks();
    poller.shutdown().await;
    info!("Price poller stopped after {} ticks", ticks);
}
