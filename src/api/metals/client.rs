use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{ApiError, CurrentPrices, PricePoint, PriceSnapshot};
use crate::models::Commodity;

/// Where historical series and current prices come from
///
/// Services depend on this rather than on `MetalsClient` directly.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// GET /api/historical/{metal}
    async fn historical(&self, commodity: Commodity) -> Result<Vec<PricePoint>, ApiError>;

    /// GET /api/prices
    async fn current_prices(&self) -> Result<PriceSnapshot, ApiError>;
}

/// HTTP client for the metals tracker backend
pub struct MetalsClient {
    http_client: HttpClient,
    base_url: String,
}

impl MetalsClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000";

    /// Create a new client with custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn historical_url(&self, commodity: Commodity) -> String {
        format!("{}/api/historical/{}", self.base_url, commodity.slug())
    }

    pub fn prices_url(&self) -> String {
        format!("{}/api/prices", self.base_url)
    }

    /// Map a non-success status to an error, keeping the body for context
    fn error_for_status(status: reqwest::StatusCode, body_text: String) -> ApiError {
        let status_code = status.as_u16();
        match status_code {
            404 => ApiError::NotFound(body_text),
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    /// GET `url` and decode the JSON body into `T`
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(Self::error_for_status(status, body_text));
        }

        decode_body(&body_text)
    }
}

#[async_trait]
impl PriceSource for MetalsClient {
    async fn historical(&self, commodity: Commodity) -> Result<Vec<PricePoint>, ApiError> {
        let points: Vec<PricePoint> = self.get_json(&self.historical_url(commodity)).await?;
        debug!("Received {} {} price points", points.len(), commodity);
        Ok(points)
    }

    async fn current_prices(&self) -> Result<PriceSnapshot, ApiError> {
        let prices: CurrentPrices = self.get_json(&self.prices_url()).await?;
        Ok(PriceSnapshot {
            prices,
            fetched_at: Utc::now(),
        })
    }
}

/// Decode a response body, reporting malformed payloads as deserialization errors
pub fn decode_body<T: DeserializeOwned>(body_text: &str) -> Result<T, ApiError> {
    serde_json::from_str(body_text)
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
}
