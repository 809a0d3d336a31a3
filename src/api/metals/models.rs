use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Commodity;
use crate::utils::format_usd;

pub use crate::models::PricePoint;

/// Response from GET /api/prices: current price per metal name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentPrices(BTreeMap<String, f64>);

impl CurrentPrices {
    pub fn get(&self, commodity: Commodity) -> Option<f64> {
        self.0.get(commodity.slug()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for CurrentPrices {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        CurrentPrices(iter.into_iter().collect())
    }
}

/// Renders as `gold=$2050.00, silver=$25.50`, sorted by name
impl fmt::Display for CurrentPrices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, price) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, format_usd(*price))?;
            first = false;
        }
        Ok(())
    }
}

/// Current prices together with the moment they were received
#[derive(Debug, Clone)]
pub struct PriceSnapshot {
    pub prices: CurrentPrices,
    pub fetched_at: DateTime<Utc>,
}

/// Comprehensive error type for API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Body was not the expected JSON shape
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
