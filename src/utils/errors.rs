use thiserror::Error;

use crate::api::metals::ApiError;

/// Failures while turning a historical series into a drawn chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to fetch series: {0}")]
    Api(#[from] ApiError),
    #[error("Chart config has no dataset")]
    NoDataset,
    #[error("Region '{0}' not found on page")]
    MissingRegion(String),
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Failed to export chart config: {0}")]
    Export(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
