use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::ChartError;
use crate::config::Config;
use crate::models::ChartConfig;
use crate::services::chart_service;

/// Something charts can be drawn onto, addressed by region identity
pub trait ChartSurface: Send + Sync {
    /// Whether a region with this identity exists
    fn has_region(&self, region_id: &str) -> bool;

    /// Draw a chart into an existing region
    fn draw(&self, region_id: &str, config: &ChartConfig) -> Result<(), ChartError>;
}

/// A page of chart regions backed by an output directory
///
/// Each region is written as `{region}.png`, and when config export is on,
/// the chart configuration as `{region}.json` beside it.
pub struct ChartPage {
    output_dir: PathBuf,
    regions: HashSet<String>,
    width: u32,
    height: u32,
    export_config: bool,
}

impl ChartPage {
    pub fn new<I, R>(output_dir: impl Into<PathBuf>, regions: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        ChartPage {
            output_dir: output_dir.into(),
            regions: regions.into_iter().map(Into::into).collect(),
            width: 800,
            height: 400,
            export_config: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        ChartPage::new(config.output_dir.clone(), config.regions.iter().cloned())
            .with_size(config.chart_width, config.chart_height)
            .with_config_export(config.export_chart_config)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_config_export(mut self, enabled: bool) -> Self {
        self.export_config = enabled;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if needed
    pub fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(&self.output_dir)
    }

    pub fn region_path(&self, region_id: &str, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", region_id, extension))
    }

    /// Write the chart configuration as pretty JSON
    pub fn export_config(&self, region_id: &str, config: &ChartConfig) -> Result<PathBuf, ChartError> {
        let path = self.region_path(region_id, "json");
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

impl ChartSurface for ChartPage {
    fn has_region(&self, region_id: &str) -> bool {
        self.regions.contains(region_id)
    }

    fn draw(&self, region_id: &str, config: &ChartConfig) -> Result<(), ChartError> {
        if !self.has_region(region_id) {
            return Err(ChartError::MissingRegion(region_id.to_string()));
        }

        let image_path = self.region_path(region_id, "png");
        chart_service::render_chart(&image_path, config, self.width, self.height)?;
        debug!("Rendered {} to {}", region_id, image_path.display());

        if self.export_config {
            let config_path = self.export_config(region_id, config)?;
            debug!("Exported {} config to {}", region_id, config_path.display());
        }

        Ok(())
    }
}
