//! Chart generation models
//!
//! `ChartConfig` mirrors the configuration object a Chart.js line chart is
//! constructed from (`type`, `data`, `options`), so it serializes to JSON
//! that a web page can hand to the library. Value formatting is carried as
//! `CurrencyFormat` extension keys the page turns into callbacks.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::commodity::Commodity;
use crate::utils::format_currency;

/// A single data point on a price chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Calendar date label, e.g. "2024-05-01"
    pub date: String,
    /// USD per troy ounce
    pub price: f64,
}

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Same color with transparency applied
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba { rgb: self, alpha }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A semi-transparent color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Rgb,
    pub background_color: Rgba,
    pub border_width: u32,
    pub fill: bool,
    /// Bézier curve tension, 0 draws straight segments
    pub tension: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    pub scales: Scales,
}

#[derive(Debug, Clone, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub display: bool,
    pub position: LegendPosition,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tooltip {
    pub mode: String,
    pub intersect: bool,
    pub label: CurrencyFormat,
}

/// How a value is rendered as text: currency prefix plus fixed decimals
///
/// Chart.js formats tick and tooltip text with callbacks, which JSON cannot
/// carry. These keys (`prefix`, `decimals`) are extensions the embedding
/// page turns into those callbacks; Chart.js itself ignores them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyFormat {
    pub prefix: String,
    pub decimals: usize,
}

impl CurrencyFormat {
    pub fn usd() -> Self {
        Self {
            prefix: "$".to_string(),
            decimals: 2,
        }
    }

    pub fn format(&self, value: f64) -> String {
        format_currency(&self.prefix, self.decimals, value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scales {
    pub x: CategoryAxis,
    pub y: ValueAxis,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAxis {
    pub begin_at_zero: bool,
    pub ticks: CurrencyFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAxis {
    pub ticks: TickRotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRotation {
    pub min_rotation: u32,
    pub max_rotation: u32,
}

impl ChartConfig {
    /// Line chart for one commodity's historical series
    pub fn price_line(commodity: Commodity, points: &[PricePoint]) -> Self {
        let color = commodity.color();
        let (labels, data) = split_series(points);

        ChartConfig {
            chart_type: ChartType::Line,
            data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: commodity.series_label(),
                    data,
                    border_color: color,
                    background_color: color.with_alpha(0.1),
                    border_width: 2,
                    fill: true,
                    tension: 0.4,
                }],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: true,
                plugins: Plugins {
                    legend: Legend {
                        display: true,
                        position: LegendPosition::Top,
                    },
                    tooltip: Tooltip {
                        mode: "index".to_string(),
                        intersect: false,
                        label: CurrencyFormat::usd(),
                    },
                },
                scales: Scales {
                    x: CategoryAxis {
                        ticks: TickRotation {
                            min_rotation: 45,
                            max_rotation: 45,
                        },
                    },
                    y: ValueAxis {
                        begin_at_zero: false,
                        ticks: CurrencyFormat::usd(),
                    },
                },
            },
        }
    }

    /// Text shown next to a y-axis tick
    pub fn y_tick_label(&self, value: f64) -> String {
        self.options.scales.y.ticks.format(value)
    }
}

/// Split a series into parallel label and value arrays
pub fn split_series(points: &[PricePoint]) -> (Vec<String>, Vec<f64>) {
    points
        .iter()
        .map(|p| (p.date.clone(), p.price))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<PricePoint> {
        vec![
            PricePoint { date: "2024-05-01".to_string(), price: 2301.15 },
            PricePoint { date: "2024-05-02".to_string(), price: 2290.4 },
            PricePoint { date: "2024-05-03".to_string(), price: 2312.0 },
        ]
    }

    #[test]
    fn test_labels_and_values_are_paired() {
        let points = sample_points();
        let config = ChartConfig::price_line(Commodity::Gold, &points);

        let dataset = &config.data.datasets[0];
        assert_eq!(config.data.labels.len(), points.len());
        assert_eq!(dataset.data.len(), points.len());
        for (i, point) in points.iter().enumerate() {
            assert_eq!(config.data.labels[i], point.date);
            assert_eq!(dataset.data[i], point.price);
        }
    }

    #[test]
    fn test_empty_series_gives_empty_arrays() {
        let (labels, values) = split_series(&[]);
        assert!(labels.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_price_line_options() {
        let config = ChartConfig::price_line(Commodity::Silver, &sample_points());
        let dataset = &config.data.datasets[0];

        assert_eq!(dataset.label, "Silver Price (USD/oz)");
        assert_eq!(dataset.border_color.to_string(), "rgb(192, 192, 192)");
        assert_eq!(dataset.background_color.to_string(), "rgba(192, 192, 192, 0.1)");
        assert_eq!(dataset.tension, 0.4);
        assert!(dataset.fill);
        assert_eq!(config.options.plugins.legend.position, LegendPosition::Top);
        assert!(!config.options.scales.y.begin_at_zero);
        assert_eq!(config.options.scales.x.ticks.min_rotation, 45);
        assert_eq!(config.options.scales.x.ticks.max_rotation, 45);
    }

    #[test]
    fn test_value_formatting() {
        let config = ChartConfig::price_line(Commodity::Gold, &sample_points());
        assert_eq!(config.options.plugins.tooltip.label.format(1234.5), "$1234.50");
        assert_eq!(config.y_tick_label(25.0), "$25.00");
    }

    #[test]
    fn test_serializes_in_chartjs_shape() {
        let config = ChartConfig::price_line(Commodity::Gold, &sample_points());
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["type"], "line");
        assert_eq!(json["data"]["labels"][0], "2024-05-01");
        assert_eq!(json["data"]["datasets"][0]["borderColor"], "rgb(255, 215, 0)");
        assert_eq!(json["data"]["datasets"][0]["backgroundColor"], "rgba(255, 215, 0, 0.1)");
        assert_eq!(json["options"]["maintainAspectRatio"], true);
        assert_eq!(json["options"]["plugins"]["legend"]["position"], "top");
        assert_eq!(json["options"]["scales"]["y"]["beginAtZero"], false);
        assert_eq!(json["options"]["scales"]["x"]["ticks"]["maxRotation"], 45);
        assert_eq!(json["options"]["scales"]["y"]["ticks"]["prefix"], "$");
        assert_eq!(json["options"]["scales"]["y"]["ticks"]["decimals"], 2);
        assert_eq!(json["options"]["plugins"]["tooltip"]["label"]["prefix"], "$");
    }

    #[test]
    fn test_price_point_decodes_from_json() {
        let point: PricePoint = serde_json::from_str(r#"{"date":"2024-05-01","price":2301.15}"#).unwrap();
        assert_eq!(point.date, "2024-05-01");
        assert_eq!(point.price, 2301.15);

        assert!(serde_json::from_str::<PricePoint>(r#"{"date":"2024-05-01"}"#).is_err());
        assert!(serde_json::from_str::<PricePoint>(r#"{"date":"2024-05-01","price":"high"}"#).is_err());
    }
}
