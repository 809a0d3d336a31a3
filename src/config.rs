use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::api::metals::MetalsClient;
use crate::services::price_service::DEFAULT_POLL_INTERVAL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub output_dir: PathBuf,
    pub regions: Vec<String>,
    pub chart_width: u32,
    pub chart_height: u32,
    pub export_chart_config: bool,
    pub poll_interval: Duration,
    /// HTTP timeout, off unless `REQUEST_TIMEOUT_SECS` is set
    ///
    /// Without it a backend that never answers leaves each poll tick's
    /// request pending, and those tasks accumulate for the life of the
    /// process.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, falling back to defaults for
    /// missing or blank values
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = get("METALS_API_URL").unwrap_or_else(|| MetalsClient::DEFAULT_BASE_URL.to_string());
        let output_dir = PathBuf::from(get("CHART_OUTPUT_DIR").unwrap_or_else(|| "charts".to_string()));

        let regions = match get("CHART_REGIONS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
            None => vec!["goldChart".to_string(), "silverChart".to_string()],
        };

        let chart_width = parse_or("CHART_WIDTH", get("CHART_WIDTH"), 800u32)?;
        let chart_height = parse_or("CHART_HEIGHT", get("CHART_HEIGHT"), 400u32)?;
        if chart_width == 0 || chart_height == 0 {
            return Err(ConfigError::Invalid {
                name: "CHART_WIDTH/CHART_HEIGHT",
                value: format!("{}x{}", chart_width, chart_height),
                reason: "chart size must be non-zero".to_string(),
            });
        }

        let export_chart_config = match get("CHART_EXPORT_CONFIG") {
            Some(value) => parse_bool("CHART_EXPORT_CONFIG", &value)?,
            None => true,
        };

        let poll_secs = parse_or(
            "PRICE_POLL_INTERVAL_SECS",
            get("PRICE_POLL_INTERVAL_SECS"),
            DEFAULT_POLL_INTERVAL.as_secs(),
        )?;
        if poll_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "PRICE_POLL_INTERVAL_SECS",
                value: "0".to_string(),
                reason: "interval must be at least one second".to_string(),
            });
        }

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(parse_value("REQUEST_TIMEOUT_SECS", &value)?)),
            None => None,
        };

        Ok(Config {
            api_base_url,
            output_dir,
            regions,
            chart_width,
            chart_height,
            export_chart_config,
            poll_interval: Duration::from_secs(poll_secs),
            request_timeout,
        })
    }
}

fn parse_value<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => parse_value(name, &value),
        None => Ok(default),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.output_dir, PathBuf::from("charts"));
        assert_eq!(config.regions, vec!["goldChart", "silverChart"]);
        assert_eq!((config.chart_width, config.chart_height), (800, 400));
        assert!(config.export_chart_config);
        assert_eq!(config.poll_interval, Duration::from_secs(300));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("METALS_API_URL", "http://prices.local"),
            ("CHART_REGIONS", " goldChart , ,silverChart "),
            ("CHART_WIDTH", "1024"),
            ("CHART_EXPORT_CONFIG", "no"),
            ("PRICE_POLL_INTERVAL_SECS", "60"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.api_base_url, "http://prices.local");
        assert_eq!(config.regions, vec!["goldChart", "silverChart"]);
        assert_eq!(config.chart_width, 1024);
        assert!(!config.export_chart_config);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("METALS_API_URL", "  "), ("CHART_WIDTH", "")]).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.chart_width, 800);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("PRICE_POLL_INTERVAL_SECS", "0")]),
            Err(ConfigError::Invalid { name: "PRICE_POLL_INTERVAL_SECS", .. })
        ));
        assert!(matches!(
            config_from(&[("CHART_HEIGHT", "tall")]),
            Err(ConfigError::Invalid { name: "CHART_HEIGHT", .. })
        ));
        assert!(config_from(&[("CHART_EXPORT_CONFIG", "maybe")]).is_err());
    }
}
