//! Data models for the metals tracker
//!
//! Commodities, historical price points and the chart configuration built
//! from them.

pub mod chart;
pub mod commodity;

// Re-export commonly used types for convenience
pub use chart::{ChartConfig, PricePoint};
pub use commodity::Commodity;
