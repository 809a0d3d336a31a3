pub mod curve;
pub mod errors;
pub mod format;
pub mod page;

pub use curve::smooth_path;
pub use errors::ChartError;
pub use format::{format_currency, format_usd};
pub use page::{ChartPage, ChartSurface};
