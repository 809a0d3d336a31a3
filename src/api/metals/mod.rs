pub mod client;
pub mod models;

pub use client::{MetalsClient, PriceSource};
pub use models::{ApiError, PriceSnapshot};
