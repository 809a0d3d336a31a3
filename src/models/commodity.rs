//! Supported commodities and their display attributes

use std::fmt;

use super::chart::Rgb;

/// A precious metal with a historical price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Commodity {
    Gold,
    Silver,
}

impl Commodity {
    /// Every commodity that gets a chart, in drawing order
    pub const ALL: [Commodity; 2] = [Commodity::Gold, Commodity::Silver];

    /// Lowercase name used in API paths
    pub fn slug(&self) -> &'static str {
        match self {
            Commodity::Gold => "gold",
            Commodity::Silver => "silver",
        }
    }

    /// Identity of the region this commodity's chart is drawn into
    pub fn region_id(&self) -> &'static str {
        match self {
            Commodity::Gold => "goldChart",
            Commodity::Silver => "silverChart",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Commodity::Gold => Rgb::new(255, 215, 0),
            Commodity::Silver => Rgb::new(192, 192, 192),
        }
    }

    /// Series label shown in the legend, e.g. "Gold Price (USD/oz)"
    pub fn series_label(&self) -> String {
        series_label(self.slug())
    }
}

/// Build a legend label from a lowercase metal name
pub fn series_label(metal: &str) -> String {
    let mut chars = metal.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} Price (USD/oz)", capitalized)
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
