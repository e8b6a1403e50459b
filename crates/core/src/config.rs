use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub const DEFAULT_SALES_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map/video-game-sales-data.json";

/// Plot geometry and styling, fixed for one render pass.
///
/// All lengths are in view-box units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub data_url: String,
    pub width: f64,
    pub height: f64,
    /// Band at the bottom of the plot reserved for the legend.
    pub legend_height: f64,
    pub padding: f64,
    pub label_font_size: f64,
    pub legend_font_size: f64,
    pub legend_cell_size: f64,
    pub legend_cell_padding: f64,
    /// Distance between the pointer and the tooltip's top-left corner.
    pub tooltip_offset: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_SALES_URL.to_string(),
            width: 1600.0,
            height: 1000.0,
            legend_height: 200.0,
            padding: 1.0,
            label_font_size: 14.0,
            legend_font_size: 17.0,
            legend_cell_size: 25.0,
            legend_cell_padding: 20.0,
            tooltip_offset: 10.0,
        }
    }
}

impl PlotConfig {
    /// Height of the treemap region above the legend band.
    pub fn map_height(&self) -> f64 {
        (self.height - self.legend_height).max(0.0)
    }

    /// Top edge of the first legend row.
    pub fn legend_top(&self) -> f64 {
        self.height - self.legend_height / 2.0
    }

    /// Loads a JSON config; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
