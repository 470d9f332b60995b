//! Persisted chart settings
//!
//! Settings documents are usually partial. Every field, nested ones
//! included, falls back to its own default, so a document that only sets
//! `thresholds.low` keeps the default `thresholds.high` and everything else.

use alloc::string::{String, ToString};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::chart::constants::DEFAULT_GRAPH_HOURS;
use crate::chart::{ChartRenderer, ColorOverrides, Thresholds};
use crate::units::GlucoseUnit;

/// Default minutes after which the latest reading counts as stale
pub const DEFAULT_STALE_MINUTES: u32 = 10;

/// Settings the host feeds into the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    /// Visible window in hours
    #[serde(default = "default_graph_hours")]
    pub graph_hours: f32,
    /// Low and high thresholds in mmol/L
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Category colors as CSS color strings
    #[serde(default)]
    pub colors: ColorSettings,
    /// Unit for value labels
    #[serde(default)]
    pub units: GlucoseUnit,
    /// Minutes after which the latest reading is stale
    #[serde(default = "default_stale_minutes")]
    pub stale_minutes: u32,
    /// Local offset from UTC in minutes, for hour labels
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_graph_hours() -> f32 {
    DEFAULT_GRAPH_HOURS
}

fn default_stale_minutes() -> u32 {
    DEFAULT_STALE_MINUTES
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            graph_hours: default_graph_hours(),
            thresholds: Thresholds::default(),
            colors: ColorSettings::default(),
            units: GlucoseUnit::default(),
            stale_minutes: default_stale_minutes(),
            utc_offset_minutes: 0,
        }
    }
}

/// Stored color strings, one per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    /// Color for readings below the low threshold
    pub low: String,
    /// Color for readings above the high threshold
    pub high: String,
    /// Color for readings in range
    pub normal: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            low: "#ff4444".to_string(),
            high: "#ffaa00".to_string(),
            normal: "#ffffff".to_string(),
        }
    }
}

impl ChartSettings {
    /// Push every setting into a renderer through its setters
    pub fn apply(&self, chart: &mut ChartRenderer) {
        chart.set_graph_hours(self.graph_hours);
        chart.set_thresholds(self.thresholds);
        chart.set_colors(&self.color_overrides());
        chart.set_label_unit(self.units);
        chart.set_utc_offset(self.utc_offset_minutes.saturating_mul(60));
    }

    /// Stored colors as palette overrides
    pub fn color_overrides(&self) -> ColorOverrides {
        ColorOverrides {
            low: Some(self.colors.low.clone()),
            high: Some(self.colors.high.clone()),
            normal: Some(self.colors.normal.clone()),
        }
    }

    /// Age after which the latest reading is stale
    pub fn stale_after(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.stale_minutes))
    }
}
