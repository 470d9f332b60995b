//! Category palette with per-entry fallback
//!
//! The palette is rebuilt wholesale every time the user colors change, so
//! all three categories are always present and parsed exactly once.

use alloc::string::String;

use embedded_graphics::pixelcolor::Rgb888;
use log::warn;

use super::color::{NormalizedRgb, parse_color};
use super::constants::{DEFAULT_HIGH_COLOR, DEFAULT_LOW_COLOR, DEFAULT_NORMAL_COLOR};
use super::thresholds::GlucoseCategory;

/// User-supplied color strings, merged over the built-in defaults
///
/// `None` keeps the built-in color for that category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorOverrides {
    /// Color for low readings
    pub low: Option<String>,
    /// Color for high readings
    pub high: Option<String>,
    /// Color for in-range readings
    pub normal: Option<String>,
}

impl ColorOverrides {
    /// Override string for a category, if any
    pub fn get(&self, category: GlucoseCategory) -> Option<&str> {
        match category {
            GlucoseCategory::Low => self.low.as_deref(),
            GlucoseCategory::High => self.high.as_deref(),
            GlucoseCategory::Normal => self.normal.as_deref(),
        }
    }
}

/// Pre-parsed colors for every category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    low: NormalizedRgb,
    high: NormalizedRgb,
    normal: NormalizedRgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            low: builtin_color(GlucoseCategory::Low),
            high: builtin_color(GlucoseCategory::High),
            normal: builtin_color(GlucoseCategory::Normal),
        }
    }
}

impl Palette {
    /// Build a palette from overrides
    ///
    /// Each category is resolved on its own: an unparseable string is
    /// logged and replaced by that category's built-in color without
    /// affecting the other two.
    pub fn from_overrides(overrides: &ColorOverrides) -> Self {
        Self {
            low: resolve(GlucoseCategory::Low, overrides),
            high: resolve(GlucoseCategory::High, overrides),
            normal: resolve(GlucoseCategory::Normal, overrides),
        }
    }

    /// Normalized color for a category
    pub fn color(&self, category: GlucoseCategory) -> NormalizedRgb {
        match category {
            GlucoseCategory::Low => self.low,
            GlucoseCategory::High => self.high,
            GlucoseCategory::Normal => self.normal,
        }
    }

    /// Draw color for a category
    pub fn draw_color(&self, category: GlucoseCategory) -> Rgb888 {
        self.color(category).to_rgb888()
    }
}

/// Built-in color string for a category
pub const fn default_color_string(category: GlucoseCategory) -> &'static str {
    match category {
        GlucoseCategory::Low => DEFAULT_LOW_COLOR,
        GlucoseCategory::High => DEFAULT_HIGH_COLOR,
        GlucoseCategory::Normal => DEFAULT_NORMAL_COLOR,
    }
}

/// Built-in color for a category, equal to parsing [`default_color_string`]
const fn builtin_color(category: GlucoseCategory) -> NormalizedRgb {
    match category {
        GlucoseCategory::Low => NormalizedRgb::from_rgb8(255, 70, 70),
        GlucoseCategory::High => NormalizedRgb::from_rgb8(255, 170, 0),
        GlucoseCategory::Normal => NormalizedRgb::from_rgb8(255, 255, 255),
    }
}

fn resolve(category: GlucoseCategory, overrides: &ColorOverrides) -> NormalizedRgb {
    let source = overrides
        .get(category)
        .unwrap_or(default_color_string(category));

    match parse_color(source) {
        Ok(color) => color,
        Err(e) => {
            warn!("Invalid color string for {}: {:?} ({})", category, source, e);
            builtin_color(category)
        }
    }
}
