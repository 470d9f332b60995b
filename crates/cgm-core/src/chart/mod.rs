//! Threshold-colored glucose trend chart
//!
//! This module renders sparse, irregularly spaced glucose readings as a
//! scrolling time-series chart onto any `embedded-graphics` draw target.
//! It supports:
//!
//! - A rolling window anchored to an explicit "now"
//! - A Y axis that always starts at zero and tops out at a multiple of the
//!   grid division count
//! - Gap suppression across sensor dropouts
//! - Per-segment coloring from the left sample's low/normal/high category
//! - Dashed threshold reference lines
//! - Numeric Y labels in mmol/L or mg/dL and hour-of-day X labels
//!
//! Rendering is layered: background, grid, threshold lines, series, labels.
//! With no data only the background and an empty-state label are drawn.
//!
//! # Examples
//!
//! ```ignore
//! use cgm_core::chart::*;
//!
//! let mut chart = ChartRenderer::new(ChartConfig::default());
//! chart.set_thresholds(Thresholds::new(4.0, 10.0));
//! chart.set_data(readings.iter().copied().map(RawSample::from));
//!
//! if chart.needs_redraw() {
//!     let stats = chart.render(&mut display, now)?;
//!     chart.mark_clean();
//! }
//! ```

mod axis;
pub mod color;
mod component;
pub mod constants;
mod grid;
pub mod palette;
mod segments;
pub mod series;
pub mod thresholds;
pub mod viewport;

pub use axis::{AxisLabel, ValueLabel, format_hour_label, tick_step_ms, time_ticks, y_axis_labels};
pub use color::{ColorParseError, NormalizedRgb, parse_color};
pub use component::{ChartRenderer, FrameStats};
pub use grid::LineStyle;
pub use palette::{ColorOverrides, Palette};
pub use segments::{Marker, Segment, SegmentPlan};
pub use series::{RawSample, Sample, Series};
pub use thresholds::{GlucoseCategory, Thresholds};
pub use viewport::{ChartConfig, ChartPadding, ViewState, Viewport};
