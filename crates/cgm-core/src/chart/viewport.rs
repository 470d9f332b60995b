//! Scale computation and coordinate transformation
//!
//! Handles the derived per-frame view (value axis top, rolling time window)
//! and the mapping from data space (timestamps, glucose values) to screen
//! space (pixel coordinates).

use chrono::{DateTime, Utc};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::constants::{
    AXIS_HEADROOM, COORDINATE_MARGIN_PX, DEFAULT_GRAPH_HOURS, DEFAULT_HEIGHT_PX, DEFAULT_PADDING_BOTTOM_PX,
    DEFAULT_PADDING_LEFT_PX, DEFAULT_PADDING_RIGHT_PX, DEFAULT_PADDING_TOP_PX, DEFAULT_WIDTH_PX,
    GRID_DIVISIONS, MIN_AXIS_MAX, MIN_AXIS_VALUE, MS_PER_HOUR,
};
use super::series::Series;
use crate::math::{ceil_f32, round_to_i32};
use crate::units::GlucoseUnit;

/// Padding around the plot area for labels and margins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPadding {
    /// Top padding in pixels
    pub top: u32,
    /// Right padding in pixels
    pub right: u32,
    /// Bottom padding in pixels
    pub bottom: u32,
    /// Left padding in pixels
    pub left: u32,
}

impl Default for ChartPadding {
    fn default() -> Self {
        Self {
            top: DEFAULT_PADDING_TOP_PX,
            right: DEFAULT_PADDING_RIGHT_PX,
            bottom: DEFAULT_PADDING_BOTTOM_PX,
            left: DEFAULT_PADDING_LEFT_PX,
        }
    }
}

impl ChartPadding {
    /// Create uniform padding on all sides
    pub const fn uniform(padding: u32) -> Self {
        Self {
            top: padding,
            right: padding,
            bottom: padding,
            left: padding,
        }
    }

    /// Create padding with specific values
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Chart surface and layout configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    /// Full surface size in pixels
    pub size: Size,
    /// Padding around the plot area
    pub padding: ChartPadding,
    /// Width of the rolling window in hours
    ///
    /// Zero or negative values are not rejected; they produce an empty or
    /// degenerate window.
    pub graph_hours: f32,
    /// Unit the value labels are shown in
    pub label_unit: GlucoseUnit,
    /// Local offset from UTC in seconds, used for hour-of-day labels
    pub utc_offset_secs: i32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            size: Size::new(DEFAULT_WIDTH_PX, DEFAULT_HEIGHT_PX),
            padding: ChartPadding::default(),
            graph_hours: DEFAULT_GRAPH_HOURS,
            label_unit: GlucoseUnit::default(),
            utc_offset_secs: 0,
        }
    }
}

impl ChartConfig {
    /// Create a configuration for a surface of the given size
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Set padding
    pub fn with_padding(mut self, padding: ChartPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Set the visible window in hours
    pub fn with_graph_hours(mut self, hours: f32) -> Self {
        self.graph_hours = hours;
        self
    }

    /// Full surface rectangle
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.size)
    }

    /// Surface minus padding
    pub fn plot_area(&self) -> Rectangle {
        let top_left = Point::new(self.padding.left as i32, self.padding.top as i32);

        let width = self
            .size
            .width
            .saturating_sub(self.padding.left.saturating_add(self.padding.right));
        let height = self
            .size
            .height
            .saturating_sub(self.padding.top.saturating_add(self.padding.bottom));

        Rectangle::new(top_left, Size::new(width, height))
    }

    /// Window length in milliseconds
    pub fn window_ms(&self) -> i64 {
        (self.graph_hours as f64 * MS_PER_HOUR as f64) as i64
    }
}

/// Derived scale for one frame
///
/// Never stored; computed from the series and "now" on every draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Bottom of the value axis
    pub min_value: f32,
    /// Top of the value axis, a multiple of the grid division count
    pub max_value: f32,
    /// Oldest visible instant, epoch milliseconds
    pub window_start_ms: i64,
    /// Newest visible instant ("now"), epoch milliseconds
    pub window_end_ms: i64,
}

impl ViewState {
    /// Compute the view for a series at `now`
    ///
    /// Returns `None` for an empty series, which has no scale.
    pub fn compute(series: &Series, window_ms: i64, now: DateTime<Utc>) -> Option<Self> {
        let max_data_value = series.max_value()?;
        let window_end_ms = now.timestamp_millis();

        Some(Self {
            min_value: MIN_AXIS_VALUE,
            max_value: axis_max_for(max_data_value),
            window_start_ms: window_end_ms.saturating_sub(window_ms),
            window_end_ms,
        })
    }

    /// Value span of the axis
    pub fn value_range(&self) -> f32 {
        self.max_value - self.min_value
    }

    /// Time span of the window in milliseconds
    pub fn time_range_ms(&self) -> i64 {
        self.window_end_ms - self.window_start_ms
    }

    /// Offset of an instant from the window start in milliseconds
    pub fn offset_ms(&self, time: DateTime<Utc>) -> i64 {
        time.timestamp_millis().saturating_sub(self.window_start_ms)
    }

    /// Check if an instant lies within `[window_start, window_end]`
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        let offset = self.offset_ms(time);
        offset >= 0 && offset <= self.time_range_ms()
    }

    /// Check if a value lies within `[min_value, max_value]`
    pub fn contains_value(&self, value: f32) -> bool {
        value >= self.min_value && value <= self.max_value
    }
}

/// Top of the value axis for the highest reading
///
/// At least [`MIN_AXIS_MAX`], at least one unit above the data, rounded up
/// to the next multiple of [`GRID_DIVISIONS`].
///
/// Values too large for the rounding to be exact in `f32` still never end up
/// below the data.
pub fn axis_max_for(max_data_value: f32) -> f32 {
    let divisions = GRID_DIVISIONS as f32;
    let preliminary = MIN_AXIS_MAX.max(max_data_value + AXIS_HEADROOM);
    (ceil_f32(preliminary / divisions) * divisions).max(preliminary)
}

/// Viewport for transforming data coordinates to screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    view: ViewState,
    plot_area: Rectangle,
}

impl Viewport {
    /// Create a viewport over the plot area of `config`
    pub fn new(view: ViewState, config: &ChartConfig) -> Self {
        Self {
            view,
            plot_area: config.plot_area(),
        }
    }

    /// The frame's view state
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Plot area in screen space
    pub fn plot_area(&self) -> Rectangle {
        self.plot_area
    }

    /// Unrounded screen X for an epoch-millisecond instant
    pub fn x_for_ms(&self, time_ms: i64) -> f32 {
        let offset = time_ms.saturating_sub(self.view.window_start_ms) as f64;
        let ratio = offset / self.view.time_range_ms() as f64;
        self.plot_area.top_left.x as f32 + (ratio * self.plot_area.size.width as f64) as f32
    }

    /// Unrounded screen Y for a value
    ///
    /// Screen Y grows downward, so the axis is inverted.
    pub fn y_for_value(&self, value: f32) -> f32 {
        let height = self.plot_area.size.height as f32;
        let normalized = (value - self.view.min_value) / self.view.value_range();
        self.plot_area.top_left.y as f32 + height - normalized * height
    }

    /// Transform a reading to screen coordinates
    ///
    /// Returns `None` when either coordinate is not finite (zero-length
    /// window or zero value range) or lands more than
    /// [`COORDINATE_MARGIN_PX`] outside the plot area.
    pub fn map(&self, time: DateTime<Utc>, value: f32) -> Option<Point> {
        let x = self.column_for_ms(time.timestamp_millis())?;
        let y = self.row_for_value(value)?;
        Some(Point::new(x, y))
    }

    /// Screen row for a value, `None` if not finite or too far out
    pub fn row_for_value(&self, value: f32) -> Option<i32> {
        let top = self.plot_area.top_left.y;
        let bottom = top.saturating_add(self.plot_area.size.height as i32);
        snap_within(self.y_for_value(value), top, bottom)
    }

    /// Screen column for an instant, `None` if not finite or too far out
    pub fn column_for_ms(&self, time_ms: i64) -> Option<i32> {
        let left = self.plot_area.top_left.x;
        let right = left.saturating_add(self.plot_area.size.width as i32);
        snap_within(self.x_for_ms(time_ms), left, right)
    }
}

/// Round `coord` to a pixel if it lies within `[low, high]` widened by the margin
fn snap_within(coord: f32, low: i32, high: i32) -> Option<i32> {
    let min = low.saturating_sub(COORDINATE_MARGIN_PX) as f32;
    let max = high.saturating_add(COORDINATE_MARGIN_PX) as f32;

    (coord.is_finite() && coord >= min && coord <= max).then(|| round_to_i32(coord))
}
