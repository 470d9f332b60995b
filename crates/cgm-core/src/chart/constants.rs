//! Constants for chart rendering
//!
//! All magic numbers are defined here with descriptive names and units.

use embedded_graphics::pixelcolor::Rgb888;

// ============================================================================
// Surface
// ============================================================================

/// Default chart width in pixels
pub const DEFAULT_WIDTH_PX: u32 = 300;

/// Default chart height in pixels
pub const DEFAULT_HEIGHT_PX: u32 = 150;

/// Default padding above the plot area in pixels
pub const DEFAULT_PADDING_TOP_PX: u32 = 20;

/// Default padding right of the plot area in pixels
pub const DEFAULT_PADDING_RIGHT_PX: u32 = 20;

/// Default padding below the plot area in pixels (room for time labels)
pub const DEFAULT_PADDING_BOTTOM_PX: u32 = 30;

/// Default padding left of the plot area in pixels (room for value labels)
pub const DEFAULT_PADDING_LEFT_PX: u32 = 40;

/// Default visible window in hours
pub const DEFAULT_GRAPH_HOURS: f32 = 6.0;

// ============================================================================
// Value Scale
// ============================================================================

/// Lower bound of the value axis (glucose is never negative)
pub const MIN_AXIS_VALUE: f32 = 0.0;

/// Smallest top of the value axis, keeps low flat data readable
pub const MIN_AXIS_MAX: f32 = 15.0;

/// Headroom added above the highest reading before rounding
pub const AXIS_HEADROOM: f32 = 1.0;

/// Number of grid divisions on each axis
///
/// The top of the value axis is always a multiple of this count.
pub const GRID_DIVISIONS: u32 = 6;

/// Labels below this value are not drawn (hides the "0.0" label)
pub const MIN_LABELED_VALUE: f32 = 0.1;

// ============================================================================
// Time
// ============================================================================

/// Milliseconds per minute
pub const MS_PER_MINUTE: i64 = 60 * 1000;

/// Milliseconds per hour
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Largest time delta between consecutive samples that is still connected
pub const MAX_SEGMENT_GAP_MS: i64 = 5 * MS_PER_MINUTE;

// ============================================================================
// Strokes and Shapes
// ============================================================================

/// Series line width in pixels
pub const SERIES_LINE_WIDTH_PX: u32 = 2;

/// Grid line width in pixels
pub const GRID_LINE_WIDTH_PX: u32 = 1;

/// Diameter of the single-reading marker in pixels (radius 3)
pub const MARKER_DIAMETER_PX: u32 = 7;

/// Width of one threshold dash in pixels
pub const THRESHOLD_DASH_LENGTH_PX: u32 = 2;

/// Gap between threshold dashes in pixels (dash pitch is 6 px)
pub const THRESHOLD_DASH_GAP_PX: u32 = 4;

/// Thickness of a threshold dash in pixels
pub const THRESHOLD_DASH_THICKNESS_PX: u32 = 1;

/// How far outside the plot area a mapped point may land and still be drawn
///
/// Points further out are treated as invalid coordinates. This keeps the
/// rasterizer's integer arithmetic well away from overflow.
pub const COORDINATE_MARGIN_PX: i32 = 1024;

// ============================================================================
// Labels
// ============================================================================

/// Maximum length of formatted axis labels (characters)
pub const MAX_AXIS_LABEL_LENGTH: usize = 16;

/// Gap between value labels and the plot area in pixels
pub const Y_LABEL_MARGIN_PX: i32 = 5;

/// Baseline offset of value labels below their gridline in pixels
pub const Y_LABEL_BASELINE_OFFSET_PX: i32 = 3;

/// Distance of the time label baseline from the bottom edge in pixels
pub const X_LABEL_BOTTOM_MARGIN_PX: i32 = 5;

/// Text shown when there is nothing to plot
pub const EMPTY_STATE_TEXT: &str = "No data available";

// ============================================================================
// Colors
// ============================================================================

/// Chart background (10% gray)
pub const BACKGROUND_COLOR: Rgb888 = Rgb888::new(26, 26, 26);

/// Grid line color (30% gray)
pub const GRID_COLOR: Rgb888 = Rgb888::new(77, 77, 77);

/// Axis label color (80% gray)
pub const LABEL_COLOR: Rgb888 = Rgb888::new(204, 204, 204);

/// Empty-state label color (70% gray)
pub const EMPTY_STATE_COLOR: Rgb888 = Rgb888::new(179, 179, 179);

/// Built-in color for readings below the low threshold
pub const DEFAULT_LOW_COLOR: &str = "rgb(255, 70, 70)";

/// Built-in color for readings above the high threshold
pub const DEFAULT_HIGH_COLOR: &str = "rgb(255, 170, 0)";

/// Built-in color for readings within range
pub const DEFAULT_NORMAL_COLOR: &str = "rgb(255, 255, 255)";

// ============================================================================
// Thresholds
// ============================================================================

/// Default low threshold in mmol/L
pub const DEFAULT_LOW_THRESHOLD: f32 = 4.0;

/// Default high threshold in mmol/L
pub const DEFAULT_HIGH_THRESHOLD: f32 = 10.0;
