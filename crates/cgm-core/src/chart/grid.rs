//! Grid and threshold reference lines
//!
//! Draws the low-contrast division grid under the series and the dashed
//! low/high threshold rules in their category colors.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use log::warn;

use super::constants::{
    GRID_COLOR, GRID_DIVISIONS, GRID_LINE_WIDTH_PX, THRESHOLD_DASH_GAP_PX,
    THRESHOLD_DASH_LENGTH_PX, THRESHOLD_DASH_THICKNESS_PX,
};
use super::palette::Palette;
use super::thresholds::Thresholds;
use super::viewport::Viewport;

/// Line style for horizontal rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    /// Solid continuous line
    Solid {
        /// Stroke width in pixels
        width: u32,
    },
    /// Row of small filled rectangles
    Dashed {
        /// Length of each dash in pixels
        dash_length: u32,
        /// Length of gap between dashes in pixels
        gap_length: u32,
        /// Thickness of each dash in pixels
        thickness: u32,
    },
}

/// Style of the horizontal grid lines
const GRID_STYLE: LineStyle = LineStyle::Solid {
    width: GRID_LINE_WIDTH_PX,
};

/// Style of the threshold rules
const THRESHOLD_STYLE: LineStyle = LineStyle::Dashed {
    dash_length: THRESHOLD_DASH_LENGTH_PX,
    gap_length: THRESHOLD_DASH_GAP_PX,
    thickness: THRESHOLD_DASH_THICKNESS_PX,
};

/// Draw the division grid
///
/// `GRID_DIVISIONS` divisions on each axis; the outermost lines sit on the
/// plot area edges.
pub(super) fn draw_grid<D: DrawTarget<Color = Rgb888>>(
    viewport: &Viewport,
    display: &mut D,
) -> Result<(), D::Error> {
    let plot_area = viewport.plot_area();
    let left = plot_area.top_left.x;
    let top = plot_area.top_left.y;
    let right = left + plot_area.size.width as i32;
    let bottom = top + plot_area.size.height as i32;

    for i in 0..=GRID_DIVISIONS {
        let y = top + division_offset(plot_area.size.height, i);
        draw_rule(left, right, y, GRID_COLOR, GRID_STYLE, display)?;
    }

    let style = PrimitiveStyle::with_stroke(GRID_COLOR, GRID_LINE_WIDTH_PX);
    for i in 0..=GRID_DIVISIONS {
        let x = left + division_offset(plot_area.size.width, i);
        Line::new(Point::new(x, top), Point::new(x, bottom))
            .into_styled(style)
            .draw(display)?;
    }

    Ok(())
}

/// Pixel offset of division `index` along a span of `length`
pub(super) fn division_offset(length: u32, index: u32) -> i32 {
    (length as u64 * index as u64 / GRID_DIVISIONS as u64) as i32
}

/// Draw the low and high threshold rules
///
/// A rule is drawn only if its value lies on the value axis. Returns the
/// number of rules skipped because their row could not be computed.
pub(super) fn draw_threshold_lines<D: DrawTarget<Color = Rgb888>>(
    viewport: &Viewport,
    thresholds: &Thresholds,
    palette: &Palette,
    display: &mut D,
) -> Result<usize, D::Error> {
    let plot_area = viewport.plot_area();
    let left = plot_area.top_left.x;
    let right = left + plot_area.size.width as i32;
    let mut invalid = 0;

    for (value, category) in thresholds.reference_lines() {
        if !viewport.view().contains_value(value) {
            continue;
        }

        let Some(y) = viewport.row_for_value(value) else {
            warn!("Invalid coordinate for {} threshold at {}", category, value);
            invalid += 1;
            continue;
        };

        draw_rule(
            left,
            right,
            y,
            palette.draw_color(category),
            THRESHOLD_STYLE,
            display,
        )?;
    }

    Ok(invalid)
}

/// Draw a horizontal rule from `start_x` (inclusive) to `end_x` (exclusive for dashes)
fn draw_rule<D: DrawTarget<Color = Rgb888>>(
    start_x: i32,
    end_x: i32,
    y: i32,
    color: Rgb888,
    style: LineStyle,
    display: &mut D,
) -> Result<(), D::Error> {
    match style {
        LineStyle::Solid { width } => {
            Line::new(Point::new(start_x, y), Point::new(end_x, y))
                .into_styled(PrimitiveStyle::with_stroke(color, width))
                .draw(display)?;
        }
        LineStyle::Dashed {
            dash_length,
            gap_length,
            thickness,
        } => {
            let pitch = (dash_length + gap_length).max(1) as i32;
            let dash = PrimitiveStyle::with_fill(color);
            let mut x = start_x;

            while x < end_x {
                Rectangle::new(Point::new(x, y), Size::new(dash_length, thickness))
                    .into_styled(dash)
                    .draw(display)?;
                x += pitch;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::series::{RawSample, Series};
    use crate::chart::viewport::{ChartConfig, ViewState};
    use crate::framebuffer::FrameBuffer;
    use alloc::vec;
    use chrono::DateTime;

    fn viewport() -> Viewport {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let series = Series::from_raw(vec![RawSample::new(Some(now), Some(8.0))]);
        let config = ChartConfig::default();
        let view = ViewState::compute(&series, config.window_ms(), now).unwrap();
        Viewport::new(view, &config)
    }

    #[test]
    fn test_division_offsets() {
        assert_eq!(division_offset(100, 0), 0);
        assert_eq!(division_offset(100, 3), 50);
        assert_eq!(division_offset(100, 6), 100);
        assert_eq!(division_offset(240, 1), 40);
    }

    #[test]
    fn test_grid_spans_plot_area() {
        let mut fb = FrameBuffer::new(Size::new(300, 150));
        draw_grid(&viewport(), &mut fb).unwrap();

        // Corners of the plot area (40,20)-(280,120)
        assert_eq!(fb.pixel(Point::new(40, 20)), Some(GRID_COLOR));
        assert_eq!(fb.pixel(Point::new(280, 120)), Some(GRID_COLOR));
        // Middle horizontal division at y = 70
        assert_eq!(fb.pixel(Point::new(150, 70)), Some(GRID_COLOR));
        // Nothing outside the plot area
        assert_eq!(fb.pixel(Point::new(10, 10)), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_threshold_rules_are_dashed() {
        let mut fb = FrameBuffer::new(Size::new(300, 150));
        let palette = Palette::default();
        let thresholds = Thresholds::new(4.0, 10.0);

        let invalid = draw_threshold_lines(&viewport(), &thresholds, &palette, &mut fb).unwrap();
        assert_eq!(invalid, 0);

        // Axis 0..18 over 100 px: low at 120 - 22.2 = 98 (rounded)
        let low = palette.draw_color(super::super::thresholds::GlucoseCategory::Low);
        assert_eq!(fb.pixel(Point::new(40, 98)), Some(low));
        assert_eq!(fb.pixel(Point::new(41, 98)), Some(low));
        assert_eq!(fb.pixel(Point::new(42, 98)), Some(Rgb888::BLACK));
        assert_eq!(fb.pixel(Point::new(46, 98)), Some(low));
    }

    #[test]
    fn test_threshold_outside_axis_skipped() {
        let mut fb = FrameBuffer::new(Size::new(300, 150));
        let palette = Palette::default();
        let thresholds = Thresholds::new(-1.0, 40.0);

        draw_threshold_lines(&viewport(), &thresholds, &palette, &mut fb).unwrap();

        assert_eq!(fb.dirty_area(), None);
    }
}
