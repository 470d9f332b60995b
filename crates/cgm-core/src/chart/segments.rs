//! Color-segmented series rendering
//!
//! Consecutive readings are joined by straight segments colored by the
//! category of the left reading. Segments spanning a sensor dropout or
//! reaching outside the window are skipped whole; there is no partial
//! clipping. A lone reading is drawn as a filled marker instead.
//!
//! Planning is separated from drawing so the decisions for one frame can be
//! inspected without rasterizing anything.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use log::warn;

use super::constants::{MARKER_DIAMETER_PX, MAX_SEGMENT_GAP_MS, SERIES_LINE_WIDTH_PX};
use super::palette::Palette;
use super::series::Sample;
use super::thresholds::{GlucoseCategory, Thresholds};
use super::viewport::Viewport;

/// One straight piece of the series line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Screen position of the left reading
    pub start: Point,
    /// Screen position of the right reading
    pub end: Point,
    /// Category of the left reading
    pub category: GlucoseCategory,
}

/// Marker for a series holding exactly one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Screen position of the reading
    pub center: Point,
    /// Category of the reading
    pub category: GlucoseCategory,
}

/// Everything the series layer will draw for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentPlan {
    /// Segments to stroke, oldest first
    pub segments: Vec<Segment>,
    /// Single-reading marker, if any
    pub marker: Option<Marker>,
    /// Pairs skipped because their time delta exceeds the gap limit
    pub gaps_skipped: usize,
    /// Pairs or markers skipped because a reading lies outside the window
    pub out_of_window: usize,
    /// Pairs or markers skipped because a coordinate could not be computed
    pub invalid_coordinates: usize,
}

impl SegmentPlan {
    /// Decide what to draw for a time-ordered run of readings
    pub fn build(samples: &[Sample], viewport: &Viewport, thresholds: &Thresholds) -> Self {
        let mut plan = Self::default();

        match samples {
            [] => {}
            [only] => plan.plan_marker(only, viewport, thresholds),
            _ => {
                for pair in samples.windows(2) {
                    plan.plan_pair(&pair[0], &pair[1], viewport, thresholds);
                }
            }
        }

        plan
    }

    fn plan_marker(&mut self, sample: &Sample, viewport: &Viewport, thresholds: &Thresholds) {
        if !viewport.view().contains(sample.time) {
            self.out_of_window += 1;
            return;
        }

        let Some(center) = viewport.map(sample.time, sample.value) else {
            warn!(
                "Invalid coordinate for reading {} at {}",
                sample.value, sample.time
            );
            self.invalid_coordinates += 1;
            return;
        };

        self.marker = Some(Marker {
            center,
            category: thresholds.classify(sample.value),
        });
    }

    fn plan_pair(
        &mut self,
        left: &Sample,
        right: &Sample,
        viewport: &Viewport,
        thresholds: &Thresholds,
    ) {
        let delta_ms = right
            .time
            .timestamp_millis()
            .saturating_sub(left.time.timestamp_millis());
        if delta_ms > MAX_SEGMENT_GAP_MS {
            self.gaps_skipped += 1;
            return;
        }

        let view = viewport.view();
        if !view.contains(left.time) || !view.contains(right.time) {
            self.out_of_window += 1;
            return;
        }

        let (Some(start), Some(end)) = (
            viewport.map(left.time, left.value),
            viewport.map(right.time, right.value),
        ) else {
            warn!(
                "Invalid coordinates for segment {} -> {} at {}",
                left.value, right.value, left.time
            );
            self.invalid_coordinates += 1;
            return;
        };

        self.segments.push(Segment {
            start,
            end,
            category: thresholds.classify(left.value),
        });
    }
}

/// Stroke the planned segments and marker in their palette colors
pub(super) fn draw_plan<D: DrawTarget<Color = Rgb888>>(
    plan: &SegmentPlan,
    palette: &Palette,
    display: &mut D,
) -> Result<(), D::Error> {
    for segment in &plan.segments {
        let style = PrimitiveStyle::with_stroke(
            palette.draw_color(segment.category),
            SERIES_LINE_WIDTH_PX,
        );
        Line::new(segment.start, segment.end)
            .into_styled(style)
            .draw(display)?;
    }

    if let Some(marker) = plan.marker {
        Circle::with_center(marker.center, MARKER_DIAMETER_PX)
            .into_styled(PrimitiveStyle::with_fill(
                palette.draw_color(marker.category),
            ))
            .draw(display)?;
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
    use chrono::{DateTime, TimeDelta, Utc};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    /// Reading `minutes` before now
    fn ago(minutes: i64, value: f32) -> RawSample {
        RawSample::new(Some(now() - TimeDelta::minutes(minutes)), Some(value))
    }

    fn plan_for(raw: Vec<RawSample>) -> SegmentPlan {
        let series = Series::from_raw(raw);
        let config = ChartConfig::default();
        let view = ViewState::compute(&series, config.window_ms(), now()).unwrap();
        let viewport = Viewport::new(view, &config);
        SegmentPlan::build(series.samples(), &viewport, &Thresholds::new(4.0, 10.0))
    }

    #[test]
    fn test_left_point_colors_segment() {
        let plan = plan_for(vec![ago(31, 3.5), ago(30, 5.0)]);

        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].category, GlucoseCategory::Low);
        assert_eq!(plan.gaps_skipped, 0);
    }

    #[test]
    fn test_category_follows_left_point_only() {
        let plan = plan_for(vec![ago(12, 5.0), ago(8, 12.0), ago(4, 3.0), ago(0, 6.0)]);

        let categories: Vec<_> = plan.segments.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![
                GlucoseCategory::Normal,
                GlucoseCategory::High,
                GlucoseCategory::Low
            ]
        );
    }

    #[test]
    fn test_gap_suppresses_segment() {
        let plan = plan_for(vec![ago(30, 5.0), ago(24, 6.0)]);

        assert!(plan.segments.is_empty());
        assert_eq!(plan.gaps_skipped, 1);
    }

    #[test]
    fn test_exact_gap_limit_is_connected() {
        let plan = plan_for(vec![ago(30, 5.0), ago(25, 6.0)]);
        assert_eq!(plan.segments.len(), 1);
    }

    #[test]
    fn test_gap_checked_before_window() {
        // Both outside the window and too far apart: counted as a gap
        let plan = plan_for(vec![ago(600, 5.0), ago(500, 6.0), ago(1, 6.0)]);

        assert_eq!(plan.gaps_skipped, 2);
        assert_eq!(plan.out_of_window, 0);
    }

    #[test]
    fn test_segment_crossing_window_start_skipped() {
        // 6h window: 362 minutes ago is outside, 358 inside
        let plan = plan_for(vec![ago(362, 5.0), ago(358, 6.0), ago(354, 7.0)]);

        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.out_of_window, 1);
    }

    #[test]
    fn test_future_reading_skipped() {
        let plan = plan_for(vec![ago(2, 5.0), ago(-2, 6.0)]);

        assert!(plan.segments.is_empty());
        assert_eq!(plan.out_of_window, 1);
    }

    #[test]
    fn test_single_reading_marker() {
        let plan = plan_for(vec![ago(0, 12.0)]);

        assert!(plan.segments.is_empty());
        let marker = plan.marker.unwrap();
        assert_eq!(marker.category, GlucoseCategory::High);
        // Right edge of the plot area, 12/18 of the way up from y = 120
        assert_eq!(marker.center, Point::new(280, 53));
    }

    #[test]
    fn test_single_reading_outside_window() {
        let plan = plan_for(vec![ago(400, 5.0)]);

        assert_eq!(plan.marker, None);
        assert_eq!(plan.out_of_window, 1);
    }

    #[test]
    fn test_degenerate_window_counts_invalid() {
        let series = Series::from_raw(vec![ago(0, 5.0), ago(0, 6.0)]);
        let config = ChartConfig::default().with_graph_hours(0.0);
        let view = ViewState::compute(&series, config.window_ms(), now()).unwrap();
        let viewport = Viewport::new(view, &config);

        let plan = SegmentPlan::build(series.samples(), &viewport, &Thresholds::default());

        assert!(plan.segments.is_empty());
        assert_eq!(plan.invalid_coordinates, 1);
    }

    #[test]
    fn test_far_negative_values_count_invalid() {
        let palette = Palette::default();
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        let plan = plan_for(vec![ago(2, 5.0), ago(1, -1e4)]);
        assert!(plan.segments.is_empty());
        assert_eq!(plan.invalid_coordinates, 1);
        draw_plan(&plan, &palette, &mut fb).unwrap();

        let plan = plan_for(vec![ago(1, -1e30)]);
        assert_eq!(plan.marker, None);
        assert_eq!(plan.invalid_coordinates, 1);
        draw_plan(&plan, &palette, &mut fb).unwrap();

        assert_eq!(fb.count_color(Rgb888::BLACK), 300 * 150);
    }

    #[test]
    fn test_slightly_negative_value_still_drawn() {
        let plan = plan_for(vec![ago(2, 5.0), ago(1, -2.0)]);
        assert_eq!(plan.segments.len(), 1);

        let mut fb = FrameBuffer::new(Size::new(300, 150));
        draw_plan(&plan, &Palette::default(), &mut fb).unwrap();
    }

    #[test]
    fn test_draw_uses_category_colors() {
        let plan = plan_for(vec![ago(31, 3.5), ago(30, 5.0)]);
        let palette = Palette::default();
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        draw_plan(&plan, &palette, &mut fb).unwrap();

        assert!(fb.count_color(palette.draw_color(GlucoseCategory::Low)) > 0);
        assert_eq!(
            fb.count_color(palette.draw_color(GlucoseCategory::Normal)),
            0
        );
    }

    #[test]
    fn test_draw_marker() {
        let plan = plan_for(vec![ago(0, 12.0)]);
        let palette = Palette::default();
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        draw_plan(&plan, &palette, &mut fb).unwrap();

        let high = palette.draw_color(GlucoseCategory::High);
        assert_eq!(fb.pixel(Point::new(280, 53)), Some(high));
        assert_eq!(fb.pixel(Point::new(283, 53)), Some(high));
        assert_eq!(fb.pixel(Point::new(285, 53)), Some(Rgb888::BLACK));
    }
}
