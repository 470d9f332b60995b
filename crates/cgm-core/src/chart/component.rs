//! Chart renderer
//!
//! Owns the accepted series and the chart configuration, and draws the whole
//! chart in layers onto a caller-supplied draw target.

use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_7X14};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyle;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::axis::{draw_x_axis_labels, draw_y_axis_labels};
use super::constants::{BACKGROUND_COLOR, EMPTY_STATE_COLOR, EMPTY_STATE_TEXT};
use super::grid::{draw_grid, draw_threshold_lines};
use super::palette::{ColorOverrides, Palette};
use super::segments::{SegmentPlan, draw_plan};
use super::series::{RawSample, Series};
use super::thresholds::Thresholds;
use super::viewport::{ChartConfig, ViewState, Viewport};
use crate::units::GlucoseUnit;

/// What one call to [`ChartRenderer::render`] drew
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// View used for the frame, `None` in the empty state
    pub view: Option<ViewState>,
    /// Series segments stroked
    pub segments_drawn: usize,
    /// Pairs left unconnected because of a sensor gap
    pub gaps_skipped: usize,
    /// Pairs or markers outside the window
    pub out_of_window: usize,
    /// Draw calls skipped for a non-finite coordinate
    pub invalid_coordinates: usize,
    /// Whether the single-reading marker was drawn
    pub marker_drawn: bool,
    /// Whether the empty-state label was drawn instead of a chart
    pub empty_state: bool,
    /// Value labels drawn
    pub value_labels: usize,
    /// Time labels drawn
    pub time_labels: usize,
}

/// Threshold-colored glucose chart
///
/// Every setter only records the change and requests a redraw; the host
/// decides when to call [`render`](Self::render).
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: ChartConfig,
    thresholds: Thresholds,
    palette: Palette,
    series: Series,
    /// Dirty flag for rendering optimization
    dirty: bool,
}

impl ChartRenderer {
    /// Create a renderer with default thresholds and colors and no data
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            thresholds: Thresholds::default(),
            palette: Palette::default(),
            series: Series::new(),
            dirty: true,
        }
    }

    /// Replace the series with the valid readings from `raw`
    ///
    /// Invalid readings are dropped and the rest sorted by time. Empty or
    /// fully invalid input leaves an empty series.
    pub fn set_data<I>(&mut self, raw: I)
    where
        I: IntoIterator<Item = RawSample>,
    {
        self.series = Series::from_raw(raw);
        info!("Chart data set: {} valid readings", self.series.len());

        if let (Some(first), Some(last)) = (self.series.first(), self.series.latest()) {
            debug!(
                "First reading {} at {}, last reading {} at {}",
                first.value, first.time, last.value, last.time
            );
        }

        self.dirty = true;
    }

    /// Rebuild the palette from color overrides
    pub fn set_colors(&mut self, overrides: &ColorOverrides) {
        self.palette = Palette::from_overrides(overrides);
        self.dirty = true;
    }

    /// Replace the thresholds
    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
        self.dirty = true;
    }

    /// Change the visible window
    pub fn set_graph_hours(&mut self, hours: f32) {
        self.config.graph_hours = hours;
        self.dirty = true;
    }

    /// Change the unit value labels are shown in
    pub fn set_label_unit(&mut self, unit: GlucoseUnit) {
        self.config.label_unit = unit;
        self.dirty = true;
    }

    /// Change the local offset used for hour labels
    pub fn set_utc_offset(&mut self, offset_secs: i32) {
        self.config.utc_offset_secs = offset_secs;
        self.dirty = true;
    }

    /// Accepted series, oldest first
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Current configuration
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Current thresholds
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Current palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// View the next frame would use at `now`
    pub fn view_state(&self, now: DateTime<Utc>) -> Option<ViewState> {
        ViewState::compute(&self.series, self.config.window_ms(), now)
    }

    /// Series decisions the next frame would make at `now`
    pub fn plan(&self, now: DateTime<Utc>) -> Option<SegmentPlan> {
        let viewport = Viewport::new(self.view_state(now)?, &self.config);
        Some(SegmentPlan::build(
            self.series.samples(),
            &viewport,
            &self.thresholds,
        ))
    }

    /// Check if a redraw has been requested since the last [`mark_clean`](Self::mark_clean)
    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Clear the redraw request after the host has painted
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Draw the chart with its window ending at `now`
    ///
    /// Layers: background, grid, threshold lines, series, labels. With no
    /// data only the background and a centered empty-state label are drawn.
    pub fn render<D: DrawTarget<Color = Rgb888>>(
        &self,
        display: &mut D,
        now: DateTime<Utc>,
    ) -> Result<FrameStats, D::Error> {
        self.draw_background(display)?;

        let Some(view) = self.view_state(now) else {
            self.draw_empty_state(display)?;
            return Ok(FrameStats {
                empty_state: true,
                ..FrameStats::default()
            });
        };

        let viewport = Viewport::new(view, &self.config);
        let plan = SegmentPlan::build(self.series.samples(), &viewport, &self.thresholds);

        draw_grid(&viewport, display)?;
        let invalid_thresholds =
            draw_threshold_lines(&viewport, &self.thresholds, &self.palette, display)?;
        draw_plan(&plan, &self.palette, display)?;

        let value_labels = draw_y_axis_labels(&viewport, self.config.label_unit, display)?;
        let time_labels = draw_x_axis_labels(
            &viewport,
            self.config.graph_hours,
            self.config.utc_offset_secs,
            self.config.size.height,
            display,
        )?;

        Ok(FrameStats {
            view: Some(view),
            segments_drawn: plan.segments.len(),
            gaps_skipped: plan.gaps_skipped,
            out_of_window: plan.out_of_window,
            invalid_coordinates: plan.invalid_coordinates + invalid_thresholds,
            marker_drawn: plan.marker.is_some(),
            empty_state: false,
            value_labels,
            time_labels,
        })
    }

    fn draw_background<D: DrawTarget<Color = Rgb888>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        self.config
            .bounds()
            .into_styled(PrimitiveStyle::with_fill(BACKGROUND_COLOR))
            .draw(display)
    }

    fn draw_empty_state<D: DrawTarget<Color = Rgb888>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let center = self.config.bounds().center();
        let character_style = MonoTextStyle::new(&FONT_7X14, EMPTY_STATE_COLOR);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();

        Text::with_text_style(EMPTY_STATE_TEXT, center, character_style, text_style)
            .draw(display)?;

        Ok(())
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::constants::GRID_COLOR;
    use crate::chart::thresholds::GlucoseCategory;
    use crate::framebuffer::FrameBuffer;
    use alloc::string::ToString;
    use alloc::vec;
    use chrono::TimeDelta;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn ago(minutes: i64, value: f32) -> RawSample {
        RawSample::new(Some(now() - TimeDelta::minutes(minutes)), Some(value))
    }

    #[test]
    fn test_new_renderer_requests_redraw() {
        let mut chart = ChartRenderer::default();
        assert!(chart.needs_redraw());

        chart.mark_clean();
        assert!(!chart.needs_redraw());
    }

    #[test]
    fn test_every_setter_marks_dirty() {
        let mut chart = ChartRenderer::default();
        let setters: [fn(&mut ChartRenderer); 6] = [
            |c| c.set_data(vec![]),
            |c| c.set_colors(&ColorOverrides::default()),
            |c| c.set_thresholds(Thresholds::new(3.9, 7.8)),
            |c| c.set_graph_hours(12.0),
            |c| c.set_label_unit(GlucoseUnit::MgPerDl),
            |c| c.set_utc_offset(3600),
        ];

        for setter in setters {
            chart.mark_clean();
            setter(&mut chart);
            assert!(chart.needs_redraw());
        }
    }

    #[test]
    fn test_set_data_replaces_series() {
        let mut chart = ChartRenderer::default();
        chart.set_data(vec![ago(10, 5.0), ago(20, 6.0)]);
        chart.set_data(vec![ago(5, 7.0), RawSample::new(None, Some(1.0))]);

        assert_eq!(chart.series().len(), 1);
        assert_eq!(chart.series().latest().map(|s| s.value), Some(7.0));
    }

    #[test]
    fn test_render_empty_state() {
        let chart = ChartRenderer::default();
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        let stats = chart.render(&mut fb, now()).unwrap();

        assert!(stats.empty_state);
        assert_eq!(stats.view, None);
        assert_eq!(fb.count_color(GRID_COLOR), 0);
        assert!(fb.count_color(EMPTY_STATE_COLOR) > 0);
        // Label sits around the middle of the surface
        assert_eq!(fb.pixel(Point::new(5, 5)), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_render_low_segment_scenario() {
        let mut chart = ChartRenderer::default();
        chart.set_thresholds(Thresholds::new(4.0, 10.0));
        chart.set_data(vec![ago(31, 3.5), ago(30, 5.0)]);
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        let stats = chart.render(&mut fb, now()).unwrap();

        assert!(!stats.empty_state);
        assert_eq!(stats.segments_drawn, 1);
        assert_eq!(stats.value_labels, 6);
        assert_eq!(stats.time_labels, 6);
        assert!(fb.count_color(GRID_COLOR) > 0);

        let plan = chart.plan(now()).unwrap();
        assert_eq!(plan.segments[0].category, GlucoseCategory::Low);
    }

    #[test]
    fn test_render_gap_scenario() {
        let mut chart = ChartRenderer::default();
        chart.set_data(vec![ago(30, 5.0), ago(24, 6.0)]);
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        let stats = chart.render(&mut fb, now()).unwrap();

        assert_eq!(stats.segments_drawn, 0);
        assert_eq!(stats.gaps_skipped, 1);
        assert_eq!(
            fb.count_color(chart.palette().draw_color(GlucoseCategory::Normal)),
            0
        );
    }

    #[test]
    fn test_render_marker_respects_custom_colors() {
        let mut chart = ChartRenderer::default();
        chart.set_colors(&ColorOverrides {
            normal: Some("#00ff00".to_string()),
            ..ColorOverrides::default()
        });
        chart.set_data(vec![ago(1, 6.0)]);
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        let stats = chart.render(&mut fb, now()).unwrap();

        assert!(stats.marker_drawn);
        assert!(fb.count_color(Rgb888::GREEN) > 0);
    }

    #[test]
    fn test_render_all_out_of_window() {
        let mut chart = ChartRenderer::default();
        chart.set_data(vec![ago(500, 5.0), ago(498, 6.0)]);
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        let stats = chart.render(&mut fb, now()).unwrap();

        assert!(!stats.empty_state);
        assert_eq!(stats.segments_drawn, 0);
        assert_eq!(stats.out_of_window, 1);
        assert!(fb.count_color(GRID_COLOR) > 0);
    }

    #[test]
    fn test_render_degenerate_window_completes() {
        let mut chart = ChartRenderer::default();
        chart.set_graph_hours(0.0);
        chart.set_data(vec![ago(0, 5.0), ago(0, 6.0)]);
        let mut fb = FrameBuffer::new(Size::new(300, 150));

        let stats = chart.render(&mut fb, now()).unwrap();

        assert_eq!(stats.segments_drawn, 0);
        assert_eq!(stats.invalid_coordinates, 1);
        assert_eq!(stats.time_labels, 0);
    }

    #[test]
    fn test_render_far_negative_readings_skipped() {
        for value in [-1e4f32, -1e7, -1e30] {
            let mut chart = ChartRenderer::default();
            chart.set_data(vec![ago(2, 5.0), ago(1, value)]);
            let mut fb = FrameBuffer::new(Size::new(300, 150));

            let stats = chart.render(&mut fb, now()).unwrap();

            assert_eq!(stats.segments_drawn, 0);
            assert_eq!(stats.invalid_coordinates, 1);
        }
    }
}
