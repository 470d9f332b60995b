//! Axis labels
//!
//! Value labels sit left of the plot area on every horizontal gridline.
//! Time labels mark whole hours along the bottom edge, placed with the same
//! time mapping as the data so they line up with the readings.

use alloc::vec::Vec;
use core::fmt::Write;

use chrono::{DateTime, FixedOffset, Timelike};
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Text};
use heapless::String;
use log::warn;

use super::constants::{
    GRID_DIVISIONS, LABEL_COLOR, MAX_AXIS_LABEL_LENGTH, MIN_LABELED_VALUE, MS_PER_HOUR,
    X_LABEL_BOTTOM_MARGIN_PX, Y_LABEL_BASELINE_OFFSET_PX, Y_LABEL_MARGIN_PX,
};
use super::grid::division_offset;
use super::viewport::{ViewState, Viewport};
use crate::units::GlucoseUnit;

/// Formatted axis label text
pub type AxisLabel = String<MAX_AXIS_LABEL_LENGTH>;

/// Number of horizontal gridlines that can carry a value label
const VALUE_LABEL_SLOTS: usize = GRID_DIVISIONS as usize + 1;

/// A value label on one horizontal gridline
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    /// Gridline index, 0 at the top of the plot area
    pub division: u32,
    /// Gridline value in mmol/L
    pub value: f32,
    /// Text in the display unit
    pub text: AxisLabel,
}

/// Labels for the horizontal gridlines, top first
///
/// The label nearest zero is left out.
pub fn y_axis_labels(
    view: &ViewState,
    unit: GlucoseUnit,
) -> heapless::Vec<ValueLabel, VALUE_LABEL_SLOTS> {
    let step = view.value_range() / GRID_DIVISIONS as f32;
    let mut labels = heapless::Vec::new();

    for division in 0..=GRID_DIVISIONS {
        let value = view.min_value + step * (GRID_DIVISIONS - division) as f32;
        if value < MIN_LABELED_VALUE {
            continue;
        }

        let _ = labels.push(ValueLabel {
            division,
            value,
            text: unit.format_value(value),
        });
    }

    labels
}

/// Tick spacing for a window of `graph_hours`
pub fn tick_step_ms(graph_hours: f32) -> i64 {
    let hours = if graph_hours <= 6.0 {
        1
    } else if graph_hours <= 12.0 {
        2
    } else if graph_hours <= 24.0 {
        4
    } else {
        8
    };

    hours * MS_PER_HOUR
}

/// Tick instants in `[start_ms, end_ms]` that are whole multiples of `step_ms`
///
/// Multiples are counted from the Unix epoch, so hour ticks land on whole
/// UTC hours.
pub fn time_ticks(start_ms: i64, end_ms: i64, step_ms: i64) -> Vec<i64> {
    let mut ticks = Vec::new();
    if step_ms <= 0 || end_ms < start_ms {
        return ticks;
    }

    let remainder = start_ms.rem_euclid(step_ms);
    let mut tick = if remainder == 0 {
        start_ms
    } else {
        start_ms - remainder + step_ms
    };

    while tick <= end_ms {
        ticks.push(tick);
        tick += step_ms;
    }

    ticks
}

/// `H:00` label for a tick, in the local offset
///
/// Falls back to UTC for an out-of-range offset. Returns `None` only for an
/// instant chrono cannot represent.
pub fn format_hour_label(tick_ms: i64, utc_offset_secs: i32) -> Option<AxisLabel> {
    let utc = DateTime::from_timestamp_millis(tick_ms)?;
    let local = match FixedOffset::east_opt(utc_offset_secs) {
        Some(offset) => utc.with_timezone(&offset),
        None => {
            warn!("UTC offset {}s out of range, labeling in UTC", utc_offset_secs);
            utc.fixed_offset()
        }
    };

    let mut label = AxisLabel::new();
    let _ = write!(label, "{}:00", local.hour());
    Some(label)
}

/// Draw value labels right-aligned against the plot area
///
/// Returns the number of labels drawn.
pub(super) fn draw_y_axis_labels<D: DrawTarget<Color = Rgb888>>(
    viewport: &Viewport,
    unit: GlucoseUnit,
    display: &mut D,
) -> Result<usize, D::Error> {
    let plot_area = viewport.plot_area();
    let style = MonoTextStyle::new(&FONT_6X10, LABEL_COLOR);
    let label_x = plot_area.top_left.x - Y_LABEL_MARGIN_PX;
    let labels = y_axis_labels(viewport.view(), unit);

    for label in &labels {
        let label_y = plot_area.top_left.y
            + division_offset(plot_area.size.height, label.division)
            + Y_LABEL_BASELINE_OFFSET_PX;

        Text::with_alignment(
            label.text.as_str(),
            Point::new(label_x, label_y),
            style,
            Alignment::Right,
        )
        .draw(display)?;
    }

    Ok(labels.len())
}

/// Draw hour labels centered under their ticks
///
/// The baseline sits a fixed margin above the bottom edge of the surface.
/// Returns the number of labels drawn.
pub(super) fn draw_x_axis_labels<D: DrawTarget<Color = Rgb888>>(
    viewport: &Viewport,
    graph_hours: f32,
    utc_offset_secs: i32,
    surface_height: u32,
    display: &mut D,
) -> Result<usize, D::Error> {
    let view = viewport.view();
    let style = MonoTextStyle::new(&FONT_6X10, LABEL_COLOR);
    let baseline_y = surface_height as i32 - X_LABEL_BOTTOM_MARGIN_PX;
    let ticks = time_ticks(
        view.window_start_ms,
        view.window_end_ms,
        tick_step_ms(graph_hours),
    );
    let mut drawn = 0;

    for tick in ticks {
        let Some(x) = viewport.column_for_ms(tick) else {
            warn!("Invalid coordinate for time tick {}", tick);
            continue;
        };
        let Some(label) = format_hour_label(tick, utc_offset_secs) else {
            continue;
        };

        Text::with_alignment(
            label.as_str(),
            Point::new(x, baseline_y),
            style,
            Alignment::Center,
        )
        .draw(display)?;
        drawn += 1;
    }

    Ok(drawn)
}
