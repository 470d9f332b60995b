//! Desktop renderer for the cgm glucose trend chart.
//!
//! Draws one frame of the cgm-core chart into a framebuffer, copies it onto
//! an `embedded-graphics-simulator` display and saves that as a PNG.
//!
//! Readings come from a JSON file (`--samples`). Without one, a synthetic
//! day of readings is generated so the chart can be exercised without a
//! data source.
//!
//! ```text
//! cgm-render --samples readings.json --settings settings.json --output chart.png
//! ```

mod input;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use log::{info, warn};

use cgm_core::chart::constants::{DEFAULT_HEIGHT_PX, DEFAULT_WIDTH_PX};
use cgm_core::chart::{ChartConfig, ChartRenderer, RawSample};
use cgm_core::framebuffer::FrameBuffer;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "cgm-render", about = "Render a glucose trend chart to PNG")]
struct Args {
    /// JSON array of {"time", "value"} readings; synthetic data if omitted
    #[arg(long)]
    samples: Option<PathBuf>,

    /// JSON settings document; missing keys use defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// End of the chart window (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<String>,

    /// Surface width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH_PX)]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT_PX)]
    height: u32,

    /// Pixel scale factor for the saved image
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// PNG file to write
    #[arg(long)]
    output: PathBuf,
}

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Interval between synthetic readings, matching a typical CGM sensor.
const MOCK_SAMPLE_INTERVAL: TimeDelta = TimeDelta::minutes(5);

/// Number of synthetic readings (one day).
const MOCK_SAMPLE_COUNT: i64 = 288;

/// Generates synthetic glucose readings that cross both thresholds.
///
/// A short sensor dropout two hours before `now` leaves a visible gap.
fn mock_readings(now: DateTime<Utc>) -> Vec<RawSample> {
    let dropout = (now - TimeDelta::hours(2))..(now - TimeDelta::minutes(100));

    (0..MOCK_SAMPLE_COUNT)
        .filter_map(|i| {
            let time = now - MOCK_SAMPLE_INTERVAL * (MOCK_SAMPLE_COUNT - 1 - i) as i32;
            if dropout.contains(&time) {
                return None;
            }

            let t = i as f64;
            // Roughly 2.5 to 12.5 mmol/L with a slow meal cycle and some sensor noise
            let value = 7.5 + 4.5 * (t / 24.0).sin() + 0.6 * (t / 5.0).cos();
            Some(RawSample::new(Some(time), Some(value as f32)))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!("Starting cgm-render");

    let now = match &args.now {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .with_context(|| format!("invalid --now timestamp {text:?}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let settings = match &args.settings {
        Some(path) => input::load_settings(path)?,
        None => Default::default(),
    };

    let readings = match &args.samples {
        Some(path) => input::load_samples(path)?,
        None => {
            info!("No samples given, generating synthetic readings");
            mock_readings(now)
        }
    };

    let size = Size::new(args.width, args.height);
    info!("Surface: {}x{} (scale {}x)", size.width, size.height, args.scale);

    let mut chart = ChartRenderer::new(ChartConfig::new(size));
    settings.apply(&mut chart);
    chart.set_data(readings);

    if chart.series().is_stale(now, settings.stale_after()) {
        warn!(
            "Latest reading is older than {} minutes",
            settings.stale_minutes
        );
    }

    // --- Render ------------------------------------------------------------
    let mut framebuffer = FrameBuffer::new(size);
    let Ok(stats) = chart.render(&mut framebuffer, now);
    chart.mark_clean();

    info!(
        "Frame: {} segments, {} gaps, {} out of window, {} invalid, marker {}, empty {}",
        stats.segments_drawn,
        stats.gaps_skipped,
        stats.out_of_window,
        stats.invalid_coordinates,
        stats.marker_drawn,
        stats.empty_state
    );
    if let Some(view) = stats.view {
        info!(
            "Axis 0-{} {}, {} value labels, {} time labels",
            view.max_value,
            chart.config().label_unit,
            stats.value_labels,
            stats.time_labels
        );
    }

    // --- Output ------------------------------------------------------------
    let mut display = SimulatorDisplay::<Rgb888>::new(size);
    let Ok(()) = framebuffer.flush(&mut display);

    let output_settings = OutputSettingsBuilder::new().scale(args.scale).build();
    display
        .to_rgb_output_image(&output_settings)
        .save_png(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!("Wrote {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgm_core::chart::Series;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["cgm-render", "--output", "chart.png"]).unwrap();

        assert_eq!(args.width, 300);
        assert_eq!(args.height, 150);
        assert_eq!(args.scale, 1);
        assert!(args.samples.is_none());
    }

    #[test]
    fn test_output_required() {
        assert!(Args::try_parse_from(["cgm-render"]).is_err());
    }

    #[test]
    fn test_zero_scale_rejected() {
        let result =
            Args::try_parse_from(["cgm-render", "--output", "chart.png", "--scale", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mock_readings_have_a_gap() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let series = Series::from_raw(mock_readings(now));

        assert!(series.len() < MOCK_SAMPLE_COUNT as usize);
        assert_eq!(series.latest().map(|s| s.time), Some(now));
        assert!(
            series
                .samples()
                .windows(2)
                .any(|pair| pair[1].time - pair[0].time > TimeDelta::minutes(5))
        );
    }
}
