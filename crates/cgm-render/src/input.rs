//! Input files for the renderer.
//!
//! Samples arrive as a JSON array of `{ "time": ..., "value": ... }` objects.
//! `time` may be an RFC 3339 string or epoch milliseconds. Entries that do
//! not fit are passed on as invalid [`RawSample`]s so the chart's own
//! ingestion decides what to keep.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde_json::Value;

use cgm_core::chart::RawSample;
use cgm_core::config::ChartSettings;

/// Parse a samples document.
pub fn parse_samples(json: &str) -> serde_json::Result<Vec<RawSample>> {
    let entries: Vec<Value> = serde_json::from_str(json)?;
    Ok(entries.iter().map(raw_sample).collect())
}

/// Read and parse a samples file.
pub fn load_samples(path: &Path) -> Result<Vec<RawSample>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read samples from {}", path.display()))?;
    parse_samples(&text).with_context(|| format!("invalid samples file {}", path.display()))
}

/// Read a settings file; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<ChartSettings> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("invalid settings file {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No settings at {}, using defaults", path.display());
            Ok(ChartSettings::default())
        }
        Err(e) => {
            Err(e).with_context(|| format!("failed to read settings from {}", path.display()))
        }
    }
}

fn raw_sample(entry: &Value) -> RawSample {
    let time = entry.get("time").and_then(parse_time);
    let value = entry
        .get("value")
        .and_then(Value::as_f64)
        .map(|value| value as f32);

    RawSample::new(time, value)
}

fn parse_time(time: &Value) -> Option<DateTime<Utc>> {
    match time {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|time| time.with_timezone(&Utc)),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}
