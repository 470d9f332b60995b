//! Glucose samples and the validated series the chart draws
//!
//! Callers hand over [`RawSample`]s in any order and of any quality. Only
//! readings with a timestamp and a finite value survive ingestion, and the
//! survivors are stably sorted by time into a fresh [`Series`].

use alloc::vec::Vec;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A single accepted glucose reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// When the reading was taken
    pub time: DateTime<Utc>,
    /// Reading in mmol/L
    pub value: f32,
}

impl Sample {
    /// Create a new sample
    pub const fn new(time: DateTime<Utc>, value: f32) -> Self {
        Self { time, value }
    }
}

/// A reading as delivered by a data source, not yet validated
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawSample {
    /// Timestamp, if the source provided a usable one
    pub time: Option<DateTime<Utc>>,
    /// Value, if the source provided a number
    pub value: Option<f32>,
}

impl RawSample {
    /// Create a raw sample
    pub const fn new(time: Option<DateTime<Utc>>, value: Option<f32>) -> Self {
        Self { time, value }
    }

    /// Accept the reading if it has a time and a finite value
    pub fn validate(self) -> Option<Sample> {
        let time = self.time?;
        let value = self.value?;
        value.is_finite().then_some(Sample { time, value })
    }
}

impl From<Sample> for RawSample {
    fn from(sample: Sample) -> Self {
        Self {
            time: Some(sample.time),
            value: Some(sample.value),
        }
    }
}

/// Time-ordered readings currently shown by the chart
///
/// Times never decrease from one element to the next. Equal times keep the
/// order they were delivered in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Create an empty series
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Validate and sort raw readings into a new series
    ///
    /// Readings without a time, without a value, or with a NaN value are
    /// dropped without error. Infinite values are dropped as well, which is
    /// stricter than a plain NaN filter: they have no position on the value
    /// axis and would push its top to infinity.
    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = RawSample>,
    {
        let mut samples: Vec<Sample> = raw.into_iter().filter_map(RawSample::validate).collect();
        samples.sort_by_key(|sample| sample.time);
        Self { samples }
    }

    /// All readings, oldest first
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if there are no readings
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest reading
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Most recent reading
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Highest value in the series
    pub fn max_value(&self) -> Option<f32> {
        self.samples
            .iter()
            .map(|sample| sample.value)
            .reduce(f32::max)
    }

    /// Check if the latest reading is older than `max_age` at `now`
    ///
    /// An empty series is always stale.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: TimeDelta) -> bool {
        match self.latest() {
            Some(latest) => now.signed_duration_since(latest.time) > max_age,
            None => true,
        }
    }
}
