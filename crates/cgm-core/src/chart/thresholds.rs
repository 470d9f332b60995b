//! Glucose thresholds and reading classification

use core::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD};

/// Category a single reading falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlucoseCategory {
    /// Below the low threshold
    Low,
    /// Between the thresholds (inclusive)
    Normal,
    /// Above the high threshold
    High,
}

impl GlucoseCategory {
    /// All categories, in palette order
    pub const ALL: [GlucoseCategory; 3] = [Self::Low, Self::High, Self::Normal];

    /// Settings key for this category
    pub const fn key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for GlucoseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Low/high boundaries in mmol/L
///
/// `low < high` is expected but not enforced. Inverted thresholds are
/// classified with the comparisons as written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Readings strictly below this are low
    pub low: f32,
    /// Readings strictly above this are high
    pub high: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Create thresholds from explicit boundaries
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Classify a single reading
    ///
    /// Depends only on `value` and the thresholds, never on neighbours.
    pub fn classify(&self, value: f32) -> GlucoseCategory {
        if value < self.low {
            GlucoseCategory::Low
        } else if value > self.high {
            GlucoseCategory::High
        } else {
            GlucoseCategory::Normal
        }
    }

    /// Threshold value paired with the category it bounds
    pub fn reference_lines(&self) -> [(f32, GlucoseCategory); 2] {
        [
            (self.low, GlucoseCategory::Low),
            (self.high, GlucoseCategory::High),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let thresholds = Thresholds::new(4.0, 10.0);

        assert_eq!(thresholds.classify(3.9), GlucoseCategory::Low);
        assert_eq!(thresholds.classify(4.0), GlucoseCategory::Normal);
        assert_eq!(thresholds.classify(10.0), GlucoseCategory::Normal);
        assert_eq!(thresholds.classify(10.1), GlucoseCategory::High);
    }

    #[test]
    fn test_inverted_thresholds_are_not_fixed() {
        // low > high: a value between them is both "below low" and "above high";
        // the low comparison runs first and wins.
        let thresholds = Thresholds::new(10.0, 4.0);

        assert_eq!(thresholds.classify(7.0), GlucoseCategory::Low);
        assert_eq!(thresholds.classify(12.0), GlucoseCategory::High);
        assert_eq!(thresholds.classify(2.0), GlucoseCategory::Low);
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.low, 4.0);
        assert_eq!(thresholds.high, 10.0);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let thresholds: Thresholds = serde_json::from_str(r#"{"high": 13.9}"#).unwrap();
        assert_eq!(thresholds.low, 4.0);
        assert_eq!(thresholds.high, 13.9);
    }
}
