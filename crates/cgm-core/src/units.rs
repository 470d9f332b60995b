//! Glucose units
//!
//! Readings and thresholds are always held in mmol/L. mg/dL only exists at
//! the display edge: labels, and threshold entry in a settings form.

use core::fmt::{self, Write};
use core::str::FromStr;

use heapless::String;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::math::round_f32;

/// mg/dL per mmol/L
pub const MG_PER_DL_PER_MMOL: f32 = 18.0;

/// Error returned for an unknown unit label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown glucose unit (expected \"mmol/L\" or \"mg/dL\")")]
pub struct UnitParseError;

/// Unit glucose values are displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlucoseUnit {
    /// Millimoles per litre, one decimal place
    #[default]
    #[serde(rename = "mmol/L")]
    MmolPerL,
    /// Milligrams per decilitre, whole numbers
    #[serde(rename = "mg/dL")]
    MgPerDl,
}

impl GlucoseUnit {
    /// Display label
    pub const fn label(self) -> &'static str {
        match self {
            Self::MmolPerL => "mmol/L",
            Self::MgPerDl => "mg/dL",
        }
    }

    /// Decimal places used when formatting values in this unit
    pub const fn precision(self) -> usize {
        match self {
            Self::MmolPerL => 1,
            Self::MgPerDl => 0,
        }
    }

    /// Convert a stored mmol/L value for display
    pub fn to_display(self, mmol: f32) -> f32 {
        match self {
            Self::MmolPerL => mmol,
            Self::MgPerDl => round_f32(mmol * MG_PER_DL_PER_MMOL),
        }
    }

    /// Convert a displayed value back to mmol/L for storage
    pub fn from_display(self, value: f32) -> f32 {
        match self {
            Self::MmolPerL => value,
            Self::MgPerDl => value / MG_PER_DL_PER_MMOL,
        }
    }

    /// Format a stored mmol/L value in this unit, without the unit suffix
    pub fn format_value<const N: usize>(self, mmol: f32) -> String<N> {
        let mut s = String::new();
        let _ = write!(
            s,
            "{:.*}",
            self.precision(),
            self.to_display(mmol)
        );
        s
    }
}

impl fmt::Display for GlucoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GlucoseUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("mmol/L") {
            Ok(Self::MmolPerL)
        } else if trimmed.eq_ignore_ascii_case("mg/dL") {
            Ok(Self::MgPerDl)
        } else {
            Err(UnitParseError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(GlucoseUnit::MgPerDl.to_display(4.0), 72.0);
        assert_eq!(GlucoseUnit::MgPerDl.to_display(5.55), 100.0);
        assert_eq!(GlucoseUnit::MgPerDl.from_display(180.0), 10.0);
        assert_eq!(GlucoseUnit::MmolPerL.to_display(5.5), 5.5);
        assert_eq!(GlucoseUnit::MmolPerL.from_display(5.5), 5.5);
    }

    #[test]
    fn test_format_value() {
        let mmol: String<16> = GlucoseUnit::MmolPerL.format_value(12.0);
        assert_eq!(mmol.as_str(), "12.0");

        let mg: String<16> = GlucoseUnit::MgPerDl.format_value(12.0);
        assert_eq!(mg.as_str(), "216");
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("mmol/L".parse::<GlucoseUnit>(), Ok(GlucoseUnit::MmolPerL));
        assert_eq!(" MG/DL ".parse::<GlucoseUnit>(), Ok(GlucoseUnit::MgPerDl));
        assert_eq!("mg".parse::<GlucoseUnit>(), Err(UnitParseError));
    }

    #[test]
    fn test_serde_names() {
        let unit: GlucoseUnit = serde_json::from_str("\"mg/dL\"").unwrap();
        assert_eq!(unit, GlucoseUnit::MgPerDl);
        assert_eq!(serde_json::to_string(&GlucoseUnit::MmolPerL).unwrap(), "\"mmol/L\"");
    }
}
