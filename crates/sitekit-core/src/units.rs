//! Real-world length units
//!
//! Calibration stores plain scalars; the unit only matters when a length is
//! shown to the user or typed in. Conversions go through meters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit a calibrated scene is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Meters
    Meters,
    /// Centimeters
    Centimeters,
    /// Millimeters
    Millimeters,
    /// Feet
    Feet,
    /// Inches
    Inches,
    /// Yards
    Yards,
}

impl Default for LengthUnit {
    fn default() -> Self {
        Self::Meters
    }
}

impl LengthUnit {
    /// Length of one unit in meters.
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Centimeters => 0.01,
            Self::Millimeters => 0.001,
            Self::Feet => 0.3048,
            Self::Inches => 0.0254,
            Self::Yards => 0.9144,
        }
    }

    /// Short symbol used in labels.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
            Self::Feet => "ft",
            Self::Inches => "in",
            Self::Yards => "yd",
        }
    }

    /// Converts `value` expressed in `self` into `target`.
    pub fn convert(self, value: f64, target: LengthUnit) -> f64 {
        value * self.meters_per_unit() / target.meters_per_unit()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "cm" | "centimeter" | "centimeters" => Ok(Self::Centimeters),
            "mm" | "millimeter" | "millimeters" => Ok(Self::Millimeters),
            "ft" | "foot" | "feet" => Ok(Self::Feet),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            "yd" | "yard" | "yards" => Ok(Self::Yards),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Format a length for display, e.g. `12.50 m`.
pub fn format_length(value: f64, unit: LengthUnit) -> String {
    format!("{:.2} {}", value, unit.symbol())
}
