//! Unit conversion utilities
//!
//! Heights are stored in centimeters. This module converts them to feet and
//! inches for the dual-unit ruler labels and parses user typed heights back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Values closer to zero than this format as `0'0"`
const ZERO_EPSILON: f64 = 1e-6;
/// Tolerance for carrying a rounded 12 inches into the next foot
const CARRY_EPSILON: f64 = 1e-9;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (cm)
    #[default]
    Metric,
    /// Imperial system (feet and inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "cm" => Ok(Self::Metric),
            "imperial" | "ft" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format a centimeter value as feet and inches, e.g. `5'11.5"`.
///
/// Inches carry at most two decimals with trailing zeros removed. A remainder
/// that rounds up to a full 12 inches is carried into the feet, and negative
/// input keeps a leading `-`.
pub fn cm_to_ft_in(cm: f64) -> String {
    if !cm.is_finite() || cm.abs() < ZERO_EPSILON {
        return "0'0\"".to_string();
    }

    let total_inches = cm.abs() / CM_PER_INCH;
    let mut feet = (total_inches / INCHES_PER_FOOT).floor();
    let mut inches = round_to_hundredths(total_inches - feet * INCHES_PER_FOOT);

    if inches >= INCHES_PER_FOOT - CARRY_EPSILON {
        feet += 1.0;
        inches = 0.0;
    }

    let sign = if cm < 0.0 && (feet > 0.0 || inches > 0.0) {
        "-"
    } else {
        ""
    };

    format!("{}{}'{}\"", sign, feet as u64, format_inches(inches))
}

/// Format a centimeter value as a whole-centimeter label (no unit suffix).
pub fn cm_to_label(cm: f64) -> String {
    if !cm.is_finite() {
        return "0".to_string();
    }
    // `as i64` folds -0.0 into 0
    (cm.round() as i64).to_string()
}

/// Convert feet and inches to centimeters
pub fn ft_in_to_cm(feet: f64, inches: f64) -> f64 {
    (feet * INCHES_PER_FOOT + inches) * CM_PER_INCH
}

/// Format a height for display in the given system
pub fn format_height(value_cm: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{} cm", cm_to_label(value_cm)),
        MeasurementSystem::Imperial => cm_to_ft_in(value_cm),
    }
}

/// Parse a height string to centimeters
///
/// * `input` - String to parse
/// * `system` - Assumed measurement system
///
/// Metric input is a plain number of centimeters. Imperial input accepts
/// `5'11"`, `5'11.5"`, `5'`, `71"` or a bare number of inches.
pub fn parse_height(input: &str, system: MeasurementSystem) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    match system {
        MeasurementSystem::Metric => {
            let value = input.trim_end_matches("cm").trim();
            value.parse::<f64>().map_err(|e| e.to_string())
        }
        MeasurementSystem::Imperial => {
            let (negative, body) = match input.strip_prefix('-') {
                Some(rest) => (true, rest.trim()),
                None => (false, input),
            };

            let (feet, inches) = match body.split_once('\'') {
                Some((feet, rest)) => {
                    let feet = feet
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| "Invalid feet value".to_string())?;
                    let rest = rest.trim().trim_end_matches('"').trim();
                    let inches = if rest.is_empty() {
                        0.0
                    } else {
                        rest.parse::<f64>()
                            .map_err(|_| "Invalid inches value".to_string())?
                    };
                    (feet, inches)
                }
                None => {
                    let inches = body
                        .trim_end_matches('"')
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| "Invalid inches value".to_string())?;
                    (0.0, inches)
                }
            };

            if inches < 0.0 || feet < 0.0 {
                return Err("Sign is only allowed in front of the value".to_string());
            }

            let cm = ft_in_to_cm(feet, inches);
            Ok(if negative { -cm } else { cm })
        }
    }
}

/// Get the unit label for the given system ("cm" or "ft/in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "cm",
        MeasurementSystem::Imperial => "ft/in",
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn format_inches(inches: f64) -> String {
    let text = format!("{:.2}", inches);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}
