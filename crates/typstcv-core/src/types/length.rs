//! Physical lengths with unit-preserving arithmetic

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Pattern accepted by [`Length::parse`], exported in the JSON schema
pub const LENGTH_PATTERN: &str = r"^-?[0-9]*\.?[0-9]+\s*(pt|mm|cm|in|em)$";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LengthError {
    #[error("'{value}' is not a length (expected a number followed by pt, mm, cm, in or em)")]
    Format { value: String },

    #[error("cannot combine {left} with {right} without an explicit conversion")]
    UnitMismatch { left: String, right: String },

    #[error("cannot convert {from} to {to}: em is relative to the font size")]
    NotConvertible { from: LengthUnit, to: LengthUnit },

    #[error("division of {value} by zero")]
    DivisionByZero { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Pt,
    Mm,
    Cm,
    In,
    Em,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Pt,
        LengthUnit::Mm,
        LengthUnit::Cm,
        LengthUnit::In,
        LengthUnit::Em,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Pt => "pt",
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::In => "in",
            LengthUnit::Em => "em",
        }
    }

    /// Points per unit; `None` for font-relative units
    fn points(&self) -> Option<f64> {
        match self {
            LengthUnit::Pt => Some(1.0),
            LengthUnit::Mm => Some(72.0 / 25.4),
            LengthUnit::Cm => Some(72.0 / 2.54),
            LengthUnit::In => Some(72.0),
            LengthUnit::Em => None,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A magnitude with a unit, e.g. `2cm` or `0.6em`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn pt(value: f64) -> Self {
        Self::new(value, LengthUnit::Pt)
    }

    pub const fn cm(value: f64) -> Self {
        Self::new(value, LengthUnit::Cm)
    }

    pub const fn em(value: f64) -> Self {
        Self::new(value, LengthUnit::Em)
    }

    /// Parse `<number><unit>`, whitespace between the two is allowed
    pub fn parse(input: &str) -> Result<Self, LengthError> {
        let value = input.trim();
        let err = || LengthError::Format {
            value: value.to_string(),
        };

        for unit in LengthUnit::ALL {
            if let Some(number) = value.strip_suffix(unit.as_str()) {
                let number = number.trim_end();
                if number.is_empty() || number.contains(char::is_whitespace) {
                    return Err(err());
                }
                let magnitude: f64 = number.parse().map_err(|_| err())?;
                if !magnitude.is_finite() {
                    return Err(err());
                }
                return Ok(Self::new(magnitude, unit));
            }
        }
        Err(err())
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0.0
    }

    /// Multiply the magnitude, keeping the unit
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.value * factor, self.unit)
    }

    /// Divide the magnitude, keeping the unit
    pub fn divide(&self, divisor: f64) -> Result<Self, LengthError> {
        if divisor == 0.0 {
            return Err(LengthError::DivisionByZero {
                value: self.to_string(),
            });
        }
        Ok(Self::new(self.value / divisor, self.unit))
    }

    /// Sum of two lengths in the same unit
    pub fn add(&self, other: &Length) -> Result<Self, LengthError> {
        self.same_unit(other)?;
        Ok(Self::new(self.value + other.value, self.unit))
    }

    /// Difference of two lengths in the same unit
    pub fn sub(&self, other: &Length) -> Result<Self, LengthError> {
        self.same_unit(other)?;
        Ok(Self::new(self.value - other.value, self.unit))
    }

    /// Explicit conversion between absolute units
    pub fn convert_to(&self, unit: LengthUnit) -> Result<Self, LengthError> {
        if unit == self.unit {
            return Ok(*self);
        }
        match (self.unit.points(), unit.points()) {
            (Some(from), Some(to)) => Ok(Self::new(self.value * from / to, unit)),
            _ => Err(LengthError::NotConvertible {
                from: self.unit,
                to: unit,
            }),
        }
    }

    fn same_unit(&self, other: &Length) -> Result<(), LengthError> {
        if self.unit != other.unit {
            return Err(LengthError::UnitMismatch {
                left: self.to_string(),
                right: other.to_string(),
            });
        }
        Ok(())
    }
}

/// Shortest decimal form with at most four fractional digits
pub(crate) fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let mut text = format!("{:.4}", rounded);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit)
    }
}

impl FromStr for Length {
    type Err = LengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl JsonSchema for Length {
    fn schema_name() -> Cow<'static, str> {
        "Length".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": LENGTH_PATTERN,
            "examples": ["2cm", "10pt", "0.6em"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_space() {
        assert_eq!(Length::parse("2 cm").unwrap(), Length::cm(2.0));
        assert_eq!(Length::parse("2cm").unwrap(), Length::cm(2.0));
        assert_eq!(Length::parse("0.6em").unwrap(), Length::em(0.6));
        assert_eq!(Length::parse(".5in").unwrap(), Length::new(0.5, LengthUnit::In));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for bad in ["", "cm", "2", "2 px", "two cm", "1 2cm", "NaNpt"] {
            assert!(Length::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_halving_preserves_unit() {
        let half = Length::parse("2 cm").unwrap().divide(2.0).unwrap();
        assert_eq!(half, Length::parse("1 cm").unwrap());
        assert_eq!(half.to_string(), "1cm");
    }

    #[test]
    fn test_mixed_unit_arithmetic_fails() {
        let cm = Length::parse("2cm").unwrap();
        let pt = Length::parse("10pt").unwrap();
        assert!(matches!(cm.add(&pt), Err(LengthError::UnitMismatch { .. })));
        assert!(matches!(cm.sub(&pt), Err(LengthError::UnitMismatch { .. })));
    }

    #[test]
    fn test_same_unit_arithmetic() {
        let a = Length::cm(2.0);
        let b = Length::cm(0.5);
        assert_eq!(a.add(&b).unwrap(), Length::cm(2.5));
        assert_eq!(a.sub(&b).unwrap(), Length::cm(1.5));
        assert_eq!(a.scale(1.5), Length::cm(3.0));
    }

    #[test]
    fn test_divide_by_zero() {
        assert!(matches!(
            Length::cm(1.0).divide(0.0),
            Err(LengthError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_explicit_conversion() {
        let inch = Length::new(1.0, LengthUnit::In);
        assert_eq!(inch.convert_to(LengthUnit::Pt).unwrap().to_string(), "72pt");
        assert_eq!(inch.convert_to(LengthUnit::Cm).unwrap().to_string(), "2.54cm");
        assert!(Length::em(1.0).convert_to(LengthUnit::Pt).is_err());
    }

    #[test]
    fn test_display_trims_zeros() {
        assert_eq!(Length::cm(0.5).to_string(), "0.5cm");
        assert_eq!(Length::cm(1.0 / 3.0).to_string(), "0.3333cm");
        assert_eq!(Length::pt(-0.0).to_string(), "0pt");
    }
}
