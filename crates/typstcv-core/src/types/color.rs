//! Colors in the forms Typst accepts

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Predefined Typst color names
pub const NAMED_COLORS: [&str; 18] = [
    "black", "gray", "silver", "white", "navy", "blue", "aqua", "teal", "eastern", "purple",
    "fuchsia", "maroon", "red", "orange", "yellow", "olive", "green", "lime",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("'{value}' is not a color (expected a Typst color name, #rgb, #rrggbb, #rrggbbaa or rgb(r, g, b))")]
    Format { value: String },

    #[error("component {component} in '{value}' is out of range 0-255")]
    ComponentRange { value: String, component: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Named(String),
    Rgba { r: u8, g: u8, b: u8, a: Option<u8> },
}

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$")
        .expect("BUG: invalid RGB_RE regex literal")
});

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: None }
    }

    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let value = input.trim();
        let format_err = || ColorError::Format {
            value: value.to_string(),
        };

        if NAMED_COLORS.contains(&value) {
            return Ok(Color::Named(value.to_string()));
        }

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(format_err);
        }

        if let Some(caps) = RGB_RE.captures(value) {
            let mut channels = [0u8; 3];
            for (slot, i) in channels.iter_mut().zip(1..=3) {
                let component: u32 = caps[i].parse().map_err(|_| format_err())?;
                *slot = u8::try_from(component).map_err(|_| ColorError::ComponentRange {
                    value: value.to_string(),
                    component,
                })?;
            }
            return Ok(Color::rgb(channels[0], channels[1], channels[2]));
        }

        Err(format_err())
    }

    /// `#rrggbb` form, or `None` for named colors
    pub fn to_hex(&self) -> Option<String> {
        match self {
            Color::Named(_) => None,
            Color::Rgba { r, g, b, a: None } => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
            Color::Rgba {
                r,
                g,
                b,
                a: Some(a),
            } => Some(format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    let nibble = |c: &str| byte(c).map(|v| v * 17);

    match hex.len() {
        3 => Some(Color::rgb(
            nibble(&hex[0..1])?,
            nibble(&hex[1..2])?,
            nibble(&hex[2..3])?,
        )),
        6 => Some(Color::rgb(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        8 => Some(Color::Rgba {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: Some(byte(&hex[6..8])?),
        }),
        _ => None,
    }
}

impl fmt::Display for Color {
    /// Typst expression for the color
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(name) => f.write_str(name),
            Color::Rgba { r, g, b, a: None } => write!(f, "rgb({}, {}, {})", r, g, b),
            Color::Rgba {
                r,
                g,
                b,
                a: Some(a),
            } => write!(f, "rgb({}, {}, {}, {})", r, g, b, a),
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl JsonSchema for Color {
    fn schema_name() -> Cow<'static, str> {
        "Color".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "description": "Typst color name, #rgb, #rrggbb, #rrggbbaa or rgb(r, g, b)",
            "examples": ["rgb(0, 79, 144)", "#004f90", "black"]
        })
    }
}
