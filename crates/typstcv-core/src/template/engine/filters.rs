//! Value filters: `{{ key | filter arg | filter }}`
//!
//! Length filters keep the unit of their input; `add` and `sub` take the name
//! of another context key and fail when the two units differ.

use toml::Value;

use crate::template::error::TemplateError;
use crate::types::length::{format_number, Length};
use crate::types::link::clean_url;

use super::helpers::{resolve_key, stringify_value};

pub(crate) const FILTER_NAMES: [&str; 8] = [
    "divide", "multiply", "add", "sub", "indent", "clean_url", "upper", "lower",
];

/// Apply one `name arg...` filter to an already rendered value
pub(crate) fn apply(
    spec: &str,
    input: String,
    data: &Value,
    line: usize,
) -> Result<String, TemplateError> {
    let mut parts = spec.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let failed = |message: String| TemplateError::FilterFailed {
        filter: name.to_string(),
        message,
        line,
    };

    let expect_args = |count: usize| {
        if args.len() == count {
            Ok(())
        } else {
            Err(failed(format!(
                "expects {} argument(s), got {}",
                count,
                args.len()
            )))
        }
    };

    match name {
        "divide" | "multiply" => {
            expect_args(1)?;
            let factor: f64 = args[0]
                .parse()
                .ok()
                .filter(|f: &f64| f.is_finite())
                .ok_or_else(|| failed(format!("'{}' is not a finite number", args[0])))?;
            let divide = name == "divide";
            if let Ok(length) = Length::parse(&input) {
                let result = if divide {
                    length.divide(factor)
                } else {
                    Ok(length.scale(factor))
                };
                return result.map(|l| l.to_string()).map_err(|e| failed(e.to_string()));
            }
            let number: f64 = input
                .trim()
                .parse()
                .map_err(|_| failed(format!("'{}' is neither a length nor a number", input)))?;
            if divide && factor == 0.0 {
                return Err(failed("division by zero".to_string()));
            }
            let result = if divide { number / factor } else { number * factor };
            Ok(format_number(result))
        }
        "add" | "sub" => {
            expect_args(1)?;
            let left = Length::parse(&input).map_err(|e| failed(e.to_string()))?;
            let other = resolve_key(data, args[0]).ok_or_else(|| TemplateError::UndefinedKey {
                key: args[0].to_string(),
                line,
            })?;
            let right = Length::parse(&stringify_value(other, args[0])?)
                .map_err(|e| failed(e.to_string()))?;
            let result = if name == "add" {
                left.add(&right)
            } else {
                left.sub(&right)
            };
            result.map(|l| l.to_string()).map_err(|e| failed(e.to_string()))
        }
        "indent" => {
            expect_args(1)?;
            let width: usize = args[0]
                .parse()
                .map_err(|_| failed(format!("'{}' is not a width", args[0])))?;
            Ok(indent(&input, width))
        }
        "clean_url" => {
            expect_args(0)?;
            Ok(clean_url(&input))
        }
        "upper" => {
            expect_args(0)?;
            Ok(input.to_uppercase())
        }
        "lower" => {
            expect_args(0)?;
            Ok(input.to_lowercase())
        }
        _ => Err(TemplateError::UnknownFilter {
            name: name.to_string(),
            line,
        }),
    }
}

/// Prefix every line after the first with `width` spaces
fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
            }
        }
        out.push_str(line);
    }
    out
}
