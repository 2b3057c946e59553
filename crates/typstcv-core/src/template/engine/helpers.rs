//! Context lookups shared by the evaluator and the filters

use crate::template::error::TemplateError;
use toml::Value;

/// Follow a dotted key (`entry.highlights`) through nested tables
pub(crate) fn resolve_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(data, |current, part| match current {
        Value::Table(table) => table.get(part),
        _ => None,
    })
}

/// Scalar value as template output
pub(crate) fn stringify_value(value: &Value, key: &str) -> Result<String, TemplateError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) => Err(TemplateError::ArrayInNonEachContext {
            key: key.to_string(),
        }),
        Value::Table(_) => Err(TemplateError::TableInPlaceholder {
            key: key.to_string(),
        }),
    }
}

/// Falsy: missing, `false`, `""`, `[]`, `{}`
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Boolean(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Table(table)) => !table.is_empty(),
        Some(_) => true,
    }
}

/// Copy of `base` with `var` bound to `item`
pub(crate) fn bind_loop_var(base: &Value, var: &str, item: Value) -> Value {
    let mut table = match base {
        Value::Table(t) => t.clone(),
        _ => toml::map::Map::new(),
    };
    table.insert(var.to_string(), item);
    Value::Table(table)
}
