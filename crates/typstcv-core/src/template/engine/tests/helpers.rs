//! Shared contexts for template engine tests

use crate::template::engine::TemplateContext;
use toml::{toml, Value};

/// Scalar values of every TOML kind
pub(super) fn simple_context() -> TemplateContext {
    let data = toml! {
        name = "Jane Doe"
        count = 42
        ratio = 0.75
        visible = true
        updated = 2026-01-15
        empty = ""
    };
    TemplateContext::new(Value::Table(data))
}

/// A small CV-shaped context with a section and its entries
pub(super) fn cv_context() -> TemplateContext {
    let data = toml! {
        [cv]
        name = "Jane Doe"
        email = "jane@example.com"

        [design.page]
        left_margin = "2cm"
        right_margin = "1.5cm"
        top_margin = "10pt"

        [section]
        title = "Experience"

        [[section.entries]]
        company = "Acme"
        position = "Engineer"
        highlights = ["Shipped v2", "Cut latency"]
        location = "Berlin"

        [[section.entries]]
        company = "Initech"
        position = "Intern"
        highlights = []
        location = ""
    };
    TemplateContext::new(Value::Table(data))
}
