//! Template engine implementation
//!
//! Rendering is two passes: [`blocks::parse`] builds a block tree from the
//! token stream, then the tree is evaluated against a [`TemplateContext`].
//! Parsing fails before any output is produced, so a template with an
//! unclosed block never yields partial text.

mod blocks;
mod filters;
mod helpers;
mod tokenize;

use crate::template::error::TemplateError;
use toml::Value;

use blocks::Node;
use helpers::{bind_loop_var, is_truthy, resolve_key, stringify_value};

pub(crate) use filters::FILTER_NAMES;

/// Template context holding TOML data for rendering
#[derive(Debug, Clone)]
pub struct TemplateContext {
    data: Value,
}

impl TemplateContext {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// Template engine for rendering templates with TOML data
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Check a template's syntax without rendering it
    pub fn validate(&self, template: &str) -> Result<(), TemplateError> {
        blocks::parse(template).map(|_| ())
    }

    /// Render a template with the given context
    pub fn render(
        &self,
        template: &str,
        context: &TemplateContext,
    ) -> Result<String, TemplateError> {
        let nodes = blocks::parse(template)?;
        let mut output = String::with_capacity(template.len());
        self.eval(&nodes, context.data(), &mut output)?;
        Ok(output)
    }

    fn eval(&self, nodes: &[Node], data: &Value, output: &mut String) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Output { expr, line } => {
                    output.push_str(&self.eval_expr(expr, data, *line)?);
                }
                Node::Each {
                    key,
                    var,
                    body,
                    line,
                } => {
                    let value = resolve_key(data, key).ok_or_else(|| {
                        TemplateError::UndefinedKey {
                            key: key.clone(),
                            line: *line,
                        }
                    })?;
                    let items = value
                        .as_array()
                        .ok_or_else(|| TemplateError::MalformedSyntax {
                            message: format!("Key '{}' is not an array", key),
                            line: *line,
                        })?;
                    for item in items {
                        let scoped = bind_loop_var(data, var, item.clone());
                        self.eval(body, &scoped, output)?;
                    }
                }
                Node::If {
                    key,
                    then,
                    otherwise,
                    ..
                } => {
                    let branch = if is_truthy(resolve_key(data, key)) {
                        then
                    } else {
                        otherwise
                    };
                    self.eval(branch, data, output)?;
                }
            }
        }
        Ok(())
    }

    /// `key` or `key | filter args | filter`
    fn eval_expr(&self, expr: &str, data: &Value, line: usize) -> Result<String, TemplateError> {
        let mut stages = expr.split('|');
        let key = stages.next().unwrap_or_default().trim();

        let value = resolve_key(data, key).ok_or_else(|| TemplateError::UndefinedKey {
            key: key.to_string(),
            line,
        })?;
        let mut text = stringify_value(value, key)?;

        for stage in stages {
            text = filters::apply(stage.trim(), text, data, line)?;
        }
        Ok(text)
    }
}

/// Convenience function to render a template
pub fn render(template: &str, context: &TemplateContext) -> Result<String, TemplateError> {
    TemplateEngine::new().render(template, context)
}

#[cfg(test)]
mod tests;
