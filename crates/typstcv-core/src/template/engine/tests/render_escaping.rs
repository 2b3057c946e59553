//! Backslash escapes in front of tags

use super::helpers::simple_context;
use super::*;
use toml::{toml, Value};

#[test]
fn test_escaped_placeholder_is_literal() {
    let result = render(r#"Literal: \{{name}}"#, &simple_context()).unwrap();
    assert_eq!(result, "Literal: {{name}}");
}

#[test]
fn test_escaped_placeholder_keeps_inner_spacing() {
    let result = render(r#"Literal: \{{ name }}"#, &simple_context()).unwrap();
    assert_eq!(result, "Literal: {{ name }}");
}

#[test]
fn test_double_backslash_renders_one_backslash_and_value() {
    let result = render(r#"Path: \\{{name}}"#, &simple_context()).unwrap();
    assert_eq!(result, r#"Path: \Jane Doe"#);
}

#[test]
fn test_triple_backslash_is_backslash_and_literal() {
    let result = render(r#"\\\{{name}}"#, &simple_context()).unwrap();
    assert_eq!(result, r#"\{{name}}"#);
}

#[test]
fn test_backslashes_elsewhere_are_untouched() {
    let result = render(r#"a\b \\ {{name}}"#, &simple_context()).unwrap();
    assert_eq!(result, r#"a\b \\ Jane Doe"#);
}

#[test]
fn test_escaped_unclosed_placeholder_is_error() {
    let result = render(r#"Before \{{name after"#, &simple_context());
    match result {
        Err(TemplateError::MalformedSyntax { message, .. }) => {
            assert!(message.contains("Unclosed"));
        }
        other => panic!("Expected MalformedSyntax, got {:?}", other),
    }
}

#[test]
fn test_escaped_end_tag_inside_loop_is_literal() {
    let data = toml! {
        [[items]]
        name = "One"
        [[items]]
        name = "Two"
    };
    let context = TemplateContext::new(Value::Table(data));
    let template = "{{each items |item|}}{{item.name}}: \\{{/each}} more\n{{/each}}";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "One: {{/each}} more\nTwo: {{/each}} more\n");
}

#[test]
fn test_escaped_if_inside_conditional_is_literal() {
    let template = "{{if visible}}\\{{if x}}{{/if}}";
    let result = render(template, &simple_context()).unwrap();
    assert_eq!(result, "{{if x}}");
}
