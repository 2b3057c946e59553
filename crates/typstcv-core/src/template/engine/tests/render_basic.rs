//! Placeholder rendering

use super::helpers::{cv_context, simple_context};
use super::*;

#[test]
fn test_render_simple_placeholder() {
    let result = render("Name: {{name}}", &simple_context()).unwrap();
    assert_eq!(result, "Name: Jane Doe");
}

#[test]
fn test_render_placeholder_with_spaces() {
    let result = render("Name: {{  name  }}", &simple_context()).unwrap();
    assert_eq!(result, "Name: Jane Doe");
}

#[test]
fn test_render_nested_key() {
    let result = render("{{cv.name}} <{{ cv.email }}>", &cv_context()).unwrap();
    assert_eq!(result, "Jane Doe <jane@example.com>");
}

#[test]
fn test_render_scalar_kinds() {
    let context = simple_context();
    assert_eq!(render("{{count}}", &context).unwrap(), "42");
    assert_eq!(render("{{ratio}}", &context).unwrap(), "0.75");
    assert_eq!(render("{{visible}}", &context).unwrap(), "true");
    assert_eq!(render("{{updated}}", &context).unwrap(), "2026-01-15");
}

#[test]
fn test_render_no_placeholders() {
    let text = "#set page(margin: 2cm)\n#let x = (a: 1)";
    assert_eq!(render(text, &simple_context()).unwrap(), text);
}

#[test]
fn test_single_braces_are_text() {
    let template = "#let f(x) = { x } {{name}}";
    let result = render(template, &simple_context()).unwrap();
    assert_eq!(result, "#let f(x) = { x } Jane Doe");
}

#[test]
fn test_utf8_text_around_placeholders() {
    let result = render("– {{name}} – ü", &simple_context()).unwrap();
    assert_eq!(result, "– Jane Doe – ü");
}
