//! `{{if}}` / `{{else}}` blocks

use super::helpers::{cv_context, simple_context};
use super::*;

#[test]
fn test_if_true_renders_body() {
    let result = render("{{if visible}}shown{{/if}}", &simple_context()).unwrap();
    assert_eq!(result, "shown");
}

#[test]
fn test_falsy_values() {
    let context = simple_context();
    for key in ["missing", "empty", "section"] {
        let template = format!("{{{{if {}}}}}yes{{{{else}}}}no{{{{/if}}}}", key);
        assert_eq!(render(&template, &context).unwrap(), "no", "{key}");
    }
}

#[test]
fn test_empty_array_is_falsy() {
    let template = "{{each section.entries |e|}}{{if e.highlights}}H{{else}}-{{/if}}{{/each}}";
    assert_eq!(render(template, &cv_context()).unwrap(), "H-");
}

#[test]
fn test_non_empty_string_and_numbers_are_truthy() {
    let context = simple_context();
    assert_eq!(render("{{if name}}y{{/if}}", &context).unwrap(), "y");
    assert_eq!(render("{{if count}}y{{/if}}", &context).unwrap(), "y");
}

#[test]
fn test_nested_if_inside_each() {
    let template = "{{each section.entries |e|}}{{e.company}}{{if e.location}} ({{e.location}}){{/if}};{{/each}}";
    let result = render(template, &cv_context()).unwrap();
    assert_eq!(result, "Acme (Berlin);Initech;");
}

#[test]
fn test_nested_if_else_pairs_with_inner_block() {
    let template = "{{if visible}}{{if empty}}a{{else}}b{{/if}}{{else}}c{{/if}}";
    assert_eq!(render(template, &simple_context()).unwrap(), "b");
}

#[test]
fn test_standalone_if_lines_are_removed() {
    let template = "#block[\n  {{if cv.email}}\n  #link(\"mailto:{{cv.email}}\")\n  {{else}}\n  none\n  {{/if}}\n]\n";
    let result = render(template, &cv_context()).unwrap();
    assert_eq!(result, "#block[\n  #link(\"mailto:jane@example.com\")\n]\n");
}

#[test]
fn test_inline_if_keeps_surrounding_whitespace() {
    let result = render("a {{if missing}}x{{/if}} b", &simple_context()).unwrap();
    assert_eq!(result, "a  b");
}

#[test]
fn test_missing_key_in_skipped_branch_is_not_an_error() {
    let result = render("{{if missing}}{{missing.value}}{{/if}}ok", &simple_context()).unwrap();
    assert_eq!(result, "ok");
}
