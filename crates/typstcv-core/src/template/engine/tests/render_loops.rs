//! `{{each}}` blocks

use super::helpers::cv_context;
use super::*;
use toml::{toml, Value};

#[test]
fn test_each_inline() {
    let template = "{{each section.entries |e|}}{{e.company}}, {{/each}}";
    let result = render(template, &cv_context()).unwrap();
    assert_eq!(result, "Acme, Initech, ");
}

#[test]
fn test_each_with_spaces_in_tags() {
    let template = "{{ each section.entries |e| }}[{{ e.position }}]{{ /each }}";
    let result = render(template, &cv_context()).unwrap();
    assert_eq!(result, "[Engineer][Intern]");
}

#[test]
fn test_nested_each() {
    let template = "{{each section.entries |e|}}{{e.company}}:{{each e.highlights |h|}} {{h}};{{/each}}\n{{/each}}";
    let result = render(template, &cv_context()).unwrap();
    assert_eq!(result, "Acme: Shipped v2; Cut latency;\nInitech:\n");
}

#[test]
fn test_loop_variable_shadows_outer_key() {
    let data = toml! {
        item = "outer"
        items = ["a", "b"]
    };
    let context = TemplateContext::new(Value::Table(data));
    let result = render("{{each items |item|}}{{item}}{{/each}}{{item}}", &context).unwrap();
    assert_eq!(result, "abouter");
}

#[test]
fn test_outer_keys_visible_inside_loop() {
    let template = "{{each section.entries |e|}}{{section.title}}/{{e.company}} {{/each}}";
    let result = render(template, &cv_context()).unwrap();
    assert_eq!(result, "Experience/Acme Experience/Initech ");
}

#[test]
fn test_empty_array_renders_nothing() {
    let data = toml! { items = [] };
    let context = TemplateContext::new(Value::Table(data));
    let result = render("[{{each items |item|}}{{item}}{{/each}}]", &context).unwrap();
    assert_eq!(result, "[]");
}

#[test]
fn test_standalone_each_tags_leave_no_blank_lines() {
    let template = "- start\n{{each section.entries |e|}}\n- {{e.company}}\n{{/each}}\n- end\n";
    let result = render(template, &cv_context()).unwrap();
    assert_eq!(result, "- start\n- Acme\n- Initech\n- end\n");
}
