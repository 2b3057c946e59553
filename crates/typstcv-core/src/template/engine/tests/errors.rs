//! Error reporting

use super::helpers::{cv_context, simple_context};
use super::*;

#[test]
fn test_error_undefined_key() {
    match render("Value: {{nonexistent}}", &simple_context()) {
        Err(TemplateError::UndefinedKey { key, line }) => {
            assert_eq!(key, "nonexistent");
            assert_eq!(line, 1);
        }
        other => panic!("Expected UndefinedKey, got {:?}", other),
    }
}

#[test]
fn test_error_undefined_key_reports_line() {
    match render("a\nb\n{{cv.phone}}", &cv_context()) {
        Err(TemplateError::UndefinedKey { key, line }) => {
            assert_eq!(key, "cv.phone");
            assert_eq!(line, 3);
        }
        other => panic!("Expected UndefinedKey, got {:?}", other),
    }
}

#[test]
fn test_error_array_in_placeholder() {
    assert!(matches!(
        render("{{section.entries}}", &cv_context()),
        Err(TemplateError::ArrayInNonEachContext { .. })
    ));
}

#[test]
fn test_error_table_in_placeholder() {
    assert!(matches!(
        render("{{cv}}", &cv_context()),
        Err(TemplateError::TableInPlaceholder { .. })
    ));
}

#[test]
fn test_error_unclosed_placeholder() {
    assert!(matches!(
        render("Value: {{name", &simple_context()),
        Err(TemplateError::MalformedSyntax { .. })
    ));
}

#[test]
fn test_error_unclosed_each() {
    match render("{{each section.entries |e|}}{{e.company}}", &cv_context()) {
        Err(TemplateError::MalformedSyntax { message, .. }) => {
            assert!(message.contains("Unclosed"));
        }
        other => panic!("Expected MalformedSyntax, got {:?}", other),
    }
}

#[test]
fn test_error_mismatched_end_tag() {
    match render("{{if visible}}x{{/each}}", &simple_context()) {
        Err(TemplateError::MalformedSyntax { message, .. }) => {
            assert!(message.contains("{{/each}}"));
        }
        other => panic!("Expected MalformedSyntax, got {:?}", other),
    }
}

#[test]
fn test_error_stray_else_and_end() {
    assert!(matches!(
        render("a{{else}}b", &simple_context()),
        Err(TemplateError::MalformedSyntax { .. })
    ));
    assert!(matches!(
        render("a{{/if}}", &simple_context()),
        Err(TemplateError::MalformedSyntax { .. })
    ));
    assert!(matches!(
        render("{{if visible}}a{{else}}b{{else}}c{{/if}}", &simple_context()),
        Err(TemplateError::MalformedSyntax { .. })
    ));
}

#[test]
fn test_error_each_without_var() {
    assert!(matches!(
        render("{{each section.entries}}x{{/each}}", &cv_context()),
        Err(TemplateError::MalformedSyntax { .. })
    ));
}

#[test]
fn test_syntax_errors_found_before_output() {
    // the undefined key comes first but the unclosed block is reported
    let engine = TemplateEngine::new();
    let result = engine.render("{{nonexistent}}{{if visible}}", &simple_context());
    assert!(matches!(result, Err(TemplateError::MalformedSyntax { .. })));
    assert!(engine.validate("{{if a}}{{each b |c|}}{{c}}{{/each}}{{/if}}").is_ok());
}
