//! TokenStream unit tests

use super::tokenize::{TokenKind, TokenStream};

#[test]
fn test_single_placeholder_span() {
    let mut stream = TokenStream::new("Hello {{name}} world");
    let token = stream.next().unwrap();
    assert_eq!(token.start, 6);
    assert_eq!(token.length, 8);
    assert!(!token.is_escaped());
    assert_eq!(
        token.kind,
        TokenKind::Placeholder {
            expr: "name".to_string()
        }
    );
    assert!(stream.next().is_none());
}

#[test]
fn test_token_offsets() {
    let starts: Vec<usize> = TokenStream::new("{{a}} {{b}} {{c}}").map(|t| t.start).collect();
    assert_eq!(starts, vec![0, 6, 12]);
}

#[test]
fn test_escaped_tokens() {
    let tokens: Vec<_> = TokenStream::new(r#"\{{escaped}} \\{{real}}"#).collect();
    assert_eq!(tokens.len(), 2);
    assert!(tokens[0].is_escaped());
    assert_eq!(tokens[1].backslash_count, 2);
    assert!(!tokens[1].is_escaped());
}

#[test]
fn test_block_classification() {
    let kinds: Vec<TokenKind> =
        TokenStream::new("{{each items |i|}}{{if i.ok}}{{else}}{{/if}}{{ /each }}")
            .map(|t| t.kind)
            .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::BlockStart {
                keyword: "each".to_string(),
                args: "items |i|".to_string()
            },
            TokenKind::BlockStart {
                keyword: "if".to_string(),
                args: "i.ok".to_string()
            },
            TokenKind::Else,
            TokenKind::BlockEnd {
                keyword: "if".to_string()
            },
            TokenKind::BlockEnd {
                keyword: "each".to_string()
            },
        ]
    );
}

#[test]
fn test_filter_expression_is_a_placeholder() {
    let token = TokenStream::new("{{ x | divide 2 }}").next().unwrap();
    assert_eq!(
        token.kind,
        TokenKind::Placeholder {
            expr: "x | divide 2".to_string()
        }
    );
}

#[test]
fn test_keys_starting_with_keywords_are_placeholders() {
    let token = TokenStream::new("{{iffy}}").next().unwrap();
    assert!(matches!(token.kind, TokenKind::Placeholder { .. }));
    let token = TokenStream::new("{{elsewhere}}").next().unwrap();
    assert!(matches!(token.kind, TokenKind::Placeholder { .. }));
}

#[test]
fn test_triple_braces() {
    let token = TokenStream::new("{{{triple}}}").next().unwrap();
    assert_eq!(token.start, 0);
    assert_eq!(
        token.kind,
        TokenKind::Placeholder {
            expr: "{triple".to_string()
        }
    );
}

#[test]
fn test_line_numbers() {
    let lines: Vec<usize> = TokenStream::new("Line 1\n{{a}}\nLine 3\n{{b}}")
        .map(|t| t.line)
        .collect();
    assert_eq!(lines, vec![2, 4]);
}

#[test]
fn test_unterminated_reports_opening_line() {
    let mut stream = TokenStream::new("ok {{a}}\n\n{{ broken");
    assert!(stream.next().is_some());
    assert!(stream.next().is_none());
    assert_eq!(stream.unterminated(), Some(3));
}

#[test]
fn test_empty_and_plain_input() {
    assert!(TokenStream::new("").next().is_none());
    assert!(TokenStream::new("just { text }").next().is_none());
}
