//! Turns the token stream into a block tree
//!
//! Blocks nest freely (`each` inside `if` inside `each`). A block tag that is
//! alone on its line takes the whole line with it, so templates can put
//! `{{if ...}}` and `{{/if}}` on lines of their own without leaving blank
//! lines in the output.

use crate::template::error::TemplateError;

use super::tokenize::{Token, TokenKind, TokenStream};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Output {
        expr: String,
        line: usize,
    },
    Each {
        key: String,
        var: String,
        body: Vec<Node>,
        line: usize,
    },
    If {
        key: String,
        then: Vec<Node>,
        otherwise: Vec<Node>,
        line: usize,
    },
}

/// An open block waiting for its closing tag
struct Frame {
    keyword: String,
    args: String,
    line: usize,
    nodes: Vec<Node>,
    /// Nodes collected before `{{else}}`
    then: Option<Vec<Node>>,
}

pub(crate) fn parse(template: &str) -> Result<Vec<Node>, TemplateError> {
    let mut stream = TokenStream::new(template);
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut cursor = 0;

    while let Some(token) = stream.next() {
        let standalone = if !token.is_escaped() && token.kind.is_block_tag() {
            standalone_span(template, &token, cursor)
        } else {
            None
        };
        let (text_end, next_cursor) =
            standalone.unwrap_or((token.start - token.backslash_count, token.end()));

        let current = match stack.last_mut() {
            Some(frame) => &mut frame.nodes,
            None => &mut root,
        };
        push_text(current, &template[cursor..text_end]);
        if standalone.is_none() {
            push_text(current, &"\\".repeat(token.backslash_count / 2));
        }
        cursor = next_cursor;

        if token.is_escaped() {
            push_text(current, &template[token.start..token.end()]);
            continue;
        }

        match token.kind {
            TokenKind::Placeholder { expr } => current.push(Node::Output {
                expr,
                line: token.line,
            }),
            TokenKind::BlockStart { keyword, args } => stack.push(Frame {
                keyword,
                args,
                line: token.line,
                nodes: Vec::new(),
                then: None,
            }),
            TokenKind::Else => match stack.last_mut() {
                Some(frame) if frame.keyword == "if" && frame.then.is_none() => {
                    frame.then = Some(std::mem::take(&mut frame.nodes));
                }
                _ => {
                    return Err(TemplateError::MalformedSyntax {
                        message: "Unexpected {{else}} outside of an {{if}} block".to_string(),
                        line: token.line,
                    })
                }
            },
            TokenKind::BlockEnd { keyword } => {
                let frame = match stack.pop() {
                    Some(frame) if frame.keyword == keyword => frame,
                    Some(frame) => {
                        return Err(TemplateError::MalformedSyntax {
                            message: format!(
                                "Found {{{{/{}}}}} while {{{{{}}}}} opened at line {} is still open",
                                keyword, frame.keyword, frame.line
                            ),
                            line: token.line,
                        })
                    }
                    None => {
                        return Err(TemplateError::MalformedSyntax {
                            message: format!(
                                "Unexpected {{{{/{}}}}} without matching {{{{{}}}}}",
                                keyword, keyword
                            ),
                            line: token.line,
                        })
                    }
                };
                let node = close_block(frame)?;
                match stack.last_mut() {
                    Some(parent) => parent.nodes.push(node),
                    None => root.push(node),
                }
            }
        }
    }

    if let Some(line) = stream.unterminated() {
        return Err(TemplateError::MalformedSyntax {
            message: "Unclosed placeholder: missing }}".to_string(),
            line,
        });
    }
    if let Some(frame) = stack.pop() {
        return Err(TemplateError::MalformedSyntax {
            message: format!("Unclosed {} block '{}'", frame.keyword, frame.args),
            line: frame.line,
        });
    }

    push_text(&mut root, &template[cursor..]);
    Ok(root)
}

fn close_block(frame: Frame) -> Result<Node, TemplateError> {
    match frame.keyword.as_str() {
        "each" => {
            let (key, var) = parse_each_args(&frame.args, frame.line)?;
            Ok(Node::Each {
                key,
                var,
                body: frame.nodes,
                line: frame.line,
            })
        }
        "if" => {
            let key = frame.args.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                return Err(TemplateError::MalformedSyntax {
                    message: format!("Invalid if syntax: expected a single key in 'if {}'", key),
                    line: frame.line,
                });
            }
            let (then, otherwise) = match frame.then {
                Some(then) => (then, frame.nodes),
                None => (frame.nodes, Vec::new()),
            };
            Ok(Node::If {
                key: key.to_string(),
                then,
                otherwise,
                line: frame.line,
            })
        }
        other => Err(TemplateError::MalformedSyntax {
            message: format!("Unknown block keyword '{}'", other),
            line: frame.line,
        }),
    }
}

/// `items |item|` → (`items`, `item`)
fn parse_each_args(args: &str, line: usize) -> Result<(String, String), TemplateError> {
    let malformed = |reason: &str| TemplateError::MalformedSyntax {
        message: format!("Invalid each syntax: {} in 'each {}'", reason, args),
        line,
    };

    let (key, rest) = args.split_once('|').ok_or_else(|| malformed("expected |var|"))?;
    let (var, trailing) = rest
        .split_once('|')
        .ok_or_else(|| malformed("unclosed |var|"))?;

    let key = key.trim();
    let var = var.trim();
    if key.is_empty() || var.is_empty() || !trailing.trim().is_empty() {
        return Err(malformed("expected 'each <key> |<var>|'"));
    }
    Ok((key.to_string(), var.to_string()))
}

/// If the tag is the only thing on its line, return the text end before it
/// (start of the line) and the cursor after it (past the newline)
fn standalone_span(template: &str, token: &Token, cursor: usize) -> Option<(usize, usize)> {
    let line_start = template[..token.start]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    if line_start < cursor || token.backslash_count > 0 {
        return None;
    }
    if !template[line_start..token.start]
        .chars()
        .all(|c| c == ' ' || c == '\t')
    {
        return None;
    }

    let after = &template[token.end()..];
    let line_end = after.find('\n');
    let rest_of_line = &after[..line_end.unwrap_or(after.len())];
    if !rest_of_line.trim_end_matches('\r').chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }

    // a tag on the last line without a newline stays inline
    let newline = line_end?;
    Some((line_start, token.end() + newline + 1))
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}
