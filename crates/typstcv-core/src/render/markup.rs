//! Safe embedding of user text into Typst and Markdown
//!
//! User text may carry a small inline markup subset:
//!
//! | Syntax          | Meaning         |
//! |-----------------|-----------------|
//! | `**text**`      | strong          |
//! | `*text*`, `_text_` | emphasis     |
//! | `` `code` ``    | inline code     |
//! | `[label](url)`  | link            |
//! | `\*` etc.       | literal char    |
//!
//! Conversion always parses first and escapes second: the parser turns the
//! recognized syntax into [`Inline`] nodes, and the emitter escapes every
//! remaining text run for the target. A character is therefore either markup
//! or escaped text, never both.

use crate::format::OutputFormat;
use crate::render::error::MarkupError;

/// Characters a backslash makes literal in user text
const ESCAPABLE: [char; 9] = ['\\', '*', '_', '`', '[', ']', '(', ')', '#'];

/// Characters with meaning anywhere in Typst markup
const TYPST_SPECIAL: [char; 15] = [
    '\\', '#', '*', '_', '`', '$', '<', '>', '@', '[', ']', '~', '=', '-', '+',
];

/// Characters with meaning anywhere in Markdown
const MARKDOWN_SPECIAL: [char; 12] = [
    '\\', '`', '*', '_', '[', ']', '<', '>', '#', '|', '&', '~',
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emph(Vec<Inline>),
    Code(String),
    Link { label: Vec<Inline>, url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Strong,
    EmphStar,
    EmphUnderscore,
    LinkLabel,
}

impl Delim {
    fn describe(&self) -> &'static str {
        match self {
            Delim::Strong => "'**'",
            Delim::EmphStar => "'*'",
            Delim::EmphUnderscore => "'_'",
            Delim::LinkLabel => "'['",
        }
    }
}

enum Failure {
    Unclosed { opened_at: usize, delim: Delim },
    Invalid(MarkupError),
}

impl Failure {
    fn unclosed_at(&self, expected: Delim, position: usize) -> bool {
        matches!(self, Failure::Unclosed { opened_at, delim } if *delim == expected && *opened_at == position)
    }

    fn into_error(self) -> MarkupError {
        match self {
            Failure::Unclosed { opened_at, delim } => MarkupError {
                message: format!("unclosed {}", delim.describe()),
                position: opened_at + 1,
            },
            Failure::Invalid(err) => err,
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

/// Parse user text into inline nodes
pub fn parse_inline(text: &str) -> Result<Vec<Inline>, MarkupError> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
    };
    parser.parse(None).map_err(Failure::into_error)
}

fn push_text(nodes: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    match nodes.last_mut() {
        Some(Inline::Text(last)) => last.push_str(text),
        _ => nodes.push(Inline::Text(text.to_string())),
    }
}

impl Parser {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn prev(&self) -> Option<char> {
        self.pos.checked_sub(1).and_then(|i| self.chars.get(i).copied())
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek(i) == Some(c))
    }

    fn is_space(c: Option<char>) -> bool {
        c.is_none_or(char::is_whitespace)
    }

    fn is_punctuation(c: Option<char>) -> bool {
        c.is_some_and(|c| c.is_ascii_punctuation())
    }

    /// Parse until `closer` (consumed) or the end of input
    fn parse(&mut self, closer: Option<(Delim, usize)>) -> Result<Vec<Inline>, Failure> {
        let mut nodes = Vec::new();

        while let Some(c) = self.peek(0) {
            if let Some((delim, _)) = closer {
                if self.closes(delim) {
                    return Ok(nodes);
                }
            }

            match c {
                '\\' => match self.peek(1) {
                    Some(next) if ESCAPABLE.contains(&next) => {
                        push_text(&mut nodes, &next.to_string());
                        self.pos += 2;
                    }
                    _ => {
                        push_text(&mut nodes, "\\");
                        self.pos += 1;
                    }
                },
                '`' => nodes.push(self.code_span()?),
                '*' if self.starts_with("**") && !Self::is_space(self.peek(2)) => {
                    let opened_at = self.pos;
                    let lenient = Self::is_punctuation(self.peek(2));
                    self.pos += 2;
                    match self.parse(Some((Delim::Strong, opened_at))) {
                        Ok(children) => nodes.push(Inline::Strong(children)),
                        Err(failure) if lenient && failure.unclosed_at(Delim::Strong, opened_at) => {
                            self.pos = opened_at + 2;
                            push_text(&mut nodes, "**");
                        }
                        Err(other) => return Err(other),
                    }
                }
                '*' if !Self::is_space(self.peek(1)) => {
                    let opened_at = self.pos;
                    // `/* comment */` and friends stay literal when never closed
                    let lenient = Self::is_punctuation(self.peek(1));
                    self.pos += 1;
                    match self.parse(Some((Delim::EmphStar, opened_at))) {
                        Ok(children) => nodes.push(Inline::Emph(children)),
                        Err(failure) if lenient && failure.unclosed_at(Delim::EmphStar, opened_at) => {
                            self.pos = opened_at + 1;
                            push_text(&mut nodes, "*");
                        }
                        Err(other) => return Err(other),
                    }
                }
                '_' if !self.prev().is_some_and(char::is_alphanumeric)
                    && !Self::is_space(self.peek(1)) =>
                {
                    let opened_at = self.pos;
                    self.pos += 1;
                    match self.parse(Some((Delim::EmphUnderscore, opened_at))) {
                        Ok(children) => nodes.push(Inline::Emph(children)),
                        // `_private` and friends stay literal
                        Err(failure) if failure.unclosed_at(Delim::EmphUnderscore, opened_at) => {
                            self.pos = opened_at + 1;
                            push_text(&mut nodes, "_");
                        }
                        Err(other) => return Err(other),
                    }
                }
                '[' => {
                    let opened_at = self.pos;
                    match self.link(opened_at)? {
                        Some(link) => nodes.push(link),
                        None => {
                            self.pos = opened_at + 1;
                            push_text(&mut nodes, "[");
                        }
                    }
                }
                other => {
                    push_text(&mut nodes, &other.to_string());
                    self.pos += 1;
                }
            }
        }

        match closer {
            Some((delim, opened_at)) => Err(Failure::Unclosed { opened_at, delim }),
            None => Ok(nodes),
        }
    }

    /// Consume the closing delimiter when the cursor is on one
    fn closes(&mut self, delim: Delim) -> bool {
        let after_text = !Self::is_space(self.prev());
        let len = match delim {
            Delim::Strong if after_text && self.starts_with("**") => 2,
            Delim::EmphStar if after_text && self.starts_with("*") => 1,
            Delim::EmphUnderscore
                if after_text
                    && self.starts_with("_")
                    && !self.peek(1).is_some_and(char::is_alphanumeric) =>
            {
                1
            }
            Delim::LinkLabel if self.starts_with("]") => 1,
            _ => return false,
        };
        self.pos += len;
        true
    }

    fn code_span(&mut self) -> Result<Inline, Failure> {
        let opened_at = self.pos;
        let fence = self.chars[self.pos..]
            .iter()
            .take_while(|c| **c == '`')
            .count();
        let start = self.pos + fence;

        let mut i = start;
        while i < self.chars.len() {
            if self.chars[i] == '`' {
                let run = self.chars[i..].iter().take_while(|c| **c == '`').count();
                if run == fence {
                    let mut code: String = self.chars[start..i].iter().collect();
                    if code.len() >= 2 && code.starts_with(' ') && code.ends_with(' ') {
                        code = code[1..code.len() - 1].to_string();
                    }
                    self.pos = i + run;
                    return Ok(Inline::Code(code));
                }
                i += run;
            } else {
                i += 1;
            }
        }

        Err(Failure::Invalid(MarkupError {
            message: "unclosed code span".to_string(),
            position: opened_at + 1,
        }))
    }

    /// `[label](url)`; `None` when the brackets are not a link
    fn link(&mut self, opened_at: usize) -> Result<Option<Inline>, Failure> {
        self.pos += 1;
        let label = match self.parse(Some((Delim::LinkLabel, opened_at))) {
            Ok(label) => label,
            Err(Failure::Unclosed {
                opened_at: at,
                delim: Delim::LinkLabel,
            }) if at == opened_at => return Ok(None),
            Err(other) => return Err(other),
        };
        if self.peek(0) != Some('(') {
            return Ok(None);
        }

        let target_at = self.pos;
        let Some(len) = self.chars[target_at + 1..].iter().position(|c| *c == ')') else {
            return Err(Failure::Invalid(MarkupError {
                message: "unclosed link target".to_string(),
                position: target_at + 1,
            }));
        };
        let url: String = self.chars[target_at + 1..target_at + 1 + len]
            .iter()
            .collect::<String>()
            .trim()
            .to_string();
        if url.is_empty() {
            return Err(Failure::Invalid(MarkupError {
                message: "empty link target".to_string(),
                position: target_at + 1,
            }));
        }
        self.pos = target_at + len + 2;
        Ok(Some(Inline::Link { label, url }))
    }
}

/// Wrap every whole-word occurrence of a keyword in strong emphasis
///
/// Applies to text runs only; code spans, link targets and existing strong
/// runs are left alone.
pub fn bold_keywords(nodes: Vec<Inline>, keywords: &[String]) -> Vec<Inline> {
    if keywords.iter().all(|k| k.is_empty()) {
        return nodes;
    }
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(text) => split_keywords(&text, keywords, &mut out),
            Inline::Emph(children) => out.push(Inline::Emph(bold_keywords(children, keywords))),
            Inline::Link { label, url } => out.push(Inline::Link {
                label: bold_keywords(label, keywords),
                url,
            }),
            other => out.push(other),
        }
    }
    out
}

fn split_keywords(text: &str, keywords: &[String], out: &mut Vec<Inline>) {
    let mut rest = text;
    while !rest.is_empty() {
        let found = keywords
            .iter()
            .filter(|k| !k.is_empty())
            .filter_map(|k| find_word(rest, k).map(|at| (at, k.len())))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        let Some((at, len)) = found else {
            push_text(out, rest);
            return;
        };
        push_text(out, &rest[..at]);
        out.push(Inline::Strong(vec![Inline::Text(rest[at..at + len].to_string())]));
        rest = &rest[at + len..];
    }
}

/// Byte offset of the first occurrence of `word` not inside a longer word
fn find_word(haystack: &str, word: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(word) {
        let at = from + offset;
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + word.len()..].chars().next();
        if !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric) {
            return Some(at);
        }
        from = at + word.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Escape a text run for Typst markup
pub fn escape_typst(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut line_start = true;
    let mut leading_digits = false;
    for c in text.chars() {
        let enumerates = c == '.' && leading_digits;
        // `//` starts a comment; `/ Term:` a term list
        let slash = c == '/' && (line_start || out.ends_with('/'));
        if TYPST_SPECIAL.contains(&c) || enumerates || slash {
            out.push('\\');
        }
        out.push(c);
        leading_digits = c.is_ascii_digit() && (line_start || leading_digits);
        line_start = c == '\n' || (line_start && c.is_whitespace());
    }
    out
}

/// Escape text for the inside of a Typst string literal
pub fn escape_typst_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Escape a text run for Markdown
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut line_start = true;
    let mut leading_digits = false;
    for c in text.chars() {
        let list_marker = line_start && (c == '-' || c == '+');
        let enumerates = (c == '.' || c == ')') && leading_digits;
        if MARKDOWN_SPECIAL.contains(&c) || list_marker || enumerates {
            out.push('\\');
        }
        out.push(c);
        leading_digits = c.is_ascii_digit() && (line_start || leading_digits);
        line_start = c == '\n' || (line_start && c.is_whitespace());
    }
    out
}

/// Percent-encode the characters that end or break a Markdown link target
pub fn markdown_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            other => out.push(other),
        }
    }
    out
}

/// Render nodes as Typst markup
pub fn to_typst(nodes: &[Inline]) -> String {
    let mut out = String::new();
    let mut after_call = false;
    for node in nodes {
        match node {
            Inline::Text(text) => {
                let escaped = escape_typst(text);
                // A following `.` or `(` would continue the call expression
                if after_call && (escaped.starts_with('.') || escaped.starts_with('(')) {
                    out.push('\\');
                }
                out.push_str(&escaped);
                after_call = false;
                continue;
            }
            Inline::Strong(children) => {
                out.push_str("#strong[");
                out.push_str(&to_typst(children));
                out.push(']');
            }
            Inline::Emph(children) => {
                out.push_str("#emph[");
                out.push_str(&to_typst(children));
                out.push(']');
            }
            Inline::Code(code) => {
                out.push_str("#raw(\"");
                out.push_str(&escape_typst_string(code));
                out.push_str("\")");
            }
            Inline::Link { label, url } => {
                out.push_str("#link(\"");
                out.push_str(&escape_typst_string(url));
                out.push_str("\")[");
                out.push_str(&to_typst(label));
                out.push(']');
            }
        }
        after_call = true;
    }
    out
}

/// Render nodes as Markdown
pub fn to_markdown(nodes: &[Inline]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(&escape_markdown(text)),
            Inline::Strong(children) => {
                out.push_str("**");
                out.push_str(&to_markdown(children));
                out.push_str("**");
            }
            Inline::Emph(children) => {
                out.push('*');
                out.push_str(&to_markdown(children));
                out.push('*');
            }
            Inline::Code(code) => {
                let longest_run = code
                    .split(|c| c != '`')
                    .map(str::len)
                    .max()
                    .unwrap_or(0);
                let fence = "`".repeat(longest_run + 1);
                let pad = if code.starts_with('`') || code.ends_with('`') {
                    " "
                } else {
                    ""
                };
                out.push_str(&format!("{fence}{pad}{code}{pad}{fence}"));
            }
            Inline::Link { label, url } => {
                out.push('[');
                out.push_str(&to_markdown(label));
                out.push_str("](");
                out.push_str(&markdown_url(url));
                out.push(')');
            }
        }
    }
    out
}

/// Converts user and model strings for one output format
#[derive(Debug, Clone)]
pub struct TextConverter {
    format: OutputFormat,
    keywords: Vec<String>,
}

impl TextConverter {
    pub fn new(format: OutputFormat, bold_keywords: &[String]) -> Self {
        Self {
            format,
            keywords: bold_keywords.to_vec(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Free user text: inline markup translated, everything else escaped
    pub fn markup(&self, text: &str) -> Result<String, MarkupError> {
        let nodes = bold_keywords(parse_inline(text)?, &self.keywords);
        Ok(match self.format {
            OutputFormat::Typst => to_typst(&nodes),
            OutputFormat::Markdown => to_markdown(&nodes),
        })
    }

    /// Text produced by the data model (formatted dates, link labels)
    pub fn plain(&self, text: &str) -> String {
        match self.format {
            OutputFormat::Typst => escape_typst(text),
            OutputFormat::Markdown => escape_markdown(text),
        }
    }

    /// Value placed inside a string literal of the target (`"..."`)
    pub fn literal(&self, text: &str) -> String {
        match self.format {
            OutputFormat::Typst => escape_typst_string(text),
            OutputFormat::Markdown => escape_markdown(text),
        }
    }

    /// Link target
    pub fn href(&self, url: &str) -> String {
        match self.format {
            OutputFormat::Typst => escape_typst_string(url),
            OutputFormat::Markdown => markdown_url(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_parse_recognized_markup() {
        let nodes = parse_inline("Built **fast** and *safe* `code` [site](https://x.org)").unwrap();
        assert_eq!(
            nodes,
            vec![
                text("Built "),
                Inline::Strong(vec![text("fast")]),
                text(" and "),
                Inline::Emph(vec![text("safe")]),
                text(" "),
                Inline::Code("code".to_string()),
                text(" "),
                Inline::Link {
                    label: vec![text("site")],
                    url: "https://x.org".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_lone_delimiters_are_text() {
        assert_eq!(parse_inline("5 * 3 = 15").unwrap(), vec![text("5 * 3 = 15")]);
        assert_eq!(parse_inline("snake_case_name").unwrap(), vec![text("snake_case_name")]);
        assert_eq!(parse_inline("_private").unwrap(), vec![text("_private")]);
        assert_eq!(parse_inline("[draft] notes").unwrap(), vec![text("[draft] notes")]);
    }

    #[test]
    fn test_unclosed_star_before_punctuation_is_text() {
        assert_eq!(parse_inline("a /* b */ c").unwrap(), vec![text("a /* b */ c")]);
        assert_eq!(parse_inline("glob **/*.rs").unwrap(), vec![text("glob **/*.rs")]);
        assert_eq!(
            parse_inline("*(really)* fast").unwrap(),
            vec![Inline::Emph(vec![text("(really)")]), text(" fast")]
        );
        assert!(parse_inline("*never closed").is_err());

        let markdown = TextConverter::new(OutputFormat::Markdown, &[]);
        assert_eq!(markdown.markup("a /* b */ c").unwrap(), r"a /\* b \*/ c");
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(parse_inline(r"\*not bold\*").unwrap(), vec![text("*not bold*")]);
        assert_eq!(parse_inline(r"C:\path").unwrap(), vec![text(r"C:\path")]);
    }

    #[test]
    fn test_malformed_markup() {
        let err = parse_inline("a **bold claim").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(err.message.contains("'**'"));
        assert!(parse_inline("use `cargo").is_err());
        assert!(parse_inline("[site](https://x.org").is_err());
        assert!(parse_inline("[site]()").is_err());
    }

    #[test]
    fn test_nested() {
        assert_eq!(
            parse_inline("***both***").unwrap(),
            vec![Inline::Strong(vec![Inline::Emph(vec![text("both")])])]
        );
    }

    #[test]
    fn test_typst_escapes_control_characters() {
        assert_eq!(escape_typst(r"a\b #1 $5 @me <x>"), r"a\\b \#1 \$5 \@me \<x\>");
        assert_eq!(escape_typst("C++ & C--"), r"C\+\+ & C\-\-");
        assert_eq!(escape_typst("1. first"), r"1\. first");
        assert_eq!(escape_typst("v1.2"), "v1.2");
        assert_eq!(escape_typst("a // b"), r"a /\/ b");
    }

    #[test]
    fn test_typst_output() {
        let converter = TextConverter::new(OutputFormat::Typst, &[]);
        assert_eq!(
            converter.markup("**Led** a team of 5 #engineers").unwrap(),
            r"#strong[Led] a team of 5 \#engineers"
        );
        assert_eq!(
            converter.markup("see [docs](https://x.org/\"q\")").unwrap(),
            r#"see #link("https://x.org/\"q\"")[docs]"#
        );
        assert_eq!(converter.markup("`a\"b`").unwrap(), r#"#raw("a\"b")"#);
    }

    #[test]
    fn test_typst_call_is_not_continued_by_text() {
        let converter = TextConverter::new(OutputFormat::Typst, &[]);
        assert_eq!(converter.markup("**a**.b").unwrap(), r"#strong[a]\.b");
        assert_eq!(converter.markup("**a** (b)").unwrap(), "#strong[a] (b)");
    }

    #[test]
    fn test_markdown_output() {
        let converter = TextConverter::new(OutputFormat::Markdown, &[]);
        assert_eq!(
            converter.markup("**Led** a [team](https://x.org/a b) of 5_000").unwrap(),
            r"**Led** a [team](https://x.org/a%20b) of 5\_000"
        );
        assert_eq!(converter.markup("- not a list").unwrap(), r"\- not a list");
        assert_eq!(converter.markup("1) first").unwrap(), r"1\) first");
        assert_eq!(converter.markup("2. second").unwrap(), r"2\. second");
        assert_eq!(converter.markup("see (1) and f(x)").unwrap(), "see (1) and f(x)");
        assert_eq!(
            converter.markup("~~x~~ and &copy;").unwrap(),
            r"\~\~x\~\~ and \&copy;"
        );
        assert_eq!(converter.markup("``a`b``").unwrap(), "``a`b``");
    }

    #[test]
    fn test_bold_keywords() {
        let keywords = vec!["Rust".to_string(), "C++".to_string()];
        let nodes = bold_keywords(
            parse_inline("Rust and C++, not Rusty or `Rust`").unwrap(),
            &keywords,
        );
        assert_eq!(
            nodes,
            vec![
                Inline::Strong(vec![text("Rust")]),
                text(" and "),
                Inline::Strong(vec![text("C++")]),
                text(", not Rusty or "),
                Inline::Code("Rust".to_string()),
            ]
        );
    }

    #[test]
    fn test_bold_keywords_skip_link_targets() {
        let keywords = vec!["rust".to_string()];
        let nodes = bold_keywords(
            parse_inline("[rust](https://rust-lang.org)").unwrap(),
            &keywords,
        );
        assert_eq!(
            nodes,
            vec![Inline::Link {
                label: vec![Inline::Strong(vec![text("rust")])],
                url: "https://rust-lang.org".to_string()
            }]
        );
    }

    #[test]
    fn test_plain_and_literal() {
        let typst = TextConverter::new(OutputFormat::Typst, &[]);
        assert_eq!(typst.plain("Jan 2020 – present"), "Jan 2020 – present");
        assert_eq!(typst.literal("Source \"Sans\""), r#"Source \"Sans\""#);
        let markdown = TextConverter::new(OutputFormat::Markdown, &[]);
        assert_eq!(markdown.plain("a*b"), r"a\*b");
    }
}
