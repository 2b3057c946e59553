//! Single-pass tokenizer for `{{ ... }}` tags

/// What a `{{ ... }}` tag means
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// `{{key}}` or `{{key | filter arg}}`
    Placeholder { expr: String },

    /// `{{each items |var|}}` or `{{if key}}`
    BlockStart { keyword: String, args: String },

    /// `{{else}}`
    Else,

    /// `{{/each}}` or `{{/if}}`
    BlockEnd { keyword: String },
}

impl TokenKind {
    /// Block tags are candidates for standalone-line trimming
    pub fn is_block_tag(&self) -> bool {
        !matches!(self, TokenKind::Placeholder { .. })
    }
}

/// A tag with its byte span in the template
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of `{{`
    pub start: usize,
    /// Length including both brace pairs
    pub length: usize,
    /// Backslashes immediately before `{{`; odd means the tag is literal
    pub backslash_count: usize,
    /// Line on which the tag ends
    pub line: usize,
}

impl Token {
    pub fn is_escaped(&self) -> bool {
        self.backslash_count % 2 == 1
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Scanner state
///
/// ```text
/// Text --{--> OpenBrace --{--> Inside --}--> CloseBrace --}--> emit, Text
/// ```
///
/// Every byte is looked at once or twice (a rejected brace is re-read in the
/// previous state), so tokenizing is linear in the template length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ScanState {
    Text {
        backslashes: usize,
    },
    OpenBrace {
        at: usize,
        backslashes: usize,
    },
    Inside {
        start: usize,
        backslashes: usize,
        start_line: usize,
    },
    CloseBrace {
        start: usize,
        backslashes: usize,
        start_line: usize,
    },
}

/// Iterator over the tags of a template
pub(crate) struct TokenStream<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    state: ScanState,
}

impl<'a> TokenStream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            state: ScanState::Text { backslashes: 0 },
        }
    }

    /// Line of a `{{` left open at the end of input, once the stream is drained
    pub fn unterminated(&self) -> Option<usize> {
        match self.state {
            ScanState::Inside { start_line, .. } | ScanState::CloseBrace { start_line, .. } => {
                Some(start_line)
            }
            _ => None,
        }
    }

    fn classify(content: &str) -> TokenKind {
        let content = content.trim();
        if let Some(args) = content.strip_prefix("each ") {
            TokenKind::BlockStart {
                keyword: "each".to_string(),
                args: args.trim().to_string(),
            }
        } else if let Some(args) = content.strip_prefix("if ") {
            TokenKind::BlockStart {
                keyword: "if".to_string(),
                args: args.trim().to_string(),
            }
        } else if content == "else" {
            TokenKind::Else
        } else if let Some(keyword) = content.strip_prefix('/') {
            TokenKind::BlockEnd {
                keyword: keyword.trim().to_string(),
            }
        } else {
            TokenKind::Placeholder {
                expr: content.to_string(),
            }
        }
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let bytes = self.text.as_bytes();

        while self.pos < bytes.len() {
            let byte = bytes[self.pos];

            match self.state {
                ScanState::Text { backslashes } => {
                    self.state = match byte {
                        b'\\' => ScanState::Text {
                            backslashes: backslashes + 1,
                        },
                        b'{' => ScanState::OpenBrace {
                            at: self.pos,
                            backslashes,
                        },
                        _ => ScanState::Text { backslashes: 0 },
                    };
                }
                ScanState::OpenBrace { at, backslashes } => {
                    if byte != b'{' {
                        // lone brace: re-read this byte as text
                        self.state = ScanState::Text { backslashes: 0 };
                        continue;
                    }
                    self.state = ScanState::Inside {
                        start: at,
                        backslashes,
                        start_line: self.line,
                    };
                }
                ScanState::Inside {
                    start,
                    backslashes,
                    start_line,
                } => {
                    if byte == b'}' {
                        self.state = ScanState::CloseBrace {
                            start,
                            backslashes,
                            start_line,
                        };
                    }
                }
                ScanState::CloseBrace {
                    start,
                    backslashes,
                    start_line,
                } => {
                    if byte != b'}' {
                        self.state = ScanState::Inside {
                            start,
                            backslashes,
                            start_line,
                        };
                        continue;
                    }
                    // content sits between `{{` and the first `}` of `}}`
                    let content = &self.text[start + 2..self.pos - 1];
                    let token = Token {
                        kind: Self::classify(content),
                        start,
                        length: self.pos + 1 - start,
                        backslash_count: backslashes,
                        line: self.line,
                    };
                    self.pos += 1;
                    self.state = ScanState::Text { backslashes: 0 };
                    return Some(token);
                }
            }

            if byte == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }

        None
    }
}
