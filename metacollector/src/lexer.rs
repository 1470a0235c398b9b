//! Character scanner and the token-stream API the extractor consumes.
//!
//! The scanner understands just enough of header-like source to keep brace
//! tracking honest: comments, preprocessor lines, and string/char literals
//! never leak structural tokens. Commas are argument separators and are
//! dropped entirely.

use crate::errors::ScanError;
use crate::token::{Token, TokenKind};

/// On-demand token stream over one input file.
///
/// Tokens are produced one at a time; the stream retains only the current
/// token and a single pending lookahead slot.
pub struct TokenStream<'a> {
    file: &'a str,
    src: &'a str,
    pos: usize,
    line: usize,
    pending: Option<Token>,
    current: Option<Token>,
}

impl<'a> TokenStream<'a> {
    pub fn new(file: &'a str, src: &'a str) -> Self {
        Self {
            file,
            src,
            pos: 0,
            line: 1,
            pending: None,
            current: None,
        }
    }

    /// Consumes and returns the next token, or `None` at end of input.
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.pending.take().or_else(|| self.scan_token());
        self.current = token.clone();
        token
    }

    /// Consumes the next token only when it matches `kind`.
    pub fn advance_if(&mut self, kind: TokenKind) -> bool {
        if self.pending.is_none() {
            self.pending = self.scan_token();
        }
        let matches = self.pending.as_ref().is_some_and(|token| token.kind == kind);
        if matches {
            self.advance();
        }
        matches
    }

    /// Consumes the next token, failing unless it matches `kind`.
    pub fn require(&mut self, kind: TokenKind) -> Result<Token, ScanError> {
        let Some(token) = self.advance() else {
            return Err(ScanError::UnexpectedEnd {
                file: self.file.to_string(),
                expected: kind.describe(),
            });
        };

        if token.kind != kind {
            return Err(ScanError::UnexpectedToken {
                file: self.file.to_string(),
                line: token.line,
                expected: kind.describe(),
                found: token.text,
            });
        }

        Ok(token)
    }

    /// Consumes the next token of any kind, failing at end of input.
    pub fn require_any(&mut self) -> Result<Token, ScanError> {
        self.advance().ok_or_else(|| ScanError::UnexpectedEnd {
            file: self.file.to_string(),
            expected: "any token",
        })
    }

    /// The most recently consumed token.
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Kind of the most recently consumed token.
    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current.as_ref().map(|token| token.kind)
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn scan_token(&mut self) -> Option<Token> {
        self.skip_insignificant();

        let ch = self.rest().chars().next()?;
        let line = self.line;

        let structural = match ch {
            '{' => Some(TokenKind::BraceStart),
            '}' => Some(TokenKind::BraceEnd),
            '(' => Some(TokenKind::ParenStart),
            ')' => Some(TokenKind::ParenEnd),
            ';' => Some(TokenKind::Semicolon),
            _ => None,
        };

        if let Some(kind) = structural {
            self.pos += 1;
            return Some(Token::new(kind, ch, line));
        }

        if ch == '"' || ch == '\'' {
            return Some(self.scan_literal(ch, line));
        }

        if is_word(ch) {
            return Some(self.scan_run(is_word, line));
        }

        // Keep `::` as one token so scoped type names stay readable.
        if ch == ':' {
            return Some(self.scan_run(|c| c == ':', line));
        }

        self.pos += ch.len_utf8();
        Some(Token::new(TokenKind::Symbol, ch, line))
    }

    fn skip_insignificant(&mut self) {
        loop {
            let rest = self.rest();
            let Some(ch) = rest.chars().next() else { return };

            if ch == '\n' {
                self.line += 1;
                self.pos += 1;
            } else if ch.is_whitespace() || ch == ',' {
                self.pos += ch.len_utf8();
            } else if rest.starts_with("//") {
                self.skip_line_comment();
            } else if rest.starts_with("/*") {
                self.skip_block_comment();
            } else if ch == '#' {
                self.skip_preprocessor_line();
            } else {
                return;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            if bytes[self.pos] == b'*' && bytes.get(self.pos + 1) == Some(&b'/') {
                self.pos += 2;
                return;
            }
            if bytes[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    /// Skips a `#...` directive through any backslash-continued lines. The
    /// terminating newline is left for [`Self::skip_insignificant`].
    fn skip_preprocessor_line(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            if bytes[self.pos] == b'\n' {
                if self.pos > 0 && bytes[self.pos - 1] == b'\\' {
                    self.line += 1;
                    self.pos += 1;
                    continue;
                }
                return;
            }
            self.pos += 1;
        }
    }

    /// Consumes a quoted literal as one opaque symbol, escapes honored.
    fn scan_literal(&mut self, quote: char, line: usize) -> Token {
        let start = self.pos;
        self.pos += 1;
        let mut escaped = false;

        while let Some(ch) = self.rest().chars().next() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
            }
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                break;
            }
        }

        Token::new(TokenKind::Symbol, &self.src[start..self.pos], line)
    }

    fn scan_run(&mut self, accept: fn(char) -> bool, line: usize) -> Token {
        let start = self.pos;
        while let Some(ch) = self.rest().chars().next() {
            if !accept(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        Token::new(TokenKind::Symbol, &self.src[start..self.pos], line)
    }
}

fn is_word(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
