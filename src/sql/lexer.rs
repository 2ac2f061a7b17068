//! Hand-written tokenizer for the procedural SQL dialect.
//!
//! The [`Lexer`] is demand driven: the parser pulls tokens one at a time
//! with [`Lexer::next_token`] and may look one token ahead with
//! [`Lexer::peek`]. Whitespace is not discarded; it comes back as
//! [`TokenKind::Ignored`] tokens so that line numbers stay exact and the
//! token texts reproduce the input verbatim.

use tracing::trace;

use crate::error::{ProcError, Result};
use crate::sql::token::{keyword_kind, Token, TokenKind};

/// A hand-written tokenizer with a single token of lookahead.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    /// At most one token fetched by `peek` but not yet consumed.
    lookahead: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given source text. Lines are 1-based.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            lookahead: None,
        }
    }

    /// The line the scanning cursor is currently on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Tokenize the rest of the input and return the token list.
    ///
    /// The returned vector always ends with [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        match self.lookahead.take() {
            Some(tok) => Ok(tok),
            None => self.scan_token(),
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token> {
        let tok = match self.lookahead.take() {
            Some(tok) => tok,
            None => self.scan_token()?,
        };
        let pending: &Token = self.lookahead.insert(tok);
        Ok(pending)
    }

    /// The category of the next token, without consuming it.
    pub fn peek_kind(&mut self) -> Result<TokenKind> {
        Ok(self.peek()?.kind)
    }

    /// Consume the next token, failing unless it has the given category.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let tok = self.next_token()?;
        if tok.kind != kind {
            return Err(ProcError::lex(
                tok.line,
                format!("expected {kind}, found {}", tok.describe()),
            ));
        }
        Ok(tok)
    }

    /// `true` once the input is exhausted and no real token is pending.
    pub fn is_finished(&self) -> bool {
        match &self.lookahead {
            Some(tok) => tok.kind == TokenKind::Eof,
            None => self.pos >= self.input.len(),
        }
    }

    /// Consume and return the raw text up to, but not including, the next
    /// `delimiter`. The delimiter itself is left for the next token.
    ///
    /// This bypasses tokenization, so it must not be called while a
    /// lookahead token is pending.
    pub fn scan_until(&mut self, delimiter: char) -> Result<String> {
        if let Some(pending) = &self.lookahead {
            return Err(ProcError::Internal(format!(
                "scan_until({delimiter:?}) called with {} pending on line {}",
                pending.describe(),
                pending.line
            )));
        }
        let rest = &self.input[self.pos..];
        let end = rest
            .find(delimiter)
            .ok_or_else(|| ProcError::lex(self.line, format!("missing delimiter {delimiter:?}")))?;
        let text = &rest[..end];
        self.pos += end;
        self.line += count_line_breaks(text);
        trace!(line = self.line, len = text.len(), "scanned up to {delimiter:?}");
        Ok(text.to_string())
    }

    // -- helpers ------------------------------------------------------------

    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Cut `len` bytes off the front of the remaining input as one token.
    fn take(&mut self, len: usize, kind: TokenKind) -> Token {
        let text = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Token::new(self.line, kind, text)
    }

    // -- main scanner -------------------------------------------------------

    fn scan_token(&mut self) -> Result<Token> {
        let ch = match self.peek_byte() {
            Some(c) => c,
            None => return Ok(Token::new(self.line, TokenKind::Eof, "")),
        };

        let token = match ch {
            b'$' => self.take(1, TokenKind::VarPrefix),
            b'(' => self.take(1, TokenKind::LeftParen),
            b')' => self.take(1, TokenKind::RightParen),
            b'=' => self.take(1, TokenKind::Equal),
            b',' => self.take(1, TokenKind::Comma),
            b':' => self.take(1, TokenKind::Colon),
            b';' => self.take(1, TokenKind::Semicolon),
            b'"' => self.read_quote(b'"', TokenKind::Quote, TokenKind::DuoQuote),
            b'\'' => self.read_quote(b'\'', TokenKind::SingleQuote, TokenKind::DuoSingleQuote),
            c if c.is_ascii_alphabetic() || c == b'_' => self.read_identifier_or_keyword(),
            c if is_ignored(c) => self.read_ignored(),
            _ => return Err(self.unexpected_symbol()),
        };

        trace!(line = token.line, kind = ?token.kind, text = ?token.text, "token");
        Ok(token)
    }

    fn read_quote(&mut self, quote: u8, single: TokenKind, double: TokenKind) -> Token {
        if self.peek_byte_at(1) == Some(quote) {
            self.take(2, double)
        } else {
            self.take(1, single)
        }
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let len = self.input.as_bytes()[self.pos..]
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric() || **c == b'_')
            .count();
        let word = &self.input[self.pos..self.pos + len];
        let kind = keyword_kind(&word.to_ascii_uppercase()).unwrap_or(TokenKind::Name);
        self.take(len, kind)
    }

    fn read_ignored(&mut self) -> Token {
        let len = self.input.as_bytes()[self.pos..]
            .iter()
            .take_while(|c| is_ignored(**c))
            .count();
        // The token keeps the line it starts on; the counter moves past it.
        let token = self.take(len, TokenKind::Ignored);
        self.line += count_line_breaks(&token.text);
        token
    }

    fn unexpected_symbol(&self) -> ProcError {
        let symbol = self.input[self.pos..].chars().next().unwrap_or('\0');
        ProcError::lex(self.line, format!("unexpected symbol {symbol:?}"))
    }
}

fn is_ignored(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Count line breaks, treating `\r\n` and `\n\r` as a single break.
pub(crate) fn count_line_breaks(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut breaks = 0;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'\r', Some(b'\n')) | (b'\n', Some(b'\r')) => {
                breaks += 1;
                i += 2;
            }
            (b'\r', _) | (b'\n', _) => {
                breaks += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    breaks
}

// ===========================================================================
// Tests
// ===========================================================================
