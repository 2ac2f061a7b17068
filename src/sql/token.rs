//! Token model for the procedural SQL dialect.
//!
//! A [`Token`] is a classified, positioned slice of source text. The set of
//! categories is closed: every character of the input lands in exactly one
//! token, whitespace included, so the raw texts of a token stream always
//! concatenate back to the original source.

use std::fmt;

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // -----------------------------------------------------------------------
    // Keywords
    // -----------------------------------------------------------------------
    Print,
    Procedure,
    In,
    Out,
    Integer,
    Char,
    Create,
    Or,
    Replace,
    Is,
    Begin,
    End,
    Execute,
    Immediate,

    // -----------------------------------------------------------------------
    // Punctuation
    // -----------------------------------------------------------------------
    LeftParen,
    RightParen,
    Equal,
    Colon,
    Comma,
    Semicolon,

    // -----------------------------------------------------------------------
    // Quoting
    // -----------------------------------------------------------------------
    /// A lone `"`.
    Quote,
    /// `""`, the empty double-quoted string.
    DuoQuote,
    /// A lone `'`.
    SingleQuote,
    /// `''`, the empty single-quoted string.
    DuoSingleQuote,

    // -----------------------------------------------------------------------
    // Special
    // -----------------------------------------------------------------------
    /// The `$` sigil in front of a variable name.
    VarPrefix,
    /// An identifier that is not a keyword.
    Name,
    /// A maximal run of whitespace and line breaks.
    Ignored,
    /// End-of-input sentinel.
    Eof,
}

impl TokenKind {
    /// Parameter type keywords.
    pub fn is_type(self) -> bool {
        matches!(self, TokenKind::Integer | TokenKind::Char)
    }

    /// Parameter direction keywords.
    pub fn is_direction(self) -> bool {
        matches!(self, TokenKind::In | TokenKind::Out)
    }

    pub fn is_keyword(self) -> bool {
        keyword_spelling(self).is_some()
    }
}

/// Map an uppercased word to its keyword category.
pub(crate) fn keyword_kind(word: &str) -> Option<TokenKind> {
    // The input `word` is already uppercased by the caller.
    match word {
        "PRINT" => Some(TokenKind::Print),
        "PROCEDURE" => Some(TokenKind::Procedure),
        "IN" => Some(TokenKind::In),
        "OUT" => Some(TokenKind::Out),
        "INTEGER" => Some(TokenKind::Integer),
        "CHAR" => Some(TokenKind::Char),
        "CREATE" => Some(TokenKind::Create),
        "OR" => Some(TokenKind::Or),
        "REPLACE" => Some(TokenKind::Replace),
        "IS" => Some(TokenKind::Is),
        "BEGIN" => Some(TokenKind::Begin),
        "END" => Some(TokenKind::End),
        "EXECUTE" => Some(TokenKind::Execute),
        "IMMEDIATE" => Some(TokenKind::Immediate),
        _ => None,
    }
}

fn keyword_spelling(kind: TokenKind) -> Option<&'static str> {
    let word = match kind {
        TokenKind::Print => "PRINT",
        TokenKind::Procedure => "PROCEDURE",
        TokenKind::In => "IN",
        TokenKind::Out => "OUT",
        TokenKind::Integer => "INTEGER",
        TokenKind::Char => "CHAR",
        TokenKind::Create => "CREATE",
        TokenKind::Or => "OR",
        TokenKind::Replace => "REPLACE",
        TokenKind::Is => "IS",
        TokenKind::Begin => "BEGIN",
        TokenKind::End => "END",
        TokenKind::Execute => "EXECUTE",
        TokenKind::Immediate => "IMMEDIATE",
        _ => return None,
    };
    Some(word)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self {
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Equal => "'='",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Quote => "'\"'",
            TokenKind::DuoQuote => "'\"\"'",
            TokenKind::SingleQuote => "\"'\"",
            TokenKind::DuoSingleQuote => "\"''\"",
            TokenKind::VarPrefix => "'$'",
            TokenKind::Name => "identifier",
            TokenKind::Ignored => "whitespace",
            TokenKind::Eof => "end of input",
            keyword => {
                let word = keyword_spelling(*keyword).unwrap_or_default();
                return write!(f, "keyword {word}");
            }
        };
        f.write_str(desc)
    }
}

/// A single token together with the line it starts on and its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub line: usize,
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(line: usize, kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            line,
            kind,
            text: text.into(),
        }
    }

    /// Human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Name => format!("identifier `{}`", self.text),
            kind if kind.is_keyword() => format!("keyword `{}`", self.text),
            kind => kind.to_string(),
        }
    }
}
