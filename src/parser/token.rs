//! Token kinds produced by the lexer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Str,
    Variable,
    Assignment,
    Pipe,
    Semicolon,
    RedirectIn,
    RedirectOut,
    RedirectAppend,
    LParen,
    RParen,
    Newline,
    Eof,
}

impl TokenKind {
    /// Human-readable label used in syntax error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Word => "word",
            TokenKind::Str => "string",
            TokenKind::Variable => "variable",
            TokenKind::Assignment => "assignment",
            TokenKind::Pipe => "'|'",
            TokenKind::Semicolon => "';'",
            TokenKind::RedirectIn => "'<'",
            TokenKind::RedirectOut => "'>'",
            TokenKind::RedirectAppend => "'>>'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A single lexical token. `text` holds the decoded lexeme: for `Word`/`Str`
/// it's the literal text after escape processing, for `Variable` it's the
/// bare name (no `$`/braces), for `Assignment` it's the raw `NAME=VALUE`
/// source text split on the first `=` by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: usize, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            pos,
            line,
            column,
        }
    }
}
