use std::fmt;

/// Kinds of tokens produced by the [`Lexer`](super::Lexer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `@` directly followed by a name character (or `?` and a name character)
    At,
    /// `#` directly followed by a name character
    Hash,
    /// `~` directly followed by a name character or `{`
    Tilde,
    /// `=` anywhere but the start of a line
    Equal,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Percent,
    Question,
    Dash,
    /// Run of letters and underscores
    Ident,
    /// Run of ASCII digits
    Int,
    Newline,
    /// Run of spaces and tabs
    Whitespace,
    /// `-- text`, literal is the trimmed text
    Comment,
    /// `[- text -]`, literal is the trimmed text
    BlockComment,
    /// `= name` or `=== name ===`, literal is the name
    Section,
    /// One or more consecutive `> text` lines joined by a space
    Note,
    /// `>> key: value`, literal is everything after `>>`
    Metadata,
    /// Raw text between the `---` delimiters at the start of the document
    FrontMatter,
    Eof,
    /// Any character without a syntactic role, rendered as plain text
    Illegal,
}

/// A lexed token with the line and column it starts at (both 1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Tokens that may appear inside an ingredient or cookware name
    pub fn is_name_part(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Ident | TokenKind::Int | TokenKind::Dash | TokenKind::Whitespace
        )
    }

    pub fn is_alphanumeric(&self) -> bool {
        matches!(self.kind, TokenKind::Ident | TokenKind::Int)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) at {}:{}", self.kind, self.literal, self.line, self.column)
    }
}
