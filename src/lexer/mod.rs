//! Character-level scanner turning recipe text into [`Token`]s.
//!
//! The lexer looks at most a few characters ahead. Retroactive lookahead is
//! provided by a pushback queue: the parser can hand back any number of
//! tokens and they are replayed before scanning resumes.

mod token;

pub use token::{Token, TokenKind};

use std::collections::VecDeque;

use log::trace;

use crate::error::ParseError;

const FRONT_MATTER_DELIMITER: &str = "---";

pub struct Lexer<'a> {
    input: &'a str,
    cursor: Cursor,
    pushback: VecDeque<Token>,
}

/// Position in the input, updated one character at a time
#[derive(Debug, Clone, Copy)]
struct Cursor {
    pos: usize,
    line: usize,
    column: usize,
    /// Only spaces and tabs since the last line break
    line_blank: bool,
}

impl Cursor {
    fn step(&mut self, c: char) {
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_blank = true;
        } else {
            self.column += 1;
            self.line_blank &= matches!(c, ' ' | '\t' | '\r');
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: Cursor {
                pos: 0,
                line: 1,
                column: 1,
                line_blank: true,
            },
            pushback: VecDeque::new(),
        }
    }

    /// Returns the next token, replaying pushed back tokens first
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        if let Some(token) = self.pushback.pop_front() {
            return Ok(token);
        }
        let token = self.scan()?;
        trace!("token {}", token);
        Ok(token)
    }

    /// Returns the token `next_token` would return without consuming it
    pub fn peek_token(&mut self) -> Result<Token, ParseError> {
        if let Some(token) = self.pushback.front() {
            return Ok(token.clone());
        }
        let cursor = self.cursor;
        let token = self.scan();
        self.cursor = cursor;
        token
    }

    /// Pushes a single token back; it is the next one returned
    pub fn unread(&mut self, token: Token) {
        self.pushback.push_front(token);
    }

    /// Pushes several tokens back so they replay in their original order
    pub fn unread_all(&mut self, tokens: Vec<Token>) {
        for token in tokens.into_iter().rev() {
            self.pushback.push_front(token);
        }
    }

    fn pos(&self) -> usize {
        self.cursor.pos
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos()..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos()..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor.step(c);
        Some(c)
    }

    fn advance_to(&mut self, pos: usize) {
        let input = self.input;
        for c in input[self.pos()..pos].chars() {
            self.cursor.step(c);
        }
    }

    /// Only spaces and tabs between the previous line break and the cursor
    fn at_line_start(&self) -> bool {
        self.cursor.line_blank
    }

    fn after_whitespace(&self) -> bool {
        matches!(
            self.input[..self.pos()].chars().next_back(),
            Some(' ' | '\t' | '\n' | '\r')
        )
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let start = self.pos();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
        &input[start..self.pos()]
    }

    /// Consumes to the end of the line, swallowing the line terminator
    fn rest_of_line(&mut self) -> &'a str {
        let text = self.take_while(|c| c != '\n');
        self.advance();
        text.strip_suffix('\r').unwrap_or(text)
    }

    fn scan(&mut self) -> Result<Token, ParseError> {
        let (line, column) = (self.cursor.line, self.cursor.column);
        let token = |kind, literal: &str| Ok(Token::new(kind, literal, line, column));

        let Some(c) = self.peek() else {
            return token(TokenKind::Eof, "");
        };

        match c {
            '\r' => {
                self.advance();
                self.scan()
            }
            '\n' => {
                self.advance();
                token(TokenKind::Newline, "\n")
            }
            ' ' | '\t' => {
                let run = self.take_while(|c| matches!(c, ' ' | '\t'));
                token(TokenKind::Whitespace, run)
            }
            '-' if self.pos() == 0 && self.input.starts_with(FRONT_MATTER_DELIMITER) => {
                match self.read_front_matter()? {
                    Some(raw) => token(TokenKind::FrontMatter, raw),
                    None => self.scan_dash(line, column),
                }
            }
            '-' => self.scan_dash(line, column),
            '[' if self.peek_at(1) == Some('-') => {
                self.advance_to(self.pos() + 2);
                let input = self.input;
                let rest = &input[self.pos()..];
                let (body, consumed) = match rest.find("-]") {
                    Some(end) => (&rest[..end], end + 2),
                    None => (rest, rest.len()),
                };
                self.advance_to(self.pos() + consumed);
                token(TokenKind::BlockComment, body.trim())
            }
            '>' if self.at_line_start() => {
                if self.peek_at(1) == Some('>') {
                    self.advance_to(self.pos() + 2);
                    let text = self.rest_of_line();
                    return token(TokenKind::Metadata, text.trim());
                }
                let note = self.read_note();
                token(TokenKind::Note, &note)
            }
            '=' if self.at_line_start() => {
                self.take_while(|c| c == '=');
                let text = self.rest_of_line();
                let name = text.trim().trim_end_matches('=').trim();
                token(TokenKind::Section, name)
            }
            '=' => self.single(TokenKind::Equal, line, column),
            '@' => {
                let sigil = is_name_char(self.peek_at(1))
                    || (self.peek_at(1) == Some('?') && is_name_char(self.peek_at(2)));
                let kind = if sigil { TokenKind::At } else { TokenKind::Illegal };
                self.single(kind, line, column)
            }
            '#' => {
                let kind = if is_name_char(self.peek_at(1)) {
                    TokenKind::Hash
                } else {
                    TokenKind::Illegal
                };
                self.single(kind, line, column)
            }
            '~' => {
                let next = self.peek_at(1);
                let kind = if is_name_char(next) || next == Some('{') {
                    TokenKind::Tilde
                } else {
                    TokenKind::Illegal
                };
                self.single(kind, line, column)
            }
            '{' => self.single(TokenKind::LBrace, line, column),
            '}' => self.single(TokenKind::RBrace, line, column),
            '(' => self.single(TokenKind::LParen, line, column),
            ')' => self.single(TokenKind::RParen, line, column),
            '%' => self.single(TokenKind::Percent, line, column),
            '?' => self.single(TokenKind::Question, line, column),
            c if c.is_ascii_digit() => {
                let digits = self.take_while(|c| c.is_ascii_digit());
                token(TokenKind::Int, digits)
            }
            c if is_ident_char(c) => {
                let ident = self.take_while(is_ident_char);
                token(TokenKind::Ident, ident)
            }
            _ => self.single(TokenKind::Illegal, line, column),
        }
    }

    fn single(&mut self, kind: TokenKind, line: usize, column: usize) -> Result<Token, ParseError> {
        let start = self.pos();
        self.advance();
        Ok(Token::new(kind, &self.input[start..self.pos()], line, column))
    }

    fn scan_dash(&mut self, line: usize, column: usize) -> Result<Token, ParseError> {
        // Mid-word dashes such as "half--baked" stay plain text
        if self.peek_at(1) == Some('-') && (self.at_line_start() || self.after_whitespace()) {
            self.advance_to(self.pos() + 2);
            let text = self.rest_of_line();
            return Ok(Token::new(TokenKind::Comment, text.trim(), line, column));
        }
        self.single(TokenKind::Dash, line, column)
    }

    /// Reads `> text` lines, joining consecutive ones with a single space
    fn read_note(&mut self) -> String {
        let mut parts = Vec::new();
        loop {
            self.take_while(|c| matches!(c, ' ' | '\t'));
            self.advance(); // '>'
            parts.push(self.rest_of_line().trim().to_string());

            let rest = &self.input[self.pos()..];
            let next_line = rest.trim_start_matches([' ', '\t']);
            if !next_line.starts_with('>') || next_line.starts_with(">>") {
                break;
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }

    /// Returns the raw text between the delimiters, or `None` when the opening
    /// `---` is not followed by a line break
    fn read_front_matter(&mut self) -> Result<Option<&'a str>, ParseError> {
        let input = self.input;
        let after_open = &input[FRONT_MATTER_DELIMITER.len()..];
        let trimmed = after_open.trim_start_matches([' ', '\t']);
        let newline_len = if trimmed.starts_with("\r\n") {
            2
        } else if trimmed.starts_with('\n') {
            1
        } else {
            return Ok(None);
        };
        let body_start =
            FRONT_MATTER_DELIMITER.len() + (after_open.len() - trimmed.len()) + newline_len;
        let body = &input[body_start..];

        let mut line_start = 0;
        while !body[line_start..].starts_with(FRONT_MATTER_DELIMITER) {
            match body[line_start..].find('\n') {
                Some(i) => line_start += i + 1,
                None => {
                    return Err(ParseError::UnterminatedFrontMatter {
                        line: self.cursor.line,
                    })
                }
            }
        }

        let raw = &body[..line_start];
        self.advance_to(body_start + line_start + FRONT_MATTER_DELIMITER.len());
        self.rest_of_line();
        Ok(Some(raw))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// A character that starts an identifier or an integer token
fn is_name_char(c: Option<char>) -> bool {
    c.is_some_and(|c| is_ident_char(c) || c.is_ascii_digit())
}

/// Scans the whole input, mostly useful for debugging and tests
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        if token.is(TokenKind::Eof) {
            return Ok(tokens);
        }
        tokens.push(token);
    }
}
