//! Tokenizer for Go source files.
//!
//! Produces just enough token structure for declaration-level parsing:
//! identifiers, literals, single-character punctuation, comments and
//! newlines. Operators are not combined; the parser only ever needs `<-`,
//! which it reads as two tokens.

use crate::error::{CodegenError, CodegenResult};
use std::path::Path;

/// A lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier or keyword
    Ident(String),

    /// Numeric literal, kept verbatim
    Number(String),

    /// Interpreted string literal, unescaped
    Str(String),

    /// Raw string literal, contents between the backquotes
    RawStr(String),

    /// Rune literal, kept verbatim without quotes
    Char(String),

    /// Any other single character
    Punct(char),

    /// Line or block comment
    Comment(Comment),

    /// End of line outside of literals and comments
    Newline,
}

/// Comment text with its markers stripped
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Text lines of the comment
    pub lines: Vec<String>,

    /// Last source line the comment occupies
    pub end_line: usize,
}

/// Token with the source line it starts on (1-based)
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

/// Tokenize a complete source file
pub fn tokenize(path: &Path, source: &str) -> CodegenResult<Vec<Spanned>> {
    Lexer {
        path,
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
    }
    .run()
}

struct Lexer<'a> {
    path: &'a Path,
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer<'_> {
    fn run(mut self) -> CodegenResult<Vec<Spanned>> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek(0) {
            let line = self.line;
            let token = match c {
                '\n' => {
                    self.bump();
                    Token::Newline
                }
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '/' if self.peek(1) == Some('/') => self.line_comment(),
                '/' if self.peek(1) == Some('*') => self.block_comment()?,
                '"' => self.interpreted_string()?,
                '`' => self.raw_string()?,
                '\'' => self.rune()?,
                c if is_ident_start(c) => Token::Ident(self.take_while(is_ident_continue)),
                c if c.is_ascii_digit() => {
                    Token::Number(self.take_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_'))
                }
                c => {
                    self.bump();
                    Token::Punct(c)
                }
            };
            tokens.push(Spanned { token, line });
        }

        Ok(tokens)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn error(&self, line: usize, message: &str) -> CodegenError {
        CodegenError::Syntax {
            path: self.path.to_path_buf(),
            line,
            message: message.to_string(),
        }
    }

    fn line_comment(&mut self) -> Token {
        self.pos += 2;
        let text = self.take_while(|c| c != '\n');
        let text = text.strip_prefix(' ').unwrap_or(&text);
        Token::Comment(Comment {
            lines: vec![text.trim_end().to_string()],
            end_line: self.line,
        })
    }

    fn block_comment(&mut self) -> CodegenResult<Token> {
        let start = self.line;
        self.pos += 2;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('*') if self.peek(0) == Some('/') => {
                    self.pos += 1;
                    break;
                }
                Some(c) => text.push(c),
                None => return Err(self.error(start, "unterminated block comment")),
            }
        }

        let lines = text
            .lines()
            .map(|line| {
                let line = line.trim();
                let line = line.strip_prefix('*').unwrap_or(line);
                line.strip_prefix(' ').unwrap_or(line).to_string()
            })
            .collect();

        Ok(Token::Comment(Comment {
            lines,
            end_line: self.line,
        }))
    }

    fn interpreted_string(&mut self) -> CodegenResult<Token> {
        let start = self.line;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => return Err(self.error(start, "unterminated string literal")),
                },
                Some('\n') | None => return Err(self.error(start, "unterminated string literal")),
                Some(c) => text.push(c),
            }
        }
        Ok(Token::Str(text))
    }

    fn raw_string(&mut self) -> CodegenResult<Token> {
        let start = self.line;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('`') => break,
                Some(c) => text.push(c),
                None => return Err(self.error(start, "unterminated raw string literal")),
            }
        }
        Ok(Token::RawStr(text))
    }

    fn rune(&mut self) -> CodegenResult<Token> {
        let start = self.line;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\'') => break,
                Some('\\') => {
                    text.push('\\');
                    if let Some(c) = self.bump() {
                        text.push(c);
                    }
                }
                Some('\n') | None => return Err(self.error(start, "unterminated rune literal")),
                Some(c) => text.push(c),
            }
        }
        Ok(Token::Char(text))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
#[path = "lexer/lexer_tests.rs"]
mod lexer_tests;
