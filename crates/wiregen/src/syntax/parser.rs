//! Declaration-level parser for Go source files.
//!
//! Only the package clause and `type` declarations are parsed. Everything
//! else (imports, functions, variables) is skipped by balanced-delimiter
//! scanning, so function bodies never need to be understood.

use super::ast::{FieldDecl, SourceFile, StructDecl, TypeExpr};
use super::lexer::{self, Comment, Spanned, Token};
use crate::error::{CodegenError, CodegenResult};
use std::fs;
use std::path::Path;

/// Read and parse a source file
pub fn parse_file(path: &Path) -> CodegenResult<SourceFile> {
    let source = fs::read_to_string(path)
        .map_err(|e| CodegenError::io(format!("failed to read {}", path.display()), e))?;

    parse_source(path, &source)
}

/// Parse source text; `path` is used for error messages and recorded on the result
pub fn parse_source(path: &Path, source: &str) -> CodegenResult<SourceFile> {
    let tokens = lexer::tokenize(path, source)?;

    Parser {
        path,
        tokens,
        pos: 0,
    }
    .parse_file()
}

/// Consecutive comment lines with no blank line between them
struct DocGroup {
    lines: Vec<String>,
    end_line: usize,
}

/// Add a comment to the running group, or start a new group after a gap
fn absorb(group: &mut Option<DocGroup>, comment: Comment, start_line: usize) {
    match group {
        Some(g) if start_line <= g.end_line + 1 => {
            g.lines.extend(comment.lines);
            g.end_line = comment.end_line;
        }
        _ => {
            *group = Some(DocGroup {
                lines: comment.lines,
                end_line: comment.end_line,
            });
        }
    }
}

/// Take the group as documentation if it ends right above `decl_line`
fn take_doc(group: &mut Option<DocGroup>, decl_line: usize) -> String {
    group
        .take()
        .filter(|g| g.end_line + 1 == decl_line)
        .map(|g| g.lines.join("\n").trim().to_string())
        .unwrap_or_default()
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(s) | Token::Number(s) => s.clone(),
        Token::Str(s) => format!("{s:?}"),
        Token::RawStr(s) => format!("`{s}`"),
        Token::Char(s) => format!("'{s}'"),
        Token::Punct(c) => c.to_string(),
        Token::Comment(_) => "comment".to_string(),
        Token::Newline => "newline".to_string(),
    }
}

struct Parser<'a> {
    path: &'a Path,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser<'_> {
    fn parse_file(mut self) -> CodegenResult<SourceFile> {
        let mut package = None;
        let mut structs = Vec::new();
        let mut doc = None;

        while let Some(Spanned { token, line }) = self.tokens.get(self.pos).cloned() {
            match token {
                Token::Comment(comment) => {
                    self.pos += 1;
                    absorb(&mut doc, comment, line);
                }
                Token::Ident(word) if word == "package" && package.is_none() => {
                    self.pos += 1;
                    package = Some(self.expect_ident("package name")?);
                }
                Token::Ident(word) if word == "type" => {
                    self.pos += 1;
                    let decl_doc = take_doc(&mut doc, line);
                    if self.eat_punct('(') {
                        self.parse_type_group(decl_doc, &mut structs)?;
                    } else if let Some(decl) = self.parse_type_spec(decl_doc)? {
                        structs.push(decl);
                    }
                }
                Token::Punct('{' | '(' | '[') => self.skip_balanced()?,
                _ => self.pos += 1,
            }
        }

        let package = package.ok_or_else(|| self.error(1, "missing package clause"))?;

        Ok(SourceFile {
            path: self.path.to_path_buf(),
            package,
            structs,
        })
    }

    /// Parse the specs of `type ( ... )`; the opening paren is already consumed
    fn parse_type_group(
        &mut self,
        group_doc: String,
        structs: &mut Vec<StructDecl>,
    ) -> CodegenResult<()> {
        let start = self.line();
        let mut doc = None;
        let mut specs = Vec::new();
        let mut spec_count = 0usize;

        loop {
            let Some(Spanned { token, line }) = self.tokens.get(self.pos).cloned() else {
                return Err(self.error(start, "unterminated type group"));
            };
            match token {
                Token::Punct(')') => {
                    self.pos += 1;
                    break;
                }
                Token::Newline | Token::Punct(';') => self.pos += 1,
                Token::Comment(comment) => {
                    self.pos += 1;
                    absorb(&mut doc, comment, line);
                }
                Token::Ident(_) => {
                    spec_count += 1;
                    let spec_doc = take_doc(&mut doc, line);
                    if let Some(decl) = self.parse_type_spec(spec_doc)? {
                        specs.push(decl);
                    }
                }
                other => {
                    return Err(self.error(
                        line,
                        &format!("expected type spec, found {}", describe(&other)),
                    ));
                }
            }
        }

        // A lone spec inherits the group's doc comment
        if spec_count == 1 {
            for spec in specs.iter_mut().filter(|s| s.doc.is_empty()) {
                spec.doc = group_doc.clone();
            }
        }

        structs.extend(specs);
        Ok(())
    }

    /// Parse `Name [TypeParams] [=] Type`, returning the declaration if it is a struct
    fn parse_type_spec(&mut self, doc: String) -> CodegenResult<Option<StructDecl>> {
        let line = self.line();
        let name = self.expect_ident("type name")?;

        if self.at_type_params() {
            self.skip_balanced()?;
        }
        self.eat_punct('=');

        if self.check_ident("struct") {
            self.pos += 1;
            let fields = self.parse_struct_body()?;
            return Ok(Some(StructDecl {
                name,
                doc,
                fields,
                line,
            }));
        }

        self.skip_to_spec_end()?;
        Ok(None)
    }

    fn parse_struct_body(&mut self) -> CodegenResult<Vec<FieldDecl>> {
        let start = self.line();
        self.expect_punct('{')?;

        let mut fields = Vec::new();
        loop {
            let Some(Spanned { token, line }) = self.tokens.get(self.pos).cloned() else {
                return Err(self.error(start, "unterminated struct body"));
            };
            match token {
                Token::Punct('}') => {
                    self.pos += 1;
                    return Ok(fields);
                }
                Token::Newline | Token::Punct(';') | Token::Comment(_) => self.pos += 1,
                _ => {
                    fields.push(self.parse_field(line)?);
                    self.expect_field_end()?;
                }
            }
        }
    }

    fn parse_field(&mut self, line: usize) -> CodegenResult<FieldDecl> {
        let embedded = match (self.token_at(0), self.token_at(1)) {
            (Some(Token::Punct('*')), _) => true,
            (Some(Token::Ident(_)), Some(Token::Punct('.'))) => true,
            (
                Some(Token::Ident(_)),
                None
                | Some(
                    Token::Newline
                    | Token::Punct(';' | '}')
                    | Token::Str(_)
                    | Token::RawStr(_)
                    | Token::Comment(_),
                ),
            ) => true,
            (Some(Token::Ident(_)), _) => false,
            (Some(other), _) => {
                let found = describe(other);
                return Err(self.error(
                    line,
                    &format!("expected field declaration, found {found}"),
                ));
            }
            (None, _) => return Err(self.error(line, "expected field declaration")),
        };

        let names = if embedded {
            Vec::new()
        } else {
            self.parse_ident_list()?
        };
        let ty = self.parse_type()?;

        let tag = match self.token_at(0) {
            Some(Token::Str(s) | Token::RawStr(s)) => {
                let tag = s.clone();
                self.pos += 1;
                Some(tag)
            }
            _ => None,
        };

        Ok(FieldDecl {
            names,
            ty,
            tag,
            line,
        })
    }

    fn expect_field_end(&mut self) -> CodegenResult<()> {
        while matches!(self.token_at(0), Some(Token::Comment(_))) {
            self.pos += 1;
        }
        match self.token_at(0) {
            Some(Token::Newline | Token::Punct(';')) => {
                self.pos += 1;
                Ok(())
            }
            Some(Token::Punct('}')) => Ok(()),
            Some(other) => {
                let found = describe(other);
                Err(self.error(self.line(), &format!("unexpected {found} after field")))
            }
            None => Err(self.error(self.line(), "unterminated struct body")),
        }
    }

    fn parse_ident_list(&mut self) -> CodegenResult<Vec<String>> {
        let mut names = vec![self.expect_ident("field name")?];
        while self.eat_punct(',') {
            while matches!(self.token_at(0), Some(Token::Newline)) {
                self.pos += 1;
            }
            names.push(self.expect_ident("field name")?);
        }
        Ok(names)
    }

    fn parse_type(&mut self) -> CodegenResult<TypeExpr> {
        let line = self.line();
        let Some(token) = self.token_at(0).cloned() else {
            return Err(self.error(line, "expected type, found end of file"));
        };

        match token {
            Token::Punct('*') => {
                self.pos += 1;
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            Token::Punct('[') => {
                self.pos += 1;
                if self.eat_punct(']') {
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len = self.collect_array_len()?;
                Ok(TypeExpr::Array {
                    len,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Token::Punct('(') => {
                self.pos += 1;
                let inner = self.parse_type()?;
                self.expect_punct(')')?;
                Ok(inner)
            }
            Token::Punct('<') => {
                self.pos += 1;
                self.expect_punct('-')?;
                if !self.check_ident("chan") {
                    return Err(self.error(line, "expected `chan` after `<-`"));
                }
                self.pos += 1;
                Ok(TypeExpr::Chan(Box::new(self.parse_type()?)))
            }
            Token::Ident(word) => self.parse_word_type(word, line),
            other => Err(self.error(
                line,
                &format!("expected type, found {}", describe(&other)),
            )),
        }
    }

    fn parse_word_type(&mut self, word: String, line: usize) -> CodegenResult<TypeExpr> {
        self.pos += 1;
        match word.as_str() {
            "map" => {
                self.expect_punct('[')?;
                let key = self.parse_type()?;
                self.expect_punct(']')?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            "chan" => {
                if self.eat_punct('<') {
                    self.expect_punct('-')?;
                }
                Ok(TypeExpr::Chan(Box::new(self.parse_type()?)))
            }
            "func" => {
                if !self.check_punct('(') {
                    return Err(self.error(line, "expected `(` after `func`"));
                }
                self.skip_balanced()?;
                if self.check_punct('(') {
                    self.skip_balanced()?;
                } else if self.starts_type() {
                    self.parse_type()?;
                }
                Ok(TypeExpr::Func)
            }
            "struct" | "interface" => {
                if !self.check_punct('{') {
                    return Err(self.error(line, &format!("expected `{{` after `{word}`")));
                }
                self.skip_balanced()?;
                Ok(if word == "struct" {
                    TypeExpr::Struct
                } else {
                    TypeExpr::Interface
                })
            }
            _ => {
                let named = if self.eat_punct('.') {
                    let name = self.expect_ident("type name")?;
                    TypeExpr::qualified(word, name)
                } else {
                    TypeExpr::named(word)
                };

                if self.eat_punct('[') {
                    let mut args = vec![self.parse_type()?];
                    while self.eat_punct(',') {
                        args.push(self.parse_type()?);
                    }
                    self.expect_punct(']')?;
                    return Ok(TypeExpr::Generic {
                        base: Box::new(named),
                        args,
                    });
                }

                Ok(named)
            }
        }
    }

    /// Collect the length expression of `[N]T`; the `[` is already consumed
    fn collect_array_len(&mut self) -> CodegenResult<String> {
        let start = self.line();
        let mut text = String::new();
        let mut depth = 0usize;

        loop {
            let Some(token) = self.token_at(0).cloned() else {
                return Err(self.error(start, "unterminated array length"));
            };
            self.pos += 1;
            match token {
                Token::Punct(']') if depth == 0 => return Ok(text),
                Token::Punct(']') => depth -= 1,
                Token::Punct('[') => depth += 1,
                _ => {}
            }
            text.push_str(&describe(&token));
        }
    }

    /// Skip a balanced `{}`, `()` or `[]` group starting at the current token
    fn skip_balanced(&mut self) -> CodegenResult<()> {
        let start = self.line();
        let mut depth = 0usize;

        while let Some(spanned) = self.tokens.get(self.pos) {
            match spanned.token {
                Token::Punct('{' | '(' | '[') => depth += 1,
                Token::Punct('}' | ')' | ']') => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.pos += 1;
            if depth == 0 {
                return Ok(());
            }
        }

        Err(self.error(start, "unbalanced delimiters"))
    }

    /// Skip a non-struct type spec up to its terminator
    fn skip_to_spec_end(&mut self) -> CodegenResult<()> {
        while let Some(token) = self.token_at(0) {
            match token {
                Token::Newline | Token::Punct(';') => {
                    self.pos += 1;
                    return Ok(());
                }
                Token::Punct(')') => return Ok(()),
                Token::Punct('{' | '(' | '[') => self.skip_balanced()?,
                _ => self.pos += 1,
            }
        }
        Ok(())
    }

    fn starts_type(&self) -> bool {
        matches!(
            self.token_at(0),
            Some(Token::Ident(_) | Token::Punct('*' | '[' | '(' | '<'))
        )
    }

    fn token_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.line)
            .unwrap_or(1)
    }

    fn check_punct(&self, c: char) -> bool {
        matches!(self.token_at(0), Some(Token::Punct(p)) if *p == c)
    }

    /// `[` opening a type parameter list rather than a slice or array type
    ///
    /// Parameters are `Name Constraint` pairs, so the first name is never
    /// directly followed by `]` as an array length would be.
    fn at_type_params(&self) -> bool {
        if !self.check_punct('[') {
            return false;
        }
        match (self.token_at(1), self.token_at(2)) {
            (Some(Token::Newline), _) => true,
            (Some(Token::Ident(_)), Some(next)) => *next != Token::Punct(']'),
            _ => false,
        }
    }

    fn check_ident(&self, word: &str) -> bool {
        matches!(self.token_at(0), Some(Token::Ident(w)) if w == word)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        let found = self.check_punct(c);
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect_punct(&mut self, c: char) -> CodegenResult<()> {
        if self.eat_punct(c) {
            return Ok(());
        }
        let found = self
            .token_at(0)
            .map(describe)
            .unwrap_or_else(|| "end of file".to_string());
        Err(self.error(self.line(), &format!("expected `{c}`, found {found}")))
    }

    fn expect_ident(&mut self, what: &str) -> CodegenResult<String> {
        match self.token_at(0) {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            other => {
                let found = other
                    .map(describe)
                    .unwrap_or_else(|| "end of file".to_string());
                Err(self.error(self.line(), &format!("expected {what}, found {found}")))
            }
        }
    }

    fn error(&self, line: usize, message: &str) -> CodegenError {
        CodegenError::Syntax {
            path: self.path.to_path_buf(),
            line,
            message: message.to_string(),
        }
    }
}
