//! Lexer for the Riv programming language.
//!
//! Turns a UTF-8 buffer into a flat, `Eof`-terminated token vector.
//! Whitespace, newlines, and comments never reach the stream. Operators are
//! scanned with maximal munch (`<<=` wins over `<<` wins over `<`), and
//! keywords are recognized at emit time by looking the identifier lexeme up
//! in the keyword table.
//!
//! Positions are global: the caller passes the file's base offset from
//! `SourceMap::file_base`, and every span is relative to that space. A UTF-8
//! BOM at the start of the buffer is skipped before lexing begins.
//!
//! The first lexical error ends the stream; the vector is still
//! `Eof`-terminated so the parser never runs off the end.

use std::str::Chars;

use riv_common::diagnostics::DiagnosticSink;
use riv_common::span::Span;

use crate::errors::SyntaxError;
use crate::token::{Token, TokenKind};

const BOM: &str = "\u{feff}";

/// Lexes a buffer, returning the token vector and collected diagnostics.
pub fn lex(source: &str, base: u32) -> (Vec<Token>, DiagnosticSink) {
    Lexer::new(source, base).collect_tokens()
}

/// The lexer for Riv source code.
pub struct Lexer<'src> {
    source: &'src str,
    chars: Chars<'src>,
    /// Base offset in global position space.
    base: u32,
    /// Current byte offset in the source (local, 0-indexed).
    local_pos: u32,
    diagnostics: DiagnosticSink,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer for `source` with the file's base offset.
    pub fn new(source: &'src str, base: u32) -> Self {
        let mut lexer = Self {
            source,
            chars: source.chars(),
            base,
            local_pos: 0,
            diagnostics: DiagnosticSink::new(),
        };
        if source.starts_with(BOM) {
            lexer.chars = source[BOM.len()..].chars();
            lexer.local_pos = BOM.len() as u32;
        }
        lexer
    }

    /// Current position in global space.
    #[inline]
    fn pos(&self) -> u32 {
        self.base + self.local_pos
    }

    /// Lexes to completion (or the first error) and returns the tokens.
    ///
    /// The vector always ends in exactly one `Eof` token.
    pub fn collect_tokens(mut self) -> (Vec<Token>, DiagnosticSink) {
        let mut tokens = Vec::with_capacity(64);
        loop {
            let token = self.next_token();
            let kind = token.kind;
            tokens.push(token);
            if kind == TokenKind::Eof {
                break;
            }
            if self.diagnostics.has_errors() {
                let pos = self.pos();
                tokens.push(Token::new(TokenKind::Eof, Span::new(pos, pos)));
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.pos();
        let kind = match self.peek() {
            None => TokenKind::Eof,
            Some(c) => self.scan_token(c),
        };
        Token::new(kind, Span::new(start, self.pos()))
    }

    /// Peeks at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Peeks one character past the current one.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    /// Consumes and returns the current character.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.local_pos += c.len_utf8() as u32;
        Some(c)
    }

    /// Consumes the current character if it matches.
    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips whitespace, newlines, and comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => {
                        self.skip_block_comment();
                        if self.diagnostics.has_errors() {
                            return;
                        }
                    }
                    _ => break,
                },
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.advance(); // /
        self.advance(); // /
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos();
        self.advance(); // /
        self.advance(); // *

        loop {
            match self.peek() {
                None => {
                    self.diagnostics
                        .emit(SyntaxError::UnterminatedBlockComment.at(Span::new(start, self.pos())));
                    return;
                }
                Some('*') if self.peek_next() == Some('/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Scans one token, dispatching on the current character.
    fn scan_token(&mut self, c: char) -> TokenKind {
        match c {
            // Single-character delimiters
            '(' => { self.advance(); TokenKind::LParen }
            ')' => { self.advance(); TokenKind::RParen }
            '{' => { self.advance(); TokenKind::LBrace }
            '}' => { self.advance(); TokenKind::RBrace }
            '[' => { self.advance(); TokenKind::LBracket }
            ']' => { self.advance(); TokenKind::RBracket }
            ';' => { self.advance(); TokenKind::Semicolon }
            ',' => { self.advance(); TokenKind::Comma }
            '?' => { self.advance(); TokenKind::Question }
            '@' => { self.advance(); TokenKind::At }
            '#' => { self.advance(); TokenKind::Hash }
            '\\' => { self.advance(); TokenKind::Backslash }

            // Colon or ::
            ':' => {
                self.advance();
                if self.advance_if(':') {
                    TokenKind::ColonColon
                } else {
                    TokenKind::Colon
                }
            }

            // Dot, .., ...
            '.' => {
                self.advance();
                if self.advance_if('.') {
                    if self.advance_if('.') {
                        TokenKind::Ellipsis
                    } else {
                        TokenKind::DotDot
                    }
                } else {
                    TokenKind::Dot
                }
            }

            // Equals, ==, =>
            '=' => {
                self.advance();
                if self.advance_if('=') {
                    TokenKind::EqEq
                } else if self.advance_if('>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Eq
                }
            }

            // Plus, ++, +=
            '+' => {
                self.advance();
                if self.advance_if('+') {
                    TokenKind::PlusPlus
                } else if self.advance_if('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }

            // Minus, --, -=, ->
            '-' => {
                self.advance();
                if self.advance_if('-') {
                    TokenKind::MinusMinus
                } else if self.advance_if('=') {
                    TokenKind::MinusEq
                } else if self.advance_if('>') {
                    TokenKind::RArrow
                } else {
                    TokenKind::Minus
                }
            }

            // Star, **, *=
            '*' => {
                self.advance();
                if self.advance_if('*') {
                    TokenKind::StarStar
                } else if self.advance_if('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }

            // Slash, /= (comments were consumed as trivia)
            '/' => {
                self.advance();
                if self.advance_if('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }

            // Percent, %%, %=
            '%' => {
                self.advance();
                if self.advance_if('%') {
                    TokenKind::PercentPercent
                } else if self.advance_if('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }

            // Amp, &&, &^, &=
            '&' => {
                self.advance();
                if self.advance_if('&') {
                    TokenKind::AmpAmp
                } else if self.advance_if('^') {
                    TokenKind::AmpCaret
                } else if self.advance_if('=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }

            // Pipe, ||, |=
            '|' => {
                self.advance();
                if self.advance_if('|') {
                    TokenKind::PipePipe
                } else if self.advance_if('=') {
                    TokenKind::PipeEq
                } else {
                    TokenKind::Pipe
                }
            }

            // Caret, ^=
            '^' => {
                self.advance();
                if self.advance_if('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }

            // Tilde, ~=
            '~' => {
                self.advance();
                if self.advance_if('=') {
                    TokenKind::TildeEq
                } else {
                    TokenKind::Tilde
                }
            }

            // Not, !=
            '!' => {
                self.advance();
                if self.advance_if('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Not
                }
            }

            // Less, <=, <-, <<, <<=
            '<' => {
                self.advance();
                if self.advance_if('=') {
                    TokenKind::LtEq
                } else if self.advance_if('-') {
                    TokenKind::LArrow
                } else if self.advance_if('<') {
                    if self.advance_if('=') {
                        TokenKind::ShlEq
                    } else {
                        TokenKind::Shl
                    }
                } else {
                    TokenKind::Lt
                }
            }

            // Greater, >=, >>, >>=
            '>' => {
                self.advance();
                if self.advance_if('=') {
                    TokenKind::GtEq
                } else if self.advance_if('>') {
                    if self.advance_if('=') {
                        TokenKind::ShrEq
                    } else {
                        TokenKind::Shr
                    }
                } else {
                    TokenKind::Gt
                }
            }

            // Literals
            '"' => self.scan_string(),
            '\'' => self.scan_char(),
            '0'..='9' => self.scan_number(),

            // Identifiers and keywords
            c if is_ident_start(c) => self.scan_ident(),

            // Anything else is an error
            _ => {
                let start = self.pos();
                self.advance();
                self.diagnostics.emit(SyntaxError::InvalidCharacter.at_with_message(
                    Span::new(start, self.pos()),
                    format!("invalid character `{}`", c.escape_default()),
                ));
                TokenKind::Invalid
            }
        }
    }

    /// Scans an identifier, re-tagging keywords at emit time.
    fn scan_ident(&mut self) -> TokenKind {
        let start = self.local_pos as usize;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.local_pos as usize];
        TokenKind::keyword(text).unwrap_or(TokenKind::Ident)
    }

    /// Scans a decimal integer or float literal.
    fn scan_number(&mut self) -> TokenKind {
        self.scan_digits();

        // A dot only continues the literal when digits follow, so `1..2`
        // stays integer-dotdot-integer.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.scan_digits();
            TokenKind::FloatLit
        } else {
            TokenKind::IntLit
        }
    }

    fn scan_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scans a string literal. The opening quote has not been consumed.
    fn scan_string(&mut self) -> TokenKind {
        let start = self.pos();
        self.advance(); // opening "

        loop {
            match self.peek() {
                None => {
                    self.diagnostics
                        .emit(SyntaxError::UnterminatedString.at(Span::new(start, self.pos())));
                    return TokenKind::Invalid;
                }
                Some('"') => {
                    self.advance();
                    return TokenKind::StrLit;
                }
                Some('\\') => {
                    // Escapes are kept verbatim: the backslash and the
                    // following character both land in the lexeme.
                    self.advance();
                    if self.advance().is_none() {
                        self.diagnostics
                            .emit(SyntaxError::UnterminatedString.at(Span::new(start, self.pos())));
                        return TokenKind::Invalid;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Scans a character literal.
    fn scan_char(&mut self) -> TokenKind {
        let start = self.pos();
        self.advance(); // opening '

        match self.peek() {
            None | Some('\n') => {
                self.diagnostics
                    .emit(SyntaxError::UnterminatedChar.at(Span::new(start, self.pos())));
                return TokenKind::Invalid;
            }
            Some('\'') => {
                self.advance();
                self.diagnostics
                    .emit(SyntaxError::EmptyChar.at(Span::new(start, self.pos())));
                return TokenKind::Invalid;
            }
            Some('\\') => {
                self.advance();
                self.advance();
            }
            _ => {
                self.advance();
            }
        }

        if self.advance_if('\'') {
            TokenKind::CharLit
        } else {
            self.diagnostics
                .emit(SyntaxError::UnterminatedChar.at(Span::new(start, self.pos())));
            TokenKind::Invalid
        }
    }
}

/// True if the character can start an identifier (ASCII letter or `_`).
fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// True if the character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}
