//! Diagnostic definitions for the Riv front-end.
//!
//! Every lexer and parser error is a [`SyntaxError`] variant with a stable
//! numeric code and a canonical message. Code ranges:
//!
//! - 1000-1099: lexer errors
//! - 1100-1199: parser errors

use riv_common::{Diagnostic, Label, Span};

/// Syntax error codes (1xxx range).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SyntaxError {
    // === Lexer: comments (1000-1009) ===
    /// Unterminated block comment.
    UnterminatedBlockComment = 1000,

    // === Lexer: string/character literals (1010-1029) ===
    /// Unterminated string literal.
    UnterminatedString = 1010,
    /// Unterminated character literal.
    UnterminatedChar = 1012,
    /// Empty character literal.
    EmptyChar = 1013,

    // === Lexer: number literals (1040-1059) ===
    /// Integer literal does not fit in 64 bits.
    IntTooLarge = 1040,

    // === Lexer: other (1090-1099) ===
    /// Byte the lexer cannot classify.
    InvalidCharacter = 1090,

    // === Parser: general (1100-1119) ===
    /// Expected a specific token; found another.
    ExpectedToken = 1100,
    /// Token that no production accepts at this point.
    InvalidToken = 1101,
    /// Expected an expression.
    ExpectedExpr = 1102,
    /// Expected a statement.
    ExpectedStmt = 1103,
    /// Expected a type expression.
    ExpectedType = 1104,
    /// Expected an identifier.
    ExpectedIdent = 1105,
    /// Expected a top-level declaration.
    ExpectedDecl = 1106,
    /// Syntactic nesting exceeds the supported depth.
    NestingTooDeep = 1110,

    // === Parser: declarations and statements (1120-1139) ===
    /// Function prototype is missing its return type.
    ExpectedReturnType = 1120,
    /// `if` without a body.
    ExpectedIfBody = 1121,
    /// Variable declared both `mutable` and `const`.
    MutableAndConst = 1122,
    /// More than one variadic parameter in a prototype.
    MultipleVariadic = 1123,
    /// Variadic parameter not in last position.
    VariadicNotLast = 1124,
    /// Match branch missing the `:` or `=>` separator.
    MissingMatchArrow = 1125,
}

impl SyntaxError {
    /// The numeric error code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// The canonical message.
    pub fn message(self) -> &'static str {
        match self {
            SyntaxError::UnterminatedBlockComment => "unterminated block comment",
            SyntaxError::UnterminatedString => "unterminated string literal",
            SyntaxError::UnterminatedChar => "unterminated character literal",
            SyntaxError::EmptyChar => "empty character literal",
            SyntaxError::IntTooLarge => "integer literal too large",
            SyntaxError::InvalidCharacter => "invalid character",
            SyntaxError::ExpectedToken => "expected token",
            SyntaxError::InvalidToken => "invalid token",
            SyntaxError::ExpectedExpr => "expected expression",
            SyntaxError::ExpectedStmt => "expected statement",
            SyntaxError::ExpectedType => "expected type",
            SyntaxError::ExpectedIdent => "expected identifier",
            SyntaxError::ExpectedDecl => "expected declaration",
            SyntaxError::NestingTooDeep => "nesting too deep",
            SyntaxError::ExpectedReturnType => "expected return type",
            SyntaxError::ExpectedIfBody => "expected `if` body",
            SyntaxError::MutableAndConst => {
                "cannot decorate a variable as both `mutable` and `const`"
            }
            SyntaxError::MultipleVariadic => {
                "cannot have multiple variadic arguments in function prototype"
            }
            SyntaxError::VariadicNotLast => "variadic parameter must be last",
            SyntaxError::MissingMatchArrow => "missing `:` or `=>` after match case",
        }
    }

    /// A diagnostic with this code and a span label.
    pub fn at(self, span: Span) -> Diagnostic {
        Diagnostic::error(self.message())
            .with_code(self.code())
            .with_label(Label::primary(span))
    }

    /// A diagnostic with this code, a custom message, and a span label.
    pub fn at_with_message(self, span: Span, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(message)
            .with_code(self.code())
            .with_label(Label::primary(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(SyntaxError::UnterminatedBlockComment.code(), 1000);
        assert_eq!(SyntaxError::UnterminatedString.code(), 1010);
        assert_eq!(SyntaxError::InvalidCharacter.code(), 1090);
        assert_eq!(SyntaxError::ExpectedToken.code(), 1100);
        assert_eq!(SyntaxError::MutableAndConst.code(), 1122);
    }

    #[test]
    fn diagnostic_with_span() {
        let diag = SyntaxError::UnterminatedString.at(Span::new(10, 20));
        assert_eq!(diag.code, Some(1010));
        assert_eq!(diag.message, "unterminated string literal");
        assert_eq!(diag.primary_span(), Some(Span::new(10, 20)));
    }

    #[test]
    fn diagnostic_with_custom_message() {
        let diag =
            SyntaxError::ExpectedToken.at_with_message(Span::new(0, 1), "expected `;`; found `)`");
        assert_eq!(diag.code, Some(1100));
        assert_eq!(diag.message, "expected `;`; found `)`");
    }
}
