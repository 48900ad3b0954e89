//! Type expression parsing.
//!
//! A type is a run of prefix type operators applied to a suffix expression:
//! `?T` (optional), `&T` (reference), `[]T` (slice), `[N]T` (array), with a
//! suffix expression like `Int` or `Vec(Int)` at the core.

use super::{ParseResult, Parser};
use crate::ast::{TypeExpr, TypeExprId, TypePrefix};
use crate::errors::SyntaxError;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// Parses a type expression. Returns `None` (cursor unchanged) when the
    /// current token cannot start one.
    pub(crate) fn parse_type_expr(&mut self) -> ParseResult<Option<TypeExprId>> {
        let checkpoint = self.save();
        let start = self.current.span;

        let mut prefixes = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Question => {
                    self.advance();
                    prefixes.push(TypePrefix::Optional);
                }
                TokenKind::Amp => {
                    self.advance();
                    prefixes.push(TypePrefix::Reference);
                }
                TokenKind::LBracket => {
                    self.advance();
                    if self.eat(TokenKind::RBracket) {
                        prefixes.push(TypePrefix::Slice);
                    } else {
                        let len = self.parse_expr_required()?;
                        self.expect(TokenKind::RBracket)?;
                        prefixes.push(TypePrefix::Array(len));
                    }
                }
                _ => break,
            }
        }

        let Some(base) = self.parse_suffix_expr()? else {
            if prefixes.is_empty() {
                return Ok(None);
            }
            // Prefix operators with nothing to apply to. In probing
            // contexts the caller backtracks past the whole attempt.
            self.restore(checkpoint);
            self.diagnostics.emit(SyntaxError::ExpectedType.at_with_message(
                self.current.span,
                format!("expected type; found `{}`", self.current.kind),
            ));
            return Err(());
        };

        let span = start.to(self.prev_span());
        Ok(Some(self.ast.types.alloc(TypeExpr {
            prefixes,
            base,
            span,
        })))
    }
}
