//! Expression parsing.
//!
//! Binary expressions go through one generic climb over a static precedence
//! table; each level folds left-associatively (`Infinity`) except the
//! comparison level, which is non-associative (`Once`). The remaining
//! assignment operators sit above the table in a single
//! `Expr (AssignOp Expr)?` production.

use riv_common::span::Span;

use super::{ParseResult, Parser};
use crate::ast::*;
use crate::errors::SyntaxError;
use crate::token::TokenKind;

/// Chaining mode for one precedence level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum BinOpChain {
    /// At most one operator at this level (non-associative).
    Once,
    /// Fold operators as long as they appear (left-associative).
    Infinity,
}

/// Binary operator precedence. Higher levels bind tighter.
const PRECEDENCE: &[(TokenKind, u8, BinOp)] = &[
    (TokenKind::Star, 60, BinOp::Mul),
    (TokenKind::Slash, 60, BinOp::Div),
    (TokenKind::Percent, 60, BinOp::Rem),
    (TokenKind::Plus, 50, BinOp::Add),
    (TokenKind::Minus, 50, BinOp::Sub),
    (TokenKind::PlusEq, 50, BinOp::AddAssign),
    (TokenKind::MinusEq, 50, BinOp::SubAssign),
    (TokenKind::Shl, 40, BinOp::Shl),
    (TokenKind::Shr, 40, BinOp::Shr),
    (TokenKind::EqEq, 30, BinOp::Eq),
    (TokenKind::NotEq, 30, BinOp::Ne),
    (TokenKind::Gt, 30, BinOp::Gt),
    (TokenKind::Lt, 30, BinOp::Lt),
    (TokenKind::GtEq, 30, BinOp::Ge),
    (TokenKind::LtEq, 30, BinOp::Le),
    (TokenKind::Amp, 20, BinOp::And),
    (TokenKind::Pipe, 10, BinOp::Or),
];

/// The levels of the table from loosest to tightest, with chaining modes.
const LEVELS: &[(u8, BinOpChain)] = &[
    (10, BinOpChain::Infinity),
    (20, BinOpChain::Infinity),
    (30, BinOpChain::Once),
    (40, BinOpChain::Infinity),
    (50, BinOpChain::Infinity),
    (60, BinOpChain::Infinity),
];

fn binary_op_at(kind: TokenKind, level: u8) -> Option<BinOp> {
    PRECEDENCE
        .iter()
        .find(|&&(k, l, _)| k == kind && l == level)
        .map(|&(_, _, op)| op)
}

impl<'a> Parser<'a> {
    /// Parses an expression. Returns `None` (cursor unchanged) when the
    /// current token cannot start one.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Option<ExprId>> {
        self.nested(|p| p.parse_binary_expr(0))
    }

    pub(crate) fn parse_expr_required(&mut self) -> ParseResult<ExprId> {
        match self.parse_expr()? {
            Some(expr) => Ok(expr),
            None => {
                self.diagnostics.emit(SyntaxError::ExpectedExpr.at_with_message(
                    self.current.span,
                    format!("expected expression; found `{}`", self.current.kind),
                ));
                Err(())
            }
        }
    }

    /// `Expr (AssignOp Expr)?` — the assignment operators not carried by
    /// the precedence table, applied at most once.
    pub(crate) fn parse_assign_expr(&mut self) -> ParseResult<Option<ExprId>> {
        let Some(lhs) = self.parse_expr()? else {
            return Ok(None);
        };

        let op = match self.current.kind {
            TokenKind::Eq => BinOp::Assign,
            TokenKind::StarEq => BinOp::MulAssign,
            TokenKind::SlashEq => BinOp::DivAssign,
            TokenKind::PercentEq => BinOp::RemAssign,
            TokenKind::ShlEq => BinOp::ShlAssign,
            TokenKind::ShrEq => BinOp::ShrAssign,
            TokenKind::AmpEq => BinOp::AndAssign,
            TokenKind::PipeEq => BinOp::OrAssign,
            TokenKind::CaretEq => BinOp::XorAssign,
            TokenKind::TildeEq => BinOp::TildeAssign,
            _ => return Ok(Some(lhs)),
        };
        self.advance();

        let rhs = self.parse_expr_required()?;
        Ok(Some(self.alloc_binary(op, lhs, rhs)))
    }

    pub(crate) fn parse_assign_expr_required(&mut self) -> ParseResult<ExprId> {
        match self.parse_assign_expr()? {
            Some(expr) => Ok(expr),
            None => {
                self.diagnostics.emit(SyntaxError::ExpectedExpr.at_with_message(
                    self.current.span,
                    format!("expected expression; found `{}`", self.current.kind),
                ));
                Err(())
            }
        }
    }

    /// The generic climb: folds operators of one table level, recursing into
    /// the next-tighter level for operands.
    fn parse_binary_expr(&mut self, level_idx: usize) -> ParseResult<Option<ExprId>> {
        let Some(&(level, chain)) = LEVELS.get(level_idx) else {
            return self.parse_prefix_expr();
        };

        let Some(mut lhs) = self.parse_binary_expr(level_idx + 1)? else {
            return Ok(None);
        };

        loop {
            let Some(op) = binary_op_at(self.current.kind, level) else {
                break;
            };
            self.advance();

            let rhs = match self.parse_binary_expr(level_idx + 1)? {
                Some(rhs) => rhs,
                None => {
                    self.diagnostics.emit(SyntaxError::ExpectedExpr.at_with_message(
                        self.current.span,
                        format!("expected expression; found `{}`", self.current.kind),
                    ));
                    return Err(());
                }
            };
            lhs = self.alloc_binary(op, lhs, rhs);

            if chain == BinOpChain::Once {
                break;
            }
        }

        Ok(Some(lhs))
    }

    fn alloc_binary(&mut self, op: BinOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        let span = self.ast.expr(lhs).span.to(self.ast.expr(rhs).span);
        self.ast.exprs.alloc(Expr {
            kind: ExprKind::Binary(BinaryExpr { op, lhs, rhs }),
            span,
        })
    }

    /// `(! | - | ~ | &)* SuffixExpr`
    fn parse_prefix_expr(&mut self) -> ParseResult<Option<ExprId>> {
        let op = match self.current.kind {
            TokenKind::Not => PrefixOp::Not,
            TokenKind::Minus => PrefixOp::Neg,
            TokenKind::Tilde => PrefixOp::BitNot,
            TokenKind::Amp => PrefixOp::Ref,
            _ => return self.parse_suffix_expr(),
        };
        let start = self.current.span;
        self.advance();

        let operand = match self.nested(|p| p.parse_prefix_expr())? {
            Some(operand) => operand,
            None => {
                self.diagnostics.emit(SyntaxError::ExpectedExpr.at_with_message(
                    self.current.span,
                    format!("expected expression; found `{}`", self.current.kind),
                ));
                return Err(());
            }
        };

        let span = start.to(self.ast.expr(operand).span);
        Ok(Some(self.ast.exprs.alloc(Expr {
            kind: ExprKind::Prefix(PrefixExpr { op, expr: operand }),
            span,
        })))
    }

    /// A primary expression followed by any mix of index/slice suffixes and
    /// call argument lists, folding left.
    pub(crate) fn parse_suffix_expr(&mut self) -> ParseResult<Option<ExprId>> {
        let Some(mut out) = self.parse_primary_expr()? else {
            return Ok(None);
        };

        loop {
            match self.current.kind {
                TokenKind::LBracket => {
                    self.advance();
                    out = self.parse_index_or_slice(out)?;
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_call_args()?;
                    self.expect(TokenKind::RParen)?;
                    let span = self.ast.expr(out).span.to(self.prev_span());
                    out = self.ast.exprs.alloc(Expr {
                        kind: ExprKind::Call(CallExpr { callee: out, args }),
                        span,
                    });
                }
                _ => break,
            }
        }

        Ok(Some(out))
    }

    /// After the `[`: `Expr]`, `Expr? .. Expr?]`.
    fn parse_index_or_slice(&mut self, base: ExprId) -> ParseResult<ExprId> {
        let kind = if self.eat(TokenKind::DotDot) {
            let end = if self.at(TokenKind::RBracket) {
                None
            } else {
                Some(self.parse_expr_required()?)
            };
            ExprKind::Slice(SliceExpr {
                base,
                start: None,
                end,
            })
        } else {
            let first = self.parse_expr_required()?;
            if self.eat(TokenKind::DotDot) {
                let end = if self.at(TokenKind::RBracket) {
                    None
                } else {
                    Some(self.parse_expr_required()?)
                };
                ExprKind::Slice(SliceExpr {
                    base,
                    start: Some(first),
                    end,
                })
            } else {
                ExprKind::Index(IndexExpr { base, index: first })
            }
        };
        self.expect(TokenKind::RBracket)?;

        let span = self.ast.expr(base).span.to(self.prev_span());
        Ok(self.ast.exprs.alloc(Expr { kind, span }))
    }

    /// Comma-separated arguments up to (not including) the `)`.
    fn parse_call_args(&mut self) -> ParseResult<Vec<ExprId>> {
        let mut args = Vec::new();
        while !self.at(TokenKind::RParen) && !self.at_eof() {
            args.push(self.parse_assign_expr_required()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Option<ExprId>> {
        let start = self.current.span;
        let kind = match self.current.kind {
            TokenKind::IntLit => {
                let token = self.current;
                self.advance();
                let text = self.span_text(token.span);
                match text.parse::<u64>() {
                    Ok(value) => ExprKind::IntLit(value),
                    Err(_) => {
                        self.diagnostics
                            .emit(SyntaxError::IntTooLarge.at(token.span));
                        return Err(());
                    }
                }
            }
            TokenKind::FloatLit => {
                let token = self.current;
                self.advance();
                let sym = self.intern_span(token.span);
                ExprKind::FloatLit(sym)
            }
            TokenKind::CharLit => {
                let token = self.current;
                self.advance();
                ExprKind::CharLit(self.decode_char(token.span))
            }
            TokenKind::StrLit => {
                let token = self.current;
                self.advance();
                // Strip the surrounding quotes; escapes stay verbatim.
                let body = Span::new(token.span.start.0 + 1, token.span.end.0 - 1);
                let sym = self.intern_span(body);
                ExprKind::StrLit(sym)
            }
            TokenKind::True => {
                self.advance();
                ExprKind::BoolLit(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::BoolLit(false)
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::NullLit
            }
            TokenKind::Unreachable => {
                self.advance();
                ExprKind::Unreachable
            }
            TokenKind::Ident => {
                let ident = self.parse_ident()?;
                ExprKind::Ident(ident)
            }
            TokenKind::If => return self.parse_if_expr().map(Some),
            TokenKind::Match => return self.parse_match_expr().map(Some),
            TokenKind::Break => {
                self.advance();
                let label = self.parse_break_label()?;
                let value = self.parse_expr()?;
                ExprKind::Break(BreakExpr { label, value })
            }
            TokenKind::Continue => {
                self.advance();
                let label = self.parse_break_label()?;
                ExprKind::Continue(ContinueExpr { label })
            }
            TokenKind::Return => {
                self.advance();
                let value = self.parse_expr()?;
                ExprKind::Return(ReturnExpr { value })
            }
            TokenKind::LBrace => {
                if let Some(list) = self.try_parse_init_list()? {
                    return Ok(Some(list));
                }
                let block = self.parse_block()?;
                ExprKind::Block(block)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_assign_expr_required()?;
                self.expect(TokenKind::RParen)?;
                return Ok(Some(inner));
            }
            _ => return Ok(None),
        };

        Ok(Some(self.ast.exprs.alloc(Expr {
            kind,
            span: start.to(self.prev_span()),
        })))
    }

    /// `if ( Expr ) Expr (else Expr)?` in expression position.
    fn parse_if_expr(&mut self) -> ParseResult<ExprId> {
        let start = self.current.span;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr_required()?;
        self.expect(TokenKind::RParen)?;

        let then_expr = match self.parse_expr()? {
            Some(expr) => expr,
            None => {
                self.diagnostics.emit(SyntaxError::ExpectedIfBody.at_with_message(
                    self.current.span,
                    format!("expected `if` body; found `{}`", self.current.kind),
                ));
                return Err(());
            }
        };

        let else_expr = if self.eat(TokenKind::Else) {
            Some(self.parse_expr_required()?)
        } else {
            None
        };

        Ok(self.ast.exprs.alloc(Expr {
            kind: ExprKind::If(IfExpr {
                cond,
                then_expr,
                else_expr,
            }),
            span: start.to(self.prev_span()),
        }))
    }

    /// `match (\( Expr \) | Expr) { Branch (, Branch)* ,? }`
    pub(crate) fn parse_match_expr(&mut self) -> ParseResult<ExprId> {
        let start = self.current.span;
        self.expect(TokenKind::Match)?;

        let parens = self.eat(TokenKind::LParen);
        let scrutinee = self.parse_expr_required()?;
        if parens {
            self.expect(TokenKind::RParen)?;
        }

        self.expect(TokenKind::LBrace)?;
        let mut arms = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            arms.push(self.parse_match_arm()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;

        Ok(self.ast.exprs.alloc(Expr {
            kind: ExprKind::Match(MatchExpr { scrutinee, arms }),
            span: start.to(self.prev_span()),
        }))
    }

    /// `(else | Item (, Item)*) (: | =>) AssignmentExpr`
    fn parse_match_arm(&mut self) -> ParseResult<MatchArm> {
        let start = self.current.span;

        let case = if self.eat(TokenKind::Else) {
            MatchCase::Else
        } else {
            let mut items = vec![self.parse_match_item()?];
            // An item list comma is only consumed when another item
            // follows; the branch separator comma stays put.
            while self.at(TokenKind::Comma)
                && !self.peek_is(TokenKind::RBrace)
                && !self.peek_is(TokenKind::Else)
            {
                self.advance();
                items.push(self.parse_match_item()?);
            }
            MatchCase::Items(items)
        };

        if !self.eat(TokenKind::Colon) && !self.eat(TokenKind::FatArrow) {
            self.diagnostics
                .emit(SyntaxError::MissingMatchArrow.at(self.current.span));
            return Err(());
        }

        let value = self.parse_assign_expr_required()?;
        Ok(MatchArm {
            case,
            value,
            span: start.to(self.prev_span()),
        })
    }

    /// `Expr (.. Expr)?`
    fn parse_match_item(&mut self) -> ParseResult<MatchItem> {
        let start = self.parse_expr_required()?;
        let end = if self.eat(TokenKind::DotDot) {
            Some(self.parse_expr_required()?)
        } else {
            None
        };
        Ok(MatchItem { start, end })
    }

    /// `: IDENT` after `break`/`continue`.
    fn parse_break_label(&mut self) -> ParseResult<Option<riv_common::Ident>> {
        if !self.eat(TokenKind::Colon) {
            return Ok(None);
        }
        self.parse_ident().map(Some)
    }

    /// `{ Expr (, Expr)* ,? }` or `{}`. Returns `None` with the cursor
    /// unchanged when the braces hold statements instead.
    fn try_parse_init_list(&mut self) -> ParseResult<Option<ExprId>> {
        let checkpoint = self.save();
        let start = self.current.span;
        self.advance(); // {

        let mut entries = Vec::new();
        loop {
            if self.eat(TokenKind::RBrace) {
                break;
            }
            let Some(entry) = self.parse_expr()? else {
                self.restore(checkpoint);
                return Ok(None);
            };
            entries.push(entry);

            if self.eat(TokenKind::Comma) {
                continue;
            }
            if self.eat(TokenKind::RBrace) {
                break;
            }
            // Something other than `,` or `}` after an entry: a block.
            self.restore(checkpoint);
            return Ok(None);
        }

        Ok(Some(self.ast.exprs.alloc(Expr {
            kind: ExprKind::InitList(entries),
            span: start.to(self.prev_span()),
        })))
    }

    /// Decodes a character literal lexeme (span includes the quotes).
    fn decode_char(&self, span: Span) -> char {
        let text = self.span_text(span);
        let body = &text[1..text.len() - 1];
        let mut chars = body.chars();
        match chars.next() {
            Some('\\') => match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('0') => '\0',
                Some(c) => c,
                None => '\\',
            },
            Some(c) => c,
            None => '\0',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use crate::ast::*;

    /// Renders an expression as an S-expression for shape assertions.
    fn sexpr(ast: &Ast, id: ExprId) -> String {
        match &ast.expr(id).kind {
            ExprKind::IntLit(v) => v.to_string(),
            ExprKind::Ident(_) => "id".into(),
            ExprKind::BoolLit(b) => b.to_string(),
            ExprKind::Binary(bin) => format!(
                "({} {} {})",
                bin.op.as_str(),
                sexpr(ast, bin.lhs),
                sexpr(ast, bin.rhs)
            ),
            ExprKind::Prefix(pre) => {
                format!("({} {})", pre.op.as_str(), sexpr(ast, pre.expr))
            }
            ExprKind::Call(call) => {
                let args: Vec<_> = call.args.iter().map(|&a| sexpr(ast, a)).collect();
                format!("(call {} [{}])", sexpr(ast, call.callee), args.join(" "))
            }
            ExprKind::Index(ix) => {
                format!("(index {} {})", sexpr(ast, ix.base), sexpr(ast, ix.index))
            }
            ExprKind::Slice(sl) => format!(
                "(slice {} {} {})",
                sexpr(ast, sl.base),
                sl.start.map_or("_".into(), |s| sexpr(ast, s)),
                sl.end.map_or("_".into(), |e| sexpr(ast, e)),
            ),
            other => format!("{other:?}"),
        }
    }

    /// Parses `x = <expr>;` and renders the initializer.
    fn expr_shape(expr_src: &str) -> String {
        let source = format!("x = {expr_src};");
        let (file, _) = parse(&source, 0);
        assert!(
            !file.diagnostics.has_errors(),
            "errors for {expr_src:?}: {:?}",
            file.diagnostics.diagnostics()
        );
        let module = file.module.unwrap();
        match &file.ast.decl(module.decls[0]).kind {
            DeclKind::Var(var) => sexpr(&file.ast, var.init.unwrap()),
            other => panic!("expected var decl, got {other:?}"),
        }
    }

    #[test]
    fn same_level_folds_left() {
        assert_eq!(expr_shape("1 + 2 + 3"), "(+ (+ 1 2) 3)");
        assert_eq!(expr_shape("1 * 2 * 3"), "(* (* 1 2) 3)");
        assert_eq!(expr_shape("1 - 2 + 3"), "(+ (- 1 2) 3)");
    }

    #[test]
    fn higher_level_binds_tighter() {
        assert_eq!(expr_shape("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(expr_shape("1 * 2 + 3"), "(+ (* 1 2) 3)");
        assert_eq!(expr_shape("1 + 2 << 3"), "(<< (+ 1 2) 3)");
        assert_eq!(expr_shape("1 << 2 == 3"), "(== (<< 1 2) 3)");
        assert_eq!(expr_shape("1 == 2 & 3"), "(& (== 1 2) 3)");
        assert_eq!(expr_shape("1 & 2 | 3"), "(| (& 1 2) 3)");
    }

    #[test]
    fn parens_override_precedence() {
        assert_eq!(expr_shape("(1 + 2) * 3"), "(* (+ 1 2) 3)");
    }

    #[test]
    fn comparison_is_non_associative() {
        // One comparison parses fine...
        assert_eq!(expr_shape("1 < 2"), "(< 1 2)");
        // ...but chaining a second is a syntax error.
        let (file, _) = parse("x = 1 < 2 < 3;", 0);
        assert!(file.diagnostics.has_errors());
    }

    #[test]
    fn compound_add_sub_assign_sit_at_additive_level() {
        // `+=`/`-=` live in the table at level 50.
        assert_eq!(expr_shape("id += 2 * 3"), "(+= id (* 2 3))");
        assert_eq!(expr_shape("id -= 1"), "(-= id 1)");
    }

    #[test]
    fn prefix_operators() {
        assert_eq!(expr_shape("-1 + 2"), "(+ (- 1) 2)");
        assert_eq!(expr_shape("!true"), "(! true)");
        assert_eq!(expr_shape("~1"), "(~ 1)");
        assert_eq!(expr_shape("&id"), "(& id)");
        assert_eq!(expr_shape("!!true"), "(! (! true))");
        // Prefix binds tighter than any binary operator.
        assert_eq!(expr_shape("-1 * 2"), "(* (- 1) 2)");
    }

    #[test]
    fn suffix_operators_fold_left() {
        assert_eq!(expr_shape("f(1)(2)"), "(call (call id [1]) [2])");
        assert_eq!(expr_shape("a[1][2]"), "(index (index id 1) 2)");
        assert_eq!(expr_shape("f(1)[2]"), "(index (call id [1]) 2)");
        assert_eq!(expr_shape("a[1](2)"), "(call (index id 1) [2])");
    }

    #[test]
    fn call_arguments() {
        assert_eq!(expr_shape("f()"), "(call id [])");
        assert_eq!(expr_shape("f(1, 2, 3)"), "(call id [1 2 3])");
        // Trailing comma admitted.
        assert_eq!(expr_shape("f(1, 2,)"), "(call id [1 2])");
    }

    #[test]
    fn slices() {
        assert_eq!(expr_shape("a[1 .. 2]"), "(slice id 1 2)");
        assert_eq!(expr_shape("a[.. 2]"), "(slice id _ 2)");
        assert_eq!(expr_shape("a[1 ..]"), "(slice id 1 _)");
        assert_eq!(expr_shape("a[..]"), "(slice id _ _)");
    }

    #[test]
    fn literals() {
        let (file, interner) = parse("x = \"hi\\n\";", 0);
        assert!(!file.diagnostics.has_errors());
        let module = file.module.unwrap();
        let var = match &file.ast.decl(module.decls[0]).kind {
            DeclKind::Var(var) => var.clone(),
            other => panic!("expected var, got {other:?}"),
        };
        match file.ast.expr(var.init.unwrap()).kind {
            ExprKind::StrLit(sym) => {
                // Quotes stripped, escape kept verbatim.
                assert_eq!(interner.resolve(sym), Some("hi\\n"));
            }
            ref other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn empty_string_literal() {
        // spec scenario 1
        let (file, interner) = parse("x = \"\";", 0);
        assert!(!file.diagnostics.has_errors());
        let module = file.module.unwrap();
        let var = match &file.ast.decl(module.decls[0]).kind {
            DeclKind::Var(var) => var.clone(),
            other => panic!("expected var, got {other:?}"),
        };
        match file.ast.expr(var.init.unwrap()).kind {
            ExprKind::StrLit(sym) => assert_eq!(interner.resolve(sym), Some("")),
            ref other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn char_literals() {
        for (src, expected) in [("'a'", 'a'), ("'\\n'", '\n'), ("'\\t'", '\t'), ("'\\''", '\'')] {
            let source = format!("x = {src};");
            let (file, _) = parse(&source, 0);
            assert!(!file.diagnostics.has_errors(), "errors for {src}");
            let module = file.module.unwrap();
            let var = match &file.ast.decl(module.decls[0]).kind {
                DeclKind::Var(var) => var.clone(),
                other => panic!("expected var, got {other:?}"),
            };
            assert_eq!(
                &file.ast.expr(var.init.unwrap()).kind,
                &ExprKind::CharLit(expected),
                "for {src}"
            );
        }
    }

    #[test]
    fn keyword_literals() {
        assert_eq!(expr_shape("true"), "true");
        let (file, _) = parse("x = null; y = unreachable;", 0);
        assert!(!file.diagnostics.has_errors());
    }

    #[test]
    fn if_expression_with_else() {
        let (file, _) = parse("x = if (true) 1 else 2;", 0);
        assert!(!file.diagnostics.has_errors());
        let module = file.module.unwrap();
        let var = match &file.ast.decl(module.decls[0]).kind {
            DeclKind::Var(var) => var.clone(),
            other => panic!("expected var, got {other:?}"),
        };
        match file.ast.expr(var.init.unwrap()).kind {
            ExprKind::If(ife) => {
                assert!(ife.has_else());
                assert_eq!(&file.ast.expr(ife.then_expr).kind, &ExprKind::IntLit(1));
                assert_eq!(
                    &file.ast.expr(ife.else_expr.unwrap()).kind,
                    &ExprKind::IntLit(2)
                );
            }
            ref other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn if_expression_without_else_has_no_branch() {
        let (file, _) = parse("x = if (true) 1;", 0);
        assert!(!file.diagnostics.has_errors());
        let module = file.module.unwrap();
        let var = match &file.ast.decl(module.decls[0]).kind {
            DeclKind::Var(var) => var.clone(),
            other => panic!("expected var, got {other:?}"),
        };
        match file.ast.expr(var.init.unwrap()).kind {
            ExprKind::If(ife) => {
                assert!(!ife.has_else());
                assert!(ife.else_expr.is_none());
            }
            ref other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn init_list() {
        let (file, _) = parse("x = { 1, 2, 3 };", 0);
        assert!(!file.diagnostics.has_errors());
        let module = file.module.unwrap();
        let var = match &file.ast.decl(module.decls[0]).kind {
            DeclKind::Var(var) => var.clone(),
            other => panic!("expected var, got {other:?}"),
        };
        match &file.ast.expr(var.init.unwrap()).kind {
            ExprKind::InitList(entries) => assert_eq!(entries.len(), 3),
            other => panic!("expected init list, got {other:?}"),
        }
    }

    #[test]
    fn init_list_trailing_comma_and_empty() {
        for (src, len) in [("{ 1, }", 1), ("{}", 0), ("{ 1, 2, }", 2)] {
            let source = format!("x = {src};");
            let (file, _) = parse(&source, 0);
            assert!(!file.diagnostics.has_errors(), "errors for {src}");
            let module = file.module.unwrap();
            let var = match &file.ast.decl(module.decls[0]).kind {
                DeclKind::Var(var) => var.clone(),
                other => panic!("expected var, got {other:?}"),
            };
            match &file.ast.expr(var.init.unwrap()).kind {
                ExprKind::InitList(entries) => assert_eq!(entries.len(), len, "for {src}"),
                other => panic!("expected init list for {src}, got {other:?}"),
            }
        }
    }

    #[test]
    fn match_expression() {
        let source = "x = match (y) { 1, 2: 10, 3 .. 5 => 20, else: 30 };";
        let (file, _) = parse(source, 0);
        assert!(
            !file.diagnostics.has_errors(),
            "{:?}",
            file.diagnostics.diagnostics()
        );
        let module = file.module.unwrap();
        let var = match &file.ast.decl(module.decls[0]).kind {
            DeclKind::Var(var) => var.clone(),
            other => panic!("expected var, got {other:?}"),
        };
        let arms = match &file.ast.expr(var.init.unwrap()).kind {
            ExprKind::Match(m) => &m.arms,
            other => panic!("expected match, got {other:?}"),
        };
        assert_eq!(arms.len(), 3);
        match &arms[0].case {
            MatchCase::Items(items) => {
                assert_eq!(items.len(), 2);
                assert!(items[0].end.is_none());
            }
            other => panic!("expected items, got {other:?}"),
        }
        match &arms[1].case {
            MatchCase::Items(items) => {
                assert_eq!(items.len(), 1);
                assert!(items[0].end.is_some());
            }
            other => panic!("expected range item, got {other:?}"),
        }
        assert_eq!(arms[2].case, MatchCase::Else);
    }

    #[test]
    fn match_without_parens() {
        let (file, _) = parse("x = match y { else: 0 };", 0);
        assert!(!file.diagnostics.has_errors());
    }

    #[test]
    fn match_missing_separator() {
        let (file, _) = parse("x = match (y) { 1 10 };", 0);
        assert!(file.diagnostics.has_errors());
        assert_eq!(
            file.diagnostics.diagnostics()[0].message,
            "missing `:` or `=>` after match case"
        );
    }

    #[test]
    fn break_continue_return_forms() {
        let sources = [
            "func f() -> Int { break; }",
            "func f() -> Int { break 1; }",
            "func f() -> Int { break :out; }",
            "func f() -> Int { break :out 1; }",
            "func f() -> Int { continue; }",
            "func f() -> Int { continue :out; }",
            "func f() -> Int { return; }",
            "func f() -> Int { return 1 + 2; }",
        ];
        for source in sources {
            let (file, _) = parse(source, 0);
            assert!(
                !file.diagnostics.has_errors(),
                "errors for {source:?}: {:?}",
                file.diagnostics.diagnostics()
            );
        }
    }

    #[test]
    fn int_literal_overflow() {
        let (file, _) = parse("x = 99999999999999999999999999;", 0);
        assert!(file.diagnostics.has_errors());
        assert_eq!(
            file.diagnostics.diagnostics()[0].message,
            "integer literal too large"
        );
    }
}
