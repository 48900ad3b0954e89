//! Statement parsing.
//!
//! Dispatch is by first-token lookahead. The only backtracking production is
//! the variable declaration: in statement position `TypeExpr? IDENT` cannot
//! be told from an expression without parsing, so the declaration is probed
//! and the cursor restored when it does not commit.

use super::{ParseResult, Parser};
use crate::ast::*;
use crate::errors::SyntaxError;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// Parses one statement. Returns `None` (cursor unchanged) when the
    /// current token cannot start one, letting the block close.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Option<StmtId>> {
        self.nested(|p| p.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Option<StmtId>> {
        let start = self.current.span;

        match self.current.kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(Some(self.alloc_stmt(StmtKind::Empty, start)))
            }
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = self.ast.block(block).span;
                Ok(Some(self.alloc_stmt(StmtKind::Block(block), span)))
            }
            TokenKind::If => self.parse_if_stmt().map(Some),
            TokenKind::Defer => self.parse_defer_stmt().map(Some),
            TokenKind::Match => {
                let expr = self.parse_match_expr()?;
                let span = self.ast.expr(expr).span;
                Ok(Some(self.alloc_stmt(StmtKind::Expr(expr), span)))
            }
            TokenKind::Inline | TokenKind::Loop => self.parse_loop_stmt(None).map(Some),
            TokenKind::Ident if self.peek_is(TokenKind::Colon) => {
                self.parse_labeled_stmt().map(Some)
            }
            _ => {
                // Variable declaration, then assignment-expression statement.
                if self.can_start_var_decl() {
                    if let Some((var, span)) = self.parse_var_decl()? {
                        return Ok(Some(self.alloc_stmt(StmtKind::Var(var), span)));
                    }
                }

                let Some(expr) = self.parse_assign_expr()? else {
                    return Ok(None);
                };
                self.expect(TokenKind::Semicolon)?;
                let span = start.to(self.prev_span());
                Ok(Some(self.alloc_stmt(StmtKind::Expr(expr), span)))
            }
        }
    }

    /// Tokens that can open the `export? (mutable|const)? TypeExpr?` head of
    /// a declaration. Anything else skips the probe entirely.
    fn can_start_var_decl(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Export
                | TokenKind::Mutable
                | TokenKind::Const
                | TokenKind::Ident
                | TokenKind::Question
                | TokenKind::Amp
                | TokenKind::LBracket
        )
    }

    /// `{ Stmt* }`
    pub(crate) fn parse_block(&mut self) -> ParseResult<BlockId> {
        let start = self.current.span;
        self.expect(TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            match self.parse_statement()? {
                Some(stmt) => stmts.push(stmt),
                None => break,
            }
        }
        self.expect(TokenKind::RBrace)?;

        Ok(self.ast.blocks.alloc(Block {
            label: None,
            stmts,
            span: start.to(self.prev_span()),
        }))
    }

    /// `IDENT :` attached to a block or a loop; anything else is an error.
    fn parse_labeled_stmt(&mut self) -> ParseResult<StmtId> {
        let start = self.current.span;
        let label = self.parse_ident()?;
        self.expect(TokenKind::Colon)?;

        match self.current.kind {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                self.ast.blocks[block].label = Some(label);
                let span = start.to(self.prev_span());
                Ok(self.alloc_stmt(StmtKind::Block(block), span))
            }
            TokenKind::Inline | TokenKind::Loop => self.parse_loop_stmt(Some(label)),
            _ => {
                self.diagnostics.emit(SyntaxError::InvalidToken.at_with_message(
                    self.current.span,
                    format!("invalid token: `{}`", self.current.kind),
                ));
                Err(())
            }
        }
    }

    /// `if ( Expr ) Body (else Stmt)?`
    fn parse_if_stmt(&mut self) -> ParseResult<StmtId> {
        let start = self.current.span;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr_required()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = self.parse_body_stmt(SyntaxError::ExpectedIfBody)?;

        // Dangling else binds to the innermost unbound if: the recursive
        // call consumes it before control returns here.
        let else_branch = if self.eat(TokenKind::Else) {
            match self.parse_statement()? {
                Some(stmt) => Some(stmt),
                None => {
                    self.diagnostics.emit(SyntaxError::ExpectedStmt.at_with_message(
                        self.current.span,
                        format!("expected statement; found `{}`", self.current.kind),
                    ));
                    return Err(());
                }
            }
        } else {
            None
        };

        let span = start.to(self.prev_span());
        Ok(self.alloc_stmt(
            StmtKind::If(IfStmt {
                cond,
                then_branch,
                else_branch,
            }),
            span,
        ))
    }

    /// `defer (Block | AssignmentExpr ;)`
    fn parse_defer_stmt(&mut self) -> ParseResult<StmtId> {
        let start = self.current.span;
        self.expect(TokenKind::Defer)?;
        let body = self.parse_body_stmt(SyntaxError::ExpectedStmt)?;
        let span = start.to(self.prev_span());
        Ok(self.alloc_stmt(StmtKind::Defer(body), span))
    }

    /// A block, or an assignment expression terminated by `;`.
    fn parse_body_stmt(&mut self, missing: SyntaxError) -> ParseResult<StmtId> {
        if self.at(TokenKind::LBrace) {
            let start = self.current.span;
            let block = self.parse_block()?;
            let span = start.to(self.prev_span());
            return Ok(self.alloc_stmt(StmtKind::Block(block), span));
        }

        let start = self.current.span;
        match self.parse_assign_expr()? {
            Some(expr) => {
                self.expect(TokenKind::Semicolon)?;
                let span = start.to(self.prev_span());
                Ok(self.alloc_stmt(StmtKind::Expr(expr), span))
            }
            None => {
                self.diagnostics.emit(missing.at_with_message(
                    self.current.span,
                    format!("{}; found `{}`", missing.message(), self.current.kind),
                ));
                Err(())
            }
        }
    }

    /// `inline? loop (header)? Block` in its three forms.
    fn parse_loop_stmt(&mut self, label: Option<riv_common::Ident>) -> ParseResult<StmtId> {
        let start = label.map_or(self.current.span, |l| l.span);
        let is_inline = self.eat(TokenKind::Inline);

        if !self.at(TokenKind::Loop) {
            // `inline` must introduce a loop.
            self.diagnostics.emit(SyntaxError::InvalidToken.at_with_message(
                self.current.span,
                format!("invalid token: `{}`", self.current.kind),
            ));
            return Err(());
        }
        self.advance();

        let kind = if self.at(TokenKind::LBrace) {
            LoopKind::While { cond: None }
        } else {
            self.parse_loop_header()?
        };

        let body = self.parse_block()?;
        let span = start.to(self.prev_span());
        Ok(self.alloc_stmt(
            StmtKind::Loop(LoopStmt {
                label,
                is_inline,
                kind,
                body,
            }),
            span,
        ))
    }

    /// The parenthesized loop header: in-style, C-style, or while-style.
    fn parse_loop_header(&mut self) -> ParseResult<LoopKind> {
        self.expect(TokenKind::LParen)?;

        // `loop (x in xs)`
        if self.at(TokenKind::Ident) && self.peek_is(TokenKind::In) {
            let binder = self.parse_ident()?;
            self.expect(TokenKind::In)?;
            let iterable = self.parse_expr_required()?;
            self.expect(TokenKind::RParen)?;
            return Ok(LoopKind::In { binder, iterable });
        }

        // `loop (; cond?; step?)`
        if self.eat(TokenKind::Semicolon) {
            return self.parse_loop_c_tail(None);
        }

        // A variable declaration as the C-style initializer consumes its own
        // terminating semicolon.
        if self.can_start_var_decl() {
            if let Some((var, span)) = self.parse_var_decl()? {
                let init = self.alloc_stmt(StmtKind::Var(var), span);
                return self.parse_loop_c_tail(Some(init));
            }
        }

        let first_start = self.current.span;
        let first = self.parse_assign_expr_required()?;

        if self.eat(TokenKind::Semicolon) {
            // C-style with an expression initializer.
            let span = first_start.to(self.prev_span());
            let init = self.alloc_stmt(StmtKind::Expr(first), span);
            return self.parse_loop_c_tail(Some(init));
        }

        // While-style.
        self.expect(TokenKind::RParen)?;
        Ok(LoopKind::While { cond: Some(first) })
    }

    /// The `cond?; step?)` tail of a C-style header. The initializer's
    /// semicolon has already been consumed.
    fn parse_loop_c_tail(&mut self, init: Option<StmtId>) -> ParseResult<LoopKind> {
        let cond = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr_required()?)
        };
        self.expect(TokenKind::Semicolon)?;

        let step = if self.at(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_assign_expr_required()?)
        };
        self.expect(TokenKind::RParen)?;

        Ok(LoopKind::C { init, cond, step })
    }
}

#[cfg(test)]
mod tests {
    use super::super::{parse, ParsedFile};
    use crate::ast::*;
    use riv_common::symbol::SymbolInterner;

    fn parse_ok(source: &str) -> (ParsedFile, SymbolInterner) {
        let (file, interner) = parse(source, 0);
        assert!(
            !file.diagnostics.has_errors(),
            "errors for {source:?}: {:?}",
            file.diagnostics.diagnostics()
        );
        (file, interner)
    }

    /// Statements of the body of the first function in the module.
    fn body_stmts(file: &ParsedFile) -> Vec<StmtId> {
        let module = file.module.as_ref().unwrap();
        match &file.ast.decl(module.decls[0]).kind {
            DeclKind::Func(func) => file.ast.block(func.body.unwrap()).stmts.clone(),
            other => panic!("expected function, got {other:?}"),
        }
    }

    fn in_func(body: &str) -> String {
        format!("func f() -> Int {{ {body} }}")
    }

    #[test]
    fn empty_block() {
        let (file, _) = parse_ok("func f() -> Int { }");
        assert!(body_stmts(&file).is_empty());
    }

    #[test]
    fn empty_statement() {
        let (file, _) = parse_ok(&in_func(";"));
        let stmts = body_stmts(&file);
        assert_eq!(stmts.len(), 1);
        assert_eq!(&file.ast.stmt(stmts[0]).kind, &StmtKind::Empty);
    }

    #[test]
    fn if_statement_with_else() {
        // spec scenario: if (a) b; else c;
        let (file, interner) = parse_ok(&in_func("if (a) b; else c;"));
        let stmts = body_stmts(&file);
        assert_eq!(stmts.len(), 1);

        let ifs = match &file.ast.stmt(stmts[0]).kind {
            StmtKind::If(ifs) => ifs.clone(),
            other => panic!("expected if, got {other:?}"),
        };

        let ident_of = |expr: ExprId| match file.ast.expr(expr).kind {
            ExprKind::Ident(ident) => interner.resolve(ident.sym).unwrap().to_string(),
            ref other => panic!("expected ident, got {other:?}"),
        };
        assert_eq!(ident_of(ifs.cond), "a");

        match file.ast.stmt(ifs.then_branch).kind {
            StmtKind::Expr(e) => assert_eq!(ident_of(e), "b"),
            ref other => panic!("expected expr stmt, got {other:?}"),
        }
        match file.ast.stmt(ifs.else_branch.unwrap()).kind {
            StmtKind::Expr(e) => assert_eq!(ident_of(e), "c"),
            ref other => panic!("expected expr stmt, got {other:?}"),
        }
    }

    #[test]
    fn if_statement_block_body() {
        let (file, _) = parse_ok(&in_func("if (a) { b; } else { c; }"));
        let stmts = body_stmts(&file);
        let ifs = match &file.ast.stmt(stmts[0]).kind {
            StmtKind::If(ifs) => ifs.clone(),
            other => panic!("expected if, got {other:?}"),
        };
        assert!(matches!(
            file.ast.stmt(ifs.then_branch).kind,
            StmtKind::Block(_)
        ));
        assert!(matches!(
            file.ast.stmt(ifs.else_branch.unwrap()).kind,
            StmtKind::Block(_)
        ));
    }

    #[test]
    fn dangling_else_binds_innermost() {
        // Without a `;` boundary the inner if consumes the else.
        let (file, _) = parse_ok(&in_func("if (a) if (b) c else d;"));
        let stmts = body_stmts(&file);
        let outer = match &file.ast.stmt(stmts[0]).kind {
            StmtKind::If(ifs) => ifs.clone(),
            other => panic!("expected if, got {other:?}"),
        };
        assert!(outer.else_branch.is_none());
        let inner = match file.ast.stmt(outer.then_branch).kind {
            StmtKind::Expr(e) => match file.ast.expr(e).kind {
                ExprKind::If(inner) => inner,
                ref other => panic!("expected if expression, got {other:?}"),
            },
            ref other => panic!("expected expression statement, got {other:?}"),
        };
        assert!(inner.has_else());
    }

    #[test]
    fn semicolon_closes_then_branch_before_else() {
        // With the `;` the inner if is complete and the else is the outer's.
        let (file, _) = parse_ok(&in_func("if (a) if (b) c; else d;"));
        let stmts = body_stmts(&file);
        let outer = match &file.ast.stmt(stmts[0]).kind {
            StmtKind::If(ifs) => ifs.clone(),
            other => panic!("expected if, got {other:?}"),
        };
        assert!(outer.else_branch.is_some());
    }

    #[test]
    fn if_missing_body() {
        let (file, _) = parse(&in_func("if (a)"), 0);
        assert!(file.diagnostics.has_errors());
        assert!(file.diagnostics.diagnostics()[0]
            .message
            .starts_with("expected `if` body"));
    }

    #[test]
    fn else_if_chain() {
        let (file, _) = parse_ok(&in_func("if (a) b; else if (c) d; else e;"));
        let stmts = body_stmts(&file);
        let outer = match &file.ast.stmt(stmts[0]).kind {
            StmtKind::If(ifs) => ifs.clone(),
            other => panic!("expected if, got {other:?}"),
        };
        assert!(matches!(
            file.ast.stmt(outer.else_branch.unwrap()).kind,
            StmtKind::If(_)
        ));
    }

    #[test]
    fn defer_forms() {
        let (file, _) = parse_ok(&in_func("defer close(handle); defer { a; b; }"));
        let stmts = body_stmts(&file);
        assert_eq!(stmts.len(), 2);
        match file.ast.stmt(stmts[0]).kind {
            StmtKind::Defer(body) => {
                assert!(matches!(file.ast.stmt(body).kind, StmtKind::Expr(_)));
            }
            ref other => panic!("expected defer, got {other:?}"),
        }
        match file.ast.stmt(stmts[1]).kind {
            StmtKind::Defer(body) => {
                assert!(matches!(file.ast.stmt(body).kind, StmtKind::Block(_)));
            }
            ref other => panic!("expected defer, got {other:?}"),
        }
    }

    #[test]
    fn var_decl_statement() {
        let (file, _) = parse_ok(&in_func("mutable Int i = 0; x = 1;"));
        let stmts = body_stmts(&file);
        assert_eq!(stmts.len(), 2);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Var(var) => {
                assert!(var.is_mutable);
                assert!(var.ty.is_some());
            }
            other => panic!("expected var, got {other:?}"),
        }
        match &file.ast.stmt(stmts[1]).kind {
            StmtKind::Var(var) => assert!(var.ty.is_none()),
            other => panic!("expected var, got {other:?}"),
        }
    }

    #[test]
    fn expression_statements() {
        let (file, _) = parse_ok(&in_func("f(); a[0] = 5; n += 1; total ~= mask;"));
        let stmts = body_stmts(&file);
        assert_eq!(stmts.len(), 4);

        assert!(matches!(file.ast.stmt(stmts[0]).kind, StmtKind::Expr(_)));

        // `a[0] = 5` is an assignment expression, not a declaration.
        match file.ast.stmt(stmts[1]).kind {
            StmtKind::Expr(e) => match file.ast.expr(e).kind {
                ExprKind::Binary(bin) => {
                    assert_eq!(bin.op, BinOp::Assign);
                    assert!(matches!(file.ast.expr(bin.lhs).kind, ExprKind::Index(_)));
                }
                ref other => panic!("expected assignment, got {other:?}"),
            },
            ref other => panic!("expected expr stmt, got {other:?}"),
        }

        match file.ast.stmt(stmts[3]).kind {
            StmtKind::Expr(e) => match file.ast.expr(e).kind {
                ExprKind::Binary(bin) => assert_eq!(bin.op, BinOp::TildeAssign),
                ref other => panic!("expected `~=`, got {other:?}"),
            },
            ref other => panic!("expected expr stmt, got {other:?}"),
        }
    }

    #[test]
    fn labeled_block() {
        let (file, interner) = parse_ok(&in_func("outer: { a; }"));
        let stmts = body_stmts(&file);
        match file.ast.stmt(stmts[0]).kind {
            StmtKind::Block(block) => {
                let label = file.ast.block(block).label.unwrap();
                assert_eq!(interner.resolve(label.sym), Some("outer"));
            }
            ref other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn labeled_loop() {
        let (file, interner) = parse_ok(&in_func("outer: loop (a) { break :outer; }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => {
                assert_eq!(interner.resolve(lp.label.unwrap().sym), Some("outer"));
                assert!(matches!(lp.kind, LoopKind::While { cond: Some(_) }));
            }
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn label_without_block_or_loop() {
        let (file, _) = parse(&in_func("out: x = 1;"), 0);
        assert!(file.diagnostics.has_errors());
        assert!(file.diagnostics.diagnostics()[0]
            .message
            .starts_with("invalid token"));
    }

    #[test]
    fn bare_loop() {
        let (file, _) = parse_ok(&in_func("loop { tick(); }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => {
                assert!(!lp.is_inline);
                assert!(matches!(lp.kind, LoopKind::While { cond: None }));
            }
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn while_style_loop() {
        let (file, _) = parse_ok(&in_func("loop (i < 10) { i += 1; }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => assert!(matches!(lp.kind, LoopKind::While { cond: Some(_) })),
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn c_style_loop() {
        let (file, _) = parse_ok(&in_func("loop (mutable i = 0; i < 10; i += 1) { use(i); }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => match &lp.kind {
                LoopKind::C { init, cond, step } => {
                    assert!(matches!(
                        file.ast.stmt(init.unwrap()).kind,
                        StmtKind::Var(_)
                    ));
                    assert!(cond.is_some());
                    assert!(step.is_some());
                }
                other => panic!("expected C loop, got {other:?}"),
            },
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn c_style_loop_empty_clauses() {
        let (file, _) = parse_ok(&in_func("loop (;;) { }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => match &lp.kind {
                LoopKind::C { init, cond, step } => {
                    assert!(init.is_none());
                    assert!(cond.is_none());
                    assert!(step.is_none());
                }
                other => panic!("expected C loop, got {other:?}"),
            },
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn c_style_loop_untyped_decl_init() {
        // `i = 0` is an untyped declaration in loop headers too.
        let (file, _) = parse_ok(&in_func("loop (i = 0; i < 10; i += 1) { }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => match &lp.kind {
                LoopKind::C { init, .. } => {
                    assert!(matches!(
                        file.ast.stmt(init.unwrap()).kind,
                        StmtKind::Var(_)
                    ));
                }
                other => panic!("expected C loop, got {other:?}"),
            },
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn c_style_loop_expr_init() {
        let (file, _) = parse_ok(&in_func("loop (prime(); i < 10; i += 1) { }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => match &lp.kind {
                LoopKind::C { init, .. } => {
                    assert!(matches!(
                        file.ast.stmt(init.unwrap()).kind,
                        StmtKind::Expr(_)
                    ));
                }
                other => panic!("expected C loop, got {other:?}"),
            },
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn in_style_loop() {
        let (file, interner) = parse_ok(&in_func("loop (item in items) { use(item); }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => match &lp.kind {
                LoopKind::In { binder, .. } => {
                    assert_eq!(interner.resolve(binder.sym), Some("item"));
                }
                other => panic!("expected in loop, got {other:?}"),
            },
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn inline_loop() {
        let (file, _) = parse_ok(&in_func("inline loop (i in range) { }"));
        let stmts = body_stmts(&file);
        match &file.ast.stmt(stmts[0]).kind {
            StmtKind::Loop(lp) => assert!(lp.is_inline),
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn inline_without_loop_is_fatal() {
        let (file, _) = parse(&in_func("inline x = 1;"), 0);
        assert!(file.diagnostics.has_errors());
        assert!(file.diagnostics.diagnostics()[0]
            .message
            .starts_with("invalid token"));
    }

    #[test]
    fn match_statement_needs_no_semicolon() {
        let (file, _) = parse_ok(&in_func("match (x) { 1: a, else: b } y = 1;"));
        let stmts = body_stmts(&file);
        assert_eq!(stmts.len(), 2);
        match file.ast.stmt(stmts[0]).kind {
            StmtKind::Expr(e) => {
                assert!(matches!(file.ast.expr(e).kind, ExprKind::Match(_)));
            }
            ref other => panic!("expected match stmt, got {other:?}"),
        }
    }

    #[test]
    fn nested_blocks() {
        let (file, _) = parse_ok(&in_func("{ { a; } b; }"));
        let stmts = body_stmts(&file);
        assert_eq!(stmts.len(), 1);
        match file.ast.stmt(stmts[0]).kind {
            StmtKind::Block(block) => {
                assert_eq!(file.ast.block(block).stmts.len(), 2);
            }
            ref other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_block() {
        let (file, _) = parse("func f() -> Int { a;", 0);
        assert!(file.diagnostics.has_errors());
        assert!(file.diagnostics.diagnostics()[0]
            .message
            .contains("expected `}`"));
    }
}
