//! Recursive descent parser for Riv.
//!
//! The lexer runs to completion first; the parser is a cursor over the
//! materialized token vector. Productions advance only through the cursor
//! primitives (`advance`, `eat`, `expect`), and productions that probe
//! ("did not match") save and restore the cursor index. The first error
//! aborts the parse: it is emitted into the [`DiagnosticSink`] and `Err(())`
//! unwinds to the entry point, which hands back `module: None`.
//!
//! Grammar productions are split the usual way: declarations here,
//! expressions in [`expr`], statements in [`stmt`], type expressions in
//! [`types`].

mod expr;
mod stmt;
mod types;

use riv_common::diagnostics::DiagnosticSink;
use riv_common::span::Span;
use riv_common::symbol::{Ident, SymbolInterner};

use crate::ast::{Ast, Decl, DeclId, DeclKind, FuncDecl, Module, Param, StmtKind, VarDecl};
use crate::errors::SyntaxError;
use crate::lexer;
use crate::token::{Token, TokenKind};

/// Productions return `Err(())` after emitting a diagnostic; the payload
/// lives in the sink.
pub type ParseResult<T> = Result<T, ()>;

/// Maximum syntactic nesting before the parser reports an error instead of
/// recursing further.
const MAX_NESTING: u32 = 200;

/// The result of parsing one buffer.
#[derive(Debug)]
pub struct ParsedFile {
    /// Arena holding every node, including orphans from backtracked probes.
    pub ast: Ast,
    /// The module root, or `None` if a syntax error aborted the parse.
    pub module: Option<Module>,
    pub diagnostics: DiagnosticSink,
}

impl ParsedFile {
    /// True if the parse produced a usable module.
    pub fn is_ok(&self) -> bool {
        self.module.is_some() && !self.diagnostics.has_errors()
    }
}

/// Parses a buffer with a fresh interner.
pub fn parse(source: &str, base: u32) -> (ParsedFile, SymbolInterner) {
    let mut interner = SymbolInterner::new();
    let file = parse_with_interner(source, base, &mut interner);
    (file, interner)
}

/// Parses a buffer, interning identifiers into the caller's interner.
pub fn parse_with_interner(
    source: &str,
    base: u32,
    interner: &mut SymbolInterner,
) -> ParsedFile {
    let (tokens, diagnostics) = lexer::lex(source, base);
    if diagnostics.has_errors() {
        return ParsedFile {
            ast: Ast::new(),
            module: None,
            diagnostics,
        };
    }

    let mut parser = Parser::new(source, base, tokens, interner);
    let module = parser.parse_module().ok();
    ParsedFile {
        ast: parser.ast,
        module,
        diagnostics: parser.diagnostics,
    }
}

/// The token-stream cursor plus everything productions need.
pub struct Parser<'a> {
    source: &'a str,
    base: u32,
    tokens: Vec<Token>,
    pos: usize,
    pub(crate) current: Token,
    pub(crate) peek: Token,
    /// Span of the most recently consumed token, for node end positions.
    prev_span: Span,
    pub(crate) ast: Ast,
    interner: &'a mut SymbolInterner,
    pub(crate) diagnostics: DiagnosticSink,
    depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(
        source: &'a str,
        base: u32,
        tokens: Vec<Token>,
        interner: &'a mut SymbolInterner,
    ) -> Self {
        debug_assert!(matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof));
        let current = tokens[0];
        let peek = tokens.get(1).copied().unwrap_or(current);
        Self {
            source,
            base,
            tokens,
            pos: 0,
            current,
            peek,
            prev_span: Span::new(base, base),
            ast: Ast::new(),
            interner,
            diagnostics: DiagnosticSink::new(),
            depth: 0,
        }
    }

    // === Cursor primitives ===

    fn token_at(&self, pos: usize) -> Token {
        self.tokens
            .get(pos)
            .copied()
            .unwrap_or(*self.tokens.last().unwrap())
    }

    /// Consumes the current token.
    pub(crate) fn advance(&mut self) {
        self.prev_span = self.current.span;
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        self.current = self.token_at(self.pos);
        self.peek = self.token_at(self.pos + 1);
    }

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    #[inline]
    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    #[inline]
    pub(crate) fn at_eof(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Consumes the current token if its kind matches.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Like [`eat`](Self::eat), returning the consumed token.
    pub(crate) fn eat_token(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            let token = self.current;
            self.advance();
            Some(token)
        } else {
            None
        }
    }

    /// Consumes the current token or reports "expected X; found Y".
    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        match self.eat_token(kind) {
            Some(token) => Ok(token),
            None => {
                self.diagnostics.emit(SyntaxError::ExpectedToken.at_with_message(
                    self.current.span,
                    format!("expected `{}`; found `{}`", kind, self.current.kind),
                ));
                Err(())
            }
        }
    }

    /// Cursor checkpoint for backtracking productions.
    #[inline]
    pub(crate) fn save(&self) -> usize {
        self.pos
    }

    pub(crate) fn restore(&mut self, pos: usize) {
        self.pos = pos;
        self.current = self.token_at(pos);
        self.peek = self.token_at(pos + 1);
        self.prev_span = if pos == 0 {
            Span::new(self.base, self.base)
        } else {
            self.token_at(pos - 1).span
        };
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub(crate) fn prev_span(&self) -> Span {
        self.prev_span
    }

    /// The source text under a span.
    pub(crate) fn span_text(&self, span: Span) -> &'a str {
        let start = (span.start.0 - self.base) as usize;
        let end = (span.end.0 - self.base) as usize;
        &self.source[start..end]
    }

    pub(crate) fn intern_span(&mut self, span: Span) -> riv_common::symbol::Symbol {
        let text = self.span_text(span);
        self.interner.intern(text)
    }

    /// Consumes an identifier token into an [`Ident`].
    pub(crate) fn parse_ident(&mut self) -> ParseResult<Ident> {
        if !self.at(TokenKind::Ident) {
            self.diagnostics.emit(SyntaxError::ExpectedIdent.at_with_message(
                self.current.span,
                format!("expected identifier; found `{}`", self.current.kind),
            ));
            return Err(());
        }
        let token = self.current;
        self.advance();
        let sym = self.intern_span(token.span);
        Ok(Ident::new(sym, token.span))
    }

    /// Runs a production one nesting level deeper, reporting an error when
    /// the recursion bound is crossed.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            self.diagnostics
                .emit(SyntaxError::NestingTooDeep.at(self.current.span));
            return Err(());
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    // === Declarations ===

    /// Parses a whole buffer: declarations until end of file.
    pub fn parse_module(&mut self) -> ParseResult<Module> {
        let start = self.current.span;
        let mut decls = Vec::new();
        while !self.at_eof() {
            decls.push(self.parse_decl()?);
        }
        Ok(Module {
            decls,
            span: start.to(self.prev_span),
        })
    }

    fn parse_decl(&mut self) -> ParseResult<DeclId> {
        if self.at(TokenKind::Func) {
            return self.parse_func_decl();
        }

        if let Some((var, span)) = self.parse_var_decl()? {
            return Ok(self.ast.decls.alloc(Decl {
                kind: DeclKind::Var(var),
                span,
            }));
        }

        self.diagnostics.emit(SyntaxError::ExpectedDecl.at_with_message(
            self.current.span,
            format!("expected declaration; found `{}`", self.current.kind),
        ));
        Err(())
    }

    /// `func IDENT ( ParamList ) -> TypeExpr (Block | ;)`
    fn parse_func_decl(&mut self) -> ParseResult<DeclId> {
        let start = self.current.span;
        self.expect(TokenKind::Func)?;
        let name = self.parse_ident()?;

        self.expect(TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(TokenKind::RParen)?;

        if !self.eat(TokenKind::RArrow) {
            self.diagnostics.emit(SyntaxError::ExpectedReturnType.at_with_message(
                self.current.span,
                format!("expected return type; found `{}`", self.current.kind),
            ));
            return Err(());
        }
        let ret = match self.parse_type_expr()? {
            Some(ty) => ty,
            None => {
                self.diagnostics.emit(SyntaxError::ExpectedReturnType.at_with_message(
                    self.current.span,
                    format!("expected return type; found `{}`", self.current.kind),
                ));
                return Err(());
            }
        };

        let body = if self.at(TokenKind::LBrace) {
            Some(self.parse_block()?)
        } else {
            self.expect(TokenKind::Semicolon)?;
            None
        };

        Ok(self.ast.decls.alloc(Decl {
            kind: DeclKind::Func(FuncDecl {
                name,
                params,
                ret,
                body,
            }),
            span: start.to(self.prev_span),
        }))
    }

    fn parse_param_list(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        while !self.at(TokenKind::RParen) && !self.at_eof() {
            params.push(self.parse_param()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        // At most one variadic parameter, and only in last position.
        let mut variadics = params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_variadic)
            .map(|(i, p)| (i, p.span));
        if let Some((first, first_span)) = variadics.next() {
            if let Some((_, second_span)) = variadics.next() {
                self.diagnostics
                    .emit(SyntaxError::MultipleVariadic.at(second_span));
                return Err(());
            }
            if first != params.len() - 1 {
                self.diagnostics
                    .emit(SyntaxError::VariadicNotLast.at(first_span));
                return Err(());
            }
        }

        Ok(params)
    }

    /// `... IDENT?` (variadic) or `TypeExpr IDENT`.
    fn parse_param(&mut self) -> ParseResult<Param> {
        let start = self.current.span;

        if self.eat(TokenKind::Ellipsis) {
            let name = if self.at(TokenKind::Ident) {
                Some(self.parse_ident()?)
            } else {
                None
            };
            return Ok(Param {
                name,
                ty: None,
                is_variadic: true,
                span: start.to(self.prev_span),
            });
        }

        let ty = match self.parse_type_expr()? {
            Some(ty) => ty,
            None => {
                self.diagnostics.emit(SyntaxError::ExpectedType.at_with_message(
                    self.current.span,
                    format!("expected parameter type; found `{}`", self.current.kind),
                ));
                return Err(());
            }
        };
        let name = self.parse_ident()?;

        Ok(Param {
            name: Some(name),
            ty: Some(ty),
            is_variadic: false,
            span: start.to(self.prev_span),
        })
    }

    /// `export? (mutable|const)? TypeExpr? IDENT (= Expr)? ;`
    ///
    /// Returns `None` with the cursor unchanged when the tokens do not form
    /// a variable declaration. The `TypeExpr? IDENT` ambiguity resolves by
    /// reinterpretation: a bare-identifier "type" followed by `=` or (with
    /// modifiers) `;` is the variable name of an untyped declaration.
    pub(crate) fn parse_var_decl(&mut self) -> ParseResult<Option<(VarDecl, Span)>> {
        let checkpoint = self.save();
        let start = self.current.span;

        let export_tok = self.eat_token(TokenKind::Export);
        let mutable_tok = self.eat_token(TokenKind::Mutable);
        let const_tok = self.eat_token(TokenKind::Const);
        let has_mods =
            export_tok.is_some() || mutable_tok.is_some() || const_tok.is_some();

        if let (Some(_), Some(const_tok)) = (mutable_tok, const_tok) {
            self.diagnostics
                .emit(SyntaxError::MutableAndConst.at(start.to(const_tok.span)));
            return Err(());
        }

        let ty = self.parse_type_expr()?;

        let (name, ty) = if self.at(TokenKind::Ident) {
            (self.parse_ident()?, ty)
        } else {
            // No identifier after the type: the "type" may be the name.
            let bare = ty.and_then(|id| {
                let t = self.ast.type_expr(id);
                if !t.prefixes.is_empty() {
                    return None;
                }
                match self.ast.expr(t.base).kind {
                    crate::ast::ExprKind::Ident(ident) => Some(ident),
                    _ => None,
                }
            });
            let reinterpret = match bare {
                Some(_) if self.at(TokenKind::Eq) => true,
                Some(_) if has_mods && self.at(TokenKind::Semicolon) => true,
                _ => false,
            };
            if reinterpret {
                (bare.unwrap(), None)
            } else if has_mods {
                self.diagnostics.emit(SyntaxError::ExpectedIdent.at_with_message(
                    self.current.span,
                    format!("expected identifier; found `{}`", self.current.kind),
                ));
                return Err(());
            } else {
                self.restore(checkpoint);
                return Ok(None);
            }
        };

        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_expr_required()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        let var = VarDecl {
            name,
            ty,
            init,
            is_export: export_tok.is_some(),
            is_mutable: mutable_tok.is_some(),
            is_const: const_tok.is_some(),
        };
        Ok(Some((var, start.to(self.prev_span))))
    }

    /// Allocates an expression statement node.
    pub(crate) fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> crate::ast::StmtId {
        self.ast.stmts.alloc(crate::ast::Stmt { kind, span })
    }
}
