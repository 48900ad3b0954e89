//! Abstract syntax tree for Riv.
//!
//! Nodes are tagged variants stored in typed arenas owned by a single
//! [`Ast`] value; children are arena indices (`ExprId`, `StmtId`, ...), so
//! the whole tree shares one lifetime and is freed wholesale when the `Ast`
//! is dropped. Every node carries the span of the tokens it covers.

use la_arena::{Arena, Idx};

use riv_common::span::Span;
use riv_common::symbol::{Ident, Symbol};

pub type ExprId = Idx<Expr>;
pub type StmtId = Idx<Stmt>;
pub type TypeExprId = Idx<TypeExpr>;
pub type BlockId = Idx<Block>;
pub type DeclId = Idx<Decl>;

/// Owner of every AST node produced by one parse.
#[derive(Debug, Default)]
pub struct Ast {
    pub exprs: Arena<Expr>,
    pub stmts: Arena<Stmt>,
    pub types: Arena<TypeExpr>,
    pub blocks: Arena<Block>,
    pub decls: Arena<Decl>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    #[inline]
    pub fn type_expr(&self, id: TypeExprId) -> &TypeExpr {
        &self.types[id]
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id]
    }
}

/// A whole source file: the top-level declarations in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub decls: Vec<DeclId>,
    pub span: Span,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Func(FuncDecl),
    Var(VarDecl),
}

/// `func name(params) -> Ret { ... }` or a bodiless prototype `func f() -> T;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub ret: TypeExprId,
    pub body: Option<BlockId>,
}

impl FuncDecl {
    /// True if any parameter is variadic. The parser guarantees at most one,
    /// in last position.
    pub fn is_variadic(&self) -> bool {
        self.params.iter().any(|p| p.is_variadic)
    }
}

/// One function parameter: `Type name`, or the variadic `... name?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<Ident>,
    pub ty: Option<TypeExprId>,
    pub is_variadic: bool,
    pub span: Span,
}

/// `export? (mutable|const)? Type? name (= init)? ;`
///
/// `is_mutable` and `is_const` are never both set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: Option<TypeExprId>,
    pub init: Option<ExprId>,
    pub is_export: bool,
    pub is_mutable: bool,
    pub is_const: bool,
}

/// `{ stmt* }`, optionally labeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub label: Option<Ident>,
    pub stmts: Vec<StmtId>,
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    /// Stray `;`
    Empty,
    Var(VarDecl),
    /// `defer <block or assignment-expr statement>`
    Defer(StmtId),
    If(IfStmt),
    Loop(LoopStmt),
    Block(BlockId),
    /// An expression (or assignment expression) used as a statement.
    Expr(ExprId),
}

/// `if (cond) then (else alt)?` in statement position. The branches are a
/// block statement or an expression statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub cond: ExprId,
    pub then_branch: StmtId,
    pub else_branch: Option<StmtId>,
}

/// One of the three loop forms, with its optional label and `inline` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopStmt {
    pub label: Option<Ident>,
    pub is_inline: bool,
    pub kind: LoopKind,
    pub body: BlockId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopKind {
    /// `loop (init?; cond?; step?)`
    C {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        step: Option<ExprId>,
    },
    /// `loop (cond)` or the bare `loop { ... }`
    While { cond: Option<ExprId> },
    /// `loop (name in iterable)`
    In { binder: Ident, iterable: ExprId },
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    IntLit(u64),
    /// Raw lexeme; numeric interpretation belongs to a later pass.
    FloatLit(Symbol),
    CharLit(char),
    /// String body with the surrounding quotes stripped, escapes verbatim.
    StrLit(Symbol),
    BoolLit(bool),
    NullLit,
    Unreachable,
    Ident(Ident),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Index(IndexExpr),
    Slice(SliceExpr),
    Call(CallExpr),
    If(IfExpr),
    Match(MatchExpr),
    Block(BlockId),
    InitList(Vec<ExprId>),
    Break(BreakExpr),
    Continue(ContinueExpr),
    Return(ReturnExpr),
}

/// `lhs op rhs`. Both operands are present once the node is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub lhs: ExprId,
    pub rhs: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixExpr {
    pub op: PrefixOp,
    pub expr: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexExpr {
    pub base: ExprId,
    pub index: ExprId,
}

/// `base[start? .. end?]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceExpr {
    pub base: ExprId,
    pub start: Option<ExprId>,
    pub end: Option<ExprId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub callee: ExprId,
    pub args: Vec<ExprId>,
}

/// `if (cond) then else alt` in expression position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfExpr {
    pub cond: ExprId,
    pub then_expr: ExprId,
    pub else_expr: Option<ExprId>,
}

impl IfExpr {
    #[inline]
    pub fn has_else(&self) -> bool {
        self.else_expr.is_some()
    }
}

/// `match (scrutinee) { arm, ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchExpr {
    pub scrutinee: ExprId,
    pub arms: Vec<MatchArm>,
}

/// `case (: | =>) value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchArm {
    pub case: MatchCase,
    pub value: ExprId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCase {
    /// The `else` arm.
    Else,
    /// One or more items, each a value or a `lo .. hi` range.
    Items(Vec<MatchItem>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchItem {
    pub start: ExprId,
    pub end: Option<ExprId>,
}

/// `break (:label)? value?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakExpr {
    pub label: Option<Ident>,
    pub value: Option<ExprId>,
}

/// `continue (:label)?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinueExpr {
    pub label: Option<Ident>,
}

/// `return value?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnExpr {
    pub value: Option<ExprId>,
}

/// A type expression: prefix operators applied to a suffix expression,
/// e.g. `?&[4]Vec(Int)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub prefixes: Vec<TypePrefix>,
    pub base: ExprId,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePrefix {
    /// `?T`
    Optional,
    /// `&T`
    Reference,
    /// `[]T`
    Slice,
    /// `[N]T`
    Array(ExprId),
}

/// Binary operators, including the assignment forms the grammar treats as
/// binary. Lvalue checking is left to semantic analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    TildeAssign,
}

impl BinOp {
    /// True for `=` and the compound assignment operators.
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            BinOp::Assign
                | BinOp::AddAssign
                | BinOp::SubAssign
                | BinOp::MulAssign
                | BinOp::DivAssign
                | BinOp::RemAssign
                | BinOp::ShlAssign
                | BinOp::ShrAssign
                | BinOp::AndAssign
                | BinOp::OrAssign
                | BinOp::XorAssign
                | BinOp::TildeAssign
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Assign => "=",
            BinOp::AddAssign => "+=",
            BinOp::SubAssign => "-=",
            BinOp::MulAssign => "*=",
            BinOp::DivAssign => "/=",
            BinOp::RemAssign => "%=",
            BinOp::ShlAssign => "<<=",
            BinOp::ShrAssign => ">>=",
            BinOp::AndAssign => "&=",
            BinOp::OrAssign => "|=",
            BinOp::XorAssign => "^=",
            BinOp::TildeAssign => "~=",
        }
    }
}

/// Prefix operators: `!`, `-`, `~`, `&`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Not,
    Neg,
    BitNot,
    Ref,
}

impl PrefixOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
            PrefixOp::BitNot => "~",
            PrefixOp::Ref => "&",
        }
    }
}
