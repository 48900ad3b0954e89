//! Naive AST printer.
//!
//! Renders a parsed module back to source text. Composite expressions are
//! parenthesized so the output reparses to a structurally identical tree;
//! this is a debugging aid and the vehicle for the parse/print/parse
//! round-trip tests, not a formatter.

use riv_common::symbol::{Ident, SymbolInterner};

use crate::ast::*;

/// Renders a module to source text.
pub fn print_module(ast: &Ast, module: &Module, interner: &SymbolInterner) -> String {
    let mut printer = Printer {
        ast,
        interner,
        out: String::new(),
        indent: 0,
    };
    for (i, &decl) in module.decls.iter().enumerate() {
        if i > 0 {
            printer.out.push('\n');
        }
        printer.decl(decl);
        printer.out.push('\n');
    }
    printer.out
}

struct Printer<'a> {
    ast: &'a Ast,
    interner: &'a SymbolInterner,
    out: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    fn write(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn name(&mut self, ident: Ident) {
        let text = self.interner.resolve(ident.sym).unwrap_or("<?>").to_string();
        self.write(&text);
    }

    fn decl(&mut self, id: DeclId) {
        match &self.ast.decl(id).kind {
            DeclKind::Func(func) => self.func_decl(func),
            DeclKind::Var(var) => {
                self.var_decl(var);
                self.write(";");
            }
        }
    }

    fn func_decl(&mut self, func: &FuncDecl) {
        self.write("func ");
        self.name(func.name);
        self.write("(");
        for (i, param) in func.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.param(param);
        }
        self.write(") -> ");
        self.type_expr(func.ret);
        match func.body {
            Some(body) => {
                self.write(" ");
                self.block(body);
            }
            None => self.write(";"),
        }
    }

    fn param(&mut self, param: &Param) {
        if param.is_variadic {
            self.write("...");
            if let Some(name) = param.name {
                self.write(" ");
                self.name(name);
            }
            return;
        }
        if let Some(ty) = param.ty {
            self.type_expr(ty);
            self.write(" ");
        }
        if let Some(name) = param.name {
            self.name(name);
        }
    }

    fn var_decl(&mut self, var: &VarDecl) {
        if var.is_export {
            self.write("export ");
        }
        if var.is_mutable {
            self.write("mutable ");
        }
        if var.is_const {
            self.write("const ");
        }
        if let Some(ty) = var.ty {
            self.type_expr(ty);
            self.write(" ");
        }
        self.name(var.name);
        if let Some(init) = var.init {
            self.write(" = ");
            self.expr(init);
        }
    }

    fn type_expr(&mut self, id: TypeExprId) {
        let ty = self.ast.type_expr(id);
        for prefix in ty.prefixes.clone() {
            match prefix {
                TypePrefix::Optional => self.write("?"),
                TypePrefix::Reference => self.write("&"),
                TypePrefix::Slice => self.write("[]"),
                TypePrefix::Array(len) => {
                    self.write("[");
                    self.expr(len);
                    self.write("]");
                }
            }
        }
        self.expr(ty.base);
    }

    fn block(&mut self, id: BlockId) {
        let block = self.ast.block(id);
        if let Some(label) = block.label {
            self.name(label);
            self.write(": ");
        }
        if block.stmts.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.indent += 1;
        for &stmt in block.stmts.clone().iter() {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn stmt(&mut self, id: StmtId) {
        match self.ast.stmt(id).kind.clone() {
            StmtKind::Empty => self.write(";"),
            StmtKind::Var(var) => {
                self.var_decl(&var);
                self.write(";");
            }
            StmtKind::Defer(body) => {
                self.write("defer ");
                self.stmt(body);
            }
            StmtKind::If(ifs) => {
                self.write("if (");
                self.expr(ifs.cond);
                self.write(") ");
                self.stmt(ifs.then_branch);
                if let Some(else_branch) = ifs.else_branch {
                    self.write(" else ");
                    self.stmt(else_branch);
                }
            }
            StmtKind::Loop(lp) => self.loop_stmt(&lp),
            StmtKind::Block(block) => self.block(block),
            StmtKind::Expr(expr) => {
                let is_match = matches!(self.ast.expr(expr).kind, ExprKind::Match(_));
                self.expr(expr);
                if !is_match {
                    self.write(";");
                }
            }
        }
    }

    fn loop_stmt(&mut self, lp: &LoopStmt) {
        if let Some(label) = lp.label {
            self.name(label);
            self.write(": ");
        }
        if lp.is_inline {
            self.write("inline ");
        }
        self.write("loop ");
        match &lp.kind {
            LoopKind::While { cond: None } => {}
            LoopKind::While { cond: Some(cond) } => {
                self.write("(");
                self.expr(*cond);
                self.write(") ");
            }
            LoopKind::In { binder, iterable } => {
                self.write("(");
                self.name(*binder);
                self.write(" in ");
                self.expr(*iterable);
                self.write(") ");
            }
            LoopKind::C { init, cond, step } => {
                self.write("(");
                match init {
                    Some(init) => self.stmt(*init),
                    None => self.write(";"),
                }
                if let Some(cond) = cond {
                    self.write(" ");
                    self.expr(*cond);
                }
                self.write(";");
                if let Some(step) = step {
                    self.write(" ");
                    self.expr(*step);
                }
                self.write(") ");
            }
        }
        self.block(lp.body);
    }

    fn expr(&mut self, id: ExprId) {
        match self.ast.expr(id).kind.clone() {
            ExprKind::IntLit(value) => self.write(&value.to_string()),
            ExprKind::FloatLit(sym) => {
                let text = self.interner.resolve(sym).unwrap_or("0.0").to_string();
                self.write(&text);
            }
            ExprKind::CharLit(c) => {
                self.write("'");
                match c {
                    '\n' => self.write("\\n"),
                    '\t' => self.write("\\t"),
                    '\r' => self.write("\\r"),
                    '\0' => self.write("\\0"),
                    '\'' => self.write("\\'"),
                    '\\' => self.write("\\\\"),
                    c => self.out.push(c),
                }
                self.write("'");
            }
            ExprKind::StrLit(sym) => {
                let text = self.interner.resolve(sym).unwrap_or("").to_string();
                self.write("\"");
                self.write(&text);
                self.write("\"");
            }
            ExprKind::BoolLit(true) => self.write("true"),
            ExprKind::BoolLit(false) => self.write("false"),
            ExprKind::NullLit => self.write("null"),
            ExprKind::Unreachable => self.write("unreachable"),
            ExprKind::Ident(ident) => self.name(ident),
            ExprKind::Binary(bin) => {
                self.write("(");
                self.expr(bin.lhs);
                self.write(" ");
                self.write(bin.op.as_str());
                self.write(" ");
                self.expr(bin.rhs);
                self.write(")");
            }
            ExprKind::Prefix(pre) => {
                self.write("(");
                self.write(pre.op.as_str());
                self.expr(pre.expr);
                self.write(")");
            }
            ExprKind::Index(ix) => {
                self.expr(ix.base);
                self.write("[");
                self.expr(ix.index);
                self.write("]");
            }
            ExprKind::Slice(sl) => {
                self.expr(sl.base);
                self.write("[");
                if let Some(start) = sl.start {
                    self.expr(start);
                    self.write(" ");
                }
                self.write("..");
                if let Some(end) = sl.end {
                    self.write(" ");
                    self.expr(end);
                }
                self.write("]");
            }
            ExprKind::Call(call) => {
                self.expr(call.callee);
                self.write("(");
                for (i, &arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.expr(arg);
                }
                self.write(")");
            }
            ExprKind::If(ife) => {
                self.write("(if (");
                self.expr(ife.cond);
                self.write(") ");
                self.expr(ife.then_expr);
                if let Some(else_expr) = ife.else_expr {
                    self.write(" else ");
                    self.expr(else_expr);
                }
                self.write(")");
            }
            ExprKind::Match(m) => {
                self.write("match (");
                self.expr(m.scrutinee);
                self.write(") { ");
                for (i, arm) in m.arms.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.match_arm(arm);
                }
                self.write(" }");
            }
            ExprKind::Block(block) => self.block(block),
            ExprKind::InitList(entries) => {
                if entries.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                for (i, &entry) in entries.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.expr(entry);
                }
                self.write(" }");
            }
            ExprKind::Break(brk) => {
                self.write("(break");
                if let Some(label) = brk.label {
                    self.write(" :");
                    self.name(label);
                }
                if let Some(value) = brk.value {
                    self.write(" ");
                    self.expr(value);
                }
                self.write(")");
            }
            ExprKind::Continue(cont) => {
                self.write("(continue");
                if let Some(label) = cont.label {
                    self.write(" :");
                    self.name(label);
                }
                self.write(")");
            }
            ExprKind::Return(ret) => {
                self.write("(return");
                if let Some(value) = ret.value {
                    self.write(" ");
                    self.expr(value);
                }
                self.write(")");
            }
        }
    }

    fn match_arm(&mut self, arm: &MatchArm) {
        match &arm.case {
            MatchCase::Else => self.write("else"),
            MatchCase::Items(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.expr(item.start);
                    if let Some(end) = item.end {
                        self.write(" .. ");
                        self.expr(end);
                    }
                }
            }
        }
        self.write(": ");
        self.expr(arm.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    /// Parses, prints, reparses, and reprints: the two printed forms must
    /// agree, which pins structural equality of the two parses.
    fn round_trip(source: &str) {
        let (first, interner1) = parse(source, 0);
        assert!(
            !first.diagnostics.has_errors(),
            "first parse of {source:?}: {:?}",
            first.diagnostics.diagnostics()
        );
        let printed = print_module(&first.ast, first.module.as_ref().unwrap(), &interner1);

        let (second, interner2) = parse(&printed, 0);
        assert!(
            !second.diagnostics.has_errors(),
            "reparse of {printed:?}: {:?}",
            second.diagnostics.diagnostics()
        );
        let reprinted = print_module(&second.ast, second.module.as_ref().unwrap(), &interner2);

        assert_eq!(printed, reprinted, "round trip diverged for {source:?}");
    }

    #[test]
    fn round_trip_declarations() {
        round_trip("x = 1 + 2 * 3;");
        round_trip("export const Int limit = 10;");
        round_trip("mutable ?&Int slot = null;");
        round_trip("mutable [4]Int quad;");
        round_trip("func f() -> Int;");
        round_trip("func add(Int a, Int b) -> Int { return a + b; }");
        round_trip("func printf(Str fmt, ... rest) -> Int;");
    }

    #[test]
    fn round_trip_statements() {
        round_trip("func f() -> Int { if (a) b; else c; }");
        round_trip("func f() -> Int { if (a) { b; } else { c; } }");
        round_trip("func f() -> Int { defer close(h); defer { a; b; } }");
        round_trip("func f() -> Int { outer: loop (i < 10) { break :outer; } }");
        round_trip("func f() -> Int { loop (mutable i = 0; i < 10; i += 1) { use(i); } }");
        round_trip("func f() -> Int { loop (item in items) { } }");
        round_trip("func f() -> Int { inline loop { tick(); } }");
        round_trip("func f() -> Int { loop (;;) { } }");
        round_trip("func f() -> Int { lbl: { x; } }");
    }

    #[test]
    fn round_trip_expressions() {
        round_trip("x = -1 * !flag;");
        round_trip("x = a[1 .. 2] + a[..] + a[1];");
        round_trip("x = f(1, 2)(3)[4];");
        round_trip("x = if (cond) 1 else 2;");
        round_trip("x = { 1, 2, 3 };");
        round_trip("x = {};");
        round_trip("x = match (y) { 1, 2: 10, 3 .. 5: 20, else: 30 };");
        round_trip("x = \"hi\\n\" ;");
        round_trip("x = 'q';");
        round_trip("x = 3.25;");
        round_trip("x = a == b & c != d;");
        round_trip("func f() -> Int { total ~= mask; }");
        round_trip("func f() -> Int { n += step; }");
    }

    #[test]
    fn round_trip_whole_program() {
        round_trip(
            r#"
            export const Int size = 16;

            func fill(&Buf buf, Int value) -> Unit {
                loop (mutable Int i = 0; i < size; i += 1) {
                    buf[i] = value;
                }
            }

            func pick(Int tag) -> Int {
                result = match (tag) {
                    0: fallback(),
                    1 .. 9 => tag * 2,
                    else: unreachable
                };
                return result;
            }
            "#,
        );
    }

    #[test]
    fn printed_form_is_stable() {
        let (file, interner) = parse("x=1+2*3;", 0);
        let printed = print_module(&file.ast, file.module.as_ref().unwrap(), &interner);
        assert_eq!(printed, "x = (1 + (2 * 3));\n");
    }
}
