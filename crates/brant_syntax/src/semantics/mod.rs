//! The type checker.
//!
//! One recursive walk over the AST with pre-child and post-child work. The
//! pre-child hooks hoist function declarations (so call order is independent
//! of textual order), bind `:=` definitions, declare parameters, and enter
//! scopes; the post-child rules infer and validate each node's type.
//!
//! Error recovery: a node whose subtree produced an error keeps type
//! [`Type::NONE`], and every post-child rule bails out early when an operand
//! is `NONE`, so one error does not cascade into spurious follow-ups.

mod expr;
mod func;
mod stmt;

use brant_base::Diagnostic;
use brant_types::{Type, Universe};

use crate::ast::{self, Ast, Kind, NodeId};
use crate::symtab::SymTab;

/// The semantic analyzer. Decorates the AST's type side table and builds the
/// symbol table the code generator later revisits.
pub struct TypeChecker<'a> {
    ast: &'a mut Ast,
    uni: Universe,
    symtab: SymTab,
    errs: Vec<Diagnostic>,
}

impl<'a> TypeChecker<'a> {
    /// Checks the AST for type errors, labeling nodes with types.
    ///
    /// Returns the symbol table, the interned type universe, and any
    /// diagnostics.
    pub fn check(ast: &'a mut Ast) -> (SymTab, Universe, Vec<Diagnostic>) {
        let root = ast.root();
        let mut tc = TypeChecker {
            ast,
            uni: Universe::new(),
            symtab: SymTab::new(),
            errs: Vec::new(),
        };
        tc.check_node(root);
        (tc.symtab, tc.uni, tc.errs)
    }

    pub(crate) fn error(&mut self, node: NodeId, msg: impl Into<String>) {
        self.errs
            .push(Diagnostic::new(self.ast.token(node), msg.into()));
    }

    pub(crate) fn type_string(&self, ty: Type) -> String {
        self.uni.string_of(ty)
    }

    pub(crate) fn check_node(&mut self, node: NodeId) {
        if node == NodeId::INVALID || !self.ast.ty(node).is_none() {
            return;
        }

        // pre-checks before checking children
        let kind = self.ast.kind(node);
        let entered = matches!(kind, Kind::DeclList | Kind::FuncDecl | Kind::StmtList);
        match kind {
            Kind::DeclList => {
                self.symtab.enter_scope(node);
                // define functions first so call order does not matter
                for i in 0..self.ast.num_children(node) {
                    let child = self.ast.child(node, i);
                    if self.ast.kind(child) == Kind::FuncDecl {
                        self.define_func(child);
                    }
                }
            }
            Kind::AssignStmt => {
                // ensure defined variables are created in the symtab
                self.define_assign_stmt(node);
            }
            Kind::FuncDecl => {
                self.symtab.enter_scope(node);
                self.define_func_params(node);
            }
            Kind::StmtList => {
                self.symtab.enter_scope(node);
            }
            _ => {}
        }

        // check children
        for i in 0..self.ast.num_children(node) {
            let child = self.ast.child(node, i);
            self.check_node(child);
        }

        // extra checks for children used in expressions
        if kind != Kind::StmtList {
            for i in 0..self.ast.num_children(node) {
                let child = self.ast.child(node, i);
                self.check_expr_child(node, child);
            }
        }

        match kind {
            Kind::DeclList | Kind::ExprList | Kind::EmptyStmt | Kind::FieldList
            | Kind::IllegalNode => {}
            Kind::FuncDecl => self.check_func_decl(node),
            Kind::BinaryExpr => self.check_binary_expr(node),
            Kind::UnaryExpr => self.check_unary_expr(node),
            Kind::DerefExpr => self.check_deref_expr(node),
            Kind::AddrExpr => self.check_addr_expr(node),
            Kind::CallExpr => self.check_call_expr(node),
            Kind::Literal => self.check_literal(node),
            Kind::Name => self.check_name(node),
            Kind::AssignStmt => self.check_assign_stmt(node),
            Kind::IfExpr => self.check_if_expr(node),
            Kind::ForStmt => self.check_for_stmt(node),
            Kind::ReturnStmt => self.check_return_stmt(node),
            Kind::ExprStmt => {
                let ty = self.ast.ty(self.ast.child(node, ast::EXPR_STMT_EXPR));
                self.ast.set_ty(node, ty);
            }
            Kind::StmtList => self.check_block(node),
            Kind::Field => {
                let ty = self.ast.ty(self.ast.child(node, ast::FIELD_TYPE));
                self.ast.set_ty(node, ty);
            }
        }

        if entered {
            self.symtab.leave_scope();
        }
    }

    pub(crate) fn ast(&self) -> &Ast {
        self.ast
    }

    pub(crate) fn set_ty(&mut self, node: NodeId, ty: Type) {
        self.ast.set_ty(node, ty);
    }

    pub(crate) fn symtab(&self) -> &SymTab {
        &self.symtab
    }

    pub(crate) fn symtab_mut(&mut self) -> &mut SymTab {
        &mut self.symtab
    }

    pub(crate) fn uni(&self) -> &Universe {
        &self.uni
    }

    pub(crate) fn uni_mut(&mut self) -> &mut Universe {
        &mut self.uni
    }

    pub(crate) fn pop_last_error(&mut self) {
        self.errs.pop();
    }

    pub(crate) fn last_error_message(&self) -> Option<&str> {
        self.errs.last().map(|e| e.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use brant_base::File;
    use std::sync::Arc;

    fn check(src: &str) -> Vec<String> {
        let file = Arc::new(File::new("test.bt", src).unwrap());
        let (mut ast, errs) = Parser::new(file).parse();
        assert!(errs.is_empty(), "parse errors: {:?}", errs);
        let (_, _, errs) = TypeChecker::check(&mut ast);
        errs.into_iter().map(|e| e.message().to_string()).collect()
    }

    fn check_ok(src: &str) {
        let errs = check(src);
        assert!(errs.is_empty(), "unexpected errors: {:?}", errs);
    }

    fn check_err(src: &str, want: &str) {
        let errs = check(src);
        assert!(
            errs.iter().any(|e| e.contains(want)),
            "expected error containing {:?}, got {:?}",
            want,
            errs
        );
    }

    #[test]
    fn well_typed_programs_pass() {
        check_ok("func main() int { return 5 + 6 * 7 }");
        check_ok("func main() int { a := 3; z := 5; return a + z }");
        check_ok("func main() int { x := 3; y := &x; *y = 5; return x }");
        check_ok("func main() int { if true { return 1 }\n return 0 }");
        check_ok("func main() int { for i := 0; i < 3; i = i + 1 { }\n return 0 }");
    }

    #[test]
    fn call_order_is_independent_of_declaration_order() {
        check_ok("func main() int { return foo() }\nfunc foo() int { return 1 }");
    }

    #[test]
    fn undefined_name() {
        check_err("func main() int { return x }", "undefined name x");
    }

    #[test]
    fn lone_return_in_int_function() {
        check_err("func main() int { return }", "invalid return statement");
    }

    #[test]
    fn return_value_from_void_function() {
        check_err("func f() { return 1 }\nfunc main() int { return 0 }",
            "cannot return value from void function");
    }

    #[test]
    fn assign_bool_to_int() {
        check_err("func main() int { a := 1; a = true; return a }",
            "cannot assign bool to int");
    }

    #[test]
    fn redefine_in_same_scope() {
        check_err("func main() int { a := 1; a := 2; return a }", "cannot redefine a");
    }

    #[test]
    fn shadowing_across_scopes_is_allowed() {
        check_ok("func main() int { a := 1; { a := 2; a = 3 }\n return a }");
    }

    #[test]
    fn missing_return_on_some_path() {
        check_err(
            "func main() int { if true { return 1 } }",
            "missing return statement in function main",
        );
    }

    #[test]
    fn for_loop_body_return_satisfies_returns() {
        check_ok("func main() int { for { return 1 } }");
    }

    #[test]
    fn empty_body_on_int_function() {
        check_err("func main() int { }", "missing return statement in function main");
    }

    #[test]
    fn if_condition_must_be_bool() {
        check_err("func main() int { if 1 { return 1 }\n return 0 }",
            "if condition must be bool but was untyped int");
    }

    #[test]
    fn for_condition_must_be_bool() {
        check_err("func main() int { for 1 { }\n return 0 }",
            "for condition must be bool but was untyped int");
    }

    #[test]
    fn if_branches_unify_untyped_and_int() {
        check_ok("func main() int { x := 4; a := if true {1} else {x}; return a }");
    }

    #[test]
    fn if_branches_mismatched_types() {
        check_err(
            "func main() int { a := if true {1} else {false}; return a }",
            "if branches have mismatched types: untyped int and bool",
        );
    }

    #[test]
    fn deref_non_pointer() {
        check_err("func main() int { x := 1; return *x }",
            "cannot dereference non-pointer type int");
    }

    #[test]
    fn address_of_non_name() {
        check_err("func main() int { return *&(1 + 2) }", "cannot take address of non-name");
    }

    #[test]
    fn address_past_indirection_cap() {
        check_err(
            "func main() int { x := 1; y := &x; z := &y; w := &z; v := &w; return x }",
            "cannot take address of triple pointer type ***int",
        );
    }

    #[test]
    fn triple_deref_reads_are_allowed() {
        check_ok("func main() int { x := 1; y := &x; z := &y; w := &z; return ***w }");
    }

    #[test]
    fn call_of_non_function() {
        check_err("func main() int { x := 1; return x() }",
            "cannot call non-function x of type int");
    }

    #[test]
    fn call_of_undefined_function() {
        let errs = check("func main() int { return foo() }");
        assert!(errs.iter().any(|e| e.contains("cannot call undefined function foo")));
        // the plain undefined-name error is replaced, not duplicated
        assert!(!errs.iter().any(|e| e.contains("undefined name foo")));
    }

    #[test]
    fn wrong_argument_count() {
        check_err(
            "func main() int { return foo(1) }\nfunc foo(a int, b int) int { return a }",
            "wrong number of arguments to foo: expected 2, got 1",
        );
    }

    #[test]
    fn wrong_argument_type() {
        check_err(
            "func main() int { return foo(true) }\nfunc foo(a int) int { return a }",
            "wrong type for argument: expected int, got bool",
        );
    }

    #[test]
    fn redefine_function() {
        check_err(
            "func foo() {}\nfunc foo() {}\nfunc main() int { return 0 }",
            "cannot redefine function foo",
        );
    }

    #[test]
    fn return_type_mismatch() {
        check_err("func main() int { return true }",
            "cannot return bool from function returning int");
    }

    #[test]
    fn return_must_be_last_in_block() {
        check_err("func main() int { return 1; 2 }", "return must be last statement in block");
    }

    #[test]
    fn mismatched_arithmetic_operands() {
        check_err("func main() int { return 1 + true }", "mismatched types");
    }

    #[test]
    fn type_monotonicity_and_scope_reuse() {
        let file = Arc::new(File::new("t.bt", "func main() int { a := 1; return a }").unwrap());
        let (mut ast, errs) = Parser::new(file).parse();
        assert!(errs.is_empty());
        let (mut symtab, _, errs) = TypeChecker::check(&mut ast);
        assert!(errs.is_empty());

        // every checked node keeps a type; re-entering scopes by node
        // identity yields the scopes the checker created
        let root = ast.root();
        assert_eq!(ast.ty(root), Type::NONE); // DeclList itself is untyped
        let func = ast.child(root, 0);
        assert!(!ast.ty(func).is_none());

        let s1 = symtab.enter_scope(func);
        symtab.leave_scope();
        let s2 = symtab.enter_scope(func);
        assert_eq!(s1, s2);
    }
}
