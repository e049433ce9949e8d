//! Expression checking rules.

use brant_base::Kind as TokKind;
use brant_types::Type;

use crate::ast::{self, Kind, NodeId};

use super::TypeChecker;

impl TypeChecker<'_> {
    /// Extra checks for children used in expression position. Needed for
    /// constructs that can be either statements or expressions.
    pub(crate) fn check_expr_child(&mut self, parent: NodeId, child: NodeId) {
        if self.ast().kind(child) != Kind::IfExpr {
            return;
        }

        let then = self.ast().child(child, ast::IF_EXPR_THEN);
        let els = self.ast().child(child, ast::IF_EXPR_ELSE);

        if els == NodeId::INVALID {
            // else branch will get the zero value of the type
            return;
        }

        let then_ty = self.ast().ty(then);
        let els_ty = self.ast().ty(els);
        if then_ty.is_none() || els_ty.is_none() {
            return;
        }

        let unified = self.uni().unify(then_ty, els_ty);
        if unified.is_none() {
            let msg = format!(
                "if branches have mismatched types: {} and {}",
                self.type_string(then_ty),
                self.type_string(els_ty)
            );
            self.error(parent, msg);
            return;
        }

        self.set_ty(then, unified);
        self.set_ty(els, unified);
    }

    pub(crate) fn check_binary_expr(&mut self, node: NodeId) {
        let lhs = self.ast().ty(self.ast().child(node, ast::BINARY_EXPR_LHS));
        let rhs = self.ast().ty(self.ast().child(node, ast::BINARY_EXPR_RHS));

        if lhs.is_none() || rhs.is_none() {
            return;
        }

        let lhs = self.uni().underlying(lhs);
        let rhs = self.uni().underlying(rhs);

        match self.ast().token(node).kind() {
            TokKind::Eq | TokKind::Ne | TokKind::Lt | TokKind::Le | TokKind::Gt | TokKind::Ge => {
                self.set_ty(node, Type::BOOL);
                return;
            }
            _ => {}
        }

        let unified = self.uni().unify(lhs, rhs);
        if unified.is_none() {
            let msg = format!(
                "invalid operation: mismatched types {} and {}",
                self.type_string(lhs),
                self.type_string(rhs)
            );
            self.error(node, msg);
        }
        self.set_ty(node, unified);
    }

    pub(crate) fn check_unary_expr(&mut self, node: NodeId) {
        let ty = self.ast().ty(self.ast().child(node, ast::UNARY_EXPR_EXPR));
        self.set_ty(node, ty);
    }

    pub(crate) fn check_deref_expr(&mut self, node: NodeId) {
        let ty = self.ast().ty(self.ast().child(node, ast::DEREF_EXPR_EXPR));
        if ty.is_none() {
            return;
        }

        if ty.indirections() == 0 {
            let msg = format!(
                "cannot dereference non-pointer type {}",
                self.type_string(ty)
            );
            self.error(node, msg);
            return;
        }
        self.set_ty(node, ty.deref());
    }

    pub(crate) fn check_addr_expr(&mut self, node: NodeId) {
        let child = self.ast().child(node, ast::ADDR_EXPR_EXPR);
        let ty = self.ast().ty(child);
        if ty.is_none() {
            return;
        }

        if self.ast().kind(child) != Kind::Name {
            self.error(node, "cannot take address of non-name");
            return;
        }

        if ty.indirections() >= brant_types::handle::MAX_INDIRECTIONS {
            let msg = format!(
                "cannot take address of triple pointer type {}",
                self.type_string(ty)
            );
            self.error(node, msg);
            return;
        }

        self.set_ty(node, ty.pointer_to());
    }

    pub(crate) fn check_call_expr(&mut self, node: NodeId) {
        let name = self.ast().child(node, ast::CALL_EXPR_NAME);
        let name_text = self.ast().node_text(name);

        let sym = self.symtab().lookup(&name_text).copied();
        let Some(sym) = sym else {
            // replace the "undefined name" error from the name child
            if self.last_error_message() == Some(&format!("undefined name {}", name_text)) {
                self.pop_last_error();
            }
            self.error(node, format!("cannot call undefined function {}", name_text));
            return;
        };

        if sym.ty.kind() != brant_types::TypeKind::Func || sym.ty.indirections() != 0 {
            let msg = format!(
                "cannot call non-function {} of type {}",
                name_text,
                self.type_string(sym.ty)
            );
            self.error(node, msg);
            return;
        }

        let sig = self.uni().func(sym.ty);
        let params = sig.params().to_vec();
        let ret = sig.return_type();

        let args_node = self.ast().child(node, ast::CALL_EXPR_ARGS);
        let num_args = self.ast().num_children(args_node);
        if num_args != params.len() {
            let msg = format!(
                "wrong number of arguments to {}: expected {}, got {}",
                name_text,
                params.len(),
                num_args
            );
            self.error(node, msg);
            return;
        }

        for (i, param) in params.iter().enumerate() {
            let arg = self.ast().child(args_node, i);
            let ty = self.ast().ty(arg);
            if ty.is_none() {
                continue;
            }
            let unified = self.uni().unify(ty, *param);
            if unified.is_none() {
                let msg = format!(
                    "wrong type for argument: expected {}, got {}",
                    self.type_string(*param),
                    self.type_string(ty)
                );
                self.error(node, msg);
                continue;
            }
            self.set_ty(arg, unified);
        }

        self.set_ty(node, ret);
    }

    pub(crate) fn check_literal(&mut self, node: NodeId) {
        match self.ast().token(node).kind() {
            TokKind::Int => self.set_ty(node, Type::UNTYPED_INT),
            kind => panic!("unknown literal kind {}", kind.name()),
        }
    }

    pub(crate) fn check_name(&mut self, node: NodeId) {
        let text = self.ast().node_text(node);
        match self.symtab().lookup(&text) {
            Some(sym) => {
                let ty = sym.ty;
                self.set_ty(node, ty);
            }
            None => self.error(node, format!("undefined name {}", text)),
        }
    }

    pub(crate) fn check_if_expr(&mut self, node: NodeId) {
        let cond = self.ast().child(node, ast::IF_EXPR_COND);
        let cond_ty = self.ast().ty(cond);
        if cond_ty.is_none() {
            return;
        }
        if self.uni().underlying(cond_ty) != Type::BOOL {
            let msg = format!(
                "if condition must be bool but was {}",
                self.type_string(cond_ty)
            );
            self.error(node, msg);
            return;
        }

        let then_ty = self.ast().ty(self.ast().child(node, ast::IF_EXPR_THEN));
        if !then_ty.is_none() {
            self.set_ty(node, then_ty);
        }
    }

    /// A statement list used as an expression takes the type of its last
    /// child; `return` may appear only as the last statement of its block.
    pub(crate) fn check_block(&mut self, node: NodeId) {
        let num = self.ast().num_children(node);
        if num == 0 {
            self.set_ty(node, Type::VOID);
            return;
        }

        for i in 0..num {
            let child = self.ast().child(node, i);
            if self.ast().kind(child) == Kind::ReturnStmt && i != num - 1 {
                self.error(node, "return must be last statement in block");
            }
        }

        let last_ty = self.ast().ty(self.ast().child(node, num - 1));
        self.set_ty(node, last_ty);
    }
}
