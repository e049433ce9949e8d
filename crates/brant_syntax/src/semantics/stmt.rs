//! Statement checking rules.

use brant_base::Kind as TokKind;
use brant_types::Type;

use crate::ast::{self, Kind, NodeId};
use crate::symtab::{ScopeId, SymKind};

use super::TypeChecker;

impl TypeChecker<'_> {
    /// Pre-child hook for assignments: a `:=` whose LHS is an unbound name
    /// creates a variable in the current scope with the RHS type, coercing
    /// `untyped int` to `int`.
    pub(crate) fn define_assign_stmt(&mut self, node: NodeId) {
        if self.ast().token(node).kind() != TokKind::Define {
            return;
        }

        let lhs = self.ast().child(node, ast::ASSIGN_STMT_LHS);

        if self.ast().kind(lhs) != Kind::Name {
            let msg = format!("cannot define non-name {}", self.ast().node_text(lhs));
            self.error(node, msg);
            return;
        }

        let name = self.ast().node_text(lhs);
        if self.symtab().lookup_in_current_scope(&name).is_some() {
            self.error(node, format!("cannot redefine {}", name));
            return;
        }

        let rhs = self.ast().child(node, ast::ASSIGN_STMT_RHS);
        self.check_node(rhs);
        let mut rhs_ty = self.ast().ty(rhs);

        if rhs_ty == Type::UNTYPED_INT {
            rhs_ty = Type::INT;
        }

        self.symtab_mut().new_symbol(&name, SymKind::Var, rhs_ty);
    }

    pub(crate) fn check_assign_stmt(&mut self, node: NodeId) {
        let lhs_ty = self.ast().ty(self.ast().child(node, ast::ASSIGN_STMT_LHS));
        let rhs_ty = self.ast().ty(self.ast().child(node, ast::ASSIGN_STMT_RHS));

        if lhs_ty.is_none() || rhs_ty.is_none() {
            return;
        }

        let is_define = self.ast().token(node).kind() == TokKind::Define;
        if !is_define && !self.uni().is_assignable(lhs_ty, rhs_ty) {
            let msg = format!(
                "cannot assign {} to {}",
                self.type_string(rhs_ty),
                self.type_string(lhs_ty)
            );
            self.error(node, msg);
            return;
        }

        self.set_ty(node, self.uni().unify(lhs_ty, rhs_ty));
    }

    pub(crate) fn check_for_stmt(&mut self, node: NodeId) {
        let cond = self.ast().child(node, ast::FOR_STMT_COND);
        let cond_ty = self.ast().ty(cond);
        if cond_ty.is_none() {
            // no condition means an infinite loop
            return;
        }
        if self.uni().underlying(cond_ty) != Type::BOOL {
            let msg = format!(
                "for condition must be bool but was {}",
                self.type_string(cond_ty)
            );
            self.error(node, msg);
        }
    }

    pub(crate) fn check_return_stmt(&mut self, node: NodeId) {
        let fn_scope = self.symtab().local_scope();
        if fn_scope == ScopeId::INVALID {
            panic!("return statement outside of function");
        }
        let fn_node = self.symtab().scope_node(fn_scope);
        if fn_node == NodeId::INVALID {
            panic!("function scope without function node");
        }

        let fn_name = self.ast().child(fn_node, ast::FUNC_DECL_NAME);
        let fn_name = self.ast().node_text(fn_name);
        let fn_sym = self
            .symtab()
            .lookup(&fn_name)
            .expect("function scope without function symbol");

        let sig = fn_sym.ty;
        if sig.is_none() {
            panic!("function symbol without type");
        }
        let ret_ty = self.uni().func(sig).return_type();

        let num = self.ast().num_children(node);

        if ret_ty == Type::VOID {
            if num != 0 {
                self.error(node, "cannot return value from void function");
            }
            self.set_ty(node, Type::VOID);
            return;
        }

        if num != 1 {
            self.error(node, "invalid return statement");
            return;
        }

        let ty = self.ast().ty(self.ast().child(node, 0));
        if ty.is_none() {
            return;
        }

        let unified = self.uni().unify(ty, ret_ty);
        if unified.is_none() {
            let msg = format!(
                "cannot return {} from function returning {}",
                self.type_string(ty),
                self.type_string(ret_ty)
            );
            self.error(node, msg);
            return;
        }
        self.set_ty(node, unified);
    }
}
