//! Function declaration checking.

use brant_types::Type;

use crate::ast::{self, Kind, NodeId};
use crate::symtab::SymKind;

use super::TypeChecker;

impl TypeChecker<'_> {
    /// Hoists a function declaration into the symbol table before bodies are
    /// checked, so functions can be called in any textual order.
    pub(crate) fn define_func(&mut self, node: NodeId) {
        let name = self.ast().child(node, ast::FUNC_DECL_NAME);
        let name = self.ast().node_text(name);
        if self.symtab().lookup(&name).is_some() {
            self.error(node, format!("cannot redefine function {}", name));
        }

        let params_node = self.ast().child(node, ast::FUNC_DECL_PARAMS);
        let num_params = self.ast().num_children(params_node);

        let mut params = Vec::with_capacity(num_params);
        for i in 0..num_params {
            let field = self.ast().child(params_node, i);
            let typ = self.ast().child(field, ast::FIELD_TYPE);
            self.check_node(typ);
            params.push(self.ast().ty(typ));
        }

        let ret = self.ast().child(node, ast::FUNC_DECL_RET);
        let sig = if ret == NodeId::INVALID {
            self.uni_mut().func_for(&params, Type::VOID)
        } else {
            self.check_node(ret);
            let ret_ty = self.ast().ty(ret);
            self.uni_mut().func_for(&params, ret_ty)
        };

        self.symtab_mut().new_symbol(&name, SymKind::Func, sig);
    }

    /// Declares each parameter as a variable in the function's scope.
    pub(crate) fn define_func_params(&mut self, node: NodeId) {
        let params_node = self.ast().child(node, ast::FUNC_DECL_PARAMS);
        for i in 0..self.ast().num_children(params_node) {
            let field = self.ast().child(params_node, i);
            let name = self.ast().child(field, ast::FIELD_NAME);
            let typ = self.ast().child(field, ast::FIELD_TYPE);

            let name = self.ast().node_text(name);
            let ty = self.ast().ty(typ);
            self.symtab_mut().new_symbol(&name, SymKind::Var, ty);
        }
    }

    pub(crate) fn check_func_decl(&mut self, node: NodeId) {
        let name = self.ast().child(node, ast::FUNC_DECL_NAME);
        let name = self.ast().node_text(name);

        let Some(sym) = self.symtab().lookup(&name).copied() else {
            return;
        };

        self.set_ty(node, sym.ty);

        if sym.ty.is_none() {
            return;
        }

        let ret_ty = self.uni().func(sym.ty).return_type();
        if ret_ty != Type::VOID && !ret_ty.is_none() {
            let body = self.ast().child(node, ast::FUNC_DECL_BODY);
            if !self.returns(body) {
                self.error(node, format!("missing return statement in function {}", name));
            }
        }
    }

    /// Least-fixed-point "every control-flow path ends in return". A for
    /// loop counts as returning when its body returns, which accepts
    /// `for { return 1 }`.
    fn returns(&self, node: NodeId) -> bool {
        match self.ast().kind(node) {
            Kind::ReturnStmt => true,
            Kind::StmtList => {
                let num = self.ast().num_children(node);
                if num == 0 {
                    return false;
                }
                self.returns(self.ast().child(node, num - 1))
            }
            Kind::IfExpr => {
                let then = self.ast().child(node, ast::IF_EXPR_THEN);
                let els = self.ast().child(node, ast::IF_EXPR_ELSE);
                self.returns(then) && self.returns(els)
            }
            Kind::ForStmt => self.returns(self.ast().child(node, ast::FOR_STMT_BODY)),
            _ => false,
        }
    }
}
