//! Statement generation.

use brant_syntax::ast::{self, Kind, NodeId};

use super::CodeGen;

impl CodeGen<'_> {
    pub(crate) fn gen_stmt_list(&mut self, node: NodeId, last: bool) {
        self.symtab.enter_scope(node);

        let num = self.ast.num_children(node);
        for i in 0..num {
            let child = self.ast.child(node, i);
            self.gen_stmt(child, last && i == num - 1);
        }

        self.symtab.leave_scope();
    }

    pub(crate) fn gen_stmt(&mut self, node: NodeId, last: bool) {
        match self.ast.kind(node) {
            Kind::ExprStmt => self.gen_expr(self.ast.child(node, ast::EXPR_STMT_EXPR)),
            Kind::AssignStmt => self.gen_assign_stmt(node),
            Kind::ReturnStmt => self.gen_return_stmt(node, last),
            Kind::IfExpr => self.gen_if_expr(node),
            Kind::ForStmt => self.gen_for_stmt(node),
            Kind::StmtList => self.gen_stmt_list(node, last),
            Kind::EmptyStmt => {}
            kind => panic!("unknown stmt kind {}", kind),
        }
    }

    fn gen_assign_stmt(&mut self, node: NodeId) {
        self.gen_addr(self.ast.child(node, ast::ASSIGN_STMT_LHS));
        self.asm.push();
        self.gen_expr(self.ast.child(node, ast::ASSIGN_STMT_RHS));
        self.asm.pop(1);
        self.asm.store();
    }

    fn gen_return_stmt(&mut self, node: NodeId, last: bool) {
        for i in 0..self.ast.num_children(node) {
            self.gen_expr(self.ast.child(node, i));
        }
        self.asm.jump_to_epilogue();
        if last {
            return;
        }

        // make sure a new block is created after the return
        let label = self.next_label();
        self.asm.label("post.return", label);
    }

    fn gen_for_stmt(&mut self, node: NodeId) {
        let init = self.ast.child(node, ast::FOR_STMT_INIT);
        let cond = self.ast.child(node, ast::FOR_STMT_COND);
        let post = self.ast.child(node, ast::FOR_STMT_POST);
        let body = self.ast.child(node, ast::FOR_STMT_BODY);

        let label = self.next_label();

        if init != NodeId::INVALID {
            self.gen_stmt(init, false);
        }
        self.asm.label("loop", label);
        if cond != NodeId::INVALID {
            self.gen_expr(self.ast.child(cond, ast::EXPR_STMT_EXPR));
            self.asm.jump_if_false("endloop", label);
            self.asm.label("loopbody", label);
        }
        self.gen_stmt(body, false);
        if post != NodeId::INVALID {
            self.gen_stmt(post, false);
        }
        self.asm.jump("loop", label);
        self.asm.label("endloop", label);
    }
}
