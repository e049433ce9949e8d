//! Expression generation: the stack-machine lowering discipline.

use brant_base::Kind as TokKind;
use brant_syntax::ast::{self, Kind, NodeId};
use brant_types::Const;

use super::CodeGen;

impl CodeGen<'_> {
    pub(crate) fn gen_expr(&mut self, node: NodeId) {
        match self.ast.kind(node) {
            Kind::BinaryExpr => {
                self.gen_expr(self.ast.child(node, ast::BINARY_EXPR_LHS));
                self.asm.push();
                self.gen_expr(self.ast.child(node, ast::BINARY_EXPR_RHS));
                self.asm.pop(1);

                match self.ast.token(node).kind() {
                    TokKind::Add => self.asm.add(),
                    TokKind::Sub => self.asm.sub(),
                    TokKind::Star => self.asm.mul(),
                    TokKind::Div => self.asm.div(),
                    TokKind::Eq => self.asm.eq(),
                    TokKind::Ne => self.asm.ne(),
                    TokKind::Lt => self.asm.lt(),
                    TokKind::Le => self.asm.le(),
                    TokKind::Gt => self.asm.gt(),
                    TokKind::Ge => self.asm.ge(),
                    kind => panic!("unknown binary operator {}", kind.name()),
                }
            }
            Kind::UnaryExpr => {
                self.gen_expr(self.ast.child(node, ast::UNARY_EXPR_EXPR));
                self.asm.neg();
            }
            Kind::DerefExpr => {
                self.gen_expr(self.ast.child(node, ast::DEREF_EXPR_EXPR));
                self.asm.load();
            }
            Kind::AddrExpr => {
                self.gen_addr(self.ast.child(node, ast::ADDR_EXPR_EXPR));
            }
            Kind::IfExpr => self.gen_if_expr(node),
            Kind::StmtList => self.gen_stmt_list(node, false),
            Kind::Literal => {
                let text = self.ast.node_text(node);
                self.asm.load_int(&text);
            }
            Kind::Name => {
                let sym = *self
                    .symtab
                    .lookup(&self.ast.node_text(node))
                    .expect("undeclared name in codegen");
                if let Some(c) = sym.constant {
                    self.gen_const(c);
                    return;
                }
                let offset = self.local_offset(node);
                self.asm.load_local(offset);
            }
            Kind::CallExpr => self.gen_call_expr(node),
            kind => panic!("unknown expr kind {}", kind),
        }
    }

    /// Emits the address of an assignable expression into the accumulator.
    pub(crate) fn gen_addr(&mut self, node: NodeId) {
        match self.ast.kind(node) {
            Kind::Name => {
                let offset = self.local_offset(node);
                self.asm.local_addr(offset);
            }
            Kind::DerefExpr => {
                // the address of *p is the value of p
                self.gen_expr(self.ast.child(node, ast::DEREF_EXPR_EXPR));
            }
            kind => panic!("unknown addr kind {}", kind),
        }
    }

    fn gen_const(&mut self, c: Const) {
        match c {
            Const::Int(_) => self.asm.load_int(&c.to_string()),
            Const::Bool(true) => self.asm.load_int("1"),
            Const::Bool(false) => self.asm.load_int("0"),
        }
    }

    fn gen_call_expr(&mut self, node: NodeId) {
        let name = self.ast.child(node, ast::CALL_EXPR_NAME);
        let args = self.ast.child(node, ast::CALL_EXPR_ARGS);
        let num_args = self.ast.num_children(args);

        for i in 0..num_args {
            self.gen_expr(self.ast.child(args, i));
            self.asm.push();
        }

        // pop arguments into their physical registers, last first
        for i in (0..num_args).rev() {
            self.asm.pop(i);
        }

        let name = self.ast.node_text(name);
        self.asm.call(&name);
    }

    pub(crate) fn gen_if_expr(&mut self, node: NodeId) {
        let cond = self.ast.child(node, ast::IF_EXPR_COND);
        let then = self.ast.child(node, ast::IF_EXPR_THEN);
        let els = self.ast.child(node, ast::IF_EXPR_ELSE);

        let label = self.next_label();

        self.gen_expr(cond);
        if els != NodeId::INVALID {
            self.asm.jump_if_false("else", label);
        } else {
            self.asm.jump_if_false("endif", label);
        }
        self.asm.label("then", label);
        self.gen_stmt(then, false);
        self.asm.jump("endif", label);
        if els != NodeId::INVALID {
            self.asm.label("else", label);
            self.gen_stmt(els, false);
        }
        self.asm.label("endif", label);
    }

    fn local_offset(&self, node: NodeId) -> usize {
        match self.ast.kind(node) {
            Kind::Name => {
                let sym = self
                    .symtab
                    .lookup(&self.ast.node_text(node))
                    .expect("undeclared name in codegen");
                sym.slot * self.asm.word_size()
            }
            kind => panic!("unknown offset kind {}", kind),
        }
    }
}
