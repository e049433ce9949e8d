//! Declaration generation: function ordering and entry shuffling.

use brant_syntax::ast::{self, Kind, NodeId};

use super::CodeGen;

impl CodeGen<'_> {
    pub(crate) fn gen_decl_list(&mut self, node: NodeId) {
        self.symtab.enter_scope(node);

        let decls: Vec<NodeId> = self.ast.children(node).to_vec();

        // declare every function up front so calls resolve in any order
        for decl in &decls {
            if self.ast.kind(*decl) != Kind::FuncDecl {
                continue;
            }
            let name = self.ast.node_text(self.ast.child(*decl, ast::FUNC_DECL_NAME));
            let sym = self
                .symtab
                .lookup(&name)
                .expect("undeclared function in codegen");
            self.asm.declare_function(&name, sym.ty);
        }

        // generate main first: the VM's entry point is pc 0
        for decl in &decls {
            if self.ast.kind(*decl) != Kind::FuncDecl {
                continue;
            }
            if self.ast.node_text(self.ast.child(*decl, ast::FUNC_DECL_NAME)) != "main" {
                continue;
            }
            self.gen_func_decl(*decl);
        }

        // then the other functions
        for decl in &decls {
            if self.ast.kind(*decl) != Kind::FuncDecl {
                continue;
            }
            if self.ast.node_text(self.ast.child(*decl, ast::FUNC_DECL_NAME)) == "main" {
                continue;
            }
            self.gen_func_decl(*decl);
        }

        self.symtab.leave_scope();
    }

    fn gen_func_decl(&mut self, node: NodeId) {
        self.symtab.enter_scope(node);

        let name = self.ast.node_text(self.ast.child(node, ast::FUNC_DECL_NAME));

        self.asm.prologue(&name, self.symtab.stack_size());

        // move each argument register into its local slot
        let params = self.ast.child(node, ast::FUNC_DECL_PARAMS);
        for i in 0..self.ast.num_children(params) {
            let param = self.ast.child(params, i);
            let pname = self.ast.node_text(self.ast.child(param, ast::FIELD_NAME));
            let sym = self.symtab.lookup(&pname).expect("undeclared parameter");
            assert!(sym.slot == i, "param slot mismatch");
            self.asm.store_local(i);
        }

        assert!(
            self.symtab.stack_size() >= self.ast.num_children(params),
            "local size mismatch"
        );

        let body = self.ast.child(node, ast::FUNC_DECL_BODY);
        self.gen_stmt_list(body, true);

        self.asm.epilogue();

        self.symtab.leave_scope();
    }
}
