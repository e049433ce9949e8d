//! Code generation from the typed AST into the stack-machine seam.
//!
//! The generator revisits the scopes the type checker established (scope
//! reentry is idempotent by AST node), walks each function, and emits a
//! linear stack-machine instruction stream through the [`Assembly`] trait.
//! The HLIR [`crate::hlir::Builder`] implements that trait and turns the
//! stream back into a control-flow graph.

mod decl;
mod expr;
mod stmt;

use brant_syntax::{Ast, SymTab};
use brant_types::{Type, Universe};

/// The stack-machine-style interface the AST walker emits into.
///
/// To evaluate `lhs ⊕ rhs` the walker emits `lhs`, `push`, `rhs`, `pop 1`,
/// `⊕`: the left operand travels through the stack into r1 while the right
/// stays in the r0 accumulator.
pub trait Assembly {
    fn word_size(&self) -> usize;

    /// Installs the type universe before any function is declared.
    fn set_types(&mut self, types: Universe);

    /// Declares a function so later calls can reference it regardless of
    /// generation order.
    fn declare_function(&mut self, name: &str, sig: Type);

    fn prologue(&mut self, name: &str, num_locals: usize);
    fn epilogue(&mut self);

    fn push(&mut self);
    fn pop(&mut self, reg: usize);
    fn load_local(&mut self, slot: usize);
    fn store_local(&mut self, slot: usize);
    fn load(&mut self);
    fn store(&mut self);

    fn load_int(&mut self, literal: &str);
    fn local_addr(&mut self, slot: usize);

    fn add(&mut self);
    fn sub(&mut self);
    fn mul(&mut self);
    fn div(&mut self);

    fn neg(&mut self);

    fn eq(&mut self);
    fn ne(&mut self);
    fn lt(&mut self);
    fn le(&mut self);
    fn gt(&mut self);
    fn ge(&mut self);

    fn call(&mut self, name: &str);
    fn jump_to_epilogue(&mut self);
    fn jump_if_false(&mut self, label: &str, id: usize);
    fn jump(&mut self, label: &str, id: usize);
    fn label(&mut self, label: &str, id: usize);
}

/// Walks the typed AST and drives an [`Assembly`].
pub struct CodeGen<'a> {
    ast: &'a Ast,
    symtab: &'a mut SymTab,
    asm: &'a mut dyn Assembly,
    label: usize,
}

impl<'a> CodeGen<'a> {
    pub fn new(ast: &'a Ast, symtab: &'a mut SymTab, asm: &'a mut dyn Assembly) -> CodeGen<'a> {
        CodeGen {
            ast,
            symtab,
            asm,
            label: 0,
        }
    }

    /// Generates the whole program.
    pub fn generate(mut self, types: Universe) {
        self.asm.set_types(types);
        self.gen_decl_list(self.ast.root());
    }

    /// Allocates a fresh label id.
    fn next_label(&mut self) -> usize {
        let label = self.label;
        self.label += 1;
        label
    }
}
