//! The HLIR builder.
//!
//! The builder exposes the stack-machine-style [`Assembly`] interface the
//! AST code generator emits into, and materializes a control-flow graph of
//! typed values from that linear stream. Two implicit accumulator values
//! `a` and `b` stand for "the value currently in r0 / r1"; labelled block
//! boundaries become basic blocks, and forward label references are
//! recorded and patched when the label is finally emitted.
//!
//! Invariant: every block ends in exactly one terminator. A block reached
//! purely by label-fallthrough is linked as a successor only if the
//! preceding block's terminator still had a placeholder slot; the front end
//! must otherwise have emitted an explicit jump.

use std::collections::HashMap;
use std::sync::Arc;

use brant_base::File;
use brant_ir::{Constant, FuncId, Program, RegId, RegMask, ValueId, R0};
use brant_types::{Type, Universe};

use crate::codegen::Assembly;

use super::op::{register_ops, Op};

struct Ref {
    /// The terminator to fix up.
    instr: ValueId,
    /// The operand slot holding the unresolved successor.
    oper: usize,
    /// The corresponding index in the block's successor list.
    succ_slot: usize,
}

/// Adapts the code generator's linear emission style into a CFG.
pub struct Builder {
    program: Program,

    /// The current function, set between `prologue` and `epilogue`.
    cur_fn: Option<FuncId>,

    /// The current block, set by `label`.
    cur_block: Option<ValueId>,

    a: ValueId,
    b: ValueId,

    labels: HashMap<String, ValueId>,
    refs: HashMap<String, Vec<Ref>>,
}

impl Builder {
    pub fn new(file: Arc<File>) -> Builder {
        register_ops();
        Builder {
            program: Program::new(file),
            cur_fn: None,
            cur_block: None,
            a: ValueId::INVALID,
            b: ValueId::INVALID,
            labels: HashMap::new(),
            refs: HashMap::new(),
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Finishes building and hands the program over.
    ///
    /// # Panics
    ///
    /// Panics if any forward label reference is still unresolved.
    pub fn into_program(self) -> Program {
        assert!(
            self.refs.is_empty(),
            "unresolved label references: {:?}",
            self.refs.keys().collect::<Vec<_>>()
        );
        self.program
    }

    fn fid(&self) -> FuncId {
        self.cur_fn.expect("no current function")
    }

    fn block(&self) -> ValueId {
        self.cur_block.expect("no current block")
    }

    fn fn_name(&self) -> String {
        self.program.func(self.fid()).name().to_string()
    }

    /// Appends a value to the current block.
    fn value(&mut self, op: Op, ty: Type, operands: &[ValueId]) -> ValueId {
        let block = self.block();
        let fid = self.fid();
        self.program
            .func_mut(fid)
            .push_value(block, op.id(), brant_base::Token::ILLEGAL, ty, operands)
    }

    fn constant(&mut self, c: Constant) -> ValueId {
        let fid = self.fid();
        self.program.func_mut(fid).value_for_const(c)
    }

    fn reg(&mut self, id: ValueId, reg: RegId) {
        let fid = self.fid();
        self.program.func_mut(fid).add_reg(id, reg);
    }

    /// A binary operation consumes `b` (src1) and `a` (src2) and leaves its
    /// result as the new `a` in r0.
    fn binary(&mut self, op: Op, ty: Type) {
        let (b, a) = (self.b, self.a);
        self.a = self.value(op, ty, &[b, a]);
        self.reg(self.a, R0);
    }

    /// Points the current block's terminator at a label, resolving it now
    /// when known and recording a forward reference otherwise. Operands
    /// from `first_succ` on are successor slots.
    fn jump_target(&mut self, op: Op, name: String, pre_ops: &[ValueId], first_succ: usize) {
        let block = self.block();
        let fid = self.fid();

        let mut operands = pre_ops.to_vec();
        if let Some(&target) = self.labels.get(&name) {
            operands.push(target);
            self.program
                .func_mut(fid)
                .update_terminator(block, op.id(), &operands, first_succ);
            return;
        }

        operands.push(ValueId::INVALID);
        self.program
            .func_mut(fid)
            .update_terminator(block, op.id(), &operands, first_succ);

        self.refs.entry(name).or_default().push(Ref {
            instr: block,
            oper: operands.len() - 1,
            succ_slot: operands.len() - 1 - first_succ,
        });
    }
}

impl Assembly for Builder {
    fn word_size(&self) -> usize {
        1
    }

    fn set_types(&mut self, types: Universe) {
        self.program.set_types(types);
    }

    fn declare_function(&mut self, name: &str, sig: Type) {
        self.program.new_func(name, sig);
    }

    fn prologue(&mut self, name: &str, num_locals: usize) {
        self.cur_fn = Some(
            self.program
                .func_named(name)
                .expect("prologue for undeclared function"),
        );

        self.label(&format!("{}.entry", name), 0);

        let locals = self.constant(Constant::Int(num_locals as i64));
        self.value(Op::Prologue, Type::VOID, &[locals]);

        self.a = ValueId::INVALID;
        self.b = ValueId::INVALID;
    }

    fn epilogue(&mut self) {
        let name = self.fn_name();
        self.label(&format!("{}.epilogue", name), 0);
        self.value(Op::Epilogue, Type::VOID, &[]);

        let fid = self.fid();
        let block = self.block();
        let sig = self.program.func(fid).sig();
        let ret = self.program.types().func(sig).return_type();
        if ret == Type::VOID {
            self.program
                .func_mut(fid)
                .update_terminator(block, Op::Return.id(), &[], 0);
        } else {
            let a = self.a;
            self.program
                .func_mut(fid)
                .update_terminator(block, Op::Return.id(), &[a], 1);
        }

        assert!(
            self.refs.is_empty(),
            "unresolved label references at epilogue"
        );

        self.cur_block = None;
        self.cur_fn = None;
    }

    fn push(&mut self) {
        let a = self.a;
        self.value(Op::Push, Type::VOID, &[a]);
    }

    fn pop(&mut self, reg: usize) {
        self.b = self.value(Op::Pop, Type::INT, &[]);
        self.reg(self.b, RegId(reg as u8));
    }

    fn load_local(&mut self, slot: usize) {
        let c = self.constant(Constant::Int(slot as i64));
        self.a = self.value(Op::LoadLocal, Type::INT, &[c]);
        self.reg(self.a, R0);
    }

    fn store_local(&mut self, slot: usize) {
        let reg = self.constant(Constant::Reg(RegMask::single(RegId(slot as u8))));
        let c = self.constant(Constant::Int(slot as i64));
        self.value(Op::StoreLocal, Type::VOID, &[reg, c]);
    }

    fn load(&mut self) {
        let a = self.a;
        self.a = self.value(Op::Load, Type::INT, &[a]);
        self.reg(self.a, R0);
    }

    fn store(&mut self) {
        let (a, b) = (self.a, self.b);
        self.value(Op::Store, Type::VOID, &[a, b]);
    }

    fn load_int(&mut self, literal: &str) {
        let value: i64 = literal.parse().unwrap_or_default();
        let c = self.constant(Constant::Int(value));
        self.a = self.value(Op::LoadInt, Type::INT, &[c]);
        self.reg(self.a, R0);
    }

    fn local_addr(&mut self, slot: usize) {
        let c = self.constant(Constant::Int(slot as i64));
        self.a = self.value(Op::LocalAddr, Type::INT, &[c]);
        self.reg(self.a, R0);
    }

    fn add(&mut self) {
        self.binary(Op::Add, Type::INT);
    }

    fn sub(&mut self) {
        self.binary(Op::Sub, Type::INT);
    }

    fn mul(&mut self) {
        self.binary(Op::Mul, Type::INT);
    }

    fn div(&mut self) {
        self.binary(Op::Div, Type::INT);
    }

    fn neg(&mut self) {
        let a = self.a;
        self.a = self.value(Op::Neg, Type::INT, &[a]);
        self.reg(self.a, R0);
    }

    fn eq(&mut self) {
        self.binary(Op::Eq, Type::BOOL);
    }

    fn ne(&mut self) {
        self.binary(Op::Ne, Type::BOOL);
    }

    fn lt(&mut self) {
        self.binary(Op::Lt, Type::BOOL);
    }

    fn le(&mut self) {
        self.binary(Op::Le, Type::BOOL);
    }

    fn gt(&mut self) {
        self.binary(Op::Gt, Type::BOOL);
    }

    fn ge(&mut self) {
        self.binary(Op::Ge, Type::BOOL);
    }

    fn call(&mut self, name: &str) {
        let target = self
            .program
            .func_named(name)
            .expect("call to undeclared function");
        let ret = self
            .program
            .types()
            .func(self.program.func(target).sig())
            .return_type();
        let c = self.constant(Constant::Func(target));
        self.a = self.value(Op::Call, ret, &[c]);
        self.reg(self.a, R0);
    }

    fn jump_to_epilogue(&mut self) {
        let name = format!("{}.epilogue", self.fn_name());
        self.jump_target(Op::Jump, format!("{}0", name), &[], 0);
    }

    fn jump_if_false(&mut self, label: &str, id: usize) {
        let a = self.a;
        self.jump_target(
            Op::If,
            format!("{}{}", label, id),
            &[a, ValueId::INVALID],
            1,
        );
    }

    fn jump(&mut self, label: &str, id: usize) {
        self.jump_target(Op::Jump, format!("{}{}", label, id), &[], 0);
    }

    fn label(&mut self, label: &str, id: usize) {
        let name = format!("{}{}", label, id);
        let fid = self.fid();

        let bid = self.program.func_mut(fid).new_block(
            name.clone(),
            Op::Jump.id(),
            &[ValueId::INVALID],
            0,
        );

        // If the previous block's terminator still has a placeholder
        // successor slot, the new block is the fallthrough target.
        if let Some(prev) = self.cur_block {
            let f = self.program.func_mut(fid);
            if f.op(prev) == Op::If.id() {
                f.set_successor(prev, 1, 0, bid);
            } else {
                let num = f.num_operands(prev);
                if num > 0 {
                    let last = num - 1;
                    if f.operand(prev, last) == ValueId::INVALID {
                        let first_succ = num - f.block(prev).successors().len();
                        f.set_successor(prev, last, last - first_succ, bid);
                    }
                }
            }
        }

        self.cur_block = Some(bid);

        // fix up any forward references to this label
        if let Some(refs) = self.refs.remove(&name) {
            let f = self.program.func_mut(fid);
            for r in refs {
                f.set_successor(r.instr, r.oper, r.succ_slot, bid);
            }
        }

        // record the label for future references
        self.labels.insert(name, bid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brant_types::Type;

    fn builder() -> Builder {
        let file = Arc::new(File::new("test.bt", "").unwrap());
        let mut b = Builder::new(file);
        let mut uni = Universe::new();
        let sig = uni.func_for(&[], Type::INT);
        b.set_types(uni);
        b.declare_function("main", sig);
        b
    }

    #[test]
    fn forward_reference_resolves_at_label() {
        let mut b = builder();
        b.prologue("main", 0);
        b.load_int("1");
        b.jump("target", 7);
        assert!(!b.refs.is_empty());

        b.label("target", 7);
        assert!(b.refs.is_empty());

        b.load_int("2");
        b.epilogue();

        let program = b.into_program();
        let main = program.func(program.func_named("main").unwrap());
        let entry = main.block_at(0);
        // the entry block's jump points at the target block
        assert_eq!(main.block(entry.successors()[0]).name(), "target7");
    }

    #[test]
    fn backward_jump_resolves_immediately() {
        let mut b = builder();
        b.prologue("main", 0);
        b.label("loop", 3);
        b.load_int("1");
        b.jump("loop", 3);
        assert!(b.refs.is_empty());
        b.epilogue();
    }

    #[test]
    fn fallthrough_links_only_unresolved_slots() {
        let mut b = builder();
        b.prologue("main", 0);
        b.label("top", 1);
        b.load_int("1");
        b.jump("top", 1); // resolved backward jump
        b.label("next", 2); // must NOT steal top1's target
        b.load_int("2");
        b.epilogue();

        let program = b.into_program();
        let main = program.func(program.func_named("main").unwrap());
        let top = main.block_at(1);
        assert_eq!(top.name(), "top1");
        assert_eq!(main.block(top.successors()[0]).name(), "top1");
    }

    #[test]
    fn accumulator_threads_through_binary_ops() {
        let mut b = builder();
        b.prologue("main", 0);
        b.load_int("5");
        b.push();
        b.load_int("6");
        b.pop(1);
        b.add();
        b.epilogue();

        let dump = b.into_program().dump();
        assert!(dump.contains("r0 = Add r1, r0"));
        assert!(dump.contains("Return r0"));
    }

    #[test]
    #[should_panic(expected = "unresolved label references")]
    fn dangling_forward_reference_panics() {
        let mut b = builder();
        b.prologue("main", 0);
        b.load_int("1");
        b.jump("nowhere", 9);
        b.epilogue();
    }
}
