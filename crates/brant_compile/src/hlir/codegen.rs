//! The backend code generator: IR walk over the assembler seam.
//!
//! Walks blocks in textual order per function, gathers up to three register
//! masks per value (its destination, then its operand registers), and
//! dispatches on opcode to an [`Assembler`] method. The backend does not
//! allocate registers; the builder already recorded r0/r1-oriented choices
//! in each value's register mask.

use brant_ir::{Func, Program, RegMask, ValueId};

use super::op::Op;

/// What a target must supply to receive the backend's walk.
///
/// Register arguments are masks: the set of registers the value lives in.
/// For `store_local` the mask is the calling-convention slot of the
/// argument register being spilled.
pub trait Assembler {
    fn prologue(&mut self, name: &str, num_locals: usize);
    fn epilogue(&mut self);

    fn push(&mut self, src: RegMask);
    fn pop(&mut self, dst: RegMask);
    fn load_local(&mut self, dst: RegMask, slot: usize);
    fn store_local(&mut self, src: RegMask, slot: usize);
    fn load(&mut self, dst: RegMask, addr: RegMask);
    fn store(&mut self, src: RegMask, addr: RegMask);

    fn load_int(&mut self, dst: RegMask, imm: i64);
    fn local_addr(&mut self, dst: RegMask, slot: usize);

    fn add(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);
    fn sub(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);
    fn mul(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);
    fn div(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);

    fn neg(&mut self, dst: RegMask, src: RegMask);

    fn eq(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);
    fn ne(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);
    fn lt(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);
    fn le(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);
    fn gt(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);
    fn ge(&mut self, dst: RegMask, src1: RegMask, src2: RegMask);

    fn call(&mut self, name: &str);
    fn if_cond(&mut self, cond: RegMask, then_label: &str, else_label: &str);
    fn jump(&mut self, label: &str);
    fn label(&mut self, name: &str);
    fn ret(&mut self);
}

/// Walks an IR program and drives an [`Assembler`].
pub struct CodeGen<'a> {
    program: &'a Program,
    asm: &'a mut dyn Assembler,
}

impl<'a> CodeGen<'a> {
    pub fn new(program: &'a Program, asm: &'a mut dyn Assembler) -> CodeGen<'a> {
        CodeGen { program, asm }
    }

    /// Emits every function, `main` first so the VM's entry is pc 0.
    pub fn generate(&mut self) {
        for i in 0..self.program.num_funcs() {
            let f = self.program.func(brant_ir::FuncId(i as u32));
            if f.name() == "main" {
                self.generate_func(f);
            }
        }
        for i in 0..self.program.num_funcs() {
            let f = self.program.func(brant_ir::FuncId(i as u32));
            if f.name() != "main" {
                self.generate_func(f);
            }
        }
    }

    fn generate_func(&mut self, f: &Func) {
        for i in 0..f.num_blocks() {
            let block = f.block_at(i);
            self.asm.label(block.name());
            for v in block.values() {
                self.generate_instr(f, *v);
            }
            self.generate_instr(f, block.terminator());
        }
    }

    fn generate_instr(&mut self, f: &Func, instr: ValueId) {
        let mut reg = [RegMask::EMPTY; 3];
        let mut ri = 0;
        if !f.regs(instr).is_empty() {
            reg[0] = f.regs(instr);
            ri = 1;
        }
        for i in 0..f.num_operands(instr) {
            let mask = f.regs(f.operand(instr, i));
            if !mask.is_empty() {
                reg[ri] = mask;
                ri += 1;
            }
        }

        let op = Op::from_id(f.op(instr))
            .unwrap_or_else(|| panic!("unknown op {}", f.op(instr)));

        match op {
            Op::Prologue => {
                let locals = self.int_const(f, instr, 0);
                self.asm.prologue(f.name(), locals as usize);
            }
            Op::Epilogue => self.asm.epilogue(),
            Op::Push => self.asm.push(reg[0]),
            Op::Pop => self.asm.pop(reg[0]),
            Op::LoadLocal => {
                let slot = self.int_const(f, instr, 0);
                self.asm.load_local(reg[0], slot as usize);
            }
            Op::StoreLocal => {
                let mask = f
                    .const_for_value(f.operand(instr, 0))
                    .and_then(|c| c.as_reg())
                    .expect("StoreLocal without register constant");
                let slot = self.int_const(f, instr, 1);
                self.asm.store_local(mask, slot as usize);
            }
            Op::Load => self.asm.load(reg[0], reg[1]),
            Op::Store => self.asm.store(reg[0], reg[1]),
            Op::LocalAddr => {
                let slot = self.int_const(f, instr, 0);
                self.asm.local_addr(reg[0], slot as usize);
            }
            Op::LoadInt => {
                let imm = self.int_const(f, instr, 0);
                self.asm.load_int(reg[0], imm);
            }
            Op::Add => self.asm.add(reg[0], reg[1], reg[2]),
            Op::Sub => self.asm.sub(reg[0], reg[1], reg[2]),
            Op::Mul => self.asm.mul(reg[0], reg[1], reg[2]),
            Op::Div => self.asm.div(reg[0], reg[1], reg[2]),
            Op::Neg => self.asm.neg(reg[0], reg[1]),
            Op::Eq => self.asm.eq(reg[0], reg[1], reg[2]),
            Op::Ne => self.asm.ne(reg[0], reg[1], reg[2]),
            Op::Lt => self.asm.lt(reg[0], reg[1], reg[2]),
            Op::Le => self.asm.le(reg[0], reg[1], reg[2]),
            Op::Gt => self.asm.gt(reg[0], reg[1], reg[2]),
            Op::Ge => self.asm.ge(reg[0], reg[1], reg[2]),
            Op::Call => {
                let target = f
                    .const_for_value(f.operand(instr, 0))
                    .and_then(|c| c.as_func())
                    .expect("Call without function constant");
                let name = self.program.func(target).name().to_string();
                self.asm.call(&name);
            }
            Op::Jump => {
                let dest = f.block(f.operand(instr, 0)).name().to_string();
                self.asm.jump(&dest);
            }
            Op::If => {
                let then = f.block(f.operand(instr, 1)).name().to_string();
                let els = f.block(f.operand(instr, 2)).name().to_string();
                self.asm.if_cond(reg[0], &then, &els);
            }
            Op::Return => self.asm.ret(),
        }
    }

    fn int_const(&self, f: &Func, instr: ValueId, oper: usize) -> i64 {
        f.const_for_value(f.operand(instr, oper))
            .and_then(|c| c.as_int())
            .expect("expected integer constant operand")
    }
}
