//! The bytecode assembler.
//!
//! Implements the backend's [`Assembler`] seam over packed instruction
//! words, with the same label fixup scheme the HLIR builder uses: jumps to
//! labels not yet emitted are recorded and patched when the label lands.
//! The register-mask arguments are asserted against the r0/r1 conventions
//! the builder recorded; a violation is a compiler bug.

use std::collections::HashMap;

use brant_ir::{RegId, RegMask, R0, R1};

use crate::hlir::Assembler;

use super::opcodes::{Instr, Opcode};

/// Assembles bytecode for the [`super::Cpu`].
pub struct Asm {
    program: Vec<Instr>,
    labels: HashMap<String, usize>,
    refs: HashMap<String, Vec<usize>>,
    fn_name: String,
}

impl Asm {
    pub fn new() -> Asm {
        Asm {
            program: Vec::new(),
            labels: HashMap::new(),
            refs: HashMap::new(),
            fn_name: String::new(),
        }
    }

    /// The assembled program.
    ///
    /// # Panics
    ///
    /// Panics if any label reference is still unresolved.
    pub fn into_program(self) -> Vec<Instr> {
        assert!(
            self.refs.is_empty(),
            "unresolved label references: {:?}",
            self.refs.keys().collect::<Vec<_>>()
        );
        self.program
    }

    fn instr(&mut self, op: Opcode) {
        self.program.push(Instr::new(op));
    }

    fn instr1(&mut self, op: Opcode, arg: i64) {
        self.program.push(Instr::with_arg(op, arg));
    }

    fn jump_instr(&mut self, op: Opcode, label: &str) {
        if let Some(&loc) = self.labels.get(label) {
            self.instr1(op, loc as i64);
            return;
        }
        self.refs
            .entry(label.to_string())
            .or_default()
            .push(self.program.len());
        self.instr1(op, 0);
    }

    fn check_binary(dst: RegMask, src1: RegMask, src2: RegMask) {
        assert!(dst.has(R0), "dest must be r0");
        assert!(src1.has(R1), "src1 must be r1");
        assert!(src2.has(R0), "src2 must be r0");
    }
}

impl Default for Asm {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler for Asm {
    fn prologue(&mut self, name: &str, num_locals: usize) {
        self.fn_name = format!("_{}", name);
        let label = self.fn_name.clone();
        self.label(&label);
        self.instr1(Opcode::Prologue, num_locals as i64);
    }

    fn epilogue(&mut self) {}

    fn push(&mut self, src: RegMask) {
        assert!(src.has(R0), "src must be r0");
        self.instr(Opcode::Push);
    }

    fn pop(&mut self, dst: RegMask) {
        assert!(dst.len() == 1, "dest must be a single register");
        let mut dst = dst;
        self.instr1(Opcode::Pop, dst.pop().index() as i64);
    }

    fn load_local(&mut self, dst: RegMask, slot: usize) {
        assert!(dst.has(R0), "dest must be r0");
        self.instr1(Opcode::LoadLocal, slot as i64);
    }

    fn store_local(&mut self, src: RegMask, slot: usize) {
        assert!(
            src.has(RegId(slot as u8)),
            "src must be r{}, was {}",
            slot,
            src
        );
        self.instr1(Opcode::StoreLocal, slot as i64);
    }

    fn load(&mut self, dst: RegMask, addr: RegMask) {
        assert!(dst.has(R0), "dest must be r0");
        assert!(addr.has(R0), "addr must be r0");
        self.instr(Opcode::Load);
    }

    fn store(&mut self, src: RegMask, addr: RegMask) {
        assert!(src.has(R0), "src must be r0");
        assert!(addr.has(R1), "addr must be r1");
        self.instr(Opcode::Store);
    }

    fn load_int(&mut self, dst: RegMask, imm: i64) {
        assert!(dst.has(R0), "dest must be r0");
        self.instr1(Opcode::LoadInt, imm);
    }

    fn local_addr(&mut self, dst: RegMask, slot: usize) {
        assert!(dst.has(R0), "dest must be r0");
        self.instr1(Opcode::LocalAddr, slot as i64);
    }

    fn add(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Add);
    }

    fn sub(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Sub);
    }

    fn mul(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Mul);
    }

    fn div(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Div);
    }

    fn neg(&mut self, dst: RegMask, src: RegMask) {
        assert!(dst.has(R0), "dest must be r0");
        assert!(src.has(R0), "src must be r0");
        self.instr(Opcode::Neg);
    }

    fn eq(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Eq);
    }

    fn ne(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Ne);
    }

    fn lt(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Lt);
    }

    fn le(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Le);
    }

    fn gt(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Gt);
    }

    fn ge(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        Self::check_binary(dst, src1, src2);
        self.instr(Opcode::Ge);
    }

    fn call(&mut self, name: &str) {
        let label = format!("_{}", name);
        self.jump_instr(Opcode::Call, &label);
    }

    fn if_cond(&mut self, cond: RegMask, then_label: &str, else_label: &str) {
        assert!(cond.has(R0), "condition must be r0");
        self.jump_instr(Opcode::JumpIfFalse, else_label);
        self.jump_instr(Opcode::Jump, then_label);
    }

    fn jump(&mut self, label: &str) {
        self.jump_instr(Opcode::Jump, label);
    }

    fn label(&mut self, name: &str) {
        let loc = self.program.len();

        // fix up any references to this label
        if let Some(refs) = self.refs.remove(name) {
            for r in refs {
                self.program[r].patch_arg(loc);
            }
        }

        // record the label for future references
        self.labels.insert(name.to_string(), loc);
    }

    fn ret(&mut self) {
        if self.fn_name == "_main" {
            self.instr(Opcode::Exit);
            return;
        }
        self.instr(Opcode::Return);
    }
}
