//! ARM64 text assembly emitter.
//!
//! Emits a `.s` listing: a standard frame, `str`/`ldr` push and pop, `cset`
//! comparisons, and the raw `exit` syscall in `_main`'s return path. Uses
//! x0 as the accumulator and x1 as the spill register, mirroring the
//! register masks the builder recorded. Block labels are prefixed `.L.`.

use std::fmt::Write;

use brant_ir::{RegMask, R0, R1};

use crate::hlir::Assembler;

fn align(n: usize, to: usize) -> usize {
    (n + to - 1) / to * to
}

const WORD_SIZE: usize = 8;

/// The ARM64 listing under construction.
pub struct Assembly {
    out: String,
    depth: i64,
    fn_name: String,
}

impl Assembly {
    pub fn new() -> Assembly {
        Assembly {
            out: String::new(),
            depth: 0,
            fn_name: String::new(),
        }
    }

    /// The finished listing.
    pub fn finish(self) -> String {
        self.out
    }

    fn emit(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }

    fn emitf(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{}", args);
    }

    /// Frame offset of a local slot. Slot 0 lives just below the saved
    /// frame pointer.
    fn local_offset(slot: usize) -> usize {
        (slot + 1) * WORD_SIZE
    }

    fn compare(&mut self, dst: RegMask, src1: RegMask, src2: RegMask, cond: &str) {
        assert!(dst.has(R0), "dest must be r0");
        assert!(src1.has(R1), "src1 must be r1");
        assert!(src2.has(R0), "src2 must be r0");
        self.emit("  cmp x1, x0");
        self.emitf(format_args!("  cset x0, {}", cond));
    }

    fn arith(&mut self, dst: RegMask, src1: RegMask, src2: RegMask, instr: &str) {
        assert!(dst.has(R0), "dest must be r0");
        assert!(src1.has(R1), "src1 must be r1");
        assert!(src2.has(R0), "src2 must be r0");
        self.emitf(format_args!("  {} x0, x1, x0", instr));
    }
}

impl Default for Assembly {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler for Assembly {
    fn prologue(&mut self, name: &str, num_locals: usize) {
        self.fn_name = format!("_{}", name);
        self.emit(".text");
        self.emitf(format_args!(".global {}", self.fn_name.clone()));
        self.emit(".align 2");
        self.emitf(format_args!("{}:", self.fn_name.clone()));
        self.emit("  stp x29, x30, [sp, #-16]!");
        self.emit("  mov x29, sp");
        self.emitf(format_args!(
            "  sub sp, sp, #{}",
            align(num_locals * WORD_SIZE, 16)
        ));
    }

    fn epilogue(&mut self) {
        self.emit("  mov sp, x29");
        self.emit("  ldp x29, x30, [sp], #16");
        assert!(self.depth == 0, "unbalanced stack");
    }

    fn push(&mut self, src: RegMask) {
        assert!(src.has(R0), "src must be r0");
        self.depth += 1;
        // the hardware stack is 16-byte aligned, so half of each slot is
        // wasted for now
        self.emit("  str x0, [sp, #-16]!");
    }

    fn pop(&mut self, dst: RegMask) {
        assert!(dst.len() == 1, "dest must be a single register");
        self.depth -= 1;
        self.emitf(format_args!("  ldr x{}, [sp], #16", dst.peek().index()));
    }

    fn load_local(&mut self, dst: RegMask, slot: usize) {
        assert!(dst.has(R0), "dest must be r0");
        self.emitf(format_args!(
            "  ldr x0, [x29, #-{}]",
            Self::local_offset(slot)
        ));
    }

    fn store_local(&mut self, src: RegMask, slot: usize) {
        let reg = src.peek().index();
        assert!(src.len() == 1, "src must be a single register");
        self.emitf(format_args!(
            "  str x{}, [x29, #-{}]",
            reg,
            Self::local_offset(slot)
        ));
    }

    fn load(&mut self, dst: RegMask, addr: RegMask) {
        assert!(dst.has(R0), "dest must be r0");
        assert!(addr.has(R0), "addr must be r0");
        self.emit("  ldr x0, [x0]");
    }

    fn store(&mut self, src: RegMask, addr: RegMask) {
        assert!(src.has(R0), "src must be r0");
        assert!(addr.has(R1), "addr must be r1");
        self.emit("  str x0, [x1]");
    }

    fn load_int(&mut self, dst: RegMask, imm: i64) {
        assert!(dst.has(R0), "dest must be r0");
        self.emitf(format_args!("  mov x0, #{}", imm));
    }

    fn local_addr(&mut self, dst: RegMask, slot: usize) {
        assert!(dst.has(R0), "dest must be r0");
        self.emitf(format_args!(
            "  sub x0, x29, #{}",
            Self::local_offset(slot)
        ));
    }

    fn add(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.arith(dst, src1, src2, "add");
    }

    fn sub(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.arith(dst, src1, src2, "sub");
    }

    fn mul(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.arith(dst, src1, src2, "mul");
    }

    fn div(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.arith(dst, src1, src2, "sdiv");
    }

    fn neg(&mut self, dst: RegMask, src: RegMask) {
        assert!(dst.has(R0), "dest must be r0");
        assert!(src.has(R0), "src must be r0");
        self.emit("  neg x0, x0");
    }

    fn eq(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.compare(dst, src1, src2, "eq");
    }

    fn ne(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.compare(dst, src1, src2, "ne");
    }

    fn lt(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.compare(dst, src1, src2, "lt");
    }

    fn le(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.compare(dst, src1, src2, "le");
    }

    fn gt(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.compare(dst, src1, src2, "gt");
    }

    fn ge(&mut self, dst: RegMask, src1: RegMask, src2: RegMask) {
        self.compare(dst, src1, src2, "ge");
    }

    fn call(&mut self, name: &str) {
        self.emitf(format_args!("  bl _{}", name));
    }

    fn if_cond(&mut self, cond: RegMask, then_label: &str, else_label: &str) {
        assert!(cond.has(R0), "condition must be r0");
        self.emit("  cmp x0, #0");
        self.emitf(format_args!("  b.eq .L.{}", else_label));
        self.emitf(format_args!("  b .L.{}", then_label));
    }

    fn jump(&mut self, label: &str) {
        self.emitf(format_args!("  b .L.{}", label));
    }

    fn label(&mut self, name: &str) {
        self.emitf(format_args!(".L.{}:", name));
    }

    fn ret(&mut self) {
        if self.fn_name == "_main" {
            // exit syscall; x0 already holds the status
            self.emit("  mov x16, #1");
            self.emit("  svc #0");
        }
        self.emit("  ret");
    }
}
