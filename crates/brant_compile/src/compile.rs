//! The compilation pipeline.
//!
//! Strictly sequential: lex/parse → type-check → generate. Each stage
//! accumulates diagnostics; if a stage produced any, later stages are
//! skipped and the union is returned. There is no partial output on error.

use std::sync::Arc;

use brant_base::{Diagnostic, File};
use brant_ir::Program;
use brant_syntax::{Parser, TypeChecker};

use crate::arch;
use crate::codegen::{Assembly, CodeGen};
use crate::hlir::{self, Builder};
use crate::vm;

/// Compiles a source file into the given assembly sink.
pub fn compile(file: &Arc<File>, asm: &mut dyn Assembly) -> Result<(), Vec<Diagnostic>> {
    let (mut ast, errs) = Parser::new(Arc::clone(file)).parse();
    if !errs.is_empty() {
        return Err(errs);
    }

    let (mut symtab, types, errs) = TypeChecker::check(&mut ast);
    if !errs.is_empty() {
        return Err(errs);
    }

    CodeGen::new(&ast, &mut symtab, asm).generate(types);

    Ok(())
}

/// Compiles a source file to its HLIR program.
pub fn compile_to_ir(file: &Arc<File>) -> Result<Program, Vec<Diagnostic>> {
    let mut builder = Builder::new(Arc::clone(file));
    compile(file, &mut builder)?;
    Ok(builder.into_program())
}

/// Compiles a source file to an ARM64 text listing.
pub fn compile_to_asm(file: &Arc<File>) -> Result<String, Vec<Diagnostic>> {
    let program = compile_to_ir(file)?;
    let mut asm = arch::aarch64::Assembly::new();
    hlir::CodeGen::new(&program, &mut asm).generate();
    Ok(asm.finish())
}

/// Compiles a source file to bytecode for the in-process VM.
pub fn compile_to_bytecode(file: &Arc<File>) -> Result<Vec<vm::Instr>, Vec<Diagnostic>> {
    let program = compile_to_ir(file)?;
    let mut asm = vm::Asm::new();
    hlir::CodeGen::new(&program, &mut asm).generate();
    Ok(asm.into_program())
}

/// Compiles and runs a source file on the VM, returning its exit value.
pub fn run(file: &Arc<File>) -> Result<i64, Vec<Diagnostic>> {
    let program = compile_to_bytecode(file)?;
    Ok(vm::Cpu::new(program).run())
}
