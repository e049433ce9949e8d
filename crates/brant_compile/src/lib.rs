//! # brant-compile
//!
//! The back half of the brant compiler.
//!
//! # Pipeline Position
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ source → Parser → Ast → TypeChecker → (SymTab, Universe)     │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//!                 codegen (AST walk, stack-machine style)
//!                                ▼
//!                 hlir::Builder (CFG of typed values)
//!                                ▼
//!                 hlir backend (IR walk over the Assembler seam)
//!                        ▼               ▼
//!                 ARM64 listing     bytecode VM
//! ```
//!
//! Two trait seams hold the pipeline together: [`codegen::Assembly`] is the
//! stack-machine-style interface the AST walker emits into (implemented by
//! the HLIR [`hlir::Builder`]), and [`hlir::Assembler`] is the
//! register-mask-oriented interface the backend drives (implemented by the
//! ARM64 text emitter and the bytecode assembler).

pub mod arch;
pub mod codegen;
pub mod compile;
pub mod hlir;
pub mod vm;

pub use compile::{compile, compile_to_asm, compile_to_bytecode, compile_to_ir, run};
