//! The bytecode target: an assembler and an in-process virtual machine,
//! used by the test suite in place of the system assembler and linker.

pub mod asm;
pub mod cpu;
pub mod opcodes;

pub use asm::Asm;
pub use cpu::Cpu;
pub use opcodes::{Instr, Opcode};
