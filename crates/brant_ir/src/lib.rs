//! # brant-ir
//!
//! A multi-level IR suitable for storing an intermediate representation for
//! every level of the compiler after type checking: a higher level IR close
//! to the source, room for a low level IR closer to the machine, and the
//! final assembly.
//!
//! The IR is designed to be as compact as possible in order to efficiently
//! utilize the CPU cache. [`ValueId`]s identify values and are simply an
//! index into the current function's value list; the id can be used in side
//! tables to store additional information about the value. Blocks are
//! referenced by the `ValueId` of their terminator instruction, which makes
//! the graph cyclic without any ownership cycles: the arena owns everything
//! and handles are `Copy`.
//!
//! Opcodes live in a layered namespace (see [`op`]): a 2-bit level selects
//! one of four 8-bit opcode sets, and sets are registered once at program
//! start-up in a process-wide write-once table. New opcode sets plug in
//! without touching the IR core.

pub mod block;
pub mod constant;
pub mod func;
pub mod op;
pub mod program;
pub mod reg;
pub mod value;

pub use block::Block;
pub use constant::Constant;
pub use func::Func;
pub use op::{Level, OpId, OpSet};
pub use program::{FuncId, Program};
pub use reg::{RegId, RegMask, R0, R1, R2, R3, R4, R5, R6, R7, R8};
pub use value::ValueId;
