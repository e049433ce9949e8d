//! High level IR: the opcode set, the CFG builder, and the backend walk.

pub mod builder;
pub mod codegen;
pub mod op;

pub use builder::Builder;
pub use codegen::{Assembler, CodeGen};
pub use op::Op;
