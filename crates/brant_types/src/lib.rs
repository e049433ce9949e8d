//! # brant-types
//!
//! The universe of types for the brant compiler.
//!
//! Types are 32-bit [`Type`] handles rather than allocated descriptors: 4
//! bits of kind, 2 bits of pointer indirection, and an index into a
//! per-program [`Universe`] interning table. Pointer types are represented
//! by incrementing the indirection count on any handle, so `*T` and `**T`
//! never allocate.
//!
//! [`Type::NONE`] participates as a bottom element: a node whose subtree
//! failed to check keeps type `NONE`, and every later rule bails out when an
//! operand is `NONE`, so one error does not cascade.

pub mod basic;
pub mod constant;
pub mod handle;
pub mod universe;

pub use basic::Basic;
pub use constant::Const;
pub use handle::{Type, TypeKind};
pub use universe::{FuncSig, Universe};
