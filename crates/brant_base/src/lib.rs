//! # brant-base
//!
//! Structural atoms for the brant compiler pipeline.
//!
//! This crate provides the foundational types used by every later stage:
//!
//! - [`Token`]/[`Kind`] — bit-packed tokens and the pull-style lexer
//! - [`File`] — an immutable source file shared by the whole pipeline
//! - [`Interner`]/[`Symbol`] — string interning for O(1) name comparison
//! - [`Diagnostic`] — errors as data, rendered lazily with source context
//!
//! # Design Principles
//!
//! This crate has **no knowledge of the language grammar or the IR**. Tokens
//! are `(kind, byte offset)` pairs packed into 32 bits; the lexeme is never
//! stored, it is re-scanned from the offset on demand. Everything downstream
//! refers to source positions through tokens, so a diagnostic can always be
//! rendered with full context from just a token and a message.

pub mod diag;
pub mod file;
pub mod intern;
pub mod token;

pub use diag::{Diagnostic, DiagnosticReport};
pub use file::{File, MAX_FILE_SIZE};
pub use intern::{Interner, Symbol, SymbolEq};
pub use token::{Kind, Token};
