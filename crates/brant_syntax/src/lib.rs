//! # brant-syntax
//!
//! The front end of the brant compiler: lexing (via `brant-base` tokens), the
//! flat AST store, the recursive-descent parser, the scoped symbol table, and
//! the type checker.
//!
//! # Pipeline Position
//!
//! ```text
//! source text → Parser → Ast → TypeChecker → (SymTab, Universe) → codegen
//! ```
//!
//! The AST is index-addressed: nodes are [`ast::NodeId`] handles into one
//! append-only array, children live in one shared child array, and inferred
//! types live in a side table keyed by node id. Nothing in the tree is a
//! pointer, so the whole structure is immutable after parsing apart from the
//! side tables the checker fills in.

pub mod ast;
pub mod parser;
pub mod semantics;
pub mod symtab;

pub use ast::{Ast, NodeId};
pub use parser::Parser;
pub use semantics::TypeChecker;
pub use symtab::{Sym, SymKind, SymTab, ScopeId, SymbolId};
