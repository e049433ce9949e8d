//! Library surface of the `brant` CLI, split out so argument parsing and
//! dispatch stay testable.

pub mod cli;
pub mod style;

pub use cli::{run_cli, Cli};
