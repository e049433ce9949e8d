//! Diagnostics as values.
//!
//! A [`Diagnostic`] is data: the offending token and a formatted message.
//! Stages accumulate diagnostics in a `Vec` and the pipeline surfaces the
//! union. Stringification happens lazily on output, so structured consumers
//! (`--json`) can read the same values the terminal renderer does.
//!
//! # Rendered format
//!
//! ```text
//! error 2:12: undefined name y
//! func main() int {
//!     return y
//!            ^ here
//! }
//! ```

use crate::file::File;
use crate::token::Token;
use serde::Serialize;
use std::fmt::Write;

/// An error tied to a source position via its token.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    token: Token,
    message: String,
}

/// A diagnostic resolved against its file, ready for structured output.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic for the given token.
    pub fn new(token: Token, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            token,
            message: message.into(),
        }
    }

    /// The offending token.
    pub fn token(&self) -> Token {
        self.token
    }

    /// The diagnostic message, without position or context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Resolves line and column against the file for structured consumers.
    pub fn report(&self, file: &File) -> DiagnosticReport {
        let (line, col) = file.position_of(self.token);
        DiagnosticReport {
            file: file.name().to_string(),
            line,
            col,
            message: self.message.clone(),
        }
    }

    /// Renders the diagnostic with surrounding source lines and a caret
    /// pointing at the offending column.
    pub fn render(&self, file: &File) -> String {
        let (line, col) = file.position_of(self.token);
        let mut out = String::new();
        let _ = writeln!(out, "error {}:{}: {}", line, col, self.message);

        // print a few lines before and after the error
        let lines = file.lines();
        let first = line.saturating_sub(3);
        for i in first..=line + 3 {
            if i < 1 || i > lines.len() {
                continue;
            }
            let _ = writeln!(out, "{}", lines[i - 1]);
            if i == line {
                let _ = writeln!(out, "{}^ here", " ".repeat(col.saturating_sub(1)));
            }
        }
        out
    }
}
