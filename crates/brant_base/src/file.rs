//! Immutable source files.
//!
//! A [`File`] owns the source text and is shared by every later pipeline
//! stage. Tokens, AST nodes, and IR values all refer back to it through byte
//! offsets, so it is also the place where offsets are resolved to line and
//! column positions for diagnostics.

use crate::diag::Diagnostic;
use crate::token::Token;

/// Maximum source file size, from the 25 offset bits of a packed token.
pub const MAX_FILE_SIZE: usize = 1 << 25;

/// A source file: a name and its full text.
#[derive(Debug, Clone)]
pub struct File {
    name: String,
    src: String,
}

impl File {
    /// Creates a new file, rejecting sources too large for packed tokens.
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Result<File, Diagnostic> {
        let src = src.into();
        if src.len() >= MAX_FILE_SIZE {
            return Err(Diagnostic::new(
                Token::ILLEGAL,
                "source file too large (max 32 MiB)",
            ));
        }
        Ok(File {
            name: name.into(),
            src,
        })
    }

    /// The file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw source bytes. All token offsets index into this.
    pub fn src(&self) -> &[u8] {
        self.src.as_bytes()
    }

    /// Returns the text of the given token.
    pub fn token_text(&self, tok: Token) -> String {
        String::from_utf8_lossy(tok.bytes(self.src())).into_owned()
    }

    /// Returns the source text between two byte offsets.
    pub fn text_between(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.src()[start.min(self.src.len())..end.min(self.src.len())])
            .into_owned()
    }

    /// Returns the 1-based line and column of the given token.
    pub fn position_of(&self, tok: Token) -> (usize, usize) {
        let offset = tok.offset();
        let mut line = 0;
        let mut line_offset = 0;
        for (i, ch) in self.src().iter().enumerate() {
            if i >= offset {
                break;
            }
            if *ch == b'\n' {
                line += 1;
                line_offset = i;
            }
        }
        let col = if line == 0 {
            offset + 1
        } else {
            offset - line_offset
        };
        (line + 1, col)
    }

    /// The source lines, for diagnostic context printing.
    pub fn lines(&self) -> Vec<&str> {
        self.src.split('\n').collect()
    }
}

impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Kind;

    #[test]
    fn position_of_first_line() {
        let file = File::new("t.bt", "abc def").unwrap();
        let tok = Token::new(Kind::Ident, 4);
        assert_eq!(file.position_of(tok), (1, 5));
    }

    #[test]
    fn position_of_later_line() {
        let file = File::new("t.bt", "abc\ndef\nghi").unwrap();
        let tok = Token::new(Kind::Ident, 8);
        assert_eq!(file.position_of(tok), (3, 1));
        let tok = Token::new(Kind::Ident, 9);
        assert_eq!(file.position_of(tok), (3, 2));
    }

    #[test]
    fn token_text_recovers_lexeme() {
        let file = File::new("t.bt", "x := 42").unwrap();
        assert_eq!(file.token_text(Token::new(Kind::Int, 5)), "42");
        assert_eq!(file.token_text(Token::new(Kind::Define, 2)), ":=");
    }

    #[test]
    fn rejects_oversized_source() {
        let big = "x".repeat(MAX_FILE_SIZE);
        let err = File::new("big.bt", big).unwrap_err();
        assert!(err.message().contains("too large"));
    }
}
