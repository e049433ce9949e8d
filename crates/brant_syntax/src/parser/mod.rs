//! Hand-written recursive-descent parser.
//!
//! The parser drives the pull lexer one token at a time and appends AST
//! nodes post-order as productions complete. Every production that fails
//! without consuming a token emits at least one diagnostic, so the
//! declaration loop can detect lack of progress and bail instead of
//! spinning.

mod decl;
mod expr;
mod stmt;

use std::sync::Arc;

use brant_base::{Diagnostic, File, Kind as TokKind, Token};

use crate::ast::{Ast, Kind, NodeId};

/// The parser state: the AST under construction and the current token.
pub struct Parser {
    ast: Ast,
    tok: Token,
    errs: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(file: Arc<File>) -> Parser {
        Parser {
            ast: Ast::new(file),
            tok: Token::ILLEGAL,
            errs: Vec::new(),
        }
    }

    /// Parses the file into an AST, accumulating diagnostics rather than
    /// stopping at the first error.
    pub fn parse(mut self) -> (Ast, Vec<Diagnostic>) {
        self.next();
        self.decl_list();
        (self.ast, self.errs)
    }

    /// Advances to the next token, reporting and skipping any illegal runs.
    pub(crate) fn next(&mut self) -> Token {
        let tok = self.tok;
        self.tok = self.tok.next(self.ast.src());

        while self.tok.kind() == TokKind::Illegal {
            let bad = self.tok;
            self.tok = self.tok.next_valid(self.ast.src());
            let text = self
                .ast
                .file()
                .text_between(bad.offset(), self.tok.offset());
            self.error_at(bad, format!("illegal token {:?}", text.trim_end()));
        }

        tok
    }

    pub(crate) fn kind(&self) -> TokKind {
        self.tok.kind()
    }

    pub(crate) fn current(&self) -> Token {
        self.tok
    }

    /// Appends a node whose token must be of the expected kind.
    pub(crate) fn node(&mut self, nk: Kind, tk: TokKind, children: &[NodeId]) -> NodeId {
        let tok = self.expect(tk);
        self.ast.add_node(nk, tok, children)
    }

    /// Reports an error if the current token is not of the expected kind,
    /// then advances past it either way.
    pub(crate) fn expect(&mut self, kind: TokKind) -> Token {
        if self.tok.kind() != kind {
            self.error(format!("expected {}", kind));
        }
        self.next()
    }

    pub(crate) fn error(&mut self, msg: impl Into<String>) {
        self.error_at(self.tok, msg);
    }

    pub(crate) fn error_at(&mut self, tok: Token, msg: impl Into<String>) {
        self.errs.push(Diagnostic::new(tok, msg));
    }

    pub(crate) fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    pub(crate) fn ast(&self) -> &Ast {
        &self.ast
    }
}
