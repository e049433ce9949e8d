//! Statement productions.

use brant_base::Kind as TokKind;

use crate::ast::{Kind, NodeId};

use super::Parser;

impl Parser {
    // block = "{" stmtList "}"
    pub(crate) fn block(&mut self) -> NodeId {
        self.expect(TokKind::LBrace);
        let list = self.stmt_list();
        self.expect(TokKind::RBrace);
        list
    }

    // stmtList = { stmt ";"? }
    fn stmt_list(&mut self) -> NodeId {
        let tok = self.current();
        let mut stmts = Vec::new();

        while self.kind() != TokKind::RBrace && self.kind() != TokKind::Eof {
            let before = self.current();
            stmts.push(self.stmt());

            if self.kind() == TokKind::Semicolon {
                self.next();
            }

            if before == self.current() {
                // do not loop forever if we aren't making progress
                self.error("expected statement");
                break;
            }
        }

        self.ast_mut().add_node(Kind::StmtList, tok, &stmts)
    }

    // stmt = returnStmt | ifExpr | forStmt | block | simpleStmt | ";"
    fn stmt(&mut self) -> NodeId {
        match self.kind() {
            TokKind::Return => self.return_stmt(),
            TokKind::If => self.if_expr(),
            TokKind::For => self.for_stmt(),
            TokKind::LBrace => self.block(),
            TokKind::Semicolon => {
                // the separator is consumed by stmt_list
                let tok = self.current();
                self.ast_mut().add_node(Kind::EmptyStmt, tok, &[])
            }
            _ => self.simple_stmt(),
        }
    }

    // returnStmt = "return" expr?
    fn return_stmt(&mut self) -> NodeId {
        let tok = self.expect(TokKind::Return);

        let children = match self.kind() {
            TokKind::Semicolon | TokKind::RBrace | TokKind::Eof => Vec::new(),
            _ => vec![self.expr()],
        };

        self.ast_mut().add_node(Kind::ReturnStmt, tok, &children)
    }

    // simpleStmt = expr [ ("=" | ":=") expr ]
    pub(crate) fn simple_stmt(&mut self) -> NodeId {
        let tok = self.current();
        let lhs = self.expr();

        match self.kind() {
            TokKind::Assign | TokKind::Define => {
                if !self.assignable_target(lhs) {
                    self.error("expected name on the left side of the assignment");
                }
                let op = self.next();
                let rhs = self.expr();
                self.ast_mut().add_node(Kind::AssignStmt, op, &[lhs, rhs])
            }
            _ => self.ast_mut().add_node(Kind::ExprStmt, tok, &[lhs]),
        }
    }

    /// The LHS of an assignment must be a name after stripping any number of
    /// leading dereferences.
    fn assignable_target(&self, node: NodeId) -> bool {
        let mut node = node;
        while self.ast().kind(node) == Kind::DerefExpr {
            node = self.ast().child(node, crate::ast::DEREF_EXPR_EXPR);
        }
        self.ast().kind(node) == Kind::Name
    }

    // forStmt = "for" [ simpleStmt ";" ] [ simpleStmt ";" ] [ simpleStmt ] block
    //
    // A single clause with no ";" is the condition, not the init.
    fn for_stmt(&mut self) -> NodeId {
        let tok = self.expect(TokKind::For);

        let mut init = NodeId::INVALID;
        let mut cond = NodeId::INVALID;
        let mut post = NodeId::INVALID;

        if self.kind() != TokKind::LBrace {
            let first = self.simple_stmt();
            if self.kind() == TokKind::Semicolon {
                // three-clause form
                self.next();
                init = first;
                if self.kind() != TokKind::Semicolon {
                    cond = self.simple_stmt();
                }
                self.expect(TokKind::Semicolon);
                if self.kind() != TokKind::LBrace {
                    post = self.simple_stmt();
                }
            } else {
                cond = first;
            }
        }

        let body = self.block();

        self.ast_mut()
            .add_node(Kind::ForStmt, tok, &[init, cond, post, body])
    }
}
