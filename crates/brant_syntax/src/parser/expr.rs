//! Expression productions, weakest binding first.

use brant_base::Kind as TokKind;

use crate::ast::{Kind, NodeId};

use super::Parser;

impl Parser {
    // expr = relational { ("==" | "!=") relational }
    pub(crate) fn expr(&mut self) -> NodeId {
        let mut node = self.relational();
        loop {
            match self.kind() {
                TokKind::Eq | TokKind::Ne => {
                    let op = self.next();
                    let rhs = self.relational();
                    node = self.ast_mut().add_node(Kind::BinaryExpr, op, &[node, rhs]);
                }
                _ => return node,
            }
        }
    }

    // relational = additive { ("<" | "<=" | ">" | ">=") additive }
    fn relational(&mut self) -> NodeId {
        let mut node = self.additive();
        loop {
            match self.kind() {
                TokKind::Lt | TokKind::Le | TokKind::Gt | TokKind::Ge => {
                    let op = self.next();
                    let rhs = self.additive();
                    node = self.ast_mut().add_node(Kind::BinaryExpr, op, &[node, rhs]);
                }
                _ => return node,
            }
        }
    }

    // additive = multiplicative { ("+" | "-") multiplicative }
    fn additive(&mut self) -> NodeId {
        let mut node = self.multiplicative();
        loop {
            match self.kind() {
                TokKind::Add | TokKind::Sub => {
                    let op = self.next();
                    let rhs = self.multiplicative();
                    node = self.ast_mut().add_node(Kind::BinaryExpr, op, &[node, rhs]);
                }
                _ => return node,
            }
        }
    }

    // multiplicative = unary { ("*" | "/") unary }
    fn multiplicative(&mut self) -> NodeId {
        let mut node = self.unary();
        loop {
            match self.kind() {
                TokKind::Star | TokKind::Div => {
                    let op = self.next();
                    let rhs = self.unary();
                    node = self.ast_mut().add_node(Kind::BinaryExpr, op, &[node, rhs]);
                }
                _ => return node,
            }
        }
    }

    // unary = ("+" | "-" | "*" | "&") unary | primary
    fn unary(&mut self) -> NodeId {
        match self.kind() {
            TokKind::Add => {
                // unary plus is a no-op
                self.next();
                self.unary()
            }
            TokKind::Sub => {
                let op = self.next();
                let operand = self.unary();
                self.ast_mut().add_node(Kind::UnaryExpr, op, &[operand])
            }
            TokKind::Star => {
                let op = self.next();
                let operand = self.unary();
                self.ast_mut().add_node(Kind::DerefExpr, op, &[operand])
            }
            TokKind::And => {
                let op = self.next();
                let operand = self.unary();
                self.ast_mut().add_node(Kind::AddrExpr, op, &[operand])
            }
            _ => self.primary(),
        }
    }

    // primary = "(" expr ")" | literal | name | call | block | ifExpr
    fn primary(&mut self) -> NodeId {
        match self.kind() {
            TokKind::LParen => {
                self.next();
                let expr = self.expr();
                self.expect(TokKind::RParen);
                expr
            }
            TokKind::Int => self.node(Kind::Literal, TokKind::Int, &[]),
            TokKind::Ident => {
                let name = self.name();
                if self.kind() == TokKind::LParen {
                    return self.call_expr(name);
                }
                name
            }
            TokKind::LBrace => self.block(),
            TokKind::If => self.if_expr(),
            _ => {
                self.error("expected expression");
                NodeId::INVALID
            }
        }
    }

    // call = name "(" ( expr { "," expr } )? ")"
    fn call_expr(&mut self, name: NodeId) -> NodeId {
        let tok = self.expect(TokKind::LParen);

        let mut args = Vec::new();
        if self.kind() != TokKind::RParen {
            args.push(self.expr());
            while self.kind() == TokKind::Comma {
                self.next();
                args.push(self.expr());
            }
        }
        self.expect(TokKind::RParen);

        let list = self.ast_mut().add_node(Kind::ExprList, tok, &args);
        self.ast_mut().add_node(Kind::CallExpr, tok, &[name, list])
    }

    // ifExpr = "if" expr block [ "else" block ]
    pub(crate) fn if_expr(&mut self) -> NodeId {
        let tok = self.expect(TokKind::If);
        let cond = self.expr();
        let then = self.block();

        let els = if self.kind() == TokKind::Else {
            self.next();
            self.block()
        } else {
            NodeId::INVALID
        };

        self.ast_mut()
            .add_node(Kind::IfExpr, tok, &[cond, then, els])
    }
}
