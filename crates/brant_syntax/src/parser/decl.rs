//! Declaration productions.

use brant_base::Kind as TokKind;

use crate::ast::{Kind, NodeId};

use super::Parser;

impl Parser {
    // declList = decl { ";"? }
    pub(crate) fn decl_list(&mut self) -> NodeId {
        let tok = self.current();

        let mut decls = Vec::new();
        while self.kind() != TokKind::Eof {
            let before = self.current();
            decls.push(self.decl());

            if self.kind() == TokKind::Semicolon {
                self.next();
            }

            if before == self.current() {
                // do not loop forever if we aren't making progress
                self.error("expected declaration");
                return NodeId::INVALID;
            }
        }

        self.ast_mut().add_node(Kind::DeclList, tok, &decls)
    }

    // decl = funcDecl
    fn decl(&mut self) -> NodeId {
        match self.kind() {
            TokKind::Func => self.func_decl(),
            _ => {
                self.error("expected declaration");
                NodeId::INVALID
            }
        }
    }

    // funcDecl = "func" name "(" fieldList? ")" name? block
    fn func_decl(&mut self) -> NodeId {
        let tok = self.expect(TokKind::Func);
        let name = self.name();

        self.expect(TokKind::LParen);
        let params = self.field_list(TokKind::RParen);
        self.expect(TokKind::RParen);

        let ret = if self.kind() == TokKind::Ident {
            self.name()
        } else {
            NodeId::INVALID
        };

        let body = self.block();

        self.ast_mut()
            .add_node(Kind::FuncDecl, tok, &[name, params, ret, body])
    }

    // fieldList = ( field { "," field } )?
    fn field_list(&mut self, end: TokKind) -> NodeId {
        let tok = self.current();
        if self.kind() == end {
            return self.ast_mut().add_node(Kind::FieldList, tok, &[]);
        }

        let mut fields = vec![self.field()];
        while self.kind() == TokKind::Comma {
            self.next();
            fields.push(self.field());
        }
        self.ast_mut().add_node(Kind::FieldList, tok, &fields)
    }

    // field = name typeName
    fn field(&mut self) -> NodeId {
        let tok = self.current();
        let name = self.name();
        if self.kind() != TokKind::Ident {
            self.error("expected type");
            return NodeId::INVALID;
        }
        let typ = self.name();
        self.ast_mut().add_node(Kind::Field, tok, &[name, typ])
    }

    pub(crate) fn name(&mut self) -> NodeId {
        self.node(Kind::Name, TokKind::Ident, &[])
    }
}
