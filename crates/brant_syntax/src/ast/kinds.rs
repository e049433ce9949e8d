//! AST node kinds.

/// The kind of an AST node. Fits in the 8 kind bits of a packed node word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Kind {
    IllegalNode = 0,

    Literal,
    Name,

    DeclList,
    FuncDecl,

    FieldList,
    Field,

    ExprList,
    BinaryExpr,
    UnaryExpr,
    DerefExpr,
    AddrExpr,
    CallExpr,

    StmtList,
    EmptyStmt,
    ExprStmt,
    AssignStmt,
    ReturnStmt,
    IfExpr,
    ForStmt,
}

const KIND_NAMES: [&str; 20] = [
    "IllegalNode",
    "Literal",
    "Name",
    "DeclList",
    "FuncDecl",
    "FieldList",
    "Field",
    "ExprList",
    "BinaryExpr",
    "UnaryExpr",
    "DerefExpr",
    "AddrExpr",
    "CallExpr",
    "StmtList",
    "EmptyStmt",
    "ExprStmt",
    "AssignStmt",
    "ReturnStmt",
    "IfExpr",
    "ForStmt",
];

impl Kind {
    pub(crate) fn from_bits(bits: u8) -> Kind {
        const KINDS: [Kind; 20] = [
            Kind::IllegalNode,
            Kind::Literal,
            Kind::Name,
            Kind::DeclList,
            Kind::FuncDecl,
            Kind::FieldList,
            Kind::Field,
            Kind::ExprList,
            Kind::BinaryExpr,
            Kind::UnaryExpr,
            Kind::DerefExpr,
            Kind::AddrExpr,
            Kind::CallExpr,
            Kind::StmtList,
            Kind::EmptyStmt,
            Kind::ExprStmt,
            Kind::AssignStmt,
            Kind::ReturnStmt,
            Kind::IfExpr,
            Kind::ForStmt,
        ];
        KINDS.get(bits as usize).copied().unwrap_or(Kind::IllegalNode)
    }

    pub fn name(self) -> &'static str {
        KIND_NAMES[self as usize]
    }

    /// True if the node is a terminal (leaf) node.
    pub fn is_terminal(self) -> bool {
        self == Kind::Literal || self == Kind::Name
    }

    /// True if the node's token carries meaning beyond position (the
    /// operator of a binary, unary, or assignment node).
    pub fn uses_token(self) -> bool {
        self == Kind::BinaryExpr || self == Kind::UnaryExpr || self == Kind::AssignStmt
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
