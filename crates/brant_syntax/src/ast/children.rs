//! Named child indices for nodes with a fixed child count.
//!
//! Nodes with a constant number of children address them with these
//! constants so call sites stay readable.

// DeclList has a list of decl children

/// FuncDecl has a Name, a FieldList of parameters, an optional Name of the
/// return type, and a StmtList body.
pub const FUNC_DECL_NAME: usize = 0;
pub const FUNC_DECL_PARAMS: usize = 1;
pub const FUNC_DECL_RET: usize = 2;
pub const FUNC_DECL_BODY: usize = 3;

/// Field has a name and a type name.
pub const FIELD_NAME: usize = 0;
pub const FIELD_TYPE: usize = 1;

// ExprList has a list of expr children

/// BinaryExpr has LHS and RHS children; the operator is the node's token.
pub const BINARY_EXPR_LHS: usize = 0;
pub const BINARY_EXPR_RHS: usize = 1;

/// UnaryExpr has one operand.
pub const UNARY_EXPR_EXPR: usize = 0;

/// DerefExpr has one operand.
pub const DEREF_EXPR_EXPR: usize = 0;

/// AddrExpr has one operand.
pub const ADDR_EXPR_EXPR: usize = 0;

/// CallExpr has a Name and an ExprList of arguments.
pub const CALL_EXPR_NAME: usize = 0;
pub const CALL_EXPR_ARGS: usize = 1;

// StmtList has a list of statements; EmptyStmt has no children

/// ExprStmt has one expression child.
pub const EXPR_STMT_EXPR: usize = 0;

/// AssignStmt has LHS and RHS children; the operator (`=` or `:=`) is the
/// node's token.
pub const ASSIGN_STMT_LHS: usize = 0;
pub const ASSIGN_STMT_RHS: usize = 1;

// ReturnStmt has a list of expr children (zero or one)

/// IfExpr has condition, then, and else children; else may be invalid.
pub const IF_EXPR_COND: usize = 0;
pub const IF_EXPR_THEN: usize = 1;
pub const IF_EXPR_ELSE: usize = 2;

/// ForStmt has init, condition, post, and body children; all but the body
/// may be invalid.
pub const FOR_STMT_INIT: usize = 0;
pub const FOR_STMT_COND: usize = 1;
pub const FOR_STMT_POST: usize = 2;
pub const FOR_STMT_BODY: usize = 3;
