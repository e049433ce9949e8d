//! The high level IR opcode set.

use brant_ir::op::{register_common_ops, register_op_set, Level, OpId, OpSet};

/// High level IR operations: source-level operations produced by the code
/// generator. Index 0 of the level is reserved for `Invalid`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Op {
    Prologue = 1,
    Epilogue,

    // Stack operators
    Push,
    Pop,
    LoadLocal,
    StoreLocal,
    Load,
    Store,
    LocalAddr,

    // Constant operators
    LoadInt,

    // Binary operators
    Add,
    Sub,
    Mul,
    Div,

    // Unary operators
    Neg,

    // Comparison operators
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,

    // Other operators
    Call,

    // Control flow operators
    Jump,
    If,
    Return,
}

const ALL: [Op; 25] = [
    Op::Prologue,
    Op::Epilogue,
    Op::Push,
    Op::Pop,
    Op::LoadLocal,
    Op::StoreLocal,
    Op::Load,
    Op::Store,
    Op::LocalAddr,
    Op::LoadInt,
    Op::Add,
    Op::Sub,
    Op::Mul,
    Op::Div,
    Op::Neg,
    Op::Eq,
    Op::Ne,
    Op::Lt,
    Op::Gt,
    Op::Le,
    Op::Ge,
    Op::Call,
    Op::Jump,
    Op::If,
    Op::Return,
];

static HLIR_OPS: OpSet = OpSet {
    level: Level::Hlir,
    names: &[
        "Invalid",
        "Prologue",
        "Epilogue",
        "Push",
        "Pop",
        "LoadLocal",
        "StoreLocal",
        "Load",
        "Store",
        "LocalAddr",
        "LoadInt",
        "Add",
        "Sub",
        "Mul",
        "Div",
        "Neg",
        "Eq",
        "Ne",
        "Lt",
        "Gt",
        "Le",
        "Ge",
        "Call",
        "Jump",
        "If",
        "Return",
    ],
};

impl Op {
    /// The op's id in the layered namespace.
    pub fn id(self) -> OpId {
        OpId::new(Level::Hlir, self as u8)
    }

    /// Decodes an op id back into the HLIR set.
    pub fn from_id(id: OpId) -> Option<Op> {
        if id.level() != Level::Hlir {
            return None;
        }
        ALL.get((id.index() as usize).wrapping_sub(1)).copied()
    }
}

/// Registers the common and HLIR opcode sets. Idempotent; must run before
/// any program is constructed.
pub fn register_ops() {
    register_common_ops();
    register_op_set(&HLIR_OPS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        register_ops();
        for op in ALL {
            assert_eq!(Op::from_id(op.id()), Some(op));
        }
    }

    #[test]
    fn names_are_registered() {
        register_ops();
        assert_eq!(Op::Prologue.id().name(), "Prologue");
        assert_eq!(Op::LoadInt.id().name(), "LoadInt");
        assert_eq!(Op::Return.id().name(), "Return");
    }

    #[test]
    fn common_level_ids_do_not_decode_as_hlir() {
        assert_eq!(Op::from_id(brant_ir::op::CommonOp::Const.id()), None);
    }
}
