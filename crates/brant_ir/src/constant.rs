//! Constant values in the IR.
//!
//! Constants are value-ids like everything else; each function owns a
//! `const → value id` interning map so that loading the same constant twice
//! yields the same value.

use crate::program::FuncId;
use crate::reg::RegMask;

/// A compile-time constant in the IR.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Constant {
    Int(i64),
    Bool(bool),
    /// A reference to a function in the owning program.
    Func(FuncId),
    /// A register mask, used for calling-convention slots.
    Reg(RegMask),
}

impl Constant {
    pub fn as_int(self) -> Option<i64> {
        match self {
            Constant::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Constant::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_func(self) -> Option<FuncId> {
        match self {
            Constant::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_reg(self) -> Option<RegMask> {
        match self {
            Constant::Reg(m) => Some(m),
            _ => None,
        }
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Bool(v) => write!(f, "{}", v),
            // function references render through the program, which knows
            // the name; this is only a fallback
            Constant::Func(id) => write!(f, "fn{}", id.0),
            Constant::Reg(mask) => write!(f, "{}", mask),
        }
    }
}
