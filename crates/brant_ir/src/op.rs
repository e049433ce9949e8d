//! The layered opcode namespace and its process-wide registry.
//!
//! An [`OpId`] is 10 bits: 2 bits of [`Level`] selecting a sub-namespace and
//! 8 bits of index within it. Each level's descriptor set is registered once
//! at start-up, before any [`crate::Program`] is constructed, and the table
//! is read-only afterwards. This is the IR's principal extensibility hook:
//! a new lowering registers its opcode set without touching the IR core.

use once_cell::sync::OnceCell;

/// The abstraction level of an operation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Level {
    /// Common ops used by all levels (`Const`, `Reg`).
    Common = 0,
    /// High level IR, the result of semantic analysis.
    Hlir = 1,
    /// Low level IR, the result of lowering. Reserved.
    Llir = 2,
    /// Assembly, the result of code generation. Reserved.
    Asm = 3,
}

impl Level {
    fn from_bits(bits: u16) -> Level {
        match bits & 3 {
            0 => Level::Common,
            1 => Level::Hlir,
            2 => Level::Llir,
            _ => Level::Asm,
        }
    }
}

/// The id of an operation: 2 bits of level, 8 bits of index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct OpId(u16);

impl OpId {
    pub const INVALID: OpId = OpId(0);

    /// Builds an op id from a level and an index within it.
    pub fn new(level: Level, index: u8) -> OpId {
        OpId((level as u16) << 8 | index as u16)
    }

    /// Rebuilds an op id from its raw 10-bit form.
    ///
    /// # Panics
    ///
    /// Panics when the value does not fit in 10 bits; an out-of-range opcode
    /// is a compiler bug, not a user error.
    pub fn from_raw(raw: u16) -> OpId {
        assert!(raw <= 0x3ff, "opcode id out of range");
        OpId(raw)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn level(self) -> Level {
        Level::from_bits(self.0 >> 8)
    }

    pub fn index(self) -> u8 {
        self.0 as u8
    }

    /// The registered name of the operation.
    pub fn name(self) -> &'static str {
        name_of(self)
    }
}

impl std::fmt::Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered set of operations for one level.
pub struct OpSet {
    pub level: Level,
    /// Names indexed by the 8-bit op index.
    pub names: &'static [&'static str],
}

static REGISTRY: [OnceCell<&'static OpSet>; 4] =
    [OnceCell::new(), OnceCell::new(), OnceCell::new(), OnceCell::new()];

/// Registers an opcode set for its level.
///
/// Registration is write-once: registering the same set again is a no-op,
/// registering a different set for an occupied level panics. Call this from
/// program start-up, before constructing any [`crate::Program`].
pub fn register_op_set(set: &'static OpSet) {
    let cell = &REGISTRY[set.level as usize];
    if let Err(()) = cell.set(set).map_err(|_| ()) {
        let existing = cell.get().copied().unwrap();
        assert!(
            std::ptr::eq(existing, set),
            "op set already registered for level {:?}",
            set.level
        );
    }
}

/// The registered set for a level, if any.
pub fn op_set(level: Level) -> Option<&'static OpSet> {
    REGISTRY[level as usize].get().copied()
}

/// The registered name of an op, or `"Invalid"` for unregistered ids.
pub fn name_of(id: OpId) -> &'static str {
    match op_set(id.level()) {
        Some(set) => set.names.get(id.index() as usize).copied().unwrap_or("Invalid"),
        None => "Invalid",
    }
}

/// The common opcode set: constants and registers, shared by all levels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum CommonOp {
    Invalid = 0,
    Const,
    Reg,
}

impl CommonOp {
    pub fn id(self) -> OpId {
        OpId::new(Level::Common, self as u8)
    }
}

static COMMON_OPS: OpSet = OpSet {
    level: Level::Common,
    names: &["Invalid", "Const", "Reg"],
};

/// Registers the common op set. Idempotent; called by
/// [`crate::Program::new`].
pub fn register_common_ops() {
    register_op_set(&COMMON_OPS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_id_packs_level_and_index() {
        let id = OpId::new(Level::Hlir, 7);
        assert_eq!(id.level(), Level::Hlir);
        assert_eq!(id.index(), 7);
        assert_eq!(id.raw(), 0x107);
    }

    #[test]
    #[should_panic(expected = "opcode id out of range")]
    fn op_id_from_raw_rejects_out_of_range() {
        let _ = OpId::from_raw(0x400);
    }

    #[test]
    fn common_ops_register_idempotently() {
        register_common_ops();
        register_common_ops();
        assert_eq!(name_of(CommonOp::Const.id()), "Const");
        assert_eq!(name_of(CommonOp::Reg.id()), "Reg");
    }

    #[test]
    fn unregistered_levels_report_invalid() {
        assert_eq!(name_of(OpId::new(Level::Llir, 5)), "Invalid");
    }
}
