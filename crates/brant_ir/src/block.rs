//! Basic blocks.
//!
//! A block is a straight-line run of values ending in exactly one
//! terminator. The terminator is itself a value in the function's value
//! table, and the block is referenced externally by the terminator's value
//! id. Successor slots live both in the terminator's operands and in the
//! block's explicit successor list; predecessors are maintained implicitly
//! as successors are set and patched.

use brant_base::Token;
use brant_types::Type;

use crate::func::Func;
use crate::op::OpId;
use crate::value::{BlockId, ValueId};

/// A basic block in a function.
pub struct Block {
    pub(crate) name: String,

    /// The values in the block, in emission order.
    pub(crate) values: Vec<ValueId>,

    /// The terminating instruction of the block.
    pub(crate) terminator: ValueId,

    /// Explicit successor references (block terminator value ids). A slot
    /// may be `INVALID` while a forward label reference is unresolved.
    pub(crate) succ: Vec<ValueId>,

    /// Implicit predecessor references, maintained as successors are set.
    pub(crate) pred: Vec<ValueId>,
}

impl Block {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[ValueId] {
        &self.values
    }

    pub fn terminator(&self) -> ValueId {
        self.terminator
    }

    /// The block's value id, which is its terminator's id.
    pub fn value_id(&self) -> ValueId {
        self.terminator
    }

    pub fn successors(&self) -> &[ValueId] {
        &self.succ
    }

    pub fn predecessors(&self) -> &[ValueId] {
        &self.pred
    }
}

impl Func {
    /// Creates a new block whose terminator has the given op and operands;
    /// operands from `first_succ` on are successor slots. Returns the
    /// block's value id (its terminator).
    pub fn new_block(
        &mut self,
        name: impl Into<String>,
        op: OpId,
        operands: &[ValueId],
        first_succ: usize,
    ) -> ValueId {
        let bid = BlockId(self.blocks.len() as u16);
        let terminator = self.add_value_in(op, bid, Type::VOID, Token::ILLEGAL, operands);

        let succ = operands[first_succ..].to_vec();
        self.blocks.push(Block {
            name: name.into(),
            values: Vec::new(),
            terminator,
            succ: succ.clone(),
            pred: Vec::new(),
        });
        self.block_for_value.insert(terminator, bid);

        for target in succ {
            if target != ValueId::INVALID {
                self.add_pred(target, terminator);
            }
        }

        terminator
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// The block referenced by a value id (its terminator's id).
    pub fn block(&self, id: ValueId) -> &Block {
        &self.blocks[self.block_id(id).0 as usize]
    }

    pub fn block_at(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    /// True if the value id names a block (is a terminator).
    pub fn is_block(&self, id: ValueId) -> bool {
        self.block_for_value.contains_key(&id)
    }

    fn block_id(&self, id: ValueId) -> BlockId {
        *self
            .block_for_value
            .get(&id)
            .expect("value does not name a block")
    }

    /// Appends a value to the block and returns its id.
    pub fn push_value(
        &mut self,
        block: ValueId,
        op: OpId,
        token: Token,
        ty: Type,
        operands: &[ValueId],
    ) -> ValueId {
        let bid = self.block_id(block);
        let id = self.add_value_in(op, bid, ty, token, operands);
        self.blocks[bid.0 as usize].values.push(id);
        id
    }

    /// Rewrites a block's terminator op and operands; operands from
    /// `first_succ` on are successor slots. Predecessor lists of old and new
    /// targets are kept consistent.
    pub fn update_terminator(
        &mut self,
        block: ValueId,
        op: OpId,
        operands: &[ValueId],
        first_succ: usize,
    ) {
        let bid = self.block_id(block);
        let term = self.blocks[bid.0 as usize].terminator;

        let old_succ = std::mem::take(&mut self.blocks[bid.0 as usize].succ);
        for target in old_succ {
            if target != ValueId::INVALID {
                self.remove_pred(target, term);
            }
        }

        self.set_op(term, op);
        self.set_operands(term, operands);

        let succ = operands[first_succ.min(operands.len())..].to_vec();
        for target in &succ {
            if *target != ValueId::INVALID {
                self.add_pred(*target, term);
            }
        }
        self.blocks[bid.0 as usize].succ = succ;
    }

    /// Patches one successor slot of a terminator: both the operand and the
    /// block's successor list, with predecessor upkeep on both sides.
    pub fn set_successor(
        &mut self,
        term: ValueId,
        oper_index: usize,
        succ_slot: usize,
        target: ValueId,
    ) {
        let bid = self.block_id(term);

        let old = self.operand(term, oper_index);
        if old != ValueId::INVALID {
            self.remove_pred(old, term);
        }

        self.set_operand(term, oper_index, target);
        self.blocks[bid.0 as usize].succ[succ_slot] = target;

        if target != ValueId::INVALID {
            self.add_pred(target, term);
        }
    }

    fn add_pred(&mut self, target: ValueId, pred: ValueId) {
        let bid = self.block_id(target);
        self.blocks[bid.0 as usize].pred.push(pred);
    }

    fn remove_pred(&mut self, target: ValueId, pred: ValueId) {
        let bid = self.block_id(target);
        let preds = &mut self.blocks[bid.0 as usize].pred;
        if let Some(pos) = preds.iter().position(|p| *p == pred) {
            preds.remove(pos);
        }
    }
}
