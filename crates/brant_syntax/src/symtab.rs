//! The lexically scoped symbol table.
//!
//! Scopes form a chain with levels `invalid(0) → builtin(1) → global(2) →
//! local(3+)`. Scope entry is driven by AST node identity and is idempotent:
//! the first `enter_scope(n)` for a node allocates a child scope and records
//! the mapping, subsequent entries reuse it. This is how the code generator
//! revisits the exact scopes the type checker established.
//!
//! Local slot indices are allocated monotonically from the nearest
//! level-3 (function) scope, so every variable in a function body gets a
//! distinct slot regardless of block nesting.

use std::collections::HashMap;

use brant_base::{Interner, Symbol};
use brant_types::{Const, Type};

use crate::ast::NodeId;

/// Identifies a scope: an index into the scope array.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const INVALID: ScopeId = ScopeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a symbol: an index into the symbol array.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SymbolId(pub u32);

/// Scope nesting levels. Levels at or above `LOCAL` own stack slots.
pub const LEVEL_INVALID: usize = 0;
pub const LEVEL_BUILTIN: usize = 1;
pub const LEVEL_GLOBAL: usize = 2;
pub const LEVEL_LOCAL: usize = 3;

/// What a name denotes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymKind {
    Var,
    Func,
    Const,
    Type,
}

/// A symbol record.
#[derive(Clone, Copy, Debug)]
pub struct Sym {
    pub id: SymbolId,
    pub scope: ScopeId,
    pub kind: SymKind,
    pub name: Symbol,
    pub ty: Type,
    pub constant: Option<Const>,
    /// Local stack slot, meaningful only for `Var` symbols in a function.
    pub slot: usize,
}

struct Scope {
    parent: ScopeId,
    node: NodeId,
    level: usize,
    names: HashMap<Symbol, SymbolId>,
    next_slot: usize,
}

/// The symbol table: a stack of nested scopes plus the `node → scope` side
/// table that makes scope reentry idempotent.
pub struct SymTab {
    syms: Vec<Sym>,
    scopes: Vec<Scope>,
    cur: ScopeId,
    node_scope: HashMap<NodeId, ScopeId>,
    interner: Interner,
}

impl SymTab {
    /// Creates a symbol table with the builtin scope pre-populated with
    /// `true`, `false`, `int`, and `bool`.
    pub fn new() -> SymTab {
        let mut t = SymTab {
            syms: Vec::new(),
            scopes: vec![Scope {
                parent: ScopeId::INVALID,
                node: NodeId::INVALID,
                level: LEVEL_INVALID,
                names: HashMap::new(),
                next_slot: 0,
            }],
            cur: ScopeId::INVALID,
            node_scope: HashMap::new(),
            interner: Interner::new(),
        };

        // enter the builtin scope
        t.new_scope();

        let id = t.new_symbol("true", SymKind::Const, Type::BOOL);
        t.symbol_mut(id).constant = Some(Const::Bool(true));
        let id = t.new_symbol("false", SymKind::Const, Type::BOOL);
        t.symbol_mut(id).constant = Some(Const::Bool(false));

        t.new_symbol("int", SymKind::Type, Type::INT);
        t.new_symbol("bool", SymKind::Type, Type::BOOL);

        t
    }

    /// Opens a fresh child scope of the current scope and enters it.
    pub fn new_scope(&mut self) -> ScopeId {
        let level = self.scopes[self.cur.index()].level + 1;
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: self.cur,
            node: NodeId::INVALID,
            level,
            names: HashMap::new(),
            next_slot: 0,
        });
        self.cur = id;
        id
    }

    /// Enters the scope belonging to the given AST node, creating it on
    /// first entry. Idempotent per node.
    pub fn enter_scope(&mut self, node: NodeId) -> ScopeId {
        if let Some(&scope) = self.node_scope.get(&node) {
            self.cur = scope;
            return scope;
        }
        let scope = self.new_scope();
        self.node_scope.insert(node, scope);
        self.scopes[scope.index()].node = node;
        scope
    }

    /// Returns to the parent of the current scope.
    pub fn leave_scope(&mut self) {
        self.cur = self.scopes[self.cur.index()].parent;
    }

    /// The current scope.
    pub fn scope(&self) -> ScopeId {
        self.cur
    }

    pub fn scope_level(&self, id: ScopeId) -> usize {
        self.scopes[id.index()].level
    }

    pub fn parent_scope(&self, id: ScopeId) -> ScopeId {
        self.scopes[id.index()].parent
    }

    /// The AST node that owns the scope, if any.
    pub fn scope_node(&self, id: ScopeId) -> NodeId {
        self.scopes[id.index()].node
    }

    /// The nearest enclosing function-level scope, or `INVALID` outside any
    /// function.
    pub fn local_scope(&self) -> ScopeId {
        let mut scope = self.cur;
        while self.scopes[scope.index()].level > LEVEL_INVALID {
            if self.scopes[scope.index()].level == LEVEL_LOCAL {
                return scope;
            }
            scope = self.scopes[scope.index()].parent;
        }
        ScopeId::INVALID
    }

    /// The number of local slots allocated by the enclosing function so far.
    pub fn stack_size(&self) -> usize {
        let local = self.local_scope();
        if local == ScopeId::INVALID {
            return 0;
        }
        self.scopes[local.index()].next_slot
    }

    /// Looks up a name through the scope chain.
    pub fn lookup(&self, name: &str) -> Option<&Sym> {
        let sym = self.interner.lookup(name)?;
        let mut scope = &self.scopes[self.cur.index()];
        while scope.level > LEVEL_INVALID {
            if let Some(&id) = scope.names.get(&sym) {
                return Some(&self.syms[id.0 as usize]);
            }
            scope = &self.scopes[scope.parent.index()];
        }
        None
    }

    /// Looks up a name in the current scope only. Used to diagnose `:=`
    /// redefinition while still allowing shadowing across scopes.
    pub fn lookup_in_current_scope(&self, name: &str) -> Option<&Sym> {
        let sym = self.interner.lookup(name)?;
        let id = self.scopes[self.cur.index()].names.get(&sym)?;
        Some(&self.syms[id.0 as usize])
    }

    /// Declares a symbol in the current scope. Shadowing an outer binding is
    /// allowed; redefinition policy is the caller's concern.
    pub fn new_symbol(&mut self, name: &str, kind: SymKind, ty: Type) -> SymbolId {
        let name = self.interner.intern(name);
        let id = SymbolId(self.syms.len() as u32);

        let mut slot = 0;
        let local = self.local_scope();
        if local != ScopeId::INVALID {
            let local = &mut self.scopes[local.index()];
            slot = local.next_slot;
            local.next_slot += 1;
        }

        self.syms.push(Sym {
            id,
            scope: self.cur,
            kind,
            name,
            ty,
            constant: None,
            slot,
        });
        self.scopes[self.cur.index()].names.insert(name, id);
        id
    }

    pub fn symbol(&self, id: SymbolId) -> &Sym {
        &self.syms[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Sym {
        &mut self.syms[id.0 as usize]
    }

    /// Resolves an interned symbol name back to its string.
    pub fn resolve(&self, name: Symbol) -> &str {
        self.interner.resolve(name)
    }
}

impl Default for SymTab {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_visible() {
        let t = SymTab::new();
        assert_eq!(t.lookup("true").unwrap().kind, SymKind::Const);
        assert_eq!(t.lookup("false").unwrap().constant, Some(Const::Bool(false)));
        assert_eq!(t.lookup("int").unwrap().ty, Type::INT);
        assert_eq!(t.lookup("bool").unwrap().ty, Type::BOOL);
        assert!(t.lookup("undefined").is_none());
    }

    #[test]
    fn enter_scope_is_idempotent_per_node() {
        let mut t = SymTab::new();
        let node = NodeId(7);
        let first = t.enter_scope(node);
        t.leave_scope();
        let second = t.enter_scope(node);
        assert_eq!(first, second);
        assert_eq!(t.scope_node(first), node);
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let mut t = SymTab::new();
        t.enter_scope(NodeId(1));
        t.new_symbol("x", SymKind::Var, Type::INT);
        t.enter_scope(NodeId(2));
        assert_eq!(t.lookup("x").unwrap().ty, Type::INT);
        assert!(t.lookup_in_current_scope("x").is_none());
    }

    #[test]
    fn shadowing_across_scopes_is_allowed() {
        let mut t = SymTab::new();
        t.enter_scope(NodeId(1)); // global
        t.enter_scope(NodeId(2)); // function
        t.new_symbol("x", SymKind::Var, Type::INT);
        t.enter_scope(NodeId(3)); // block
        t.new_symbol("x", SymKind::Var, Type::BOOL);
        assert_eq!(t.lookup("x").unwrap().ty, Type::BOOL);
        t.leave_scope();
        assert_eq!(t.lookup("x").unwrap().ty, Type::INT);
    }

    #[test]
    fn slots_allocate_from_function_scope() {
        let mut t = SymTab::new();
        t.enter_scope(NodeId(1)); // global (level 2)
        t.enter_scope(NodeId(2)); // function (level 3)
        let a = t.new_symbol("a", SymKind::Var, Type::INT);
        t.enter_scope(NodeId(3)); // nested block (level 4)
        let b = t.new_symbol("b", SymKind::Var, Type::INT);
        assert_eq!(t.symbol(a).slot, 0);
        assert_eq!(t.symbol(b).slot, 1);
        assert_eq!(t.stack_size(), 2);
    }

    #[test]
    fn stack_size_outside_function_is_zero() {
        let mut t = SymTab::new();
        t.enter_scope(NodeId(1)); // global
        t.new_symbol("f", SymKind::Func, Type::NONE);
        assert_eq!(t.stack_size(), 0);
        assert_eq!(t.local_scope(), ScopeId::INVALID);
    }

    #[test]
    fn scope_levels_count_up() {
        let mut t = SymTab::new();
        let global = t.enter_scope(NodeId(1));
        assert_eq!(t.scope_level(global), LEVEL_GLOBAL);
        let local = t.enter_scope(NodeId(2));
        assert_eq!(t.scope_level(local), LEVEL_LOCAL);
    }
}
