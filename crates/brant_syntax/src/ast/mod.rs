//! The flat, index-addressed AST store.
//!
//! Each node is one 64-bit word packing {kind: 8 bits, first-child index:
//! 24 bits, token: 32 bits}. Child lists live in one shared append-only
//! array: node `n`'s children occupy `[first_child(n), first_child(n+1))`,
//! which forces post-order append and makes the tree immutable after
//! construction. The root is always the last node; index 0 is reserved as
//! the invalid node.
//!
//! Inferred types live in a side table keyed by node id, filled in by the
//! type checker and defaulting to [`Type::NONE`].

pub mod children;
pub mod kinds;

pub use children::*;
pub use kinds::Kind;

use std::sync::Arc;

use brant_base::{File, Token};
use brant_types::Type;

/// Identifies an AST node: an index into the node array.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The reserved invalid / absent node.
    pub const INVALID: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A packed node word: kind in the low 8 bits, first-child index in the next
/// 24, token in the high 32.
#[derive(Clone, Copy)]
struct Node(u64);

impl Node {
    fn new(kind: Kind, token: Token, first_child: usize) -> Node {
        assert!(first_child <= 0xff_ffff, "too many children");
        Node(kind as u64 | (first_child as u64) << 8 | (token.raw() as u64) << 32)
    }

    fn kind(self) -> Kind {
        Kind::from_bits((self.0 & 0xff) as u8)
    }

    fn first_child(self) -> usize {
        ((self.0 >> 8) & 0xff_ffff) as usize
    }

    fn token(self) -> Token {
        Token::from_raw((self.0 >> 32) as u32)
    }
}

/// The abstract syntax tree for one source file.
pub struct Ast {
    file: Arc<File>,

    /// Nodes in post-order traversal order.
    nodes: Vec<Node>,

    /// The shared child array, indexed via each node's first-child field.
    child: Vec<NodeId>,

    /// Inferred type per node, filled by the type checker.
    types: Vec<Type>,
}

impl Ast {
    /// Creates an empty AST for the file. Index 0 holds the illegal node.
    pub fn new(file: Arc<File>) -> Ast {
        Ast {
            file,
            nodes: vec![Node::new(Kind::IllegalNode, Token::ILLEGAL, 0)],
            child: Vec::new(),
            types: Vec::new(),
        }
    }

    /// The source file this tree was parsed from.
    pub fn file(&self) -> &Arc<File> {
        &self.file
    }

    pub fn src(&self) -> &[u8] {
        self.file.src()
    }

    /// The root node: always the last node appended.
    pub fn root(&self) -> NodeId {
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// The number of nodes, including the reserved invalid node.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Appends a node. Children must already exist, which keeps the
    /// children-precede-parent invariant by construction.
    pub fn add_node(&mut self, kind: Kind, token: Token, children: &[NodeId]) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let first_child = self.child.len();
        self.nodes.push(Node::new(kind, token, first_child));
        self.child.extend_from_slice(children);
        id
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self.nodes[id.index()].kind()
    }

    pub fn token(&self, id: NodeId) -> Token {
        self.nodes[id.index()].token()
    }

    /// The inferred type of the node, `NONE` until the checker fills it in.
    pub fn ty(&self, id: NodeId) -> Type {
        self.types.get(id.index()).copied().unwrap_or(Type::NONE)
    }

    /// Records the inferred type of a node. The side table only grows.
    pub fn set_ty(&mut self, id: NodeId, ty: Type) {
        if self.types.len() <= id.index() {
            self.types.resize(id.index() + 1, Type::NONE);
        }
        self.types[id.index()] = ty;
    }

    fn child_range(&self, id: NodeId) -> (usize, usize) {
        let start = self.nodes[id.index()].first_child();
        let end = if id.index() + 1 < self.nodes.len() {
            self.nodes[id.index() + 1].first_child()
        } else {
            self.child.len()
        };
        (start, end)
    }

    pub fn num_children(&self, id: NodeId) -> usize {
        let (start, end) = self.child_range(id);
        end - start
    }

    /// The nth child, or `INVALID` when out of range.
    pub fn child(&self, id: NodeId, index: usize) -> NodeId {
        let (start, end) = self.child_range(id);
        if index >= end - start {
            return NodeId::INVALID;
        }
        self.child[start + index]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        let (start, end) = self.child_range(id);
        &self.child[start..end]
    }

    /// The source text of the node's token.
    pub fn node_text(&self, id: NodeId) -> String {
        self.file.token_text(self.token(id))
    }

    /// String representation of the subtree rooted at `id`, used by parser
    /// tests.
    pub fn string_of(&self, root: NodeId) -> String {
        self.node_string(root, "")
    }

    fn node_string(&self, id: NodeId, indent: &str) -> String {
        if id == NodeId::INVALID {
            return format!("{}nil", indent);
        }

        let kind = self.kind(id);
        let children = self.children(id);

        if kind.is_terminal() {
            return format!("{}{}({:?})", indent, kind, self.node_text(id));
        }

        if children.is_empty() {
            let toktext = if kind.uses_token() {
                format!("{:?}", self.node_text(id))
            } else {
                String::new()
            };
            return format!("{}{}({})", indent, kind, toktext);
        }

        if children.len() <= 2 && children.iter().all(|c| self.kind(*c).is_terminal()) {
            let mut s = format!("{}{}(", indent, kind);
            if kind.uses_token() {
                s += &format!("{:?}, ", self.node_text(id));
            }
            for (i, child) in children.iter().enumerate() {
                s += &self.node_string(*child, "");
                if i < children.len() - 1 {
                    s += ", ";
                }
            }
            return s + ")";
        }

        let oper = if kind.uses_token() {
            format!("{:?}, ", self.node_text(id))
        } else {
            String::new()
        };
        let mut s = format!("{}{}({}\n", indent, kind, oper);
        let deeper = format!("{}\t", indent);
        for child in children {
            s += &self.node_string(*child, &deeper);
            s += ",\n";
        }
        s + indent + ")"
    }
}

impl std::fmt::Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.node_string(self.root(), ""))
    }
}
