//! The per-program type interning table and type relations.

use std::collections::HashMap;

use crate::basic::Basic;
use crate::handle::{Type, TypeKind};

/// A function signature: parameter types and a return type.
///
/// Signatures are interned by structural equality, so two functions with the
/// same shape share one handle index.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FuncSig {
    params: Vec<Type>,
    ret: Type,
}

impl FuncSig {
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    pub fn return_type(&self) -> Type {
        self.ret
    }
}

/// The universe of types for one program.
///
/// Basic types are addressed directly by their handle; function signatures
/// are interned here by structural equality on (parameter types, return
/// type). Pointer types never touch the universe: they are the same handle
/// with a higher indirection count.
#[derive(Clone, Default)]
pub struct Universe {
    funcs: Vec<FuncSig>,
    func_index: HashMap<FuncSig, usize>,
}

impl Universe {
    pub fn new() -> Universe {
        Universe::default()
    }

    /// Interns a function signature and returns its handle.
    pub fn func_for(&mut self, params: &[Type], ret: Type) -> Type {
        let sig = FuncSig {
            params: params.to_vec(),
            ret,
        };
        let index = match self.func_index.get(&sig) {
            Some(&index) => index,
            None => {
                let index = self.funcs.len();
                self.funcs.push(sig.clone());
                self.func_index.insert(sig, index);
                index
            }
        };
        Type::new(TypeKind::Func, 0, index)
    }

    /// The signature behind a function type handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not a function type.
    pub fn func(&self, ty: Type) -> &FuncSig {
        assert!(ty.kind() == TypeKind::Func, "not a function type");
        &self.funcs[ty.index()]
    }

    /// The un-aliased form of a type. Identity for now; reserved for named
    /// types.
    pub fn underlying(&self, ty: Type) -> Type {
        ty
    }

    /// The minimum upper bound of two types, or `NONE` when incompatible.
    ///
    /// `untyped int` unifies with `int` to `int`; otherwise only equal
    /// handles unify.
    pub fn unify(&self, a: Type, b: Type) -> Type {
        if a == b {
            return a;
        }
        if a == Type::UNTYPED_INT && b == Type::INT {
            return Type::INT;
        }
        if b == Type::UNTYPED_INT && a == Type::INT {
            return Type::INT;
        }
        Type::NONE
    }

    /// Whether a value of type `src` may be assigned to a location of type
    /// `dst`.
    pub fn is_assignable(&self, dst: Type, src: Type) -> bool {
        dst == src || (dst == Type::INT && src == Type::UNTYPED_INT)
    }

    /// Renders a type handle for diagnostics, e.g. `**int` or
    /// `func(int, bool) int`.
    pub fn string_of(&self, ty: Type) -> String {
        let stars = "*".repeat(ty.indirections());
        match ty.kind() {
            TypeKind::Basic => format!("{}{}", stars, Basic::from_index(ty.index())),
            TypeKind::Func => {
                let sig = &self.funcs[ty.index()];
                let params = sig
                    .params
                    .iter()
                    .map(|p| self.string_of(*p))
                    .collect::<Vec<_>>()
                    .join(", ");
                if sig.ret == Type::VOID {
                    format!("{}func({})", stars, params)
                } else {
                    format!("{}func({}) {}", stars, params, self.string_of(sig.ret))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn func_signatures_intern_structurally() {
        let mut uni = Universe::new();
        let a = uni.func_for(&[Type::INT, Type::BOOL], Type::INT);
        let b = uni.func_for(&[Type::INT, Type::BOOL], Type::INT);
        let c = uni.func_for(&[Type::INT], Type::INT);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn func_accessor_returns_signature() {
        let mut uni = Universe::new();
        let ty = uni.func_for(&[Type::INT], Type::BOOL);
        let sig = uni.func(ty);
        assert_eq!(sig.params(), &[Type::INT]);
        assert_eq!(sig.return_type(), Type::BOOL);
    }

    #[test]
    fn unify_equal_types() {
        let uni = Universe::new();
        assert_eq!(uni.unify(Type::INT, Type::INT), Type::INT);
        assert_eq!(uni.unify(Type::BOOL, Type::BOOL), Type::BOOL);
    }

    #[test]
    fn unify_untyped_int_with_int() {
        let uni = Universe::new();
        assert_eq!(uni.unify(Type::UNTYPED_INT, Type::INT), Type::INT);
        assert_eq!(uni.unify(Type::INT, Type::UNTYPED_INT), Type::INT);
    }

    #[test]
    fn unify_incompatible_is_none() {
        let uni = Universe::new();
        assert_eq!(uni.unify(Type::INT, Type::BOOL), Type::NONE);
        assert_eq!(uni.unify(Type::UNTYPED_INT, Type::BOOL), Type::NONE);
        assert_eq!(
            uni.unify(Type::INT.pointer_to(), Type::INT),
            Type::NONE
        );
    }

    #[test]
    fn assignability() {
        let uni = Universe::new();
        assert!(uni.is_assignable(Type::INT, Type::INT));
        assert!(uni.is_assignable(Type::INT, Type::UNTYPED_INT));
        assert!(!uni.is_assignable(Type::UNTYPED_INT, Type::INT));
        assert!(!uni.is_assignable(Type::INT, Type::BOOL));
        assert!(uni.is_assignable(Type::INT.pointer_to(), Type::INT.pointer_to()));
    }

    #[test]
    fn string_of_pointers_and_funcs() {
        let mut uni = Universe::new();
        assert_eq!(uni.string_of(Type::INT), "int");
        assert_eq!(uni.string_of(Type::INT.pointer_to().pointer_to()), "**int");
        let f = uni.func_for(&[Type::INT, Type::BOOL], Type::INT);
        assert_eq!(uni.string_of(f), "func(int, bool) int");
        let v = uni.func_for(&[], Type::VOID);
        assert_eq!(uni.string_of(v), "func()");
    }
}
