//! Static types of the language, as written in annotations.
//!
//! The type language is small: four atomic types, type variables and procedure types.
//!
//! ```text
//! number | boolean | string | void | T | (t1 * ... * tn -> t) | (Empty -> t)
//! ```
//!
//! # Type variables
//!
//! A type variable appearing in an annotation is referred to by its name. During inference, each
//! name is mapped to a cell of the unification table (see [crate::typecheck]). All the occurrences
//! of a name within one inference denote the same cell.
//!
//! An omitted annotation is represented by a [TypeF::Wildcard], which the typechecker replaces by
//! a fresh unification variable.
//!
//! # Generic representation
//!
//! As for terms, types are defined by a functor [TypeF] parametrized by the type of its recursive
//! occurrences. [Type] ties the knot for annotation types, while
//! [crate::typecheck::UnifType] ties it with unification variables as an additional case.
use std::convert::Infallible;
use std::fmt;

use crate::{identifier::Ident, impl_display_from_pretty, position::TermPos};

/// The atomic types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtomicType {
    Number,
    Boolean,
    String,
    Void,
}

impl AtomicType {
    /// Return the atomic type denoted by a symbol in an annotation, if any.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "number" => Some(AtomicType::Number),
            "boolean" => Some(AtomicType::Boolean),
            "string" => Some(AtomicType::String),
            "void" => Some(AtomicType::Void),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AtomicType::Number => "number",
            AtomicType::Boolean => "boolean",
            AtomicType::String => "string",
            AtomicType::Void => "void",
        }
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The shape of a type, parametrized by the representation of its sub-types.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeF<Ty> {
    /// `number`, `boolean`, `string` or `void`.
    Atomic(AtomicType),
    /// A type variable referred to by name.
    Var(Ident),
    /// A missing annotation.
    Wildcard,
    /// A procedure type `(t1 * ... * tn -> t)`.
    Proc { params: Vec<Ty>, ret: Ty },
}

impl<Ty> TypeF<Ty> {
    /// Map a fallible function over the direct sub-types, threading a mutable state. Sub-types are
    /// visited left to right: parameters first, then the return type.
    pub fn try_map_state<TyO, F, S, E>(self, mut f: F, state: &mut S) -> Result<TypeF<TyO>, E>
    where
        F: FnMut(Ty, &mut S) -> Result<TyO, E>,
    {
        match self {
            TypeF::Atomic(atomic) => Ok(TypeF::Atomic(atomic)),
            TypeF::Var(id) => Ok(TypeF::Var(id)),
            TypeF::Wildcard => Ok(TypeF::Wildcard),
            TypeF::Proc { params, ret } => {
                let params = params
                    .into_iter()
                    .map(|ty| f(ty, state))
                    .collect::<Result<Vec<_>, E>>()?;
                let ret = f(ret, state)?;

                Ok(TypeF::Proc { params, ret })
            }
        }
    }

    /// Variant of [Self::try_map_state] with an infallible function.
    pub fn map_state<TyO, F, S>(self, mut f: F, state: &mut S) -> TypeF<TyO>
    where
        F: FnMut(Ty, &mut S) -> TyO,
    {
        let lifted = |ty: Ty, state: &mut S| -> Result<TyO, Infallible> { Ok(f(ty, state)) };

        match self.try_map_state(lifted, state) {
            Ok(mapped) => mapped,
            Err(never) => match never {},
        }
    }

    /// Variant of [Self::map_state] without threaded state.
    pub fn map<TyO, F>(self, mut f: F) -> TypeF<TyO>
    where
        F: FnMut(Ty) -> TyO,
    {
        self.map_state(|ty, _: &mut ()| f(ty), &mut ())
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, TypeF::Atomic(_))
    }
}

/// A type annotation.
///
/// Equality is structural and ignores positions.
#[derive(Clone, Debug)]
pub struct Type {
    pub typ: TypeF<Box<Type>>,
    pub pos: TermPos,
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ
    }
}

impl From<TypeF<Box<Type>>> for Type {
    fn from(typ: TypeF<Box<Type>>) -> Self {
        Type {
            typ,
            pos: TermPos::None,
        }
    }
}

impl Type {
    pub fn with_pos(self, pos: TermPos) -> Type {
        Type { pos, ..self }
    }

    /// Build a procedure type.
    pub fn proc(params: impl IntoIterator<Item = Type>, ret: Type) -> Type {
        Type::from(TypeF::Proc {
            params: params.into_iter().map(Box::new).collect(),
            ret: Box::new(ret),
        })
    }

    /// Build a named type variable.
    pub fn var(name: impl Into<Ident>) -> Type {
        Type::from(TypeF::Var(name.into()))
    }

    /// Is this type the absence of an annotation?
    pub fn is_wildcard(&self) -> bool {
        matches!(self.typ, TypeF::Wildcard)
    }
}

impl From<AtomicType> for Type {
    fn from(atomic: AtomicType) -> Self {
        Type::from(TypeF::Atomic(atomic))
    }
}

impl_display_from_pretty!(Type);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_types_are_equal_by_kind() {
        assert_eq!(Type::from(AtomicType::Number), Type::from(AtomicType::Number));
        assert_ne!(Type::from(AtomicType::Number), Type::from(AtomicType::String));
    }

    #[test]
    fn proc_types_compare_arity_then_components() {
        let num = || Type::from(AtomicType::Number);
        let bool_ = || Type::from(AtomicType::Boolean);

        assert_eq!(
            Type::proc([num(), num()], bool_()),
            Type::proc([num(), num()], bool_())
        );
        assert_ne!(Type::proc([num()], bool_()), Type::proc([num(), num()], bool_()));
        assert_ne!(Type::proc([num()], bool_()), Type::proc([bool_()], bool_()));
        assert_ne!(Type::proc([num()], bool_()), Type::proc([num()], num()));
    }

    #[test]
    fn map_visits_params_then_return() {
        let typ: TypeF<u32> = TypeF::Proc {
            params: vec![1, 2],
            ret: 3,
        };
        let mut visited = Vec::new();
        let mapped = typ.map_state(
            |n, visited: &mut Vec<u32>| {
                visited.push(n);
                n * 10
            },
            &mut visited,
        );

        assert_eq!(visited, vec![1, 2, 3]);
        assert_eq!(
            mapped,
            TypeF::Proc {
                params: vec![10, 20],
                ret: 30
            }
        );
    }
}
