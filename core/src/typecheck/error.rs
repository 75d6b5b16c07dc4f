//! Internal error types for typechecking.
use super::{UnifTable, UnifType, VarId};

use crate::{error::TypecheckError, pretty::PrettyPrintCap, term::RichTerm};

/// The maximum width of the printed context expression in error messages.
pub const CONTEXT_MAX_WIDTH: usize = 80;

/// Error during the unification of two types.
///
/// In each variant, `expected` and `inferred` refer to the two arguments of the unification, in
/// this order.
#[derive(Debug, PartialEq, Clone)]
pub enum UnifError {
    /// Tried to unify two incompatible types, either two distinct atomic types or two types of a
    /// different shape.
    TypeMismatch {
        expected: UnifType,
        inferred: UnifType,
    },
    /// Tried to unify two procedure types with a different number of parameters, or two lists of
    /// types of different lengths. In the latter case, there are no types to report.
    ArityMismatch {
        expected_arity: usize,
        inferred_arity: usize,
        types: Option<(UnifType, UnifType)>,
    },
    /// Binding the variable to the type would create a cyclic type.
    OccursCheck { var: VarId, typ: UnifType },
    /// A type expression that should never reach the unifier, such as a named type variable that
    /// hasn't been converted to a unification variable.
    BadTypeExpression(UnifType),
    /// Several unifications of a list of types failed.
    Multiple(Vec<UnifError>),
}

impl UnifError {
    /// Convert a unification error to a typechecking error.
    ///
    /// There is a hierarchy between error types, from the most local/specific to the most
    /// high-level:
    /// - [`UnifError`]
    /// - [`crate::error::TypecheckError`]
    ///
    /// The conversion resolves the unification types against the current state of the table and
    /// attaches the position and the printed form of the expression being checked, `ctxt`. It must
    /// thus happen before the bindings made by the failed unification are undone.
    pub fn into_typecheck_err(self, table: &UnifTable, ctxt: &RichTerm) -> TypecheckError {
        let pos = ctxt.pos;

        match self {
            UnifError::TypeMismatch { expected, inferred } => TypecheckError::TypeMismatch {
                expected: expected.to_type(table),
                inferred: inferred.to_type(table),
                pos,
            },
            UnifError::ArityMismatch {
                expected_arity,
                inferred_arity,
                types,
            } => TypecheckError::ArityMismatch {
                expected_arity,
                inferred_arity,
                types: types.map(|(expected, inferred)| {
                    (expected.to_type(table), inferred.to_type(table))
                }),
                pos,
            },
            UnifError::OccursCheck { var, typ } => TypecheckError::OccursCheck {
                var: UnifType::UnifVar(var).to_type(table),
                typ: typ.to_type(table),
                pos,
            },
            UnifError::BadTypeExpression(typ) => TypecheckError::BadTypeExpression {
                typ: typ.to_type(table),
                pos,
            },
            UnifError::Multiple(errors) => TypecheckError::Multiple {
                context: ctxt.pretty_print_cap(CONTEXT_MAX_WIDTH),
                errors: errors
                    .into_iter()
                    .map(|err| err.into_typecheck_err(table, ctxt))
                    .collect(),
                pos,
            },
        }
    }
}
