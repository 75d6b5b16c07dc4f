//! Typing of primitive operations.
use super::*;
use crate::{mk_uty_proc, term::PrimOp, typ::AtomicType};

/// Type of a primitive operator.
///
/// Polymorphic operators are instantiated with fresh unification variables at each call, so that
/// two references to the same operator don't constrain each other.
pub fn get_prim_type(state: &mut State, op: PrimOp) -> UnifType {
    match op {
        // number * number -> number
        PrimOp::Add | PrimOp::Sub | PrimOp::Mult | PrimOp::Div => mk_uty_proc!(
            [AtomicType::Number, AtomicType::Number] => AtomicType::Number
        ),
        // number * number -> boolean
        PrimOp::LessThan | PrimOp::GreaterThan | PrimOp::NumEq => mk_uty_proc!(
            [AtomicType::Number, AtomicType::Number] => AtomicType::Boolean
        ),
        // boolean * boolean -> boolean
        PrimOp::And | PrimOp::Or => mk_uty_proc!(
            [AtomicType::Boolean, AtomicType::Boolean] => AtomicType::Boolean
        ),
        // boolean -> boolean
        PrimOp::Not => mk_uty_proc!([AtomicType::Boolean] => AtomicType::Boolean),
        // forall T. T -> boolean
        PrimOp::IsNumber
        | PrimOp::IsBoolean
        | PrimOp::IsString
        | PrimOp::IsSymbol
        | PrimOp::IsList
        | PrimOp::IsPair => {
            let arg = state.fresh_var();
            mk_uty_proc!([arg] => AtomicType::Boolean)
        }
        // forall T1 T2. T1 * T2 -> boolean
        PrimOp::Eq | PrimOp::Equal | PrimOp::StringEq => {
            let fst = state.fresh_var();
            let snd = state.fresh_var();
            mk_uty_proc!([fst, snd] => AtomicType::Boolean)
        }
        // forall T. T -> void
        PrimOp::Display => {
            let arg = state.fresh_var();
            mk_uty_proc!([arg] => AtomicType::Void)
        }
        // Empty -> void
        PrimOp::Newline => mk_uty_proc!([] => AtomicType::Void),
    }
}
