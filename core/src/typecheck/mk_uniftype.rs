//! Helpers for building `UnifType`s.
use super::UnifType;
use crate::typ::{AtomicType, TypeF};

/// Procedure type constructor for types implementing `Into<UnifType>`.
///
/// `mk_uty_proc!([t1, t2] => t)` corresponds to `(t1 * t2 -> t)` and `mk_uty_proc!([] => t)` to
/// `(Empty -> t)`.
#[macro_export]
macro_rules! mk_uty_proc {
    ([ $( $params:expr ),* ] => $ret:expr) => {
        $crate::typecheck::UnifType::concrete(
            $crate::typ::TypeF::Proc {
                params: vec![ $( Box::new($crate::typecheck::UnifType::from($params)) ),* ],
                ret: Box::new($crate::typecheck::UnifType::from($ret)),
            }
        )
    };
}

/// Build a procedure type from a list of parameter types and a return type.
pub fn proc(params: impl IntoIterator<Item = UnifType>, ret: UnifType) -> UnifType {
    UnifType::concrete(TypeF::Proc {
        params: params.into_iter().map(Box::new).collect(),
        ret: Box::new(ret),
    })
}

/// Generate an helper function to build an atomic type.
macro_rules! generate_builder {
    ($fun:ident, $var:ident) => {
        pub fn $fun() -> UnifType {
            UnifType::concrete(TypeF::Atomic(AtomicType::$var))
        }
    };
}

generate_builder!(num, Number);
generate_builder!(str, String);
generate_builder!(bool, Boolean);
generate_builder!(void, Void);
