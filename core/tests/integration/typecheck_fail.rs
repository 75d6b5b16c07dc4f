use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use tinfer_core::{
    error::TypecheckError,
    typ::{AtomicType, Type, TypeF},
    typecheck::{Environment, State},
};

use crate::{infer, infer_in_env};

fn atomic(typ: &Type) -> Option<AtomicType> {
    match typ.typ {
        TypeF::Atomic(atomic) => Some(atomic),
        _ => None,
    }
}

/// Assert that inference fails with exactly one type mismatch between two atomic types, possibly
/// wrapped in an aggregate error.
#[track_caller]
fn assert_atomic_mismatch(s: &str, exp: AtomicType, inf: AtomicType) {
    let err = infer(s).unwrap_err();
    let leaves = err.leaves();

    assert_eq!(leaves.len(), 1, "unexpected errors: {err}");
    assert_matches!(
        leaves[0],
        TypecheckError::TypeMismatch { expected, inferred, .. }
            if atomic(expected) == Some(exp) && atomic(inferred) == Some(inf)
    );
}

#[test]
fn unbound_identifier() {
    assert_matches!(
        infer("x"),
        Err(TypecheckError::UnboundIdentifier { id, .. }) if id.label() == "x"
    );
    assert_matches!(
        infer("(lambda ((x : number)) : number y)"),
        Err(TypecheckError::UnboundIdentifier { .. })
    );
}

#[test]
fn let_variables_are_not_in_scope_of_their_values() {
    assert_matches!(
        infer("(let (((x : number) 1) ((y : number) x)) y)"),
        Err(TypecheckError::UnboundIdentifier { .. })
    );
}

#[test]
fn conditional_test_must_be_boolean() {
    assert_atomic_mismatch("(if 3 1 2)", AtomicType::Boolean, AtomicType::Number);
}

#[test]
fn conditional_branches_must_agree() {
    assert_atomic_mismatch("(if #t 1 \"a\")", AtomicType::Number, AtomicType::String);
}

#[test]
fn application_argument_mismatch() {
    let err = infer("((lambda ((x : number)) : number x) \"hello\")").unwrap_err();
    let message = err.to_string();

    assert!(message.contains("number"), "{message}");
    assert!(message.contains("string"), "{message}");
    assert_atomic_mismatch(
        "((lambda ((x : number)) : number x) \"hello\")",
        AtomicType::Number,
        AtomicType::String,
    );
}

#[test]
fn application_failures_are_all_reported() {
    let err = infer("(+ \"one\" #t)").unwrap_err();
    assert_eq!(err.leaves().len(), 2);
}

#[test]
fn application_of_non_procedure() {
    assert_matches!(
        infer("(1 2)"),
        Err(TypecheckError::TypeMismatch { .. })
    );
}

#[test]
fn wrong_number_of_arguments() {
    assert_matches!(
        infer("((lambda ((x : number)) : number x) 1 2)"),
        Err(TypecheckError::ArityMismatch {
            expected_arity: 1,
            inferred_arity: 2,
            types: Some(_),
            ..
        })
    );
}

#[test]
fn procedure_return_type_mismatch() {
    assert_atomic_mismatch(
        "(lambda ((x : number)) : string (+ x 1))",
        AtomicType::String,
        AtomicType::Number,
    );
}

#[test]
fn let_binding_mismatch() {
    assert_atomic_mismatch(
        "(let (((x : number) \"three\")) x)",
        AtomicType::Number,
        AtomicType::String,
    );
}

#[test]
fn let_binding_failures_are_aggregated() {
    let err = infer("(let (((x : number) \"three\") ((y : boolean) 4)) x)").unwrap_err();

    assert_matches!(err, TypecheckError::Multiple { .. });
    assert_eq!(err.leaves().len(), 2);
}

#[test]
fn failing_element_before_the_end_of_a_body() {
    assert_atomic_mismatch(
        "(lambda () : number (+ 1 \"a\") 1)",
        AtomicType::Number,
        AtomicType::String,
    );
    assert_atomic_mismatch(
        "(let (((x : number) 1)) (not 1) x)",
        AtomicType::Boolean,
        AtomicType::Number,
    );
}

#[test]
fn body_stops_at_the_first_failing_element() {
    let source = "(lambda () : number (not 1) (+ 1 \"a\") 1)";
    assert_atomic_mismatch(source, AtomicType::Boolean, AtomicType::Number);

    // Only the first application got to allocate its result variable.
    let mut state = State::new();
    assert!(infer_in_env(source, &mut state, &Environment::new()).is_err());
    assert_eq!(state.table.len(), 1);
}

#[test]
fn letrec_with_non_procedure() {
    assert_matches!(
        infer("(letrec (((x : number) 3)) x)"),
        Err(TypecheckError::UnsupportedConstruct { construct, .. }) if construct == "letrec"
    );
    assert_matches!(
        infer(
            "(letrec (((f : (number -> number)) (lambda ((n : number)) : number n)) \
                ((x : number) 3)) \
            (f x))"
        ),
        Err(TypecheckError::UnsupportedConstruct { .. })
    );
}

#[test]
fn letrec_body_mismatch() {
    assert_atomic_mismatch(
        "(letrec ((f (lambda ((n : number)) : number (if (= n 0) 0 \"zero\")))) \
        (f 5))",
        AtomicType::Number,
        AtomicType::String,
    );
}

#[test]
fn occurs_check() {
    assert_matches!(
        infer("(lambda ((f : T)) : number (f f))"),
        Err(TypecheckError::OccursCheck { .. })
    );
}

#[test]
fn fresh_variable_per_application_is_unbound_on_failure() {
    let mut state = State::new();
    let result = infer_in_env("(not 1)", &mut state, &Environment::new());

    assert!(result.is_err());
    assert_eq!(state.table.len(), 1);
    assert!(!state.table.is_bound(0));
}

#[test]
fn program_is_unsupported() {
    assert_matches!(
        infer("(L5 1)"),
        Err(TypecheckError::UnsupportedConstruct { construct, .. }) if construct == "program"
    );
}

#[test]
fn quote_and_assignment_are_unsupported() {
    assert_matches!(
        infer("'(1 2)"),
        Err(TypecheckError::UnsupportedConstruct { .. })
    );
    assert_matches!(
        infer("(set! x 1)"),
        Err(TypecheckError::UnsupportedConstruct { .. })
    );
}

#[test]
fn error_message_of_entry_point() {
    assert_eq!(
        tinfer_core::infer_type_of("(if #t 1 \"a\")"),
        Err(String::from(
            "incompatible atomic types: expected `number`, found `string`"
        ))
    );
}
