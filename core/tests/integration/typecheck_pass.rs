use pretty_assertions::assert_eq;
use tinfer_core::{
    identifier::Ident,
    typecheck::{mk_uniftype, Environment, State},
};

use crate::{infer_in_env, infer_printed};

#[test]
fn literals() {
    assert_eq!(infer_printed("3"), "number");
    assert_eq!(infer_printed("-2.5"), "number");
    assert_eq!(infer_printed("#t"), "boolean");
    assert_eq!(infer_printed("#f"), "boolean");
    assert_eq!(infer_printed("\"x\""), "string");
}

#[test]
fn literals_ignore_the_environment() {
    let mut state = State::new();
    let env = Environment::new().extend([
        (Ident::from("x"), mk_uniftype::str()),
        (Ident::from("y"), mk_uniftype::bool()),
    ]);

    assert_eq!(
        infer_in_env("3", &mut state, &env).unwrap().to_string(),
        "number"
    );
}

#[test]
fn variable_from_environment() {
    let mut state = State::new();
    let env = Environment::new().extend([(Ident::from("x"), mk_uniftype::num())]);

    assert_eq!(
        infer_in_env("(+ x 1)", &mut state, &env)
            .unwrap()
            .to_string(),
        "number"
    );
}

#[test]
fn primitive_operators() {
    assert_eq!(infer_printed("+"), "(number * number -> number)");
    assert_eq!(infer_printed("not"), "(boolean -> boolean)");
    assert_eq!(infer_printed("newline"), "(Empty -> void)");
    assert_eq!(infer_printed("(newline)"), "void");
    assert_eq!(infer_printed("(display \"hi\")"), "void");
    assert_eq!(infer_printed("(number? #t)"), "boolean");
    assert_eq!(infer_printed("(eq? 1 \"one\")"), "boolean");
}

#[test]
fn polymorphic_operators_are_instantiated_at_each_use() {
    assert_eq!(
        infer_printed("(and (number? 1) (number? \"one\"))"),
        "boolean"
    );
}

#[test]
fn conditional() {
    assert_eq!(infer_printed("(if #t 1 2)"), "number");
    assert_eq!(infer_printed("(if (< 1 2) \"a\" \"b\")"), "string");
}

#[test]
fn procedure() {
    assert_eq!(
        infer_printed("(lambda ((x : number)) : number (+ x 1))"),
        "(number -> number)"
    );
    assert_eq!(
        infer_printed("(lambda ((x : number) (y : string)) : boolean (display y) (< x 0))"),
        "(number * string -> boolean)"
    );
    assert_eq!(
        infer_printed("(lambda () : boolean #t)"),
        "(Empty -> boolean)"
    );
}

#[test]
fn procedure_with_type_variables() {
    assert_eq!(infer_printed("(lambda ((x : T)) : T x)"), "(T -> T)");
    assert_eq!(
        infer_printed("((lambda ((x : T)) : T x) 3)"),
        "number"
    );
}

#[test]
fn higher_order_procedure() {
    assert_eq!(
        infer_printed(
            "(lambda ((f : (number -> boolean)) (n : number)) : boolean (not (f n)))"
        ),
        "((number -> boolean) * number -> boolean)"
    );
}

#[test]
fn application() {
    assert_eq!(infer_printed("(+ 1 2)"), "number");
    assert_eq!(
        infer_printed("((lambda ((x : number)) : number (* x x)) 4)"),
        "number"
    );
}

#[test]
fn unannotated_declarations_are_inferred() {
    assert_eq!(infer_printed("((lambda (x) : number x) 1)"), "number");
    assert_eq!(infer_printed("(let ((x 3)) (+ x 1))"), "number");
}

#[test]
fn let_binding() {
    assert_eq!(infer_printed("(let (((x : number) 3)) (+ x 1))"), "number");
    assert_eq!(
        infer_printed("(let (((x : number) 3) ((y : string) \"y\")) (display y) x)"),
        "number"
    );
}

#[test]
fn let_values_are_inferred_in_the_outer_environment() {
    let mut state = State::new();
    let env = Environment::new().extend([(Ident::from("x"), mk_uniftype::str())]);

    assert_eq!(
        infer_in_env(
            "(let (((x : number) 1) ((y : string) x)) y)",
            &mut state,
            &env
        )
        .unwrap()
        .to_string(),
        "string"
    );
}

#[test]
fn letrec_binding() {
    assert_eq!(
        infer_printed(
            "(letrec (((f : (number -> number)) \
                (lambda ((n : number)) : number (if (= n 0) 0 (f (- n 1)))))) \
            (f 5))"
        ),
        "number"
    );
}

#[test]
fn mutually_recursive_letrec() {
    assert_eq!(
        infer_printed(
            "(letrec ((even? (lambda ((n : number)) : boolean (if (= n 0) #t (odd? (- n 1))))) \
                (odd? (lambda ((n : number)) : boolean (if (= n 0) #f (even? (- n 1)))))) \
            (even? 10))"
        ),
        "boolean"
    );
}

#[test]
fn define_is_void() {
    assert_eq!(infer_printed("(define (x : number) 5)"), "void");
    // The value isn't checked.
    assert_eq!(infer_printed("(define (x : number) \"five\")"), "void");
}

#[test]
fn fresh_variable_per_application_is_bound() {
    let mut state = State::new();
    let result = infer_in_env("(+ 1 2)", &mut state, &Environment::new());

    assert_eq!(result.unwrap().to_string(), "number");
    assert_eq!(state.table.len(), 1);
    assert!(state.table.is_bound(0));
}

#[test]
fn infer_type_of_entry_point() {
    assert_eq!(
        tinfer_core::infer_type_of("(let (((x : number) 3)) (+ x 1))"),
        Ok(String::from("number"))
    );
}
