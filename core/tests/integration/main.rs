use codespan::Files;
use tinfer_core::{
    error::TypecheckError,
    parser,
    term::RichTerm,
    typ::Type,
    typecheck::{self, Environment, State},
};

mod program_api;
mod typecheck_fail;
mod typecheck_pass;

#[track_caller]
pub fn parse(s: &str) -> RichTerm {
    let id = Files::new().add("<test>", String::from(s));
    parser::parse(id, s).unwrap()
}

/// Infer the type of an expression in the empty environment.
#[track_caller]
pub fn infer(s: &str) -> Result<Type, TypecheckError> {
    typecheck::type_check(&parse(s))
}

/// Infer the type of an expression in the given environment, and return the final state as well.
#[track_caller]
pub fn infer_in_env(s: &str, state: &mut State, env: &Environment) -> Result<Type, TypecheckError> {
    typecheck::type_check_in_env(&parse(s), state, env)
}

/// Infer the type of an expression and return its printed form.
#[track_caller]
pub fn infer_printed(s: &str) -> String {
    infer(s).unwrap().to_string()
}
