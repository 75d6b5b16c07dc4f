//! Type inference by unification for L5, a small Scheme dialect with optional type annotations.
pub mod environment;
pub mod error;
pub mod identifier;
pub mod parser;
pub mod position;
pub mod pretty;
pub mod program;
pub mod term;
pub mod typ;
pub mod typecheck;

pub use typecheck::infer_type_of;
