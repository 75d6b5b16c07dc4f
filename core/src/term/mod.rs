//! AST of an L5 expression.
//!
//! The AST is produced by the [parser](crate::parser) and is read-only for the typechecker. Every
//! node is wrapped in a [RichTerm], which attaches the source position of the node.
use std::fmt;

use crate::{
    identifier::LocIdent, impl_display_from_pretty, parser::sexp::SExp, position::TermPos,
    typ::Type,
};

/// The primitive operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimOp {
    Add,
    Sub,
    Mult,
    Div,
    LessThan,
    GreaterThan,
    NumEq,
    And,
    Or,
    Not,
    IsNumber,
    IsBoolean,
    IsString,
    IsSymbol,
    IsList,
    IsPair,
    Eq,
    Equal,
    StringEq,
    Display,
    Newline,
}

impl PrimOp {
    pub const ALL: [PrimOp; 21] = [
        PrimOp::Add,
        PrimOp::Sub,
        PrimOp::Mult,
        PrimOp::Div,
        PrimOp::LessThan,
        PrimOp::GreaterThan,
        PrimOp::NumEq,
        PrimOp::And,
        PrimOp::Or,
        PrimOp::Not,
        PrimOp::IsNumber,
        PrimOp::IsBoolean,
        PrimOp::IsString,
        PrimOp::IsSymbol,
        PrimOp::IsList,
        PrimOp::IsPair,
        PrimOp::Eq,
        PrimOp::Equal,
        PrimOp::StringEq,
        PrimOp::Display,
        PrimOp::Newline,
    ];

    /// The primitive operator named by `symbol`, if any.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        PrimOp::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// The symbol naming this operator in the source.
    pub fn symbol(&self) -> &'static str {
        match self {
            PrimOp::Add => "+",
            PrimOp::Sub => "-",
            PrimOp::Mult => "*",
            PrimOp::Div => "/",
            PrimOp::LessThan => "<",
            PrimOp::GreaterThan => ">",
            PrimOp::NumEq => "=",
            PrimOp::And => "and",
            PrimOp::Or => "or",
            PrimOp::Not => "not",
            PrimOp::IsNumber => "number?",
            PrimOp::IsBoolean => "boolean?",
            PrimOp::IsString => "string?",
            PrimOp::IsSymbol => "symbol?",
            PrimOp::IsList => "list?",
            PrimOp::IsPair => "pair?",
            PrimOp::Eq => "eq?",
            PrimOp::Equal => "equal?",
            PrimOp::StringEq => "string=?",
            PrimOp::Display => "display",
            PrimOp::Newline => "newline",
        }
    }
}

impl fmt::Display for PrimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A declared variable together with its type annotation. A missing annotation is a
/// [crate::typ::TypeF::Wildcard].
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub id: LocIdent,
    pub typ: Type,
}

/// A binding `(var val)` of a `let`, `letrec` or `define`.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub var: VarDecl,
    pub val: RichTerm,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfData {
    pub test: RichTerm,
    pub then_branch: RichTerm,
    pub else_branch: RichTerm,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProcData {
    pub params: Vec<VarDecl>,
    /// The declared return type.
    pub ret: Type,
    /// The body. Never empty when built by the parser.
    pub body: Vec<RichTerm>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppData {
    pub rator: RichTerm,
    pub rands: Vec<RichTerm>,
}

/// The data of both `let` and `letrec`.
#[derive(Clone, Debug, PartialEq)]
pub struct LetData {
    pub bindings: Vec<Binding>,
    pub body: Vec<RichTerm>,
}

/// An L5 expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Num(f64),
    Bool(bool),
    Str(String),
    /// A reference to a primitive operator.
    PrimOp(PrimOp),
    /// A variable reference.
    Var(LocIdent),
    If(IfData),
    Proc(ProcData),
    App(AppData),
    Let(LetData),
    Letrec(LetData),
    /// A top-level definition `(define var val)`.
    Define(Binding),
    /// A whole program `(L5 exp+)`.
    Program(Vec<RichTerm>),
    /// A quoted datum.
    Quote(SExp),
    /// An assignment `(set! var val)`.
    Set { var: LocIdent, val: RichTerm },
}

impl Term {
    /// A short human-readable description of the shape of the term, used in error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Term::Num(_) => "number literal",
            Term::Bool(_) => "boolean literal",
            Term::Str(_) => "string literal",
            Term::PrimOp(_) => "primitive operator",
            Term::Var(_) => "variable",
            Term::If(_) => "if expression",
            Term::Proc(_) => "lambda expression",
            Term::App(_) => "application",
            Term::Let(_) => "let expression",
            Term::Letrec(_) => "letrec expression",
            Term::Define(_) => "define",
            Term::Program(_) => "program",
            Term::Quote(_) => "quoted literal",
            Term::Set { .. } => "set! expression",
        }
    }
}

/// A term together with its position in the source.
///
/// Equality ignores positions.
#[derive(Clone, Debug)]
pub struct RichTerm {
    pub term: Box<Term>,
    pub pos: TermPos,
}

impl RichTerm {
    pub fn new(term: Term, pos: TermPos) -> Self {
        RichTerm {
            term: Box::new(term),
            pos,
        }
    }

    pub fn with_pos(self, pos: TermPos) -> Self {
        RichTerm { pos, ..self }
    }

    pub fn as_ref(&self) -> &Term {
        &self.term
    }
}

impl PartialEq for RichTerm {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl From<Term> for RichTerm {
    fn from(term: Term) -> Self {
        RichTerm::new(term, TermPos::None)
    }
}

impl_display_from_pretty!(RichTerm);

/// Helpers to build terms programmatically, mostly used in tests.
pub mod make {
    use super::*;
    use crate::identifier::Ident;

    pub fn num(n: f64) -> RichTerm {
        Term::Num(n).into()
    }

    pub fn bool(b: bool) -> RichTerm {
        Term::Bool(b).into()
    }

    pub fn string(s: impl Into<String>) -> RichTerm {
        Term::Str(s.into()).into()
    }

    pub fn var(name: impl Into<Ident>) -> RichTerm {
        Term::Var(LocIdent::new(name)).into()
    }

    pub fn op(op: PrimOp) -> RichTerm {
        Term::PrimOp(op).into()
    }

    pub fn if_then_else(test: RichTerm, then_branch: RichTerm, else_branch: RichTerm) -> RichTerm {
        Term::If(IfData {
            test,
            then_branch,
            else_branch,
        })
        .into()
    }

    pub fn app(rator: RichTerm, rands: impl IntoIterator<Item = RichTerm>) -> RichTerm {
        Term::App(AppData {
            rator,
            rands: rands.into_iter().collect(),
        })
        .into()
    }

    pub fn decl(name: impl Into<Ident>, typ: Type) -> VarDecl {
        VarDecl {
            id: LocIdent::new(name),
            typ,
        }
    }

    pub fn proc(params: impl IntoIterator<Item = VarDecl>, ret: Type, body: RichTerm) -> RichTerm {
        Term::Proc(ProcData {
            params: params.into_iter().collect(),
            ret,
            body: vec![body],
        })
        .into()
    }

    pub fn let_in(bindings: impl IntoIterator<Item = (VarDecl, RichTerm)>, body: RichTerm) -> RichTerm {
        Term::Let(LetData {
            bindings: bindings
                .into_iter()
                .map(|(var, val)| Binding { var, val })
                .collect(),
            body: vec![body],
        })
        .into()
    }
}
