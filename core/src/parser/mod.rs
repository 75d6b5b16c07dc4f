//! Parsing of L5 source code.
//!
//! Parsing happens in two stages. The [reader](sexp) first turns the source into an s-expression,
//! which is then converted to the [AST](crate::term) by recognizing the special forms. Type
//! annotations are parsed by [parse_texp] during the second stage.
use codespan::FileId;

use crate::{
    error::ParseError,
    identifier::LocIdent,
    term::*,
    typ::{AtomicType, Type, TypeF},
};

use sexp::{Atom, SExp, SExpF};

pub mod error;
pub mod lexer;
pub mod sexp;


/// Symbols which have a special meaning inside type expressions, and thus can't be used as type
/// variable names.
const TYPE_MARKERS: [&str; 4] = ["->", "*", ":", "Empty"];

/// Parse an L5 expression or an L5 program `(L5 exp+)`.
pub fn parse(file_id: FileId, source: &str) -> Result<RichTerm, ParseError> {
    let sexp = sexp::read_one(file_id, source)?;

    match sexp.as_list() {
        Some([head, exps @ ..]) if head.is_symbol("L5") => {
            if exps.is_empty() {
                return Err(malformed(
                    &sexp,
                    "program",
                    "a program must contain at least one expression",
                ));
            }

            let exps = exps.iter().map(parse_exp).collect::<Result<Vec<_>, _>>()?;
            Ok(RichTerm::new(Term::Program(exps), sexp.pos))
        }
        _ => parse_exp(&sexp),
    }
}

/// Parse a standalone type expression.
pub fn parse_type(file_id: FileId, source: &str) -> Result<Type, ParseError> {
    parse_texp(&sexp::read_one(file_id, source)?)
}

fn malformed(sexp: &SExp, form: &str, message: impl Into<String>) -> ParseError {
    ParseError::MalformedExpression {
        pos: sexp.pos,
        form: form.to_owned(),
        message: message.into(),
    }
}

fn malformed_type(sexp: &SExp, message: impl Into<String>) -> ParseError {
    ParseError::MalformedType {
        pos: sexp.pos,
        message: message.into(),
    }
}

/// Convert an s-expression to an expression.
pub fn parse_exp(sexp: &SExp) -> Result<RichTerm, ParseError> {
    let term = match &sexp.data {
        SExpF::Atom(Atom::Num(n)) => Term::Num(*n),
        SExpF::Atom(Atom::Bool(b)) => Term::Bool(*b),
        SExpF::Atom(Atom::Str(s)) => Term::Str(s.clone()),
        SExpF::Atom(Atom::Symbol(id)) => match PrimOp::from_symbol(id.label()) {
            Some(op) => Term::PrimOp(op),
            None => Term::Var(LocIdent::new(id.clone()).with_pos(sexp.pos)),
        },
        SExpF::List(elts) => match elts.split_first() {
            None => return Err(malformed(sexp, "application", "empty combination `()`")),
            Some((head, rest)) => match head.as_symbol() {
                Some("if") => parse_if(sexp, rest)?,
                Some("lambda") => Term::Proc(parse_lambda(sexp, rest)?),
                Some("let") => Term::Let(parse_let(sexp, "let", rest)?),
                Some("letrec") => Term::Letrec(parse_let(sexp, "letrec", rest)?),
                Some("define") => parse_define(sexp, rest)?,
                Some("quote") => match rest {
                    [datum] => Term::Quote(datum.clone()),
                    _ => return Err(malformed(sexp, "quote", "quote expects exactly one datum")),
                },
                Some("set!") => parse_set(sexp, rest)?,
                Some("L5") => {
                    return Err(malformed(
                        sexp,
                        "program",
                        "a program can only appear at the top level",
                    ))
                }
                _ => Term::App(AppData {
                    rator: parse_exp(head)?,
                    rands: rest.iter().map(parse_exp).collect::<Result<_, _>>()?,
                }),
            },
        },
    };

    Ok(RichTerm::new(term, sexp.pos))
}

fn parse_if(sexp: &SExp, rest: &[SExp]) -> Result<Term, ParseError> {
    match rest {
        [test, then_branch, else_branch] => Ok(Term::If(IfData {
            test: parse_exp(test)?,
            then_branch: parse_exp(then_branch)?,
            else_branch: parse_exp(else_branch)?,
        })),
        _ => Err(malformed(
            sexp,
            "if",
            format!(
                "if expects a test, a then branch and an else branch, got {} argument(s)",
                rest.len()
            ),
        )),
    }
}

/// Parse a non-empty body.
fn parse_body(sexp: &SExp, form: &str, body: &[SExp]) -> Result<Vec<RichTerm>, ParseError> {
    if body.is_empty() {
        return Err(malformed(sexp, form, format!("{form} expects a non-empty body")));
    }

    body.iter().map(parse_exp).collect()
}

/// Parse a declared variable name. Type markers and atomic type names are rejected, so that a
/// misplaced annotation such as `(lambda (x : number) ...)` isn't read as three parameters.
fn parse_var(sexp: &SExp, form: &str) -> Result<LocIdent, ParseError> {
    match sexp.as_symbol() {
        Some(name) if TYPE_MARKERS.contains(&name) || AtomicType::from_symbol(name).is_some() => {
            Err(malformed(
                sexp,
                form,
                format!("`{name}` can't be used as a variable name"),
            ))
        }
        Some(name) => Ok(LocIdent::new(name).with_pos(sexp.pos)),
        None => Err(malformed(sexp, form, "expected a variable")),
    }
}

/// Parse a parameter `x` or `(x : texp)`.
fn parse_param(sexp: &SExp, form: &str) -> Result<VarDecl, ParseError> {
    match &sexp.data {
        SExpF::Atom(Atom::Symbol(_)) => Ok(VarDecl {
            id: parse_var(sexp, form)?,
            typ: Type::from(TypeF::Wildcard),
        }),
        SExpF::List(elts) => match elts.as_slice() {
            [id, colon, texp] if colon.is_symbol(":") => Ok(VarDecl {
                id: parse_var(id, form)?,
                typ: parse_texp(texp)?,
            }),
            _ => Err(malformed(
                sexp,
                form,
                "expected a variable `x` or an annotated variable `(x : type)`",
            )),
        },
        _ => Err(malformed(
            sexp,
            form,
            "expected a variable `x` or an annotated variable `(x : type)`",
        )),
    }
}

fn parse_lambda(sexp: &SExp, rest: &[SExp]) -> Result<ProcData, ParseError> {
    let Some((params, rest)) = rest.split_first() else {
        return Err(malformed(sexp, "lambda", "lambda expects a parameter list"));
    };

    let params = params
        .as_list()
        .ok_or_else(|| malformed(params, "lambda", "expected a parameter list"))?
        .iter()
        .map(|param| parse_param(param, "lambda"))
        .collect::<Result<Vec<_>, _>>()?;

    let (ret, body) = match rest {
        [colon, texp, body @ ..] if colon.is_symbol(":") => (parse_texp(texp)?, body),
        [colon] if colon.is_symbol(":") => {
            return Err(malformed(colon, "lambda", "expected a return type after `:`"))
        }
        body => (Type::from(TypeF::Wildcard), body),
    };

    Ok(ProcData {
        params,
        ret,
        body: parse_body(sexp, "lambda", body)?,
    })
}

fn parse_binding(sexp: &SExp, form: &str) -> Result<Binding, ParseError> {
    match sexp.as_list() {
        Some([var, val]) => Ok(Binding {
            var: parse_param(var, form)?,
            val: parse_exp(val)?,
        }),
        _ => Err(malformed(sexp, form, "expected a binding `(var value)`")),
    }
}

fn parse_let(sexp: &SExp, form: &str, rest: &[SExp]) -> Result<LetData, ParseError> {
    let Some((bindings, body)) = rest.split_first() else {
        return Err(malformed(sexp, form, format!("{form} expects a list of bindings")));
    };

    let bindings = bindings
        .as_list()
        .ok_or_else(|| malformed(bindings, form, "expected a list of bindings"))?
        .iter()
        .map(|binding| parse_binding(binding, form))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LetData {
        bindings,
        body: parse_body(sexp, form, body)?,
    })
}

fn parse_define(sexp: &SExp, rest: &[SExp]) -> Result<Term, ParseError> {
    match rest {
        [var, val] => Ok(Term::Define(Binding {
            var: parse_param(var, "define")?,
            val: parse_exp(val)?,
        })),
        _ => Err(malformed(
            sexp,
            "define",
            "define expects a variable and a value",
        )),
    }
}

fn parse_set(sexp: &SExp, rest: &[SExp]) -> Result<Term, ParseError> {
    match rest {
        [var, val] => {
            let name = var
                .as_symbol()
                .ok_or_else(|| malformed(var, "set!", "expected a variable"))?;

            Ok(Term::Set {
                var: LocIdent::new(name).with_pos(var.pos),
                val: parse_exp(val)?,
            })
        }
        _ => Err(malformed(sexp, "set!", "set! expects a variable and a value")),
    }
}

/// Convert an s-expression to a type expression.
///
/// ```text
/// texp ::= number | boolean | string | void | symbol
///        | (texp * ... * texp -> texp)
///        | (Empty -> texp)
/// ```
pub fn parse_texp(sexp: &SExp) -> Result<Type, ParseError> {
    let typ = match &sexp.data {
        SExpF::Atom(Atom::Symbol(id)) => match AtomicType::from_symbol(id.label()) {
            Some(atomic) => TypeF::Atomic(atomic),
            None if TYPE_MARKERS.contains(&id.label()) => {
                return Err(malformed_type(
                    sexp,
                    format!("`{id}` can't be used as a type"),
                ))
            }
            None => TypeF::Var(id.clone()),
        },
        SExpF::Atom(_) => {
            return Err(malformed_type(sexp, "expected a type"));
        }
        SExpF::List(elts) => parse_proc_type(sexp, elts)?,
    };

    Ok(Type::from(typ).with_pos(sexp.pos))
}

fn parse_proc_type(sexp: &SExp, elts: &[SExp]) -> Result<TypeF<Box<Type>>, ParseError> {
    let (args, ret) = match elts {
        [args @ .., arrow, ret] if arrow.is_symbol("->") => (args, ret),
        _ => {
            return Err(malformed_type(
                sexp,
                "expected a procedure type `(t1 * ... * tn -> t)`",
            ))
        }
    };

    let params = match args {
        [] => {
            return Err(malformed_type(
                sexp,
                "a procedure type without parameters is written `(Empty -> t)`",
            ))
        }
        [empty] if empty.is_symbol("Empty") => Vec::new(),
        _ if args.len() % 2 == 0 => {
            return Err(malformed_type(
                sexp,
                "parameter types must be separated by `*`",
            ))
        }
        _ => args
            .iter()
            .enumerate()
            .map(|(idx, arg)| {
                if idx % 2 == 1 {
                    if arg.is_symbol("*") {
                        Ok(None)
                    } else {
                        Err(malformed_type(arg, "expected `*` between parameter types"))
                    }
                } else {
                    parse_texp(arg).map(|ty| Some(Box::new(ty)))
                }
            })
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(TypeF::Proc {
        params,
        ret: Box::new(parse_texp(ret)?),
    })
}
