//! Implementation of the typechecker.
//!
//! # Mode of operation
//!
//! Type inference is syntax-directed: there is one typing rule per shape of expression, and the
//! rules are composed recursively over the AST by [type_of]. Rules call the unifier to equate
//! types, which binds unification variables along the way.
//!
//! Type annotations are taken as is: the type of a parameter is its annotation, and so is the
//! return type of a procedure. A missing annotation is a fresh unification variable to be solved
//! for by unification. Named type variables in annotations, such as `T1`, are also unification
//! variables, and all the occurrences of the same name within one inference denote the same
//! variable.
//!
//! There is no let-polymorphism: the type of a let-bound variable or of a procedure is never
//! generalized.
//!
//! # Errors
//!
//! Most rules stop at the first error. The rules that check a list of independent things (the
//! operands of an application, the bindings of a `let` or a `letrec`) check all of them and report
//! all the failures at once, in a [TypecheckError::Multiple].
use std::collections::HashMap;

use codespan::Files;

use crate::{
    environment::Environment as GenericEnvironment,
    error::TypecheckError,
    identifier::Ident,
    parser,
    pretty::PrettyPrintCap,
    term::{IfData, LetData, ProcData, RichTerm, Term},
    typ::{AtomicType, Type, TypeF},
};

pub mod error;
pub mod mk_uniftype;
pub mod operation;
pub mod unif;

use error::{UnifError, CONTEXT_MAX_WIDTH};
pub use unif::{
    check_equal_type, occurs_check, resolve_var, unify, unify_all, UnifTable, VarId,
};

/// The typing environment, mapping variables to their (unification) type.
pub type Environment = GenericEnvironment<Ident, UnifType>;

/// The types on which the unification algorithm operates, which may be either a concrete type or
/// a unification variable.
///
/// Equality is structural, except for unification variables which are equal if and only if they
/// are the same variable.
#[derive(Clone, PartialEq, Debug)]
pub enum UnifType {
    /// A concrete type (like `number` or `(T -> string)`).
    Concrete(TypeF<Box<UnifType>>),
    /// A unification variable.
    UnifVar(VarId),
}

impl UnifType {
    /// Create a concrete generic unification type.
    pub fn concrete(typ: TypeF<Box<UnifType>>) -> Self {
        UnifType::Concrete(typ)
    }

    /// Convert a type annotation to a unification type. Named type variables are mapped to the
    /// unification variable allocated for their name, and wildcards are replaced by fresh
    /// unification variables.
    pub fn from_type(ty: Type, state: &mut State) -> Self {
        match ty.typ {
            TypeF::Var(id) => state.named_var(id),
            TypeF::Wildcard => state.fresh_var(),
            typ => UnifType::Concrete(
                typ.map_state(|ty, state| Box::new(UnifType::from_type(*ty, state)), state),
            ),
        }
    }

    /// Convert a unification type to a type, by following the bindings of unification variables.
    /// Unbound variables are converted to named type variables.
    pub fn to_type(&self, table: &UnifTable) -> Type {
        match self {
            UnifType::UnifVar(id) => match table.get_type(*id) {
                Some(bound) => bound.to_type(table),
                None => Type::from(TypeF::Var(table.var_name(*id))),
            },
            UnifType::Concrete(typ) => {
                Type::from(typ.clone().map(|ty| Box::new(ty.to_type(table))))
            }
        }
    }

    /// Return the unification root associated with this type. If the type is a unification
    /// variable, return the result of `table.root_type`. Return `self` otherwise.
    pub fn into_root(self, table: &UnifTable) -> Self {
        match self {
            UnifType::UnifVar(var_id) => table.root_type(var_id),
            uty => uty,
        }
    }
}

impl From<AtomicType> for UnifType {
    fn from(atomic: AtomicType) -> Self {
        UnifType::Concrete(TypeF::Atomic(atomic))
    }
}

impl From<TypeF<Box<UnifType>>> for UnifType {
    fn from(typ: TypeF<Box<UnifType>>) -> Self {
        UnifType::Concrete(typ)
    }
}

/// The typechecking state: the unification table and the unification variables allocated for the
/// named type variables of annotations.
///
/// One state is created per top-level inference, and unification variables are never shared
/// across states.
#[derive(Default)]
pub struct State {
    /// The unification table.
    pub table: UnifTable,
    /// The unification variable of each named type variable encountered so far.
    names: HashMap<Ident, VarId>,
}

impl State {
    pub fn new() -> Self {
        State::default()
    }

    /// Allocate a fresh, anonymous, unification variable.
    pub fn fresh_var(&mut self) -> UnifType {
        let uvar = self.table.fresh_type_uvar();
        log::debug!("fresh unification variable {uvar:?}");
        uvar
    }

    /// Return the unification variable associated to a named type variable, allocating it the
    /// first time the name is encountered.
    pub fn named_var(&mut self, name: Ident) -> UnifType {
        let id = match self.names.get(&name) {
            Some(id) => *id,
            None => {
                let id = self.table.fresh_type_var_id(Some(name.clone()));
                log::debug!("unification variable {id} for type variable {name}");
                self.names.insert(name, id);
                id
            }
        };

        UnifType::UnifVar(id)
    }
}

fn unsupported(construct: &str, reason: impl Into<String>, rt: &RichTerm) -> TypecheckError {
    TypecheckError::UnsupportedConstruct {
        construct: construct.to_owned(),
        reason: reason.into(),
        context: rt.pretty_print_cap(CONTEXT_MAX_WIDTH),
        pos: rt.pos,
    }
}

/// Gather the results of several independent checks. If exactly one failed, return its error. If
/// several failed, return them all in a [TypecheckError::Multiple] naming the context expression.
fn collect_all<T>(
    results: Vec<Result<T, TypecheckError>>,
    ctxt: &RichTerm,
) -> Result<Vec<T>, TypecheckError> {
    let mut values = Vec::with_capacity(results.len());
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(err) => errors.push(err),
        }
    }

    match errors.len() {
        0 => Ok(values),
        1 => Err(errors.remove(0)),
        _ => Err(TypecheckError::Multiple {
            context: ctxt.pretty_print_cap(CONTEXT_MAX_WIDTH),
            errors,
            pos: ctxt.pos,
        }),
    }
}

/// Infer the type of an expression.
pub fn type_of(
    state: &mut State,
    env: &Environment,
    rt: &RichTerm,
) -> Result<UnifType, TypecheckError> {
    log::trace!("typing {}", rt.as_ref().shape_name());

    match rt.as_ref() {
        Term::Num(_) => Ok(mk_uniftype::num()),
        Term::Bool(_) => Ok(mk_uniftype::bool()),
        Term::Str(_) => Ok(mk_uniftype::str()),
        Term::PrimOp(op) => Ok(operation::get_prim_type(state, *op)),
        Term::Var(id) => env
            .get(&id.ident())
            .cloned()
            .ok_or_else(|| TypecheckError::UnboundIdentifier {
                id: id.clone(),
                pos: id.pos.or(rt.pos),
            }),
        Term::If(data) => type_of_if(state, env, data, rt),
        Term::Proc(data) => type_of_proc(state, env, data, rt),
        Term::App(data) => type_of_app(state, env, &data.rator, &data.rands, rt),
        Term::Let(data) => type_of_let(state, env, data, rt),
        Term::Letrec(data) => type_of_letrec(state, env, data, rt),
        Term::Define(_) => Ok(type_of_define()),
        Term::Program(_) => Err(type_of_program(rt)),
        Term::Quote(_) => Err(unsupported("quote", "quoted literals can't be typed", rt)),
        Term::Set { .. } => Err(unsupported("set!", "assignments can't be typed", rt)),
    }
}

/// Infer the type of a sequence of expressions, which is the type of the last one. Every
/// expression is checked, from left to right, and the first failure is returned. `ctxt` is the
/// expression the sequence is the body of.
pub fn type_of_seq(
    state: &mut State,
    env: &Environment,
    exps: &[RichTerm],
    ctxt: &RichTerm,
) -> Result<UnifType, TypecheckError> {
    let Some((last, init)) = exps.split_last() else {
        return Err(unsupported("empty sequence", "a body can't be empty", ctxt));
    };

    for exp in init {
        type_of(state, env, exp)?;
    }

    type_of(state, env, last)
}

/// Typing rule of `(if test then else)`: the test must be a boolean, and both branches must have
/// the same type, which is the type of the whole expression.
pub fn type_of_if(
    state: &mut State,
    env: &Environment,
    data: &IfData,
    rt: &RichTerm,
) -> Result<UnifType, TypecheckError> {
    let test = type_of(state, env, &data.test);
    let then_branch = type_of(state, env, &data.then_branch);
    let else_branch = type_of(state, env, &data.else_branch);

    check_equal_type(state, Ok(mk_uniftype::bool()), test, rt)?;

    let then_ty = then_branch?;
    check_equal_type(state, Ok(then_ty.clone()), else_branch, rt)?;

    Ok(then_ty)
}

/// Typing rule of `(lambda (params) : ret body)`: the body must have the declared return type in
/// the environment extended with the parameters.
pub fn type_of_proc(
    state: &mut State,
    env: &Environment,
    data: &ProcData,
    rt: &RichTerm,
) -> Result<UnifType, TypecheckError> {
    let params: Vec<UnifType> = data
        .params
        .iter()
        .map(|decl| UnifType::from_type(decl.typ.clone(), state))
        .collect();
    let ret = UnifType::from_type(data.ret.clone(), state);

    let body_env = env.extend(
        data.params
            .iter()
            .map(|decl| decl.id.ident())
            .zip(params.iter().cloned()),
    );
    let body = type_of_seq(state, &body_env, &data.body, rt);

    check_equal_type(state, Ok(ret.clone()), body, rt)?;

    Ok(mk_uniftype::proc(params, ret))
}

/// Typing rule of an application `(rator rands)`. The type of the result is a fresh unification
/// variable, which is solved by unifying the type of the operator with the procedure type built
/// from the types of the operands.
pub fn type_of_app(
    state: &mut State,
    env: &Environment,
    rator: &RichTerm,
    rands: &[RichTerm],
    rt: &RichTerm,
) -> Result<UnifType, TypecheckError> {
    let rator_ty = type_of(state, env, rator)?;

    let rand_results: Vec<_> = rands.iter().map(|rand| type_of(state, env, rand)).collect();
    let rand_tys = collect_all(rand_results, rt)?;

    let ret = state.fresh_var();
    unify(state, rator_ty, mk_uniftype::proc(rand_tys, ret.clone()), rt)?;

    Ok(ret)
}

/// Typing rule of `(let ((var val) ...) body)`: each value is inferred in the outer environment
/// and must have the declared type of its variable. The body is inferred in the environment
/// extended with all the variables.
pub fn type_of_let(
    state: &mut State,
    env: &Environment,
    data: &LetData,
    rt: &RichTerm,
) -> Result<UnifType, TypecheckError> {
    let checks: Vec<_> = data
        .bindings
        .iter()
        .map(|binding| {
            let declared = UnifType::from_type(binding.var.typ.clone(), state);
            let inferred = type_of(state, env, &binding.val);

            check_equal_type(state, Ok(declared.clone()), inferred, &binding.val)
                .map(|()| (binding.var.id.ident(), declared))
        })
        .collect();

    let body_env = env.extend(collect_all(checks, rt)?);

    type_of_seq(state, &body_env, &data.body, rt)
}

/// Typing rule of `(letrec ((var proc) ...) body)`: only procedures can be bound. The signature of
/// each procedure is built from its annotations, and every procedure body is checked in an
/// environment where all the bound variables are in scope with their signature.
///
/// The annotation of the bound variable itself is not taken into account: the signature comes from
/// the procedure.
pub fn type_of_letrec(
    state: &mut State,
    env: &Environment,
    data: &LetData,
    rt: &RichTerm,
) -> Result<UnifType, TypecheckError> {
    let procs = data
        .bindings
        .iter()
        .map(|binding| match binding.val.as_ref() {
            Term::Proc(proc) => Some((binding, proc)),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            unsupported(
                "letrec",
                "letrec only supports the binding of procedures",
                rt,
            )
        })?;

    let signatures: Vec<(Vec<UnifType>, UnifType)> = procs
        .iter()
        .map(|(_, proc)| {
            let params = proc
                .params
                .iter()
                .map(|decl| UnifType::from_type(decl.typ.clone(), state))
                .collect();
            let ret = UnifType::from_type(proc.ret.clone(), state);

            (params, ret)
        })
        .collect();

    let rec_env = env.extend(procs.iter().zip(signatures.iter()).map(
        |((binding, _), (params, ret))| {
            (
                binding.var.id.ident(),
                mk_uniftype::proc(params.iter().cloned(), ret.clone()),
            )
        },
    ));

    let checks: Vec<_> = procs
        .iter()
        .zip(signatures)
        .map(|((binding, proc), (params, ret))| {
            let body_env = rec_env.extend(
                proc.params
                    .iter()
                    .map(|decl| decl.id.ident())
                    .zip(params),
            );
            let body = type_of_seq(state, &body_env, &proc.body, &binding.val);

            check_equal_type(state, Ok(ret), body, &binding.val)
        })
        .collect();

    collect_all(checks, rt)?;

    type_of_seq(state, &rec_env, &data.body, rt)
}

/// Typing rule of `(define var val)`. The value is not checked, and a definition is always of
/// type `void`.
pub fn type_of_define() -> UnifType {
    mk_uniftype::void()
}

/// Typing rule of `(L5 exp ...)`. Whole programs are not supported yet.
pub fn type_of_program(rt: &RichTerm) -> TypecheckError {
    unsupported("program", "typing whole programs is not supported yet", rt)
}

/// Infer the type of a closed expression, and return it with all the bindings of unification
/// variables resolved.
pub fn type_check(rt: &RichTerm) -> Result<Type, TypecheckError> {
    type_check_in_env(rt, &mut State::new(), &Environment::new())
}

/// Infer the type of an expression in a given environment and typechecking state.
pub fn type_check_in_env(
    rt: &RichTerm,
    state: &mut State,
    env: &Environment,
) -> Result<Type, TypecheckError> {
    let uty = type_of(state, env, rt)?;
    Ok(uty.to_type(&state.table))
}

/// Parse and infer the type of an expression given as source code. Return the printed type, or
/// the error message.
pub fn infer_type_of(source: &str) -> Result<String, String> {
    let mut files = Files::new();
    let file_id = files.add("<infer>", String::from(source));

    let rt = parser::parse(file_id, source).map_err(|err| err.to_string())?;

    type_check(&rt)
        .map(|typ| typ.to_string())
        .map_err(|err| err.to_string())
}
