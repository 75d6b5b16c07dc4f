//! Types unification.
//!
//! Unification variables live in a [UnifTable]. A variable is either unbound, or bound exactly
//! once to a type, which may itself be another variable. Bindings are only ever created by the
//! unifier after a successful occurs check, which keeps the graph of bindings acyclic.
//!
//! # Transactions
//!
//! A failed unification must leave the table as it found it, including the bindings made by the
//! successful sub-unifications of a list of types. The table thus records every binding made while
//! a [Snapshot] is open in a trail, which is used to undo them on failure. The public entry points
//! [unify] and [unify_all] open a snapshot and either commit it or roll back to it.
use super::*;

/// Unification variable unique identifier.
pub type VarId = usize;

/// An element of the unification table. Contains the potential type this variable points to (or
/// `None` if the variable hasn't been unified with something yet), and the name of the variable,
/// if it comes from a type annotation.
pub struct UnifSlot<Ty> {
    value: Option<Ty>,
    name: Option<Ident>,
}

impl<Ty> UnifSlot<Ty> {
    pub fn new(name: Option<Ident>) -> Self {
        UnifSlot { value: None, name }
    }
}

/// A point in the history of the unification table that can be rolled back to.
#[must_use]
#[derive(Debug)]
pub struct Snapshot {
    trail_len: usize,
}

/// The unification table.
///
/// Map each unification variable to either another type variable or a concrete type it has been
/// unified with. Each binding `(ty, var)` in this map should be thought of an edge in a
/// unification graph.
///
/// The unification table is a relatively low-level data structure, whose consumer has to ensure
/// specific invariants. It is used by the `unify` function and its variants, but you should avoid
/// using it directly, unless you know what you're doing.
#[derive(Default)]
pub struct UnifTable {
    types: Vec<UnifSlot<UnifType>>,
    /// The variables bound since the oldest open snapshot, in order.
    trail: Vec<VarId>,
    open_snapshots: usize,
}

impl UnifTable {
    pub fn new() -> Self {
        UnifTable::default()
    }

    /// Assign a type to a type unification variable.
    ///
    /// # Preconditions
    ///
    /// - The variable must be unbound: a variable is bound at most once.
    /// - The occurs check of `var` against `uty` must have succeeded. This is the responsibility
    ///   of the caller.
    pub(crate) fn assign_type(&mut self, var: VarId, uty: UnifType) {
        debug_assert!(self.types[var].value.is_none());

        log::debug!("binding {} to {uty:?}", self.var_name(var));
        self.types[var].value = Some(uty);

        if self.open_snapshots > 0 {
            self.trail.push(var);
        }
    }

    /// Retrieve the current assignment of a type unification variable.
    pub fn get_type(&self, var: VarId) -> Option<&UnifType> {
        self.types[var].value.as_ref()
    }

    /// Is the variable bound?
    pub fn is_bound(&self, var: VarId) -> bool {
        self.get_type(var).is_some()
    }

    /// The number of variables allocated in the table.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The name of a variable, as printed in types. Variables coming from annotations keep their
    /// name, while fresh variables are named after their id.
    pub fn var_name(&self, var: VarId) -> Ident {
        self.types[var]
            .name
            .clone()
            .unwrap_or_else(|| Ident::from(format!("T_{var}")))
    }

    /// Create a fresh type unification variable identifier and allocate a corresponding slot in
    /// the table.
    pub fn fresh_type_var_id(&mut self, name: Option<Ident>) -> VarId {
        let next = self.types.len();
        self.types.push(UnifSlot::new(name));
        next
    }

    /// Create a fresh, anonymous, type unification variable and allocate a corresponding slot in
    /// the table.
    pub fn fresh_type_uvar(&mut self) -> UnifType {
        UnifType::UnifVar(self.fresh_type_var_id(None))
    }

    /// Follow the links in the unification table to find the representative of the equivalence
    /// class of the type unification variable `x`.
    ///
    /// This corresponds to the find in union-find.
    pub fn root_type(&self, var_id: VarId) -> UnifType {
        match self.types[var_id].value.as_ref() {
            None => UnifType::UnifVar(var_id),
            Some(UnifType::UnifVar(id)) => self.root_type(*id),
            Some(ty) => ty.clone(),
        }
    }

    /// Start recording the bindings made from now on.
    pub fn snapshot(&mut self) -> Snapshot {
        self.open_snapshots += 1;

        Snapshot {
            trail_len: self.trail.len(),
        }
    }

    /// Keep the bindings made since the snapshot.
    pub fn commit(&mut self, snapshot: Snapshot) {
        debug_assert!(self.open_snapshots > 0);
        debug_assert!(snapshot.trail_len <= self.trail.len());

        self.open_snapshots -= 1;

        if self.open_snapshots == 0 {
            self.trail.clear();
        }
    }

    /// Undo every binding made since the snapshot.
    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        debug_assert!(self.open_snapshots > 0);

        let undone: Vec<VarId> = self.trail.drain(snapshot.trail_len..).collect();

        for var in undone {
            log::debug!("rolling back the binding of {}", self.var_name(var));
            self.types[var].value = None;
        }

        self.open_snapshots -= 1;
    }
}

/// Check that `var` doesn't occur in `uty`. Bound variables are checked through their binding.
///
/// Fail with [UnifError::OccursCheck] if it does, and with [UnifError::BadTypeExpression] if `uty`
/// contains a named type variable or a wildcard, which should have been converted to unification
/// variables beforehand.
pub fn occurs_check(table: &UnifTable, var: VarId, uty: &UnifType) -> Result<(), UnifError> {
    fn check(
        table: &UnifTable,
        var: VarId,
        uty: &UnifType,
        whole: &UnifType,
    ) -> Result<(), UnifError> {
        match uty {
            UnifType::UnifVar(id) if *id == var => Err(UnifError::OccursCheck {
                var,
                typ: whole.clone(),
            }),
            UnifType::UnifVar(id) => match table.get_type(*id) {
                Some(bound) => check(table, var, bound, whole),
                None => Ok(()),
            },
            UnifType::Concrete(TypeF::Atomic(_)) => Ok(()),
            UnifType::Concrete(TypeF::Proc { params, ret }) => {
                for param in params {
                    check(table, var, param, whole)?;
                }

                check(table, var, ret, whole)
            }
            UnifType::Concrete(TypeF::Var(_) | TypeF::Wildcard) => {
                Err(UnifError::BadTypeExpression(uty.clone()))
            }
        }
    }

    check(table, var, uty, uty)
}

/// Resolve the variable `var` against `target`.
///
/// If `var` is bound, its binding is unified with `target`. Otherwise, `var` is bound to `target`
/// after the occurs check, unless `target` is (or is bound to) `var` itself, in which case there is
/// nothing to do.
pub fn resolve_var(table: &mut UnifTable, var: VarId, target: UnifType) -> Result<(), UnifError> {
    if let Some(bound) = table.get_type(var).cloned() {
        return unify_types(table, bound, target);
    }

    let target = target.into_root(table);

    if matches!(target, UnifType::UnifVar(id) if id == var) {
        return Ok(());
    }

    occurs_check(table, var, &target)?;
    table.assign_type(var, target);

    Ok(())
}

/// Try to unify two types. On failure, the bindings made by the call are *not* undone: this is
/// the responsibility of the transactional entry points [unify] and [unify_all].
pub fn unify_types(table: &mut UnifTable, t1: UnifType, t2: UnifType) -> Result<(), UnifError> {
    let t1 = t1.into_root(table);
    let t2 = t2.into_root(table);

    match (t1, t2) {
        (UnifType::UnifVar(id1), UnifType::UnifVar(id2)) if id1 == id2 => Ok(()),
        (UnifType::UnifVar(id), uty) | (uty, UnifType::UnifVar(id)) => resolve_var(table, id, uty),
        (UnifType::Concrete(TypeF::Atomic(a1)), UnifType::Concrete(TypeF::Atomic(a2))) => {
            if a1 == a2 {
                Ok(())
            } else {
                Err(UnifError::TypeMismatch {
                    expected: UnifType::from(a1),
                    inferred: UnifType::from(a2),
                })
            }
        }
        (
            UnifType::Concrete(TypeF::Proc {
                params: params1,
                ret: ret1,
            }),
            UnifType::Concrete(TypeF::Proc {
                params: params2,
                ret: ret2,
            }),
        ) => {
            if params1.len() != params2.len() {
                return Err(UnifError::ArityMismatch {
                    expected_arity: params1.len(),
                    inferred_arity: params2.len(),
                    types: Some((
                        UnifType::concrete(TypeF::Proc {
                            params: params1,
                            ret: ret1,
                        }),
                        UnifType::concrete(TypeF::Proc {
                            params: params2,
                            ret: ret2,
                        }),
                    )),
                });
            }

            let lhs = params1.into_iter().chain(std::iter::once(ret1));
            let rhs = params2.into_iter().chain(std::iter::once(ret2));

            unify_all_types(
                table,
                lhs.map(|ty| *ty).collect(),
                rhs.map(|ty| *ty).collect(),
            )
        }
        (t1, t2) => Err(UnifError::TypeMismatch {
            expected: t1,
            inferred: t2,
        }),
    }
}

/// Unify two lists of types pairwise. Doesn't short-circuit: every pair is unified, and all the
/// failures are reported together in a [UnifError::Multiple].
pub fn unify_all_types(
    table: &mut UnifTable,
    tys1: Vec<UnifType>,
    tys2: Vec<UnifType>,
) -> Result<(), UnifError> {
    if tys1.len() != tys2.len() {
        return Err(UnifError::ArityMismatch {
            expected_arity: tys1.len(),
            inferred_arity: tys2.len(),
            types: None,
        });
    }

    let errors: Vec<UnifError> = tys1
        .into_iter()
        .zip(tys2)
        .filter_map(|(t1, t2)| unify_types(table, t1, t2).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(UnifError::Multiple(errors))
    }
}

/// Run a unification as a transaction: if it fails, the error is converted to a typechecking error
/// and every binding made in the meantime is undone.
fn transaction<F>(table: &mut UnifTable, ctxt: &RichTerm, f: F) -> Result<(), TypecheckError>
where
    F: FnOnce(&mut UnifTable) -> Result<(), UnifError>,
{
    let snapshot = table.snapshot();

    match f(table) {
        Ok(()) => {
            table.commit(snapshot);
            Ok(())
        }
        Err(err) => {
            let err = err.into_typecheck_err(table, ctxt);
            table.rollback_to(snapshot);
            Err(err)
        }
    }
}

/// Unify two types, binding free unification variables as needed. `ctxt` is the expression being
/// checked, and is only used to report errors.
///
/// Either all the bindings needed to make the two types equal are made, or none is and an error
/// is returned.
pub fn unify(
    state: &mut State,
    t1: UnifType,
    t2: UnifType,
    ctxt: &RichTerm,
) -> Result<(), TypecheckError> {
    transaction(&mut state.table, ctxt, |table| unify_types(table, t1, t2))
}

/// Unify two lists of types of the same length pairwise, reporting every failure at once. Lists of
/// different lengths are rejected with an arity error.
pub fn unify_all(
    state: &mut State,
    tys1: Vec<UnifType>,
    tys2: Vec<UnifType>,
    ctxt: &RichTerm,
) -> Result<(), TypecheckError> {
    transaction(&mut state.table, ctxt, |table| {
        unify_all_types(table, tys1, tys2)
    })
}

/// Variant of [unify] on the results of type inference: errors of the inputs are propagated as is,
/// without being unified. The error of `t1` takes precedence.
pub fn check_equal_type(
    state: &mut State,
    t1: Result<UnifType, TypecheckError>,
    t2: Result<UnifType, TypecheckError>,
    ctxt: &RichTerm,
) -> Result<(), TypecheckError> {
    unify(state, t1?, t2?, ctxt)
}
