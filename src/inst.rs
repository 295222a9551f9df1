//! Quantifier instantiation for SMT-backed proofs.
//!
//! SMT solvers decide quantifier-free problems; quantified premises they handle unevenly at
//! best. The way out is to keep the quantifiers on the caller's side: to prove that some
//! premises entail a goal, assert the *negated* goal along with finitely many ground instances
//! of the premises, and check for unsatisfiability. Unsat means the goal is proven; sat yields
//! a model worth inspecting.
//!
//! This module provides the three ingredients of that workflow, generic over any term structure
//! implementing [`Ast`]:
//!
//! - [`terms`] enumerates candidate instantiation terms of a given sort up to a given height,
//!   starting from seed terms and the relevant leaves of a formula;
//! - [`instantiate`] and [`instantiate_all`] produce ground instances of quantified premises
//!   ([`Quant`]), either from a fixed argument tuple or by broadcasting over a candidate set;
//! - [`applications`] scans a formula for the applications of given function symbols, which
//!   [`unfold_once`] and [`unfold`] use to expand recursive definitions ([`Defs`]) at exactly
//!   the argument tuples a formula mentions.
//!
//! Everything here is pure: functions build sets of formulas and never talk to a solver. The
//! [`check`](crate::check) module takes over from there.

crate::prelude!();


/// A function symbol, as instantiation sees it.
///
/// Arity and argument sorts are all the engine ever asks of a symbol; identity is whatever the
/// implementor's `Ord`/`Eq` say it is.
pub trait Fun {
    /// Sort of the symbol's arguments.
    type Sort;

    /// Number of arguments the symbol takes.
    fn arity(&self) -> usize;
    /// Sort of the `idx`-th argument.
    fn domain(&self, idx: usize) -> Self::Sort;
}

/// A term, as instantiation sees it.
///
/// The engine needs sort access, children access, the identity of the symbol applied at the
/// root (if any), sort-checked application, and simultaneous substitution. `Ord` is required so
/// results can live in ordered sets, `Display` so contract violations can name the offending
/// term.
pub trait Ast: Clone + Ord + fmt::Display {
    /// Sort type.
    type Sort: Clone + PartialEq + fmt::Display;
    /// Function symbol type.
    type Fun: Fun<Sort = Self::Sort> + Clone + Ord + fmt::Display;

    /// Sort of the term.
    fn sort(&self) -> Self::Sort;
    /// Symbol applied at the root, `None` for anything but a symbol application.
    fn decl(&self) -> Option<&Self::Fun>;
    /// Children of the term, empty for leaves.
    fn args(&self) -> &[Self];
    /// Applies a symbol to some arguments.
    fn apply(fun: &Self::Fun, args: Vec<Self>) -> Res<Self>;
    /// Simultaneous structural substitution.
    ///
    /// Every sub-term equal to the first component of a pair is replaced by that pair's second
    /// component; substituted material is not re-scanned.
    fn substitute(&self, map: &[(Self, Self)]) -> Self;
}

/// A universally quantified premise: bound variables paired with a quantifier-free body.
///
/// Bound variables are ordinary leaf terms mentioned by the body, typically nullary declared
/// symbols. Their order matters: fixed-tuple instantiation binds positionally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quant<A> {
    /// Bound variables, leaf terms.
    vars: Vec<A>,
    /// Quantifier-free body.
    body: A,
}
impl<A: Ast> Quant<A> {
    /// Constructor, fails if some variable is not a leaf.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::{inst::Quant, term::{Decl, Sort, Term}};
    /// let x = Decl::new_const("x", Sort::int());
    /// let body = Term::ge(x.term(), x.term()).unwrap();
    /// let quant = Quant::new(vec![x.term()], body).unwrap();
    /// assert_eq!(quant.arity(), 1);
    /// ```
    pub fn new(vars: Vec<A>, body: A) -> Res<Self> {
        for var in &vars {
            if !var.args().is_empty() {
                bail!("illegal quantified variable `{}`, expected a leaf", var)
            }
        }
        Ok(Self { vars, body })
    }

    /// Bound variables.
    pub fn vars(&self) -> &[A] {
        &self.vars
    }
    /// Quantifier-free body.
    pub fn body(&self) -> &A {
        &self.body
    }
    /// Number of bound variables.
    pub fn arity(&self) -> usize {
        self.vars.len()
    }

    /// Binds the variables to `args`, positionally.
    fn bind(&self, args: Vec<A>) -> A {
        debug_assert_eq!(args.len(), self.vars.len());
        let map: Vec<(A, A)> = self.vars.iter().cloned().zip(args.into_iter()).collect();
        self.body.substitute(&map)
    }

    /// Lazy iterator over the instances drawing values from `pool`.
    ///
    /// Yields one instance per combination of pool elements, `k^n` of them for `k` pool
    /// elements and `n` variables, in an unspecified order. Distinct combinations can produce
    /// equal instances, so collecting into a set may yield fewer elements. Sorts are not
    /// checked here; [`instantiate`] checks them eagerly before iterating.
    pub fn instances<'a>(&'a self, pool: &Set<A>) -> Instances<'a, A> {
        Instances {
            quant: self,
            combos: Combinations::new(pool.iter().cloned().collect(), self.arity()),
        }
    }
}

/// Lazy iterator over the instances of a quantified premise, see [`Quant::instances`].
pub struct Instances<'a, A> {
    /// Premise being instantiated.
    quant: &'a Quant<A>,
    /// Argument combinations left to bind.
    combos: Combinations<A>,
}
impl<'a, A: Ast> Iterator for Instances<'a, A> {
    type Item = A;
    fn next(&mut self) -> Option<A> {
        self.combos.next().map(|args| self.quant.bind(args))
    }
}

/// Iterator over all `width`-wide tuples of elements of `pool`.
///
/// Yields `pool.len() ^ width` tuples, rightmost position varying fastest. A zero `width`
/// yields a single empty tuple; an empty pool with a non-zero `width` yields nothing.
struct Combinations<A> {
    pool: Vec<A>,
    /// Odometer over pool indices, `None` once exhausted.
    digits: Option<Vec<usize>>,
}
impl<A: Clone> Combinations<A> {
    fn new(pool: Vec<A>, width: usize) -> Self {
        let digits = if width > 0 && pool.is_empty() {
            None
        } else {
            Some(vec![0; width])
        };
        Self { pool, digits }
    }
}
impl<A: Clone> Iterator for Combinations<A> {
    type Item = Vec<A>;
    fn next(&mut self) -> Option<Vec<A>> {
        let pool = &self.pool;
        let digits = self.digits.as_mut()?;
        let tuple = digits.iter().map(|idx| pool[*idx].clone()).collect();
        let mut done = true;
        for digit in digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.pool.len() {
                done = false;
                break;
            }
            *digit = 0
        }
        if done {
            self.digits = None
        }
        Some(tuple)
    }
}

/// Arguments of an instantiation.
///
/// Either a fixed tuple binding each variable positionally, or a candidate set every variable
/// ranges over. Usually built through the `From` conversions, see [`instantiate`].
pub enum Args<'a, A> {
    /// Fixed argument tuple, one term per quantified variable.
    Tuple(Vec<A>),
    /// Candidate set, every variable ranges over the whole set.
    Set(&'a Set<A>),
}

/// Enumerates candidate instantiation terms of sort `sort`, up to height `height`.
///
/// The height-0 terms are the `seeds` plus every leaf of `formula` of the requested sort,
/// literals included. Terms of height `h + 1` are all the applications of the `funs` to
/// height-`h` terms; each level is built from the immediately preceding level only, and the
/// result is the union of all levels. Duplicate functions are applied once.
///
/// Fails if a seed's sort is not `sort`, or if some function has an argument sort other than
/// `sort`. Functions must also *return* `sort`-sorted terms for the output to make sense as an
/// instantiation pool, but that is the application's business to check, see [`Ast::apply`].
///
/// # Examples
///
/// ```rust
/// # use herbrand::{inst, term::{Decl, Sort, Term}};
/// let g = Sort::usr("G");
/// let e = Decl::new_const("e", g.clone());
/// let a = Decl::new_const("a", g.clone());
/// let inv = Decl::new_fun("inv", vec![g.clone()], g.clone());
/// let goal = Term::eq(inv.app(vec![a.term()]).unwrap(), e.term()).unwrap();
///
/// let pool = inst::terms(&g, &[e.term()], &[inv.clone()], &goal, 1).unwrap();
///
/// // height 0: e (seed), a and (inv a)'s inner leaves from the goal
/// assert!(pool.contains(&e.term()));
/// assert!(pool.contains(&a.term()));
/// // height 1: inv applied to the height-0 terms
/// assert!(pool.contains(&inv.app(vec![a.term()]).unwrap()));
/// assert!(pool.contains(&inv.app(vec![e.term()]).unwrap()));
/// assert_eq!(pool.len(), 4);
/// ```
pub fn terms<A: Ast>(
    sort: &A::Sort,
    seeds: &[A],
    funs: &[A::Fun],
    formula: &A,
    height: usize,
) -> Res<Set<A>> {
    for seed in seeds {
        let found = seed.sort();
        if found != *sort {
            bail!(
                "cannot enumerate terms of sort `{}`: seed `{}` has sort `{}`",
                sort,
                seed,
                found,
            )
        }
    }
    let mut deduped: Vec<&A::Fun> = Vec::with_capacity(funs.len());
    for fun in funs {
        for idx in 0..fun.arity() {
            let found = fun.domain(idx);
            if found != *sort {
                bail!(
                    "cannot enumerate terms of sort `{}`: function `{}` expects a `{}` as argument {}",
                    sort,
                    fun,
                    found,
                    idx + 1,
                )
            }
        }
        if !deduped.contains(&fun) {
            deduped.push(fun)
        }
    }

    let mut res: Set<A> = seeds.iter().cloned().collect();
    let mut stack = vec![formula];
    while let Some(term) = stack.pop() {
        let args = term.args();
        if args.is_empty() {
            if term.sort() == *sort {
                res.insert(term.clone());
            }
        } else {
            for arg in args {
                stack.push(arg)
            }
        }
    }

    let mut prev: Vec<A> = res.iter().cloned().collect();
    for _ in 0..height {
        let mut level = Set::new();
        for fun in &deduped {
            for args in Combinations::new(prev.clone(), fun.arity()) {
                level.insert(A::apply(fun, args)?);
            }
        }
        prev = level.iter().cloned().collect();
        res.extend(level)
    }

    Ok(res)
}

/// Instantiates a quantified premise.
///
/// The arguments are anything convertible to [`Args`]: a `Vec<A>` or `&[A]` for a fixed tuple,
/// a `&Set<A>` for a broadcast.
///
/// - Fixed tuple: the tuple length must equal the number of bound variables and each term's
///   sort must match its variable's sort; the result holds the single corresponding instance.
/// - Broadcast: every variable ranges over the whole set, `k^n` combinations for `k` candidate
///   terms and `n` variables; every element's sort must match every variable's sort. The
///   result can be smaller than `k^n` when distinct combinations produce equal instances.
///
/// A premise with no variables yields its body, untouched, in both shapes.
///
/// # Examples
///
/// ```rust
/// # use herbrand::{inst, term::{Decl, Sort, Term}};
/// let g = Sort::usr("G");
/// let x = Decl::new_const("x", g.clone());
/// let e = Decl::new_const("e", g.clone());
/// let a = Decl::new_const("a", g.clone());
/// let mul = Decl::new_fun("mul", vec![g.clone(), g.clone()], g.clone());
///
/// // mul(x, e) = x, for all x
/// let body = Term::eq(mul.app(vec![x.term(), e.term()]).unwrap(), x.term()).unwrap();
/// let ident = inst::Quant::new(vec![x.term()], body).unwrap();
///
/// let res = inst::instantiate(&ident, vec![a.term()]).unwrap();
/// assert_eq!(res.len(), 1);
/// let inst = res.into_iter().next().unwrap();
/// assert_eq!(&inst.to_string(), "(= (mul a e) a)");
/// ```
pub fn instantiate<'a, A, I>(quant: &Quant<A>, args: I) -> Res<Set<A>>
where
    A: Ast + 'a,
    I: Into<Args<'a, A>>,
{
    let mut res = Set::new();
    match args.into() {
        Args::Tuple(tuple) => {
            if tuple.len() != quant.arity() {
                bail!(
                    "cannot instantiate {} quantified variable(s) with {} term(s)",
                    quant.arity(),
                    tuple.len(),
                )
            }
            for (var, arg) in quant.vars().iter().zip(tuple.iter()) {
                let (expected, found) = (var.sort(), arg.sort());
                if found != expected {
                    bail!(
                        "variable `{}` has sort `{}`, cannot bind `{}` of sort `{}`",
                        var,
                        expected,
                        arg,
                        found,
                    )
                }
            }
            res.insert(quant.bind(tuple));
        }
        Args::Set(set) => {
            for var in quant.vars() {
                let expected = var.sort();
                for term in set.iter() {
                    let found = term.sort();
                    if found != expected {
                        bail!(
                            "variable `{}` has sort `{}`, cannot bind `{}` of sort `{}`",
                            var,
                            expected,
                            term,
                            found,
                        )
                    }
                }
            }
            for inst in quant.instances(set) {
                res.insert(inst);
            }
        }
    }
    Ok(res)
}

/// Instantiates a batch of quantified premises over a candidate set.
///
/// Broadcasts each premise over the whole set with [`instantiate`] and unions the results.
/// Unlike single-premise instantiation, the batch shape only accepts a candidate set: a fixed
/// tuple cannot bind premises of different arities.
pub fn instantiate_all<'a, A, Qs>(quants: Qs, args: &Set<A>) -> Res<Set<A>>
where
    A: Ast + 'a,
    Qs: IntoIterator<Item = &'a Quant<A>>,
{
    let mut res = Set::new();
    for quant in quants {
        res.extend(instantiate(quant, args)?)
    }
    Ok(res)
}

/// Collects the applications of some function symbols inside a formula.
///
/// Maps each queried symbol to the list of argument tuples it is applied to in `formula`, in
/// pre-order (a node before its children, children left to right). Symbols applied nowhere map
/// to an empty list; the same tuple is recorded once per occurrence. The walk descends into the
/// arguments of matched applications, so nested occurrences are all captured. Only proper
/// applications count: a queried nullary symbol mentioned as a leaf records nothing.
///
/// # Examples
///
/// ```rust
/// # use herbrand::{inst, term::{Decl, Sort, Term}};
/// let f = Decl::new_fun("f", vec![Sort::int()], Sort::int());
/// let g = Decl::new_fun("g", vec![Sort::int()], Sort::int());
/// let a = Decl::new_const("a", Sort::int());
/// // f(g(a))
/// let formula = f.app(vec![g.app(vec![a.term()]).unwrap()]).unwrap();
///
/// let apps = inst::applications(&[f.clone(), g.clone()], &formula);
///
/// assert_eq!(apps[&f], vec![vec![g.app(vec![a.term()]).unwrap()]]);
/// assert_eq!(apps[&g], vec![vec![a.term()]]);
/// ```
pub fn applications<A: Ast>(symbols: &[A::Fun], formula: &A) -> Map<A::Fun, Vec<Vec<A>>> {
    let mut map = Map::new();
    for symbol in symbols {
        map.entry(symbol.clone()).or_insert_with(Vec::new);
    }
    let mut stack = vec![formula];
    while let Some(term) = stack.pop() {
        if !term.args().is_empty() {
            if let Some(decl) = term.decl() {
                if let Some(occurrences) = map.get_mut(decl) {
                    occurrences.push(term.args().to_vec())
                }
            }
        }
        for arg in term.args().iter().rev() {
            stack.push(arg)
        }
    }
    map
}

/// A map from function symbols to their defining equations.
///
/// Each definition is a quantified premise whose variables stand for the symbol's arguments,
/// positionally; the typical body is an equation between an application of the symbol to the
/// variables and its expansion. [`unfold_once`] and [`unfold`] expand the definitions at
/// exactly the argument tuples a formula applies them to.
#[derive(Clone)]
pub struct Defs<A: Ast> {
    /// Maps defined symbols to their definitions.
    map: Map<A::Fun, Quant<A>>,
}
impl<A: Ast> Defs<A> {
    /// Empty definition map.
    pub fn new() -> Self {
        Self { map: Map::new() }
    }

    /// Adds a definition, replacing any previous definition of the same symbol.
    ///
    /// Fails if the definition does not bind exactly one variable per argument of `fun`, or if
    /// some variable's sort differs from the corresponding argument sort.
    pub fn insert(&mut self, fun: A::Fun, def: Quant<A>) -> Res<()> {
        if fun.arity() != def.arity() {
            bail!(
                "definition for `{}` binds {} variable(s), expected {}",
                fun,
                def.arity(),
                fun.arity(),
            )
        }
        for (idx, var) in def.vars().iter().enumerate() {
            let (expected, found) = (fun.domain(idx), var.sort());
            if found != expected {
                bail!(
                    "definition for `{}`: variable `{}` has sort `{}`, argument {} expects `{}`",
                    fun,
                    var,
                    found,
                    idx + 1,
                    expected,
                )
            }
        }
        self.map.insert(fun, def);
        Ok(())
    }

    /// Functional extension: a new map holding `self`'s definitions plus `(fun, def)`.
    ///
    /// `self` is left untouched, so several extensions can share a base context.
    pub fn extended(&self, fun: A::Fun, def: Quant<A>) -> Res<Self> {
        let mut res = self.clone();
        res.insert(fun, def)?;
        Ok(res)
    }

    /// Definition of `fun`, if any.
    pub fn get(&self, fun: &A::Fun) -> Option<&Quant<A>> {
        self.map.get(fun)
    }
    /// Defined symbols.
    pub fn funs(&self) -> impl Iterator<Item = &A::Fun> {
        self.map.keys()
    }
    /// Iterator over the definitions.
    pub fn iter(&self) -> impl Iterator<Item = (&A::Fun, &Quant<A>)> {
        self.map.iter()
    }
    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.map.len()
    }
    /// True if no symbol is defined.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Expands recursive definitions at the applications a formula mentions, once.
///
/// Scans `formula` for applications of the symbols defined in `defs`; each occurrence triggers
/// one fixed-tuple instantiation of the symbol's defining equation at that occurrence's
/// arguments. The result is the set of all the instances; the formula itself is not part of it.
pub fn unfold_once<A: Ast>(defs: &Defs<A>, formula: &A) -> Res<Set<A>> {
    let funs: Vec<A::Fun> = defs.funs().cloned().collect();
    let occurrences = applications(&funs, formula);
    let mut res = Set::new();
    for (fun, def) in defs.iter() {
        if let Some(tuples) = occurrences.get(fun) {
            for tuple in tuples {
                res.extend(instantiate(def, tuple.as_slice())?)
            }
        }
    }
    Ok(res)
}

/// Iterated unfolding: expands definitions in a formula and, iteratively, in the produced
/// instances.
///
/// Runs at most `passes` passes of [`unfold_once`]: the first over `formula`, each next one
/// over the instances the previous pass produced that had not been produced before. Stops
/// early when a pass produces nothing new. The result is the union of all passes.
pub fn unfold<A: Ast>(defs: &Defs<A>, formula: &A, passes: usize) -> Res<Set<A>> {
    let mut res = Set::new();
    let mut frontier = vec![formula.clone()];
    for _ in 0..passes {
        let mut fresh = Set::new();
        for form in &frontier {
            for inst in unfold_once(defs, form)? {
                if !res.contains(&inst) {
                    fresh.insert(inst);
                }
            }
        }
        if fresh.is_empty() {
            break;
        }
        frontier = fresh.iter().cloned().collect();
        res.extend(fresh)
    }
    Ok(res)
}

/// Packs basic trait implementations.
mod trait_impls {
    use super::*;

    impl<'a, A> From<Vec<A>> for Args<'a, A> {
        fn from(tuple: Vec<A>) -> Self {
            Self::Tuple(tuple)
        }
    }
    impl<'a, A: Clone> From<&'a [A]> for Args<'a, A> {
        fn from(tuple: &'a [A]) -> Self {
            Self::Tuple(tuple.to_vec())
        }
    }
    impl<'a, A> From<&'a Set<A>> for Args<'a, A> {
        fn from(set: &'a Set<A>) -> Self {
            Self::Set(set)
        }
    }

    impl<A: Ast> Default for Defs<A> {
        fn default() -> Self {
            Self::new()
        }
    }
}
