//! Defines the term structure used to represent first-order formulas.
//!
//! Everything here is ground: quantified premises are represented in [`inst`](crate::inst) as a
//! bound-variable tuple paired with a body, where the bound variables are ordinary nullary
//! [`Decl`]s mentioned as leaves of the body. Substituting terms for those leaves is what turns
//! a premise into a ground instance.

crate::prelude!();

use rsmt2::print::{Expr2Smt, Sort2Smt};

#[cfg(test)]
mod test;

pub use crate::{build_sort, build_term as build};

/// A sort.
///
/// User-declared sorts (uninterpreted sorts and algebraic datatypes) are both referred to by
/// name through [`Sort::Usr`]; the engine only ever compares sorts for equality, so the name is
/// the whole identity. Whether such a sort is backed by a datatype is recorded separately, in
/// the [`Datatype`] value handed to the solver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sort {
    /// Bool sort.
    Bool,
    /// Integer sort.
    Int,
    /// Rational sort.
    Rat,
    /// User-declared sort, by name.
    Usr(String),
}
impl Sort {
    /// Creates the bool sort.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::Sort;
    /// let bool_sort = Sort::bool();
    /// assert_eq!(&bool_sort.to_string(), "bool")
    /// ```
    pub fn bool() -> Self {
        Self::Bool
    }
    /// Creates the integer sort.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::Sort;
    /// let int_sort = Sort::int();
    /// assert_eq!(&int_sort.to_string(), "int")
    /// ```
    pub fn int() -> Self {
        Self::Int
    }
    /// Creates the rational sort.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::Sort;
    /// let rat_sort = Sort::rat();
    /// assert_eq!(&rat_sort.to_string(), "rat")
    /// ```
    pub fn rat() -> Self {
        Self::Rat
    }
    /// Creates a user-declared sort.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::Sort;
    /// let grp = Sort::usr("G");
    /// assert_eq!(&grp.to_string(), "G");
    /// assert_eq!(grp, Sort::usr("G"));
    /// assert_ne!(grp, Sort::usr("H"));
    /// ```
    pub fn usr<S: Into<String>>(name: S) -> Self {
        Self::Usr(name.into())
    }

    /// True if the sort is an arithmetic one.
    pub fn is_arith(&self) -> bool {
        match self {
            Self::Bool | Self::Usr(_) => false,
            Self::Int | Self::Rat => true,
        }
    }

    /// SMT-LIB representation of the sort.
    pub fn smt_str(&self) -> &str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Rat => "Real",
            Self::Usr(name) => name,
        }
    }
}
impl Sort2Smt for Sort {
    fn sort_to_smt2<W: Write>(&self, w: &mut W) -> SmtRes<()> {
        write!(w, "{}", self.smt_str())?;
        Ok(())
    }
}

/// Constants.
///
/// Currently only booleans, integers and rationals are supported. Values of user-declared sorts
/// have no literal form; they only exist as (applications of) declared symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cst {
    /// Bool constant.
    B(bool),
    /// Integer constant.
    I(Int),
    /// Rational constant.
    R(Rat),
}
impl Cst {
    /// Creates a boolean constant.
    pub fn bool(b: bool) -> Self {
        Cst::B(b)
    }
    /// Creates an integer constant.
    pub fn int<I: Into<Int>>(i: I) -> Self {
        Cst::I(i.into())
    }
    /// Creates a rational constant.
    pub fn rat<R: Into<Rat>>(r: R) -> Self {
        Cst::R(r.into())
    }

    /// Sort of the constant.
    pub fn sort(&self) -> Sort {
        match self {
            Self::B(_) => Sort::Bool,
            Self::I(_) => Sort::Int,
            Self::R(_) => Sort::Rat,
        }
    }

    /// Rational value of an arithmetic constant, `None` for booleans.
    pub fn to_rat(&self) -> Option<Rat> {
        match self {
            Self::B(_) => None,
            Self::I(i) => Some(Rat::from_integer(i.clone())),
            Self::R(r) => Some(r.clone()),
        }
    }

    /// Parses a constant from an s-expression, as they appear in solver models.
    ///
    /// Handles `true`/`false`, integer literals, decimal literals, and the `(- ...)` and
    /// `(/ ...)` wrappers z3 produces. Anything else, in particular values of user-declared
    /// sorts such as `G!val!0`, yields `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::Cst;
    /// assert_eq!(Cst::of_smt2("true"), Some(Cst::bool(true)));
    /// assert_eq!(Cst::of_smt2("42"), Some(Cst::int(42)));
    /// assert_eq!(Cst::of_smt2("(- 42)"), Some(Cst::int(-42)));
    /// assert_eq!(Cst::of_smt2("G!val!0"), None);
    /// ```
    pub fn of_smt2(s: &str) -> Option<Self> {
        let s = s.trim();
        match s {
            "true" => return Some(Cst::B(true)),
            "false" => return Some(Cst::B(false)),
            _ => (),
        }
        if s.starts_with('(') && s.ends_with(')') {
            let tokens = split_tokens(&s[1..s.len() - 1]);
            return match tokens.as_slice() {
                ["-", arg] => match Cst::of_smt2(arg)? {
                    Cst::B(_) => None,
                    Cst::I(i) => Some(Cst::I(-i)),
                    Cst::R(r) => Some(Cst::R(-r)),
                },
                ["/", num, den] => {
                    let num = Cst::of_smt2(num)?.to_rat()?;
                    let den = Cst::of_smt2(den)?.to_rat()?;
                    if den.is_zero() {
                        None
                    } else {
                        Some(Cst::R(num / den))
                    }
                }
                _ => None,
            };
        }
        if let Some(dot) = s.find('.') {
            let (whole, frac) = (&s[..dot], &s[dot + 1..]);
            if whole.is_empty()
                || !whole.chars().all(|c| c.is_ascii_digit())
                || !frac.chars().all(|c| c.is_ascii_digit())
            {
                return None;
            }
            let mut num: Int = whole.parse().ok()?;
            let mut den = Int::from(1);
            for digit in frac.chars() {
                num = num * Int::from(10) + Int::from((digit as u8 - b'0') as usize);
                den = den * Int::from(10);
            }
            return Some(Cst::R(Rat::new(num, den)));
        }
        s.parse::<Int>().ok().map(Cst::I)
    }
}
impl Expr2Smt<()> for Cst {
    fn expr_to_smt2<W: Write>(&self, w: &mut W, _: ()) -> SmtRes<()> {
        // `Display` already renders SMT-LIB-compatible forms, negative literals included.
        write!(w, "{}", self)?;
        Ok(())
    }
}

/// Splits `s` into its top-level s-expression tokens.
fn split_tokens(s: &str) -> Vec<&str> {
    let mut tokens = vec![];
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (idx, c) in s.char_indices() {
        if c == '(' {
            if start.is_none() {
                start = Some(idx)
            }
            depth += 1
        } else if c == ')' {
            if depth > 0 {
                depth -= 1
            }
            if depth == 0 {
                if let Some(from) = start {
                    tokens.push(&s[from..idx + 1]);
                    start = None
                }
            }
        } else if c.is_whitespace() {
            if depth == 0 {
                if let Some(from) = start {
                    tokens.push(&s[from..idx]);
                    start = None
                }
            }
        } else if start.is_none() {
            start = Some(idx)
        }
    }
    if let Some(from) = start {
        tokens.push(&s[from..])
    }
    tokens
}

/// Operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Op {
    /// If-then-else.
    Ite,
    /// Implication.
    Implies,
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Integer division.
    IDiv,
    /// Modulo.
    Mod,
    /// Greater than or equal to.
    Ge,
    /// Less than or equal to.
    Le,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Equality.
    Eq,
    /// Negation.
    Not,
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}
impl Op {
    /// SMT-LIB string representation.
    pub fn smt_str(self) -> &'static str {
        match self {
            Self::Ite => "ite",
            Self::Implies => "=>",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IDiv => "div",
            Self::Mod => "mod",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "=",
            Self::Not => "not",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// True if `self` is an arithmetic relation.
    pub fn is_arith_relation(self) -> bool {
        match self {
            Self::Ge | Self::Le | Self::Gt | Self::Lt => true,
            Self::Ite
            | Self::Implies
            | Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::IDiv
            | Self::Mod
            | Self::Eq
            | Self::Not
            | Self::And
            | Self::Or => false,
        }
    }

    /// Minimal arity of `self`.
    pub fn min_arity(self) -> usize {
        match self {
            Self::Not | Self::Add | Self::Sub => 1,
            Self::Mod
            | Self::Mul
            | Self::Div
            | Self::IDiv
            | Self::And
            | Self::Or
            | Self::Implies
            | Self::Eq
            | Self::Le
            | Self::Lt
            | Self::Ge
            | Self::Gt => 2,
            Self::Ite => 3,
        }
    }

    /// Maximal arity for `self`, `None` if infinite.
    pub fn max_arity(self) -> Option<usize> {
        match self {
            Self::Not => Some(1),
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::And
            | Self::Or
            | Self::Implies
            | Self::Eq
            | Self::Le
            | Self::Lt
            | Self::Ge
            | Self::Gt => None,
            Self::Mod | Self::Div | Self::IDiv => Some(2),
            Self::Ite => Some(3),
        }
    }

    /// Type-checks an operator application.
    pub fn type_check(self, args: &[Term]) -> Res<Sort> {
        if args.len() < self.min_arity() {
            bail!(
                "`{}` expects at least {} argument(s)",
                self,
                self.min_arity(),
            )
        }
        if let Some(max) = self.max_arity() {
            if args.len() > max {
                bail!("`{}` expects at most {} argument(s)", self, max)
            }
        }

        let sort = match self {
            Self::Ite => {
                let cnd = args[0].sort();
                if cnd != Sort::Bool {
                    bail!("expected first argument of sort `bool`, got `{}`", cnd)
                }

                let thn = args[1].sort();
                let els = args[2].sort();

                if thn != els {
                    bail!(
                        "`{}`'s second and third arguments should have the same sort, got `{}` and `{}`",
                        self, thn, els,
                    )
                }

                thn
            }
            Self::Implies | Self::And | Self::Or | Self::Not => {
                if args.iter().any(|arg| arg.sort() != Sort::Bool) {
                    bail!("`{}`'s arguments must all be boolean formulas", self)
                }
                Sort::Bool
            }

            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::IDiv
            | Self::Mod
            | Self::Le
            | Self::Ge
            | Self::Lt
            | Self::Gt => {
                let mut sorts = args.iter().map(Term::sort);
                let first = sorts.next().expect("at least one argument");
                if !first.is_arith() {
                    bail!(
                        "`{}`'s arguments must have an arithmetic sort, unexpected sort `{}`",
                        self,
                        first,
                    )
                }
                for sort in sorts {
                    if sort != first {
                        bail!(
                            "`{}`'s arguments must all have the same sort, found `{}` and `{}`",
                            self,
                            first,
                            sort,
                        )
                    }
                }
                if (self == Self::IDiv || self == Self::Mod) && first != Sort::Int {
                    bail!(
                        "`{}` can only be applied to integer arguments, found `{}`",
                        self,
                        first,
                    )
                }

                if self == Self::Div {
                    Sort::Rat
                } else if self.is_arith_relation() {
                    Sort::Bool
                } else {
                    first
                }
            }

            Self::Eq => {
                let mut sorts = args.iter().map(Term::sort);
                let first = sorts.next().expect("at least two arguments");
                for sort in sorts {
                    if sort != first {
                        bail!(
                            "`{}`'s arguments must all have the same sort, found `{}` and `{}`",
                            self,
                            first,
                            sort,
                        )
                    }
                }
                Sort::Bool
            }
        };

        Ok(sort)
    }
}
impl Expr2Smt<()> for Op {
    fn expr_to_smt2<W: Write>(&self, w: &mut W, _: ()) -> SmtRes<()> {
        write!(w, "{}", self.smt_str())?;
        Ok(())
    }
}

/// A declared function symbol.
///
/// A symbol has a name, a domain (one sort per argument position) and a range. Nullary symbols
/// double as constants and as the bound "variables" of quantified premises. Equality is
/// structural, so two declarations with the same name and signature are the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decl {
    /// Symbol name.
    name: String,
    /// Domain, one sort per argument.
    dom: Vec<Sort>,
    /// Range sort.
    rng: Sort,
}
impl Decl {
    /// Constructor for nullary symbols (constants).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::{Decl, Sort};
    /// let e = Decl::new_const("e", Sort::usr("G"));
    /// assert_eq!(e.arity(), 0);
    /// assert_eq!(&e.term().to_string(), "e");
    /// ```
    pub fn new_const<S: Into<String>>(name: S, sort: Sort) -> Self {
        Self::new_fun(name, vec![], sort)
    }

    /// Constructor for function symbols.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::{Decl, Sort};
    /// let g = Sort::usr("G");
    /// let mul = Decl::new_fun("mul", vec![g.clone(), g.clone()], g);
    /// assert_eq!(mul.arity(), 2);
    /// ```
    pub fn new_fun<S: Into<String>>(name: S, dom: Vec<Sort>, rng: Sort) -> Self {
        Self {
            name: name.into(),
            dom,
            rng,
        }
    }

    /// Name accessor.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Number of arguments the symbol takes.
    pub fn arity(&self) -> usize {
        self.dom.len()
    }
    /// Domain accessor.
    pub fn dom(&self) -> &[Sort] {
        &self.dom
    }
    /// Sort of the `idx`-th argument.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a legal argument position.
    pub fn domain(&self, idx: usize) -> &Sort {
        &self.dom[idx]
    }
    /// Range accessor.
    pub fn range(&self) -> &Sort {
        &self.rng
    }

    /// Leaf term mentioning a nullary symbol.
    ///
    /// # Panics
    ///
    /// Panics if `self` has non-zero arity.
    pub fn term(&self) -> Term {
        if !self.dom.is_empty() {
            panic!(
                "`{}` has arity {}, cannot use it as a leaf term",
                self.name,
                self.arity()
            )
        }
        Term::App {
            decl: self.clone(),
            args: vec![],
        }
    }

    /// Sort-checked application of the symbol to some arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::{Decl, Sort};
    /// let g = Sort::usr("G");
    /// let e = Decl::new_const("e", g.clone());
    /// let inv = Decl::new_fun("inv", vec![g.clone()], g);
    /// let inv_e = inv.app(vec![e.term()]).unwrap();
    /// assert_eq!(&inv_e.to_string(), "(inv e)");
    /// assert!(inv.app(vec![]).is_err());
    /// ```
    pub fn app(&self, args: Vec<Term>) -> Res<Term> {
        if args.len() != self.arity() {
            bail!(
                "`{}` expects {} argument(s), got {}",
                self.name,
                self.arity(),
                args.len()
            )
        }
        for (idx, arg) in args.iter().enumerate() {
            let found = arg.sort();
            if found != self.dom[idx] {
                bail!(
                    "`{}` expects a `{}` as argument {}, got `{}` of sort `{}`",
                    self.name,
                    self.dom[idx],
                    idx + 1,
                    arg,
                    found,
                )
            }
        }
        Ok(Term::App {
            decl: self.clone(),
            args,
        })
    }
}

/// The term structure.
///
/// A term is a constant literal, an application of a declared symbol ([`Decl`]) to sub-terms, or
/// an application of a built-in operator ([`Op`]) to sub-terms. Leaves are constant literals and
/// nullary-symbol applications. Terms are immutable: every operation producing a term builds a
/// new one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Term {
    /// A constant literal.
    Cst(Cst),
    /// An application of a declared symbol, a leaf if the symbol is nullary.
    App {
        /// The applied symbol.
        decl: Decl,
        /// The arguments.
        args: Vec<Term>,
    },
    /// An application of a built-in operator.
    Op {
        /// The operator.
        op: Op,
        /// The arguments.
        args: Vec<Term>,
    },
}
impl Term {
    /// Constant constructor.
    pub fn new_cst<C: Into<Cst>>(cst: C) -> Self {
        Self::Cst(cst.into())
    }

    /// Operator application constructor, sort-checked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::{Decl, Op, Sort, Term};
    /// let n = Decl::new_const("n", Sort::int());
    /// let pos = Term::new_op(Op::Ge, vec![n.term(), Term::new_cst(0)]).unwrap();
    /// assert_eq!(&pos.to_string(), "(>= n 0)");
    /// let bad = Term::new_op(Op::And, vec![n.term()]);
    /// assert!(bad.is_err());
    /// ```
    pub fn new_op(op: Op, args: Vec<Self>) -> Res<Self> {
        op.type_check(&args)?;
        Ok(Self::Op { op, args })
    }

    /// Equality between two terms.
    pub fn eq(lft: Self, rgt: Self) -> Res<Self> {
        Self::new_op(Op::Eq, vec![lft, rgt])
    }
    /// Implication.
    pub fn implies(lft: Self, rgt: Self) -> Res<Self> {
        Self::new_op(Op::Implies, vec![lft, rgt])
    }
    /// If-then-else.
    pub fn ite(cnd: Self, thn: Self, els: Self) -> Res<Self> {
        Self::new_op(Op::Ite, vec![cnd, thn, els])
    }
    /// Conjunction.
    pub fn and(args: Vec<Self>) -> Res<Self> {
        Self::new_op(Op::And, args)
    }
    /// Disjunction.
    pub fn or(args: Vec<Self>) -> Res<Self> {
        Self::new_op(Op::Or, args)
    }
    /// Negation.
    pub fn not(arg: Self) -> Res<Self> {
        Self::new_op(Op::Not, vec![arg])
    }
    /// Greater than or equal to.
    pub fn ge(lft: Self, rgt: Self) -> Res<Self> {
        Self::new_op(Op::Ge, vec![lft, rgt])
    }
    /// Less than or equal to.
    pub fn le(lft: Self, rgt: Self) -> Res<Self> {
        Self::new_op(Op::Le, vec![lft, rgt])
    }
    /// Greater than.
    pub fn gt(lft: Self, rgt: Self) -> Res<Self> {
        Self::new_op(Op::Gt, vec![lft, rgt])
    }
    /// Less than.
    pub fn lt(lft: Self, rgt: Self) -> Res<Self> {
        Self::new_op(Op::Lt, vec![lft, rgt])
    }

    /// True if `self` is a constant literal.
    pub fn is_cst(&self) -> bool {
        match self {
            Self::Cst(_) => true,
            Self::App { .. } | Self::Op { .. } => false,
        }
    }
    /// True if `self` is a declared-symbol application.
    pub fn is_app(&self) -> bool {
        match self {
            Self::App { .. } => true,
            Self::Cst(_) | Self::Op { .. } => false,
        }
    }
    /// True if `self` has no children.
    pub fn is_leaf(&self) -> bool {
        self.args().is_empty()
    }

    /// Children accessor, empty for leaves.
    pub fn args(&self) -> &[Term] {
        match self {
            Self::Cst(_) => &[],
            Self::App { args, .. } | Self::Op { args, .. } => args,
        }
    }

    /// Declaration identity of a declared-symbol application.
    ///
    /// `None` for constant literals and operator nodes.
    pub fn decl(&self) -> Option<&Decl> {
        match self {
            Self::App { decl, .. } => Some(decl),
            Self::Cst(_) | Self::Op { .. } => None,
        }
    }

    /// Sort of the term.
    ///
    /// # Panics
    ///
    /// Panics if `self` contains an ill-sorted operator application, which only unchecked
    /// construction through the `From` conversions can produce.
    pub fn sort(&self) -> Sort {
        match self {
            Self::Cst(cst) => cst.sort(),
            Self::App { decl, .. } => decl.range().clone(),
            Self::Op { op, args } => match op.type_check(args) {
                Ok(sort) => sort,
                Err(e) => panic!("illegal operator application `{}`: {}", self, e),
            },
        }
    }

    /// Simultaneous structural substitution.
    ///
    /// Every sub-term equal to the first component of a pair is replaced by that pair's second
    /// component. Replacement is top-down and simultaneous: substituted material is not
    /// re-scanned, so swapping bindings such as `[(x, y), (y, x)]` works as expected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use herbrand::term::{Decl, Op, Sort, Term};
    /// let x = Decl::new_const("x", Sort::int());
    /// let y = Decl::new_const("y", Sort::int());
    /// let le = Term::new_op(Op::Le, vec![x.term(), y.term()]).unwrap();
    /// let swapped = le.substitute(&[(x.term(), y.term()), (y.term(), x.term())]);
    /// assert_eq!(&swapped.to_string(), "(<= y x)");
    /// ```
    pub fn substitute(&self, map: &[(Term, Term)]) -> Term {
        debug_assert!(map.iter().all(|(src, tgt)| src.sort() == tgt.sort()));
        for (src, tgt) in map {
            if self == src {
                return tgt.clone();
            }
        }
        match self {
            Self::Cst(_) => self.clone(),
            Self::App { decl, args } => Term::App {
                decl: decl.clone(),
                args: args.iter().map(|arg| arg.substitute(map)).collect(),
            },
            Self::Op { op, args } => Term::Op {
                op: *op,
                args: args.iter().map(|arg| arg.substitute(map)).collect(),
            },
        }
    }

    /// Negation of a reference to a term.
    ///
    /// This is mostly useful in cases when we have a reference to a formula we don't want to
    /// clone, and want to assert the negation.
    pub fn negated(&self) -> NotTerm<'_> {
        self.into()
    }
}

/// Represents the negation of a borrowed term.
///
/// This is mostly useful in cases when we have a reference to a formula we don't want to clone,
/// and want to assert the negation.
///
/// # Examples
///
/// ```rust
/// # use herbrand::term::{Decl, NotTerm, Sort};
/// use herbrand::rsmt2::print::Expr2Smt;
/// let b = Decl::new_const("b", Sort::bool());
/// let c = Decl::new_const("c", Sort::bool());
/// let formula = herbrand::build_term!((and (b) (c)));
///
/// let not_formula: NotTerm = formula.negated();
///
/// let mut buff = vec![];
/// not_formula.expr_to_smt2(&mut buff, ()).unwrap();
/// let s = String::from_utf8_lossy(&buff);
/// assert_eq!(&s, "(not (and b c))")
/// ```
pub struct NotTerm<'a> {
    term: &'a Term,
}
impl<'a> From<&'a Term> for NotTerm<'a> {
    fn from(term: &'a Term) -> Self {
        Self { term }
    }
}
impl<'a> Expr2Smt<()> for NotTerm<'a> {
    fn expr_to_smt2<W: Write>(&self, w: &mut W, _: ()) -> SmtRes<()> {
        write!(w, "(not ")?;
        self.term.expr_to_smt2(w, ())?;
        write!(w, ")")?;
        Ok(())
    }
}

impl Expr2Smt<()> for Term {
    fn expr_to_smt2<W: Write>(&self, w: &mut W, _: ()) -> SmtRes<()> {
        match self {
            Self::Cst(cst) => cst.expr_to_smt2(w, ()),
            Self::App { decl, args } => {
                if args.is_empty() {
                    write!(w, "{}", decl.name())?;
                    return Ok(());
                }
                write!(w, "({}", decl.name())?;
                for arg in args {
                    write!(w, " ")?;
                    arg.expr_to_smt2(w, ())?
                }
                write!(w, ")")?;
                Ok(())
            }
            Self::Op { op, args } => {
                write!(w, "(")?;
                op.expr_to_smt2(w, ())?;
                for arg in args {
                    write!(w, " ")?;
                    arg.expr_to_smt2(w, ())?
                }
                write!(w, ")")?;
                Ok(())
            }
        }
    }
}

/// A constructor of an algebraic datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctor {
    /// Constructor name.
    name: String,
    /// Selector fields, a name and a sort each.
    fields: Vec<(String, Sort)>,
}
impl Ctor {
    /// Constructor.
    ///
    /// Recursive fields refer to the datatype being described through its own [`Sort::usr`]
    /// name, as in `("tail", Sort::usr("List"))`.
    pub fn new<S: Into<String>>(name: S, fields: Vec<(S, Sort)>) -> Self {
        Self {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(field, sort)| (field.into(), sort))
                .collect(),
        }
    }

    /// Name accessor.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Field accessor.
    pub fn fields(&self) -> &[(String, Sort)] {
        &self.fields
    }
}

/// An algebraic datatype description.
///
/// Constructors and selectors are exposed as ordinary [`Decl`]s, so datatype terms go through
/// the same construction and substitution machinery as everything else. The description itself
/// is only consumed by the solver layer when declaring the datatype.
///
/// # Examples
///
/// ```rust
/// # use herbrand::term::{Ctor, Datatype, Sort};
/// let list = Datatype::new(
///     "List",
///     vec![
///         Ctor::new("nil", vec![]),
///         Ctor::new("cons", vec![("head", Sort::int()), ("tail", Sort::usr("List"))]),
///     ],
/// );
/// assert_eq!(list.sort(), Sort::usr("List"));
/// let cons = list.ctor("cons").unwrap();
/// assert_eq!(cons.arity(), 2);
/// let head = list.selector("head").unwrap();
/// assert_eq!(head.range(), &Sort::int());
/// assert_eq!(
///     &list.smt2_decl(),
///     "(declare-datatype List ((nil) (cons (head Int) (tail List))))",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datatype {
    /// Datatype name, also its sort name.
    name: String,
    /// Constructors.
    ctors: Vec<Ctor>,
}
impl Datatype {
    /// Constructor.
    pub fn new<S: Into<String>>(name: S, ctors: Vec<Ctor>) -> Self {
        Self {
            name: name.into(),
            ctors,
        }
    }

    /// Name accessor.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Constructor accessor.
    pub fn ctors(&self) -> &[Ctor] {
        &self.ctors
    }
    /// The sort of this datatype's terms.
    pub fn sort(&self) -> Sort {
        Sort::usr(&self.name)
    }

    /// Declaration for the constructor named `name`.
    pub fn ctor(&self, name: &str) -> Res<Decl> {
        for ctor in &self.ctors {
            if ctor.name == name {
                return Ok(Decl::new_fun(
                    &ctor.name,
                    ctor.fields.iter().map(|(_, sort)| sort.clone()).collect(),
                    self.sort(),
                ));
            }
        }
        bail!("datatype `{}` has no constructor `{}`", self.name, name)
    }

    /// Declaration for the selector named `name`.
    pub fn selector(&self, name: &str) -> Res<Decl> {
        for ctor in &self.ctors {
            for (field, sort) in &ctor.fields {
                if field == name {
                    return Ok(Decl::new_fun(field, vec![self.sort()], sort.clone()));
                }
            }
        }
        bail!("datatype `{}` has no selector `{}`", self.name, name)
    }

    /// The SMT-LIB 2.6 `declare-datatype` command for this datatype.
    pub fn smt2_decl(&self) -> String {
        let mut s = format!("(declare-datatype {} (", self.name);
        for (idx, ctor) in self.ctors.iter().enumerate() {
            if idx > 0 {
                s.push(' ')
            }
            s.push('(');
            s.push_str(&ctor.name);
            for (field, sort) in &ctor.fields {
                s.push_str(&format!(" ({} {})", field, sort.smt_str()))
            }
            s.push(')');
        }
        s.push_str("))");
        s
    }
}

impl inst::Fun for Decl {
    type Sort = Sort;
    fn arity(&self) -> usize {
        self.arity()
    }
    fn domain(&self, idx: usize) -> Sort {
        self.domain(idx).clone()
    }
}

impl inst::Ast for Term {
    type Sort = Sort;
    type Fun = Decl;
    fn sort(&self) -> Sort {
        self.sort()
    }
    fn decl(&self) -> Option<&Decl> {
        self.decl()
    }
    fn args(&self) -> &[Term] {
        self.args()
    }
    fn apply(decl: &Decl, args: Vec<Term>) -> Res<Term> {
        decl.app(args)
    }
    fn substitute(&self, map: &[(Term, Term)]) -> Term {
        self.substitute(map)
    }
}

/// Packs basic trait implementations.
mod trait_impls {
    use super::*;

    impl fmt::Display for Sort {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Self::Bool => write!(fmt, "bool"),
                Self::Int => write!(fmt, "int"),
                Self::Rat => write!(fmt, "rat"),
                Self::Usr(name) => write!(fmt, "{}", name),
            }
        }
    }

    impl fmt::Display for Op {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            write!(fmt, "{}", self.smt_str())
        }
    }

    impl fmt::Display for Cst {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Self::B(b) => b.fmt(fmt),
                Self::I(i) => {
                    if i.sign() == Sign::Minus {
                        write!(fmt, "(- {})", -i)
                    } else {
                        i.fmt(fmt)
                    }
                }
                Self::R(r) => {
                    let (num, den) = (r.numer(), r.denom());
                    match (num.sign(), den.sign()) {
                        (Sign::Minus, Sign::Minus) => write!(fmt, "(/ {} {})", -num, -den),
                        (Sign::Minus, _) => write!(fmt, "(- (/ {} {}))", -num, den),
                        (_, Sign::Minus) => write!(fmt, "(- (/ {} {}))", num, -den),
                        _ => write!(fmt, "(/ {} {})", num, den),
                    }
                }
            }
        }
    }
    impl From<bool> for Cst {
        fn from(b: bool) -> Self {
            Self::B(b)
        }
    }
    impl From<Int> for Cst {
        fn from(i: Int) -> Self {
            Self::I(i)
        }
    }
    impl From<isize> for Cst {
        fn from(n: isize) -> Self {
            Self::I(Int::from(n))
        }
    }
    impl From<Rat> for Cst {
        fn from(r: Rat) -> Self {
            Self::R(r)
        }
    }

    impl fmt::Display for Decl {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            write!(fmt, "{}", self.name())
        }
    }

    impl fmt::Display for Term {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Self::Cst(cst) => cst.fmt(fmt),
                Self::App { decl, args } => {
                    if args.is_empty() {
                        return decl.fmt(fmt);
                    }
                    write!(fmt, "({}", decl)?;
                    for arg in args {
                        write!(fmt, " {}", arg)?
                    }
                    write!(fmt, ")")
                }
                Self::Op { op, args } => {
                    write!(fmt, "({}", op)?;
                    for arg in args {
                        write!(fmt, " {}", arg)?
                    }
                    write!(fmt, ")")
                }
            }
        }
    }
    impl<C> From<C> for Term
    where
        C: Into<Cst>,
    {
        fn from(cst: C) -> Self {
            Self::Cst(cst.into())
        }
    }
    impl From<(Op, Vec<Term>)> for Term {
        fn from((op, args): (Op, Vec<Term>)) -> Self {
            Self::Op { op, args }
        }
    }
    impl From<(Decl, Vec<Term>)> for Term {
        fn from((decl, args): (Decl, Vec<Term>)) -> Self {
            Self::App { decl, args }
        }
    }
}
