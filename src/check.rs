//! Types and helpers to run proof attempts through a solver.
//!
//! A [Checker] wraps a Z3 session. Callers declare the sorts, datatypes and symbols their terms
//! mention, then call [Checker::prove] with a goal and the ground instances supporting it. The
//! checker asserts the negation of the goal along with the instances: an unsat answer means the
//! instances entail the goal, a sat answer yields a model describing how the attempt fails.
//!
//! Each checker owns one solver session and its assertions accumulate. Use a fresh checker for
//! each independent goal.
//!
//! [Checker]: struct.Checker.html
//! [Checker::prove]: struct.Checker.html#method.prove

crate::prelude!();

use rsmt2::SmtConf;

use term::{Datatype, Decl, Sort, Term};

pub mod cexs;

pub use cexs::{Cex, SmtParser, Solver};


/// Outcome of a proof attempt.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The instances entail the goal.
    Proved,
    /// The goal does not follow from the instances, comes with a model falsifying it.
    Unproven(Cex),
    /// The solver timed out.
    Timeout,
    /// The solver gave up.
    Unknown,
}
impl Outcome {
    /// True if the goal was proved.
    pub fn is_proved(&self) -> bool {
        match self {
            Self::Proved => true,
            Self::Unproven(_) | Self::Timeout | Self::Unknown => false,
        }
    }

    /// Model accessor, for unproven outcomes.
    pub fn cex(&self) -> Option<&Cex> {
        match self {
            Self::Unproven(cex) => Some(cex),
            Self::Proved | Self::Timeout | Self::Unknown => None,
        }
    }
}

/// A solver session for proving goals from ground instances.
pub struct Checker {
    /// Underlying SMT solver.
    solver: Solver,
}
impl Checker {
    /// Constructor.
    ///
    /// The `z3_cmd` is whitespace-split, the first token is the command and the rest are passed
    /// as options. If `tee` is set, everything sent to the solver is also written to the file at
    /// that path.
    pub fn new(z3_cmd: impl Into<String>, tee: Option<impl AsRef<str>>) -> Res<Self> {
        let z3_cmd = z3_cmd.into();
        let mut split_cmd = z3_cmd.split(|c: char| c.is_whitespace());
        let z3_cmd = split_cmd
            .next()
            .ok_or_else(|| format!("illegal Z3 command `{}`", z3_cmd))?
            .trim();
        let mut conf = SmtConf::z3(z3_cmd);

        for opt in split_cmd {
            let opt = opt.trim();
            if !opt.is_empty() {
                conf.option(opt);
            }
        }

        let mut solver = conf
            .spawn(cexs::SmtParser)
            .chain_err(|| "while spawning z3 solver")?;
        if let Some(path) = tee {
            solver.path_tee(path.as_ref())?
        }
        Ok(Self { solver })
    }

    /// Sends a raw command to the solver.
    ///
    /// Covers the commands rsmt2 has no primitive for, sort and datatype declarations here. The
    /// answer is not read back, only commands that produce none can go through this.
    fn raw(&mut self, cmd: impl AsRef<str>) -> Res<()> {
        writeln!(self.solver, "{}", cmd.as_ref())?;
        self.solver.flush()?;
        Ok(())
    }

    /// Declares an uninterpreted sort.
    ///
    /// Fails on built-in sorts, which must not be declared.
    pub fn declare_sort(&mut self, sort: &Sort) -> Res<()> {
        if let Sort::Usr(name) = sort {
            self.raw(format!("(declare-sort {} 0)", name))
                .chain_err(|| format!("while declaring sort `{}`", sort))
        } else {
            bail!("cannot declare built-in sort `{}`", sort)
        }
    }

    /// Declares an algebraic datatype.
    pub fn declare_datatype(&mut self, dtyp: &Datatype) -> Res<()> {
        self.raw(dtyp.smt2_decl())
            .chain_err(|| format!("while declaring datatype `{}`", dtyp.name()))
    }

    /// Declares a constant or function symbol.
    pub fn declare(&mut self, decl: &Decl) -> Res<()> {
        if decl.arity() == 0 {
            self.solver
                .declare_const(decl.name(), decl.range())
                .chain_err(|| format!("while declaring constant `{}`", decl))?
        } else {
            self.solver
                .declare_fun(decl.name(), decl.dom(), decl.range())
                .chain_err(|| format!("while declaring function `{}`", decl))?
        }
        Ok(())
    }

    /// Declares a sequence of symbols.
    pub fn declare_all<'a>(&mut self, decls: impl IntoIterator<Item = &'a Decl>) -> Res<()> {
        for decl in decls {
            self.declare(decl)?
        }
        Ok(())
    }

    /// Asserts a boolean term.
    pub fn assert(&mut self, term: &Term) -> Res<()> {
        if term.sort() != Sort::Bool {
            bail!("cannot assert term `{}` of sort `{}`", term, term.sort())
        }
        self.solver
            .assert(term)
            .chain_err(|| format!("while asserting `{}`", term))?;
        Ok(())
    }

    /// Asserts a sequence of boolean terms.
    pub fn assert_all<'a>(&mut self, terms: impl IntoIterator<Item = &'a Term>) -> Res<()> {
        for term in terms {
            self.assert(term)?
        }
        Ok(())
    }

    /// Asserts the negation of a boolean term.
    pub fn assert_negation(&mut self, term: &Term) -> Res<()> {
        if term.sort() != Sort::Bool {
            bail!("cannot assert term `{}` of sort `{}`", term, term.sort())
        }
        self.solver
            .assert(&term.negated())
            .chain_err(|| format!("while asserting the negation of `{}`", term))?;
        Ok(())
    }

    /// Checks satisfiability of the current assertions.
    pub fn check_sat(&mut self) -> Res<bool> {
        let res = self.solver.check_sat()?;
        Ok(res)
    }

    /// Runs a proof attempt for a goal.
    ///
    /// Asserts the negation of `goal` along with all the `instances`, and checks satisfiability.
    /// Every sort and symbol the goal and instances mention must have been declared beforehand.
    pub fn prove<'a>(
        &mut self,
        goal: &Term,
        instances: impl IntoIterator<Item = &'a Term>,
    ) -> Res<Outcome> {
        self.solver
            .comment(&format!("Negation of goal `{}`.", goal))?;
        self.assert_negation(goal)?;
        self.solver.comment("Ground instances.")?;
        self.assert_all(instances)?;

        match self.solver.check_sat() {
            Ok(false) => Ok(Outcome::Proved),
            Ok(true) => {
                let mut cex = Cex::new();
                cex.populate(&mut self.solver)
                    .chain_err(|| format!("while retrieving a model falsifying `{}`", goal))?;
                Ok(Outcome::Unproven(cex))
            }
            Err(e) => {
                use rsmt2::errors::ErrorKind as EK;
                match e.kind() {
                    EK::Unknown => Ok(Outcome::Unknown),
                    EK::Timeout => Ok(Outcome::Timeout),
                    _ => return Err(e.into()),
                }
            }
        }
    }
}

/// Packs basic trait implementations.
mod trait_impls {
    use super::*;

    impl fmt::Display for Outcome {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Self::Proved => write!(fmt, "proved"),
                Self::Unproven(_) => write!(fmt, "unproven"),
                Self::Timeout => write!(fmt, "timeout"),
                Self::Unknown => write!(fmt, "unknown"),
            }
        }
    }

    impl Deref for Checker {
        type Target = Solver;
        fn deref(&self) -> &Solver {
            &self.solver
        }
    }
    impl DerefMut for Checker {
        fn deref_mut(&mut self) -> &mut Solver {
            &mut self.solver
        }
    }
}
