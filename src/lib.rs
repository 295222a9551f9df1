//! A minimal quantifier-instantiation library.
//!
//! SMT solvers decide quantifier-free formulas reliably; quantified ones, much less so. This
//! crate semi-automates proofs of theorems of shape `(quantified premises) => (quantifier-free
//! goal)` by turning the premises into ground formulas the solver can handle:
//!
//! - [`inst::terms`] enumerates candidate ground terms up to some application height;
//! - [`inst::instantiate`] substitutes candidate terms for a premise's bound variables;
//! - [`inst::applications`] finds where recursively defined symbols are applied, so their
//!   defining equations can be unfolded at exactly those arguments ([`inst::unfold_once`]).
//!
//! Asserting the negated goal along with the produced instances and hearing *unsat* back from
//! the solver constitutes a proof. The [`term`] module provides a concrete term representation,
//! and [`check`] runs proof attempts through a z3 process, but the engine in [`inst`] only
//! relies on the capability traits [`inst::Ast`] and [`inst::Fun`] and can back onto any
//! expression layer implementing them.

#![forbid(missing_docs)]

pub extern crate rsmt2;

mod macros;

pub mod prelude;

pub mod check;
pub mod inst;
pub mod term;
