//! Proves uniqueness of inverse in a group.
//!
//! The signature is a sort `G` with a neutral element `e`, a product `mul` and an inverse `inv`.
//! From the three group axioms, the demo shows that `mul(a, b) = e` forces `b` to be `inv(a)`,
//! twice: once from four hand-picked instantiations, once by broadcasting every axiom over an
//! enumerated pool of ground terms.
//!
//! Requires a `z3` binary in the path. Run with `cargo run --example group`.

use herbrand::prelude::*;

use herbrand::check::{Checker, Outcome};
use herbrand::inst::Quant;
use herbrand::term::{Decl, Sort, Term};

fn run() -> Res<()> {
    // Group signature: the neutral element, two arbitrary elements, product and inverse.
    let g = Sort::usr("G");
    let e = Decl::new_const("e", g.clone());
    let a = Decl::new_const("a", g.clone());
    let b = Decl::new_const("b", g.clone());
    let mul = Decl::new_fun("mul", vec![g.clone(), g.clone()], g.clone());
    let inv = Decl::new_fun("inv", vec![g.clone()], g.clone());

    // Variables bound by the axioms.
    let x = Decl::new_const("x", g.clone());
    let y = Decl::new_const("y", g.clone());
    let z = Decl::new_const("z", g.clone());

    // `mul(x, mul(y, z)) = mul(mul(x, y), z)`
    let assoc = Quant::new(
        vec![x.term(), y.term(), z.term()],
        Term::eq(
            mul.app(vec![x.term(), mul.app(vec![y.term(), z.term()])?])?,
            mul.app(vec![mul.app(vec![x.term(), y.term()])?, z.term()])?,
        )?,
    )?;
    // `mul(x, e) = x` and `mul(e, x) = x`
    let identity = Quant::new(
        vec![x.term()],
        Term::and(vec![
            Term::eq(mul.app(vec![x.term(), e.term()])?, x.term())?,
            Term::eq(mul.app(vec![e.term(), x.term()])?, x.term())?,
        ])?,
    )?;
    // `mul(x, inv(x)) = e` and `mul(inv(x), x) = e`
    let inverse = Quant::new(
        vec![x.term()],
        Term::and(vec![
            Term::eq(mul.app(vec![x.term(), inv.app(vec![x.term()])?])?, e.term())?,
            Term::eq(mul.app(vec![inv.app(vec![x.term()])?, x.term()])?, e.term())?,
        ])?,
    )?;

    // Goal: if `mul(a, b) = e` then `b = inv(a)`.
    let inv_a = inv.app(vec![a.term()])?;
    let goal = Term::implies(
        Term::eq(mul.app(vec![a.term(), b.term()])?, e.term())?,
        Term::eq(b.term(), inv_a.clone())?,
    )?;
    println!("goal: {}", goal);

    // First route, hand-picked instantiations. The term `mul(inv(a), mul(a, b))` rewrites to
    // `inv(a)` through the premise and the identity axiom, and to `b` through associativity and
    // the inverse axiom.
    let mut instances = Set::new();
    instances.extend(inst::instantiate(&inverse, vec![a.term()])?);
    instances.extend(inst::instantiate(
        &assoc,
        vec![inv_a.clone(), a.term(), b.term()],
    )?);
    instances.extend(inst::instantiate(&identity, vec![inv_a])?);
    instances.extend(inst::instantiate(&identity, vec![b.term()])?);

    println!();
    println!(
        "proof attempt from {} hand-picked instance(s)",
        instances.len()
    );
    let outcome = prove(&g, vec![&e, &a, &b, &mul, &inv], &goal, &instances)?;
    report(&outcome);

    // Second route, enumerate ground terms up to height 1 and broadcast every axiom over the
    // whole pool.
    let pool = inst::terms(&g, &[e.term()], &[mul.clone(), inv.clone()], &goal, 1)?;
    let instances = inst::instantiate_all(&[assoc, identity, inverse], &pool)?;

    println!();
    println!(
        "proof attempt from {} instance(s) over {} enumerated term(s)",
        instances.len(),
        pool.len()
    );
    let outcome = prove(&g, vec![&e, &a, &b, &mul, &inv], &goal, &instances)?;
    report(&outcome);

    Ok(())
}

/// Runs one proof attempt in a fresh solver session.
fn prove(sort: &Sort, decls: Vec<&Decl>, goal: &Term, instances: &Set<Term>) -> Res<Outcome> {
    let mut checker = Checker::new("z3", None::<&str>)?;
    checker.declare_sort(sort)?;
    checker.declare_all(decls)?;
    checker.prove(goal, instances)
}

/// Prints an outcome, with the model when the goal is unproven.
fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Proved => println!("goal proved"),
        Outcome::Unproven(cex) => {
            println!("goal not proven, the instances allow:");
            println!("{}", cex)
        }
        outcome => println!("solver gave up ({})", outcome),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        for e in e.iter().skip(1) {
            eprintln!("- {}", e)
        }
        std::process::exit(2)
    }
}
