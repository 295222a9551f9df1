//! Sortedness of an insertion function over integer lists.
//!
//! Works over an algebraic datatype `List = nil | cons(head: Int, tail: List)` and recursively
//! defined symbols: `sortedls` holds on sorted lists, `insertls` inserts a key in front of the
//! first element greater than or equal to it, and `sort_while_append` inserts a whole list
//! element by element. Unfolding the definitions at their occurrences proves goals 1 and 3
//! outright; goal 2 is not provable this way and yields a model; goal 4 additionally needs
//! goal 2's statement as a lemma.
//!
//! Requires a `z3` binary in the path. Run with `cargo run --example lists`.

use herbrand::prelude::*;

use herbrand::check::{Checker, Outcome};
use herbrand::inst::{Defs, Quant};
use herbrand::term::{Ctor, Datatype, Decl, Sort, Term};

fn run() -> Res<()> {
    // The datatype and the recursively defined symbols over it.
    let list = Datatype::new(
        "List",
        vec![
            Ctor::new("nil", vec![]),
            Ctor::new("cons", vec![("head", Sort::int()), ("tail", Sort::usr("List"))]),
        ],
    );
    let nil = list.ctor("nil")?;
    let cons = list.ctor("cons")?;
    let head = list.selector("head")?;
    let tail = list.selector("tail")?;
    let sortedls = Decl::new_fun("sortedls", vec![list.sort()], Sort::bool());
    let insertls = Decl::new_fun("insertls", vec![list.sort(), Sort::int()], list.sort());

    // Variables for the definitions and the goals.
    let x = Decl::new_const("x", list.sort());
    let y = Decl::new_const("y", list.sort());
    let l = Decl::new_const("l", list.sort());
    let k = Decl::new_const("k", Sort::int());
    let n = Decl::new_const("n", Sort::int());

    // `sortedls(x)` is true when `x` has less than two elements, or when its first two elements
    // are ordered and its tail is itself sorted.
    let tail_x = tail.app(vec![x.term()])?;
    let head_x = head.app(vec![x.term()])?;
    let sorted_def = Quant::new(
        vec![x.term()],
        Term::eq(
            sortedls.app(vec![x.term()])?,
            Term::ite(
                Term::eq(x.term(), nil.term())?,
                Term::new_cst(true),
                Term::ite(
                    Term::eq(tail_x.clone(), nil.term())?,
                    Term::new_cst(true),
                    Term::and(vec![
                        Term::le(head_x.clone(), head.app(vec![tail_x.clone()])?)?,
                        sortedls.app(vec![tail_x.clone()])?,
                    ])?,
                )?,
            )?,
        )?,
    )?;
    // `insertls(x, k)` puts `k` in front of the first element that is at least `k`.
    let insert_def = Quant::new(
        vec![x.term(), k.term()],
        Term::eq(
            insertls.app(vec![x.term(), k.term()])?,
            Term::ite(
                Term::eq(x.term(), nil.term())?,
                cons.app(vec![k.term(), nil.term()])?,
                Term::ite(
                    Term::ge(head_x.clone(), k.term())?,
                    cons.app(vec![k.term(), x.term()])?,
                    cons.app(vec![head_x, insertls.app(vec![tail_x, k.term()])?])?,
                )?,
            )?,
        )?,
    )?;

    let mut defs = Defs::new();
    defs.insert(sortedls.clone(), sorted_def)?;
    defs.insert(insertls.clone(), insert_def)?;

    // Goal 1: inserting any key into the empty list yields a sorted list.
    let goal = sortedls.app(vec![insertls.app(vec![nil.term(), n.term()])?])?;
    println!("goal 1: {}", goal);
    let instances = inst::unfold_once(&defs, &goal)?;
    let outcome = prove(&list, vec![&sortedls, &insertls, &n], &goal, &instances)?;
    report(&outcome);

    // `thm(lst, val)`: inserting `val` into a sorted `lst` keeps it sorted.
    let thm = |lst: Term, val: Term| -> Res<Term> {
        Term::implies(
            sortedls.app(vec![lst.clone()])?,
            sortedls.app(vec![insertls.app(vec![lst, val])?])?,
        )
    };

    // Goal 2: the statement itself. Unfolding alone cannot prove it, the solver reports a model
    // instead.
    let goal = thm(l.term(), k.term())?;
    println!();
    println!("goal 2: {}", goal);
    let instances = inst::unfold_once(&defs, &goal)?;
    let outcome = prove(&list, vec![&sortedls, &insertls, &l, &k], &goal, &instances)?;
    report(&outcome);

    // Goal 3: same statement, this time assuming it as a contract on the tail of `l`.
    let contract = Term::implies(
        Term::not(Term::eq(l.term(), nil.term())?)?,
        thm(tail.app(vec![l.term()])?, k.term())?,
    )?;
    let goal = Term::implies(contract, thm(l.term(), k.term())?)?;
    println!();
    println!("goal 3: {}", goal);
    let instances = inst::unfold_once(&defs, &goal)?;
    let outcome = prove(&list, vec![&sortedls, &insertls, &l, &k], &goal, &instances)?;
    report(&outcome);

    // `sort_while_append(x, y)` inserts the elements of `y` one by one into `x`.
    let swa = Decl::new_fun(
        "sort_while_append",
        vec![list.sort(), list.sort()],
        list.sort(),
    );
    let swa_def = Quant::new(
        vec![x.term(), y.term()],
        Term::eq(
            swa.app(vec![x.term(), y.term()])?,
            Term::ite(
                Term::eq(y.term(), nil.term())?,
                x.term(),
                swa.app(vec![
                    insertls.app(vec![x.term(), head.app(vec![y.term()])?])?,
                    tail.app(vec![y.term()])?,
                ])?,
            )?,
        )?,
    )?;
    let defs = defs.extended(swa.clone(), swa_def)?;

    // `thm2(lst1, lst2)`: appending `lst2` to a sorted `lst1` this way keeps it sorted.
    let thm2 = |lst1: Term, lst2: Term| -> Res<Term> {
        Term::implies(
            sortedls.app(vec![lst1.clone()])?,
            sortedls.app(vec![swa.app(vec![lst1, lst2])?])?,
        )
    };

    // Goal 4: the contract form of `thm2`. Unfolding is not enough, the step where `insertls`
    // grows the accumulator needs goal 2's statement as a lemma, instantiated right there.
    let head_y = head.app(vec![y.term()])?;
    let contract = Term::implies(
        Term::not(Term::eq(y.term(), nil.term())?)?,
        thm2(
            insertls.app(vec![x.term(), head_y.clone()])?,
            tail.app(vec![y.term()])?,
        )?,
    )?;
    let goal = Term::implies(contract, thm2(x.term(), y.term())?)?;
    println!();
    println!("goal 4: {}", goal);

    let lemma = Quant::new(vec![x.term(), k.term()], thm(x.term(), k.term())?)?;
    let mut instances = inst::unfold_once(&defs, &goal)?;
    instances.extend(inst::instantiate(&lemma, vec![x.term(), head_y])?);
    let outcome = prove(&list, vec![&sortedls, &insertls, &swa, &x, &y], &goal, &instances)?;
    report(&outcome);

    Ok(())
}

/// Runs one proof attempt in a fresh solver session.
fn prove(list: &Datatype, decls: Vec<&Decl>, goal: &Term, instances: &Set<Term>) -> Res<Outcome> {
    let mut checker = Checker::new("z3", None::<&str>)?;
    checker.declare_datatype(list)?;
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
