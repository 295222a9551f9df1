//! Tests over terms.

crate::prelude!();

use rsmt2::print::Expr2Smt;

use term::{Cst, Ctor, Datatype, Decl, Op, Sort, Term};

/// Declarations for a group signature, used by most tests below.
fn group_sig() -> (Decl, Decl, Decl, Decl, Decl) {
    let g = Sort::usr("G");
    let e = Decl::new_const("e", g.clone());
    let a = Decl::new_const("a", g.clone());
    let b = Decl::new_const("b", g.clone());
    let mul = Decl::new_fun("mul", vec![g.clone(), g.clone()], g.clone());
    let inv = Decl::new_fun("inv", vec![g.clone()], g);
    (e, a, b, mul, inv)
}

#[test]
fn typing_implies() {
    let p = Decl::new_const("p", Sort::bool());
    let q = Decl::new_const("q", Sort::bool());
    let lft = build_term!((p));
    let rgt = build_term!((q));

    let sort = Op::Implies.type_check(&[lft, rgt]).unwrap();

    assert_eq!(sort, Sort::Bool);
}

#[test]
fn typing_ite() {
    let p = Decl::new_const("p", Sort::bool());
    let n_1 = Decl::new_const("n_1", Sort::int());
    let n_2 = Decl::new_const("n_2", Sort::int());

    let cnd = build_term!((p));
    let thn = build_term!((+ (n_1) 2));
    let els = build_term!((- (n_2) 10));

    let sort = Op::Ite.type_check(&[cnd, thn, els]).unwrap();

    assert_eq!(sort, Sort::Int);
}

#[test]
fn typing_ite_fail() {
    let n = Decl::new_const("n", Sort::int());
    let p = Decl::new_const("p", Sort::bool());

    let err = Op::Ite
        .type_check(&[build_term!((n)), build_term!((n)), build_term!((n))])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected first argument of sort `bool`, got `int`",
    );

    let err = Op::Ite
        .type_check(&[build_term!((p)), build_term!((p)), build_term!((n))])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "`ite`'s second and third arguments should have the same sort, got `bool` and `int`",
    );
}

#[test]
fn typing_cmp() {
    let a = Decl::new_const("a", Sort::int());
    let b = Decl::new_const("b", Sort::int());

    let a_1 = build_term!((+ (a) 2));
    let a_2 = build_term!((* (b) 7));

    let sort = Op::Ge.type_check(&[a_1, a_2]).unwrap();
    assert_eq!(sort, Sort::Bool);
}

#[test]
fn typing_arity_fail() {
    let p = Decl::new_const("p", Sort::bool());

    let err = Op::And.type_check(&[build_term!((p))]).unwrap_err();
    assert_eq!(err.to_string(), "`and` expects at least 2 argument(s)");

    let err = Op::Not
        .type_check(&[build_term!((p)), build_term!((p))])
        .unwrap_err();
    assert_eq!(err.to_string(), "`not` expects at most 1 argument(s)");
}

#[test]
fn typing_arith_fail() {
    let n = Decl::new_const("n", Sort::int());
    let r = Decl::new_const("r", Sort::rat());
    let p = Decl::new_const("p", Sort::bool());

    let err = Op::Add
        .type_check(&[build_term!((n)), build_term!((r))])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "`+`'s arguments must all have the same sort, found `int` and `rat`",
    );

    let err = Op::Add
        .type_check(&[build_term!((p)), build_term!((p))])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "`+`'s arguments must have an arithmetic sort, unexpected sort `bool`",
    );

    let err = Op::IDiv
        .type_check(&[build_term!((r)), build_term!((r))])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "`div` can only be applied to integer arguments, found `rat`",
    );
}

#[test]
fn typing_eq() {
    let (e, a, _, _, inv) = group_sig();
    let inv_a = inv.app(vec![a.term()]).unwrap();

    let sort = Op::Eq.type_check(&[inv_a, e.term()]).unwrap();
    assert_eq!(sort, Sort::Bool);

    let n = Decl::new_const("n", Sort::int());
    let err = Op::Eq.type_check(&[e.term(), n.term()]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "`=`'s arguments must all have the same sort, found `G` and `int`",
    );
}

#[test]
fn app_fail() {
    let (e, _, _, mul, _) = group_sig();

    let err = mul.app(vec![e.term()]).unwrap_err();
    assert_eq!(err.to_string(), "`mul` expects 2 argument(s), got 1");

    let err = mul.app(vec![e.term(), build_term!(7)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "`mul` expects a `G` as argument 2, got `7` of sort `int`",
    );
}

#[test]
fn display() {
    let (e, a, _, mul, inv) = group_sig();

    let inv_a = inv.app(vec![a.term()]).unwrap();
    let prod = mul.app(vec![inv_a, a.term()]).unwrap();
    assert_eq!(&prod.to_string(), "(mul (inv a) a)");
    assert_eq!(prod.sort(), Sort::usr("G"));

    let eq = build_term!((= prod (e)));
    assert_eq!(&eq.to_string(), "(= (mul (inv a) a) e)");
    assert_eq!(eq.sort(), Sort::Bool);
}

#[test]
fn smt2_printing() {
    let n = Decl::new_const("n", Sort::int());
    let term = build_term!((>= (+ (n) 1) 0));

    let mut buff = vec![];
    term.expr_to_smt2(&mut buff, ()).unwrap();
    assert_eq!(&String::from_utf8_lossy(&buff), "(>= (+ n 1) 0)");

    let mut buff = vec![];
    term.negated().expr_to_smt2(&mut buff, ()).unwrap();
    assert_eq!(&String::from_utf8_lossy(&buff), "(not (>= (+ n 1) 0))");
}

#[test]
fn smt2_printing_negative_csts() {
    let neg = build_term!((- 7));
    let mut buff = vec![];
    neg.expr_to_smt2(&mut buff, ()).unwrap();
    assert_eq!(&String::from_utf8_lossy(&buff), "(- 7)");

    let cst = Term::new_cst(-7);
    let mut buff = vec![];
    cst.expr_to_smt2(&mut buff, ()).unwrap();
    assert_eq!(&String::from_utf8_lossy(&buff), "(- 7)");

    let half = Term::new_cst(Rat::new(Int::from(-1), Int::from(2)));
    let mut buff = vec![];
    half.expr_to_smt2(&mut buff, ()).unwrap();
    assert_eq!(&String::from_utf8_lossy(&buff), "(- (/ 1 2))");
}

#[test]
fn subst_simultaneous() {
    let x = Decl::new_const("x", Sort::int());
    let y = Decl::new_const("y", Sort::int());

    let le = build_term!((<= (x) (y)));
    let swapped = le.substitute(&[(x.term(), y.term()), (y.term(), x.term())]);
    assert_eq!(&swapped.to_string(), "(<= y x)");
}

#[test]
fn subst_top_down() {
    let (e, a, _, mul, inv) = group_sig();

    let inv_a = inv.app(vec![a.term()]).unwrap();
    let nested = mul.app(vec![inv_a.clone(), inv_a.clone()]).unwrap();

    // Replaced material is not re-scanned, so only the original occurrences change.
    let res = nested.substitute(&[(inv_a, e.term())]);
    assert_eq!(&res.to_string(), "(mul e e)");

    let whole = mul.app(vec![a.term(), a.term()]).unwrap();
    let res = whole.substitute(&[(whole.clone(), e.term())]);
    assert_eq!(&res.to_string(), "e");
}

#[test]
fn subst_leaves_csts() {
    let n = Decl::new_const("n", Sort::int());
    let m = Decl::new_const("m", Sort::int());
    let term = build_term!((+ (n) 2));

    let res = term.substitute(&[(n.term(), m.term())]);
    assert_eq!(&res.to_string(), "(+ m 2)");

    let res = term.substitute(&[(m.term(), n.term())]);
    assert_eq!(res, term);
}

#[test]
fn cst_of_smt2() {
    assert_eq!(Cst::of_smt2("true"), Some(Cst::B(true)));
    assert_eq!(Cst::of_smt2("false"), Some(Cst::B(false)));
    assert_eq!(Cst::of_smt2("42"), Some(Cst::int(42)));
    assert_eq!(Cst::of_smt2("(- 42)"), Some(Cst::int(-42)));
    assert_eq!(
        Cst::of_smt2("(/ 1 2)"),
        Some(Cst::rat(Rat::new(Int::from(1), Int::from(2)))),
    );
    assert_eq!(
        Cst::of_smt2("(- (/ 1 2))"),
        Some(Cst::rat(Rat::new(Int::from(-1), Int::from(2)))),
    );
    assert_eq!(
        Cst::of_smt2("(/ 1.0 2.0)"),
        Some(Cst::rat(Rat::new(Int::from(1), Int::from(2)))),
    );
    assert_eq!(
        Cst::of_smt2("0.5"),
        Some(Cst::rat(Rat::new(Int::from(1), Int::from(2)))),
    );
    assert_eq!(Cst::of_smt2("3.0"), Some(Cst::rat(Rat::from_integer(Int::from(3)))));

    assert_eq!(Cst::of_smt2("G!val!0"), None);
    assert_eq!(Cst::of_smt2("(_ as-array k!0)"), None);
    assert_eq!(Cst::of_smt2(""), None);
}

#[test]
fn cst_display() {
    assert_eq!(&Cst::int(7).to_string(), "7");
    assert_eq!(&Cst::int(-7).to_string(), "(- 7)");
    assert_eq!(
        &Cst::rat(Rat::new(Int::from(1), Int::from(2))).to_string(),
        "(/ 1 2)",
    );
    assert_eq!(
        &Cst::rat(Rat::new(Int::from(-1), Int::from(2))).to_string(),
        "(- (/ 1 2))",
    );
}

/// The integer list datatype used by the sorted-list example.
fn int_list() -> Datatype {
    Datatype::new(
        "List",
        vec![
            Ctor::new("nil", vec![]),
            Ctor::new(
                "cons",
                vec![("head", Sort::int()), ("tail", Sort::usr("List"))],
            ),
        ],
    )
}

#[test]
fn datatype_decls() {
    let list = int_list();

    assert_eq!(list.sort(), Sort::usr("List"));

    let nil = list.ctor("nil").unwrap();
    assert_eq!(nil.arity(), 0);
    assert_eq!(nil.range(), &list.sort());
    assert_eq!(&nil.term().to_string(), "nil");

    let cons = list.ctor("cons").unwrap();
    assert_eq!(cons.arity(), 2);
    assert_eq!(cons.domain(0), &Sort::int());
    assert_eq!(cons.domain(1), &list.sort());

    let head = list.selector("head").unwrap();
    assert_eq!(head.arity(), 1);
    assert_eq!(head.domain(0), &list.sort());
    assert_eq!(head.range(), &Sort::int());

    let singleton = cons.app(vec![build_term!(1), nil.term()]).unwrap();
    assert_eq!(&singleton.to_string(), "(cons 1 nil)");
    let head_of = head.app(vec![singleton]).unwrap();
    assert_eq!(&head_of.to_string(), "(head (cons 1 nil))");
    assert_eq!(head_of.sort(), Sort::int());
}

#[test]
fn datatype_fail() {
    let list = int_list();

    let err = list.ctor("snoc").unwrap_err();
    assert_eq!(err.to_string(), "datatype `List` has no constructor `snoc`");

    let err = list.selector("car").unwrap_err();
    assert_eq!(err.to_string(), "datatype `List` has no selector `car`");
}

#[test]
fn datatype_smt2_decl() {
    let list = int_list();
    assert_eq!(
        &list.smt2_decl(),
        "(declare-datatype List ((nil) (cons (head Int) (tail List))))",
    );
}
