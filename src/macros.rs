//! Herbrand's macros.

/// Imports herbrand's prelude.
#[macro_export]
macro_rules! prelude {
    {} => { use $crate::prelude::*; };
    { pub } => { pub use $crate::prelude::*; };
}

/// Convenience macro, provides a DSL for writing terms.
///
/// - nullary declarations (constants, proof variables) must be written as `(name)`, without any
///   quotes, and resolve to a [`Decl`](crate::term::Decl) of that name in scope;
/// - applications of non-nullary declarations cannot be written inline: bind them with
///   [`Decl::app`](crate::term::Decl::app) first and mention the binding as a leaf.
#[macro_export]
macro_rules! build_term {
    (true) => ( $crate::term::Term::from(true) );
    (false) => ( $crate::term::Term::from(false) );

    ( ($var:ident) ) => (
        $var.term()
    );

    ( ($op:tt $($args:tt)*) ) => (
        $crate::term::Term::from((
            $crate::build_term!(@op $op),
            vec![ $($crate::build_term!($args)),* ],
        ))
    );

    ($cst:expr) => ( $crate::term::Term::from($cst) );

    (@op ite) => ( $crate::term::Op::Ite );
    (@op =>) => ( $crate::term::Op::Implies );
    (@op +) => ( $crate::term::Op::Add );
    (@op -) => ( $crate::term::Op::Sub );
    (@op *) => ( $crate::term::Op::Mul );
    (@op /) => ( $crate::term::Op::Div );
    (@op %) => ( $crate::term::Op::Mod );
    (@op >=) => ( $crate::term::Op::Ge );
    (@op <=) => ( $crate::term::Op::Le );
    (@op >) => ( $crate::term::Op::Gt );
    (@op <) => ( $crate::term::Op::Lt );
    (@op =) => ( $crate::term::Op::Eq );
    (@op not) => ( $crate::term::Op::Not );
    (@op and) => ( $crate::term::Op::And );
    (@op or) => ( $crate::term::Op::Or );
    (@op !) => ( $crate::term::Op::Not );
    (@op &&) => ( $crate::term::Op::And );
    (@op ||) => ( $crate::term::Op::Or );
}

/// Builds a sort.
#[macro_export]
macro_rules! build_sort {
    (bool) => {
        $crate::term::Sort::Bool
    };
    (int) => {
        $crate::term::Sort::Int
    };
    (rat) => {
        $crate::term::Sort::Rat
    };
    ($name:ident) => {
        $crate::term::Sort::usr(stringify!($name))
    };
}
