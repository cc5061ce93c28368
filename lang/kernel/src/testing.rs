//! Shared fixtures for the unit tests of this crate

use crate::signature::Signature;
use crate::term::*;

pub fn nat_sig() -> Signature {
    let mut sig = Signature::new();
    sig.add_family("Nat", 0, &[("zero", 0), ("succ", 1)]);
    sig
}

pub fn num(n: usize) -> Term {
    (0..n).fold(Term::ctor("zero", vec![]), |acc, _| Term::ctor("succ", vec![acc]))
}

/// `zero => zero, succ(k) => k`
pub fn pred_arms() -> Vec<Arm> {
    vec![
        Arm { ctor: "zero".to_owned(), params: vec![], body: Term::ctor("zero", vec![]) },
        Arm { ctor: "succ".to_owned(), params: vec![Binder::new("k")], body: Term::var("k", 0, 0) },
    ]
}

/// `fix add[struct 1] => \m, n. cases[Nat] n { zero => m, succ(k) => succ(add(m, k)) }`
pub fn add_fix() -> Term {
    let body = Term::lam(
        &["m", "n"],
        Term::Cases {
            family: "Nat".to_owned(),
            scrutinee: Box::new(Term::var("n", 0, 0)),
            arms: vec![
                Arm { ctor: "zero".to_owned(), params: vec![], body: Term::var("m", 1, 1) },
                Arm {
                    ctor: "succ".to_owned(),
                    params: vec![Binder::new("k")],
                    body: Term::ctor(
                        "succ",
                        vec![Term::app(
                            Term::var("add", 2, 0),
                            vec![Term::var("m", 1, 1), Term::var("k", 0, 0)],
                        )],
                    ),
                },
            ],
        },
    );
    Term::Fix {
        name: "add".to_owned(),
        arity: 2,
        decrease: Decrease::Structural { arg: 1 },
        body: Box::new(body),
    }
}
