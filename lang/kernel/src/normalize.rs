use log::trace;

use eqc_lang_ast::Exp;
use eqc_lang_printer::Print;

use crate::conversion::{NameCtx, ToExp, ToTerm, VarCtx};
use crate::dec::Dec;
use crate::env::Env;
use crate::eval::Eval;
use crate::no_confusion::{Clash, discriminate};
use crate::read_back::{LevelCtx, ReadBack};
use crate::result::*;
use crate::signature::Signature;
use crate::term::Term;

pub trait Normalize {
    type Nf;

    fn normalize(&self, sig: &Signature, env: &Env, ctx: &mut LevelCtx) -> KernelResult<Self::Nf>;

    fn normalize_in_empty_env(&self, sig: &Signature) -> KernelResult<Self::Nf> {
        self.normalize(sig, &Env::empty(), &mut LevelCtx::empty())
    }
}

impl<T> Normalize for T
where
    T: Eval,
    <T as Eval>::Val: ReadBack,
{
    type Nf = <<T as Eval>::Val as ReadBack>::Nf;

    fn normalize(&self, sig: &Signature, env: &Env, ctx: &mut LevelCtx) -> KernelResult<Self::Nf> {
        let val = self.eval(sig, env)?;
        val.read_back(sig, ctx)
    }
}

/// The normal form of a term without bound variables
pub fn normalize(term: &Term, sig: &Signature) -> KernelResult<Term> {
    term.normalize_in_empty_env(sig)
}

/// Whether two terms are definitionally equal
pub fn convert(lhs: &Term, rhs: &Term, sig: &Signature) -> KernelResult<bool> {
    Ok(normalize(lhs, sig)? == normalize(rhs, sig)?)
}

/// Normalize an expression of the named syntax
///
/// Local variables of the expression are treated as free variables and survive
/// normalization unchanged.
pub fn normalize_exp(exp: &Exp, sig: &Signature) -> KernelResult<Exp> {
    let term = exp.to_term(&mut NameCtx::empty())?;
    let nf = normalize(&term, sig)?;
    trace!("{} ▷ {}", exp.print_to_string(None), nf.print_to_string(None));
    nf.to_exp(&mut VarCtx::empty())
}

/// Whether two expressions of the named syntax are definitionally equal
pub fn convert_exp(lhs: &Exp, rhs: &Exp, sig: &Signature) -> KernelResult<bool> {
    let lhs = lhs.to_term(&mut NameCtx::empty())?;
    let rhs = rhs.to_term(&mut NameCtx::empty())?;
    convert(&lhs, &rhs, sig)
}

/// Whether two expressions of the named syntax are provably distinct
pub fn discriminate_exp(lhs: &Exp, rhs: &Exp, sig: &Signature) -> KernelResult<Dec<Clash>> {
    let lhs = lhs.to_term(&mut NameCtx::empty())?.eval(sig, &Env::empty())?;
    let rhs = rhs.to_term(&mut NameCtx::empty())?.eval(sig, &Env::empty())?;
    Ok(discriminate(&lhs, &rhs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use eqc_lang_ast::Var;

    fn nat_exp(n: usize) -> Exp {
        (0..n).fold(Exp::ctor("zero", vec![]), |acc, _| Exp::ctor("succ", vec![acc]))
    }

    #[test]
    fn add_computes_on_literals() {
        let mut sig = nat_sig();
        sig.add_def("add", add_fix());
        let exp = Exp::def_call("add", vec![nat_exp(2), nat_exp(3)]);
        assert_eq!(normalize_exp(&exp, &sig).unwrap(), nat_exp(5));
    }

    #[test]
    fn add_computes_on_open_terms() {
        let mut sig = nat_sig();
        sig.add_def("add", add_fix());
        let x = Var::fresh("x");
        let exp = Exp::def_call("add", vec![Exp::var(&x), nat_exp(2)]);
        let expected = Exp::ctor("succ", vec![Exp::ctor("succ", vec![Exp::var(&x)])]);
        assert_eq!(normalize_exp(&exp, &sig).unwrap(), expected);
    }

    #[test]
    fn conversion_up_to_computation() {
        let mut sig = nat_sig();
        sig.add_def("add", add_fix());
        let x = Var::fresh("x");
        let lhs = Exp::def_call("add", vec![Exp::var(&x), nat_exp(1)]);
        let rhs = Exp::ctor("succ", vec![Exp::var(&x)]);
        assert!(convert_exp(&lhs, &rhs, &sig).unwrap());
        assert!(!convert_exp(&lhs, &Exp::var(&x), &sig).unwrap());
    }

    #[test]
    fn measure_fix_unfolds_on_constructor_measure() {
        let mut sig = nat_sig();
        // half(zero) = zero, half(succ(zero)) = zero, half(succ(succ(j))) = succ(half(j))
        let zero_arm = || crate::Arm {
            ctor: "zero".to_owned(),
            params: vec![],
            body: Term::ctor("zero", vec![]),
        };
        let inner = Term::Cases {
            family: "Nat".to_owned(),
            scrutinee: Box::new(Term::var("k", 0, 0)),
            arms: vec![
                zero_arm(),
                crate::Arm {
                    ctor: "succ".to_owned(),
                    params: vec![crate::Binder::new("j")],
                    body: Term::ctor(
                        "succ",
                        vec![Term::app(Term::var("half", 3, 0), vec![Term::var("j", 0, 0)])],
                    ),
                },
            ],
        };
        let body = Term::lam(
            &["n"],
            Term::Cases {
                family: "Nat".to_owned(),
                scrutinee: Box::new(Term::var("n", 0, 0)),
                arms: vec![
                    zero_arm(),
                    crate::Arm {
                        ctor: "succ".to_owned(),
                        params: vec![crate::Binder::new("k")],
                        body: inner,
                    },
                ],
            },
        );
        let half = Term::Fix {
            name: "half".to_owned(),
            arity: 1,
            decrease: crate::Decrease::Measure {
                measure: Box::new(Term::lam(&["n"], Term::var("n", 0, 0))),
            },
            body: Box::new(body),
        };
        sig.add_def("half", half);
        let exp = Exp::def_call("half", vec![nat_exp(5)]);
        assert_eq!(normalize_exp(&exp, &sig).unwrap(), nat_exp(2));
    }
}
