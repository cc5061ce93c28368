//! First-order unification of constructor indices
//!
//! All local variables are flexible. When two variables are equated, the more recently
//! introduced one is solved, so that fields of a freshly split constructor are expressed in
//! terms of the variables already in scope.

use log::trace;

use eqc_lang_ast::{Exp, FreeVars, Subst, Substitution, TypCtor, Var};
use eqc_lang_kernel::{Dec, No, Signature, Yes, discriminate_exp, normalize_exp};
use eqc_lang_miette_util::{ToMiette, codespan::Span};
use eqc_lang_printer::Print;

use crate::result::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eqn {
    pub lhs: Exp,
    pub rhs: Exp,
}

impl Eqn {
    pub fn new(lhs: Exp, rhs: Exp) -> Self {
        Eqn { lhs, rhs }
    }
}

/// Solve `eqns`, or return an equation between provably distinct values
pub fn unify(
    sig: &Signature,
    eqns: Vec<Eqn>,
    span: Option<Span>,
) -> CompileResult<Dec<Substitution, Eqn>> {
    let mut ctx = Ctx { sig, span, eqns, solution: Substitution::new() };
    ctx.eqns.reverse();
    let res = ctx.unify()?;
    trace!("unify ~> {res:?}");
    Ok(res)
}

struct Ctx<'a> {
    sig: &'a Signature,
    span: Option<Span>,
    /// Equations still to be solved, the next one last
    eqns: Vec<Eqn>,
    solution: Substitution,
}

impl Ctx<'_> {
    fn unify(mut self) -> CompileResult<Dec<Substitution, Eqn>> {
        while let Some(eqn) = self.eqns.pop() {
            let lhs = normalize_exp(&eqn.lhs.subst(&self.solution), self.sig)?;
            let rhs = normalize_exp(&eqn.rhs.subst(&self.solution), self.sig)?;
            trace!("unify {} = {}", lhs.print_to_string(None), rhs.print_to_string(None));
            if lhs == rhs {
                continue;
            }
            match (lhs.as_var(), rhs.as_var()) {
                (Some(l), Some(r)) => {
                    if l.id > r.id {
                        self.assign(l, rhs.clone())
                    } else {
                        self.assign(r, lhs.clone())
                    }
                }
                (Some(var), None) => {
                    if let No(eqn) = self.assign_checked(var, &lhs, &rhs)? {
                        return Ok(No(eqn));
                    }
                }
                (None, Some(var)) => {
                    if let No(eqn) = self.assign_checked(var, &rhs, &lhs)? {
                        return Ok(No(eqn));
                    }
                }
                (None, None) => {
                    if let No(eqn) = self.decompose(lhs, rhs)? {
                        return Ok(No(eqn));
                    }
                }
            }
        }
        Ok(Yes(self.solution))
    }

    fn decompose(&mut self, lhs: Exp, rhs: Exp) -> CompileResult<Dec<(), Eqn>> {
        match (lhs.as_ctor(), rhs.as_ctor()) {
            (Some((lhs_name, lhs_args)), Some((rhs_name, rhs_args))) => {
                if lhs_name != rhs_name || lhs_args.len() != rhs_args.len() {
                    return Ok(No(Eqn::new(lhs.clone(), rhs.clone())));
                }
                self.push_args(lhs_args, rhs_args);
                return Ok(Yes(()));
            }
            _ => {}
        }
        if let (
            Exp::TypCtor(TypCtor { name: lhs_name, args: lhs_args, .. }),
            Exp::TypCtor(TypCtor { name: rhs_name, args: rhs_args, .. }),
        ) = (&lhs, &rhs)
        {
            if lhs_name == rhs_name && lhs_args.len() == rhs_args.len() {
                self.push_args(lhs_args, rhs_args);
                return Ok(Yes(()));
            }
        }
        self.stuck(lhs, rhs)
    }

    fn push_args(&mut self, lhs: &[Exp], rhs: &[Exp]) {
        let new: Vec<Eqn> =
            lhs.iter().zip(rhs.iter()).map(|(l, r)| Eqn::new(l.clone(), r.clone())).collect();
        self.eqns.extend(new.into_iter().rev());
    }

    /// Solve `var := exp` unless `var` occurs in `exp`
    fn assign_checked(&mut self, var: &Var, lhs: &Exp, rhs: &Exp) -> CompileResult<Dec<(), Eqn>> {
        let exp = if lhs.as_var() == Some(var) { rhs } else { lhs };
        if exp.occurs(var.id) {
            return self.stuck(lhs.clone(), rhs.clone());
        }
        self.assign(var, exp.clone());
        Ok(Yes(()))
    }

    fn assign(&mut self, var: &Var, exp: Exp) {
        trace!("solve {} := {}", var, exp.print_to_string(None));
        self.solution = self.solution.then(&Substitution::single(var, exp));
    }

    /// Neither side can be decomposed further: the equation is either absurd or undecidable
    fn stuck(&self, lhs: Exp, rhs: Exp) -> CompileResult<Dec<(), Eqn>> {
        match discriminate_exp(&lhs, &rhs, self.sig)? {
            Yes(clash) => {
                trace!("absurd by {clash:?}");
                Ok(No(Eqn::new(lhs, rhs)))
            }
            No(()) => Err(Box::new(CompileError::CannotDecide {
                lhs: lhs.print_to_string(None),
                rhs: rhs.print_to_string(None),
                span: self.span.to_miette(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig() -> Signature {
        let mut sig = Signature::new();
        sig.add_family("Nat", 0, &[("zero", 0), ("succ", 1)]);
        sig
    }

    fn zero() -> Exp {
        Exp::ctor("zero", vec![])
    }

    fn succ(e: Exp) -> Exp {
        Exp::ctor("succ", vec![e])
    }

    #[test]
    fn solves_newer_variable() {
        let n = Var::fresh("n");
        let m = Var::fresh("m");
        let eqn = Eqn::new(succ(Exp::var(&m)), succ(Exp::var(&n)));
        let res = unify(&sig(), vec![eqn], None).unwrap();
        let Yes(subst) = res else { panic!("expected a solution") };
        assert_eq!(Exp::var(&m).subst(&subst), Exp::var(&n));
        assert!(!subst.contains(&n.id));
    }

    #[test]
    fn constructor_clash() {
        let n = Var::fresh("n");
        let res = unify(&sig(), vec![Eqn::new(zero(), succ(Exp::var(&n)))], None).unwrap();
        assert!(matches!(res, No(Eqn { .. })));
    }

    #[test]
    fn cycle_is_absurd() {
        let n = Var::fresh("n");
        let res = unify(&sig(), vec![Eqn::new(Exp::var(&n), succ(Exp::var(&n)))], None).unwrap();
        assert!(matches!(res, No(_)));
    }

    #[test]
    fn solutions_propagate() {
        let n = Var::fresh("n");
        let m = Var::fresh("m");
        let eqns = vec![Eqn::new(Exp::var(&m), zero()), Eqn::new(succ(Exp::var(&m)), Exp::var(&n))];
        let Yes(subst) = unify(&sig(), eqns, None).unwrap() else { panic!("expected a solution") };
        assert_eq!(Exp::var(&n).subst(&subst), succ(zero()));
    }

    #[test]
    fn stuck_terms_cannot_be_decided() {
        let n = Var::fresh("n");
        let m = Var::fresh("m");
        let stuck = Exp::def_call("add", vec![Exp::var(&n), Exp::var(&m)]);
        let err = unify(&sig(), vec![Eqn::new(stuck, zero())], None).unwrap_err();
        assert!(matches!(*err, CompileError::CannotDecide { .. }));
    }
}
