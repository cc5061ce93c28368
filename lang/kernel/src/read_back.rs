use std::rc::Rc;

use log::trace;

use eqc_lang_printer::Print;

use crate::result::*;
use crate::signature::Signature;
use crate::term::*;
use crate::val::*;

/// The number of variables bound by each enclosing telescope during read-back
#[derive(Debug, Clone, Default)]
pub struct LevelCtx {
    bound: Vec<usize>,
}

impl LevelCtx {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Run `f` with fresh neutral variables for `binders`
    pub fn bind<T, F>(&mut self, binders: &[Binder], f: F) -> KernelResult<T>
    where
        F: FnOnce(&mut LevelCtx, Vec<Rc<Val>>) -> KernelResult<T>,
    {
        let fst = self.bound.len();
        let vars = binders
            .iter()
            .enumerate()
            .map(|(snd, binder)| {
                Val::neu(Neu::Var { name: binder.name.clone(), lvl: Lvl { fst, snd } })
            })
            .collect();
        self.bound.push(binders.len());
        let res = f(self, vars);
        self.bound.pop();
        res
    }

    pub fn lvl_to_idx(&self, lvl: Lvl) -> KernelResult<Idx> {
        let len = self
            .bound
            .get(lvl.fst)
            .filter(|len| lvl.snd < **len)
            .ok_or_else(|| KernelError::impossible(format!("Level {lvl} out of scope")))?;
        Ok(Idx { fst: self.bound.len() - 1 - lvl.fst, snd: len - 1 - lvl.snd })
    }
}

pub trait ReadBack {
    type Nf;

    fn read_back(&self, sig: &Signature, ctx: &mut LevelCtx) -> KernelResult<Self::Nf>;
}

impl ReadBack for Val {
    type Nf = Term;

    fn read_back(&self, sig: &Signature, ctx: &mut LevelCtx) -> KernelResult<Self::Nf> {
        let res = match self {
            Val::TypCtor { name, args } => {
                Term::TypCtor { name: name.clone(), args: args.read_back(sig, ctx)? }
            }
            Val::Ctor { name, args } => {
                Term::Ctor { name: name.clone(), args: args.read_back(sig, ctx)? }
            }
            Val::Type => Term::Type,
            Val::Pi { param, domain, codomain } => Term::Pi {
                param: param.clone(),
                domain: Box::new(domain.read_back(sig, ctx)?),
                codomain: Box::new(codomain.read_back(sig, ctx)?),
            },
            Val::Lam(closure) => Term::Lam {
                params: closure.params.clone(),
                body: Box::new(closure.read_back(sig, ctx)?),
            },
            Val::Fix(fix) => Term::Def(fix.name.clone()),
            Val::Neu(neu) => neu.read_back(sig, ctx)?,
        };
        trace!("read back {}", res.print_to_string(None));
        Ok(res)
    }
}

impl ReadBack for Neu {
    type Nf = Term;

    fn read_back(&self, sig: &Signature, ctx: &mut LevelCtx) -> KernelResult<Self::Nf> {
        let res = match self {
            Neu::Var { name, lvl } => Term::Var { name: name.clone(), idx: ctx.lvl_to_idx(*lvl)? },
            Neu::Free(var) => Term::Free(var.clone()),
            Neu::Def(name) => Term::Def(name.clone()),
            Neu::App { fun, args } => {
                Term::app(fun.read_back(sig, ctx)?, args.read_back(sig, ctx)?)
            }
            Neu::Cases { family, scrutinee, arms, env } => {
                let arms = arms
                    .iter()
                    .map(|arm| {
                        let closure = Closure {
                            params: arm.params.clone(),
                            env: env.clone(),
                            body: arm.body.clone(),
                        };
                        Ok(Arm {
                            ctor: arm.ctor.clone(),
                            params: arm.params.clone(),
                            body: closure.read_back(sig, ctx)?,
                        })
                    })
                    .collect::<KernelResult<_>>()?;
                Term::Cases {
                    family: family.clone(),
                    scrutinee: Box::new(scrutinee.read_back(sig, ctx)?),
                    arms,
                }
            }
            Neu::Fix { fix, args } => {
                Term::app(Term::Def(fix.name.clone()), args.read_back(sig, ctx)?)
            }
            Neu::NoConfusion { family, lhs, rhs } => Term::NoConfusion {
                family: family.clone(),
                lhs: Box::new(lhs.read_back(sig, ctx)?),
                rhs: Box::new(rhs.read_back(sig, ctx)?),
            },
        };
        Ok(res)
    }
}

impl ReadBack for Closure {
    type Nf = Term;

    fn read_back(&self, sig: &Signature, ctx: &mut LevelCtx) -> KernelResult<Self::Nf> {
        ctx.bind(&self.params, |ctx, vars| self.instantiate(sig, vars)?.read_back(sig, ctx))
    }
}

impl<T: ReadBack> ReadBack for Vec<T> {
    type Nf = Vec<T::Nf>;

    fn read_back(&self, sig: &Signature, ctx: &mut LevelCtx) -> KernelResult<Self::Nf> {
        self.iter().map(|x| x.read_back(sig, ctx)).collect()
    }
}

impl<T: ReadBack> ReadBack for Rc<T> {
    type Nf = T::Nf;

    fn read_back(&self, sig: &Signature, ctx: &mut LevelCtx) -> KernelResult<Self::Nf> {
        (**self).read_back(sig, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use crate::eval::Eval;
    use crate::testing::*;

    fn nf(sig: &Signature, term: &Term) -> Term {
        term.eval(sig, &Env::empty()).unwrap().read_back(sig, &mut LevelCtx::empty()).unwrap()
    }

    #[test]
    fn lambda_reads_back_to_indices() {
        let sig = nat_sig();
        let term = Term::lam(&["x", "y"], Term::ctor("succ", vec![Term::var("x", 0, 1)]));
        assert_eq!(nf(&sig, &term), term);
    }

    #[test]
    fn stuck_fix_reads_back_as_call() {
        let mut sig = nat_sig();
        sig.add_def("add", add_fix());
        let x = eqc_lang_ast::Var::fresh("x");
        let term = Term::app(Term::Def("add".to_owned()), vec![num(1), Term::Free(x.clone())]);
        assert_eq!(nf(&sig, &term), term);
    }

    #[test]
    fn stuck_cases_reads_back_arms() {
        let sig = nat_sig();
        let term = Term::lam(
            &["n"],
            Term::Cases {
                family: "Nat".to_owned(),
                scrutinee: Box::new(Term::var("n", 0, 0)),
                arms: pred_arms(),
            },
        );
        assert_eq!(nf(&sig, &term), term);
    }
}
