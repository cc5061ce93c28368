use std::rc::Rc;

use log::trace;

use eqc_lang_printer::Print;

use crate::dec::*;
use crate::env::Env;
use crate::no_confusion::discriminate;
use crate::result::*;
use crate::signature::Signature;
use crate::term::*;
use crate::val::*;

pub trait Eval {
    type Val;

    fn eval(&self, sig: &Signature, env: &Env) -> KernelResult<Self::Val>;
}

impl Eval for Term {
    type Val = Rc<Val>;

    fn eval(&self, sig: &Signature, env: &Env) -> KernelResult<Self::Val> {
        let res = match self {
            Term::Var { idx, .. } => env.lookup(*idx)?,
            Term::Free(var) => Val::neu(Neu::Free(var.clone())),
            Term::Def(name) => match sig.def(name) {
                Some(term) => term.eval(sig, &Env::empty())?,
                None => Val::neu(Neu::Def(name.clone())),
            },
            Term::TypCtor { name, args } => {
                Rc::new(Val::TypCtor { name: name.clone(), args: args.eval(sig, env)? })
            }
            Term::Ctor { name, args } => {
                Rc::new(Val::Ctor { name: name.clone(), args: args.eval(sig, env)? })
            }
            Term::Lam { params, body } => Rc::new(Val::Lam(Closure {
                params: params.clone(),
                env: env.clone(),
                body: (**body).clone(),
            })),
            Term::App { fun, args } => apply(sig, fun.eval(sig, env)?, args.eval(sig, env)?)?,
            Term::Pi { param, domain, codomain } => Rc::new(Val::Pi {
                param: param.clone(),
                domain: domain.eval(sig, env)?,
                codomain: Closure {
                    params: vec![param.clone()],
                    env: env.clone(),
                    body: (**codomain).clone(),
                },
            }),
            Term::Type => Rc::new(Val::Type),
            Term::Cases { family, scrutinee, arms } => {
                eval_cases(sig, env, family, scrutinee.eval(sig, env)?, arms)?
            }
            Term::Fix { name, arity, decrease, body } => {
                let decrease = match decrease {
                    Decrease::Structural { arg } => ValDecrease::Structural { arg: *arg },
                    Decrease::Measure { measure } => {
                        ValDecrease::Measure { measure: measure.eval(sig, env)? }
                    }
                };
                Rc::new(Val::Fix(Rc::new(FixClosure {
                    name: name.clone(),
                    arity: *arity,
                    decrease,
                    env: env.clone(),
                    body: (**body).clone(),
                })))
            }
            Term::NoConfusion { family, lhs, rhs } => {
                let lhs = lhs.eval(sig, env)?;
                let rhs = rhs.eval(sig, env)?;
                match discriminate(&lhs, &rhs) {
                    Yes(clash) => {
                        trace!("no_confusion[{family}]: {clash:?}");
                        Val::neu(Neu::NoConfusion { family: family.clone(), lhs, rhs })
                    }
                    No(()) => {
                        return Err(Box::new(KernelError::NotDistinct { family: family.clone() }));
                    }
                }
            }
        };
        trace!("eval {}", self.print_to_string(None));
        Ok(res)
    }
}

impl<T: Eval> Eval for Vec<T> {
    type Val = Vec<T::Val>;

    fn eval(&self, sig: &Signature, env: &Env) -> KernelResult<Self::Val> {
        self.iter().map(|x| x.eval(sig, env)).collect()
    }
}

impl Closure {
    /// Evaluate the body with the parameters bound to `args`
    pub fn instantiate(&self, sig: &Signature, args: Vec<Rc<Val>>) -> KernelResult<Rc<Val>> {
        if args.len() != self.params.len() {
            return Err(Box::new(KernelError::PartialApplication {
                expected: self.params.len(),
                actual: args.len(),
            }));
        }
        self.body.eval(sig, &self.env.extended(args))
    }
}

impl FixClosure {
    /// Whether the fixpoint may unfold when applied to `args`
    fn can_unfold(&self, sig: &Signature, args: &[Rc<Val>]) -> KernelResult<bool> {
        match &self.decrease {
            ValDecrease::Structural { arg } => Ok(args.get(*arg).is_some_and(|arg| arg.is_ctor())),
            ValDecrease::Measure { measure } => {
                Ok(apply(sig, measure.clone(), args.to_vec())?.is_ctor())
            }
        }
    }
}

/// Apply a value to arguments
pub fn apply(sig: &Signature, fun: Rc<Val>, mut args: Vec<Rc<Val>>) -> KernelResult<Rc<Val>> {
    if args.is_empty() {
        return Ok(fun);
    }
    match &*fun {
        Val::Lam(closure) => {
            if args.len() < closure.params.len() {
                return Err(Box::new(KernelError::PartialApplication {
                    expected: closure.params.len(),
                    actual: args.len(),
                }));
            }
            let rest = args.split_off(closure.params.len());
            let res = closure.instantiate(sig, args)?;
            apply(sig, res, rest)
        }
        Val::Fix(fix) => apply_fix(sig, fix.clone(), args),
        Val::Neu(Neu::Fix { fix, args: prev }) => {
            let mut all = prev.clone();
            all.append(&mut args);
            apply_fix(sig, fix.clone(), all)
        }
        Val::Neu(neu) => Ok(Val::neu(Neu::App { fun: Box::new(neu.clone()), args })),
        other => Err(Box::new(KernelError::NotAFunction { what: other.describe() })),
    }
}

fn apply_fix(
    sig: &Signature,
    fix: Rc<FixClosure>,
    mut args: Vec<Rc<Val>>,
) -> KernelResult<Rc<Val>> {
    if args.len() < fix.arity || !fix.can_unfold(sig, &args[..fix.arity])? {
        trace!("fix {} is stuck", fix.name);
        return Ok(Val::neu(Neu::Fix { fix, args }));
    }
    trace!("unfold fix {}", fix.name);
    let rest = args.split_off(fix.arity);
    let body = fix.body.eval(sig, &fix.env.extended(vec![Rc::new(Val::Fix(fix.clone()))]))?;
    let res = apply(sig, body, args)?;
    apply(sig, res, rest)
}

fn eval_cases(
    sig: &Signature,
    env: &Env,
    family: &str,
    scrutinee: Rc<Val>,
    arms: &[Arm],
) -> KernelResult<Rc<Val>> {
    match &*scrutinee {
        Val::Ctor { name, args } => {
            let arm = arms.iter().find(|arm| &arm.ctor == name).ok_or_else(|| {
                Box::new(KernelError::MissingArm { family: family.to_owned(), ctor: name.clone() })
            })?;
            if arm.params.len() != args.len() {
                return Err(Box::new(KernelError::ArmArityMismatch {
                    ctor: name.clone(),
                    expected: args.len(),
                    actual: arm.params.len(),
                }));
            }
            trace!("cases[{family}] selects {name}");
            arm.body.eval(sig, &env.extended(args.clone()))
        }
        Val::Neu(neu) => Ok(Val::neu(Neu::Cases {
            family: family.to_owned(),
            scrutinee: Box::new(neu.clone()),
            arms: arms.to_vec(),
            env: env.clone(),
        })),
        other => Err(Box::new(KernelError::ScrutineeNotACtor {
            family: family.to_owned(),
            what: other.describe(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn cases_reduces_on_constructor() {
        let sig = nat_sig();
        let pred = Term::Cases {
            family: "Nat".to_owned(),
            scrutinee: Box::new(num(2)),
            arms: pred_arms(),
        };
        let expected = num(1).eval(&sig, &Env::empty()).unwrap();
        assert_eq!(pred.eval(&sig, &Env::empty()).unwrap(), expected);
    }

    #[test]
    fn fix_unfolds_on_constructor() {
        let sig = nat_sig();
        let term = Term::app(add_fix(), vec![num(2), num(2)]);
        let expected = num(4).eval(&sig, &Env::empty()).unwrap();
        assert_eq!(term.eval(&sig, &Env::empty()).unwrap(), expected);
    }

    #[test]
    fn fix_is_stuck_on_neutral() {
        let sig = nat_sig();
        let x = eqc_lang_ast::Var::fresh("x");
        let term = Term::app(add_fix(), vec![num(1), Term::Free(x)]);
        let val = term.eval(&sig, &Env::empty()).unwrap();
        assert!(matches!(&*val, Val::Neu(Neu::Fix { args, .. }) if args.len() == 2));
    }

    #[test]
    fn partial_fix_application_resumes() {
        let sig = nat_sig();
        let partial = Term::app(add_fix(), vec![num(1)]);
        let val = partial.eval(&sig, &Env::empty()).unwrap();
        let res = apply(&sig, val, vec![num(1).eval(&sig, &Env::empty()).unwrap()]).unwrap();
        assert_eq!(res, num(2).eval(&sig, &Env::empty()).unwrap());
    }

    #[test]
    fn no_confusion_rejects_equal_values() {
        let sig = nat_sig();
        let term = Term::NoConfusion {
            family: "Nat".to_owned(),
            lhs: Box::new(num(1)),
            rhs: Box::new(num(1)),
        };
        let err = term.eval(&sig, &Env::empty()).unwrap_err();
        assert!(matches!(*err, KernelError::NotDistinct { .. }));
    }

    #[test]
    fn unknown_definitions_are_opaque() {
        let sig = nat_sig();
        let term = Term::app(Term::Def("mystery".to_owned()), vec![num(0)]);
        let val = term.eval(&sig, &Env::empty()).unwrap();
        assert!(matches!(&*val, Val::Neu(Neu::App { fun, .. }) if matches!(**fun, Neu::Def(_))));
    }
}
