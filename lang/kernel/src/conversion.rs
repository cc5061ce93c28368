//! Conversion between the named syntax and core terms

use eqc_lang_ast::{self as ast, Exp, Var, VarId};
use eqc_lang_miette_util::ToMiette;

use crate::result::*;
use crate::term::*;

// Named syntax to core terms
//
//

/// The variables bound by enclosing binders, one vector per telescope
#[derive(Debug, Clone, Default)]
pub struct NameCtx {
    bound: Vec<Vec<VarId>>,
}

impl NameCtx {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bind<T, F>(&mut self, vars: &[Var], f: F) -> T
    where
        F: FnOnce(&mut NameCtx) -> T,
    {
        self.bound.push(vars.iter().map(|var| var.id).collect());
        let res = f(self);
        self.bound.pop();
        res
    }

    fn lookup(&self, var: &Var) -> Option<Idx> {
        self.bound.iter().rev().enumerate().find_map(|(fst, tel)| {
            let pos = tel.iter().rposition(|id| *id == var.id)?;
            Some(Idx { fst, snd: tel.len() - 1 - pos })
        })
    }
}

pub trait ToTerm {
    fn to_term(&self, ctx: &mut NameCtx) -> KernelResult<Term>;
}

fn binders(vars: &[Var]) -> Vec<Binder> {
    vars.iter().map(|var| Binder::new(var.name.clone())).collect()
}

impl ToTerm for Exp {
    fn to_term(&self, ctx: &mut NameCtx) -> KernelResult<Term> {
        let res = match self {
            Exp::Variable(ast::Variable { var, .. }) => match ctx.lookup(var) {
                Some(idx) => Term::Var { name: var.name.clone(), idx },
                None => Term::Free(var.clone()),
            },
            Exp::TypCtor(ast::TypCtor { name, args, .. }) => {
                Term::TypCtor { name: name.id.clone(), args: to_terms(args, ctx)? }
            }
            Exp::Call(ast::Call { kind: ast::CallKind::Constructor, name, args, .. }) => {
                Term::Ctor { name: name.id.clone(), args: to_terms(args, ctx)? }
            }
            Exp::Call(ast::Call { kind: ast::CallKind::Definition, name, args, .. }) => {
                Term::app(Term::Def(name.id.clone()), to_terms(args, ctx)?)
            }
            Exp::App(ast::App { fun, args, .. }) => {
                Term::app(fun.to_term(ctx)?, to_terms(args, ctx)?)
            }
            Exp::Lam(ast::Lam { params, body, .. }) => Term::Lam {
                params: binders(params),
                body: Box::new(ctx.bind(params, |ctx| body.to_term(ctx))?),
            },
            Exp::Pi(ast::Pi { params, codomain, .. }) => pi_to_term(&params.params, codomain, ctx)?,
            Exp::TypeUniv(_) => Term::Type,
            Exp::Anno(ast::Anno { exp, .. }) => exp.to_term(ctx)?,
            Exp::LocalMatch(ast::LocalMatch { span, .. }) => {
                return Err(Box::new(KernelError::LocalMatch { span: span.to_miette() }));
            }
            Exp::Cases(ast::Cases { family, scrutinee, arms, .. }) => Term::Cases {
                family: family.id.clone(),
                scrutinee: Box::new(scrutinee.to_term(ctx)?),
                arms: arms
                    .iter()
                    .map(|arm| {
                        Ok(Arm {
                            ctor: arm.ctor.id.clone(),
                            params: binders(&arm.params),
                            body: ctx.bind(&arm.params, |ctx| arm.body.to_term(ctx))?,
                        })
                    })
                    .collect::<KernelResult<_>>()?,
            },
            Exp::Absurd(ast::Absurd { family, lhs, rhs, .. }) => Term::NoConfusion {
                family: family.id.clone(),
                lhs: Box::new(lhs.to_term(ctx)?),
                rhs: Box::new(rhs.to_term(ctx)?),
            },
        };
        Ok(res)
    }
}

/// A telescope `(x: A, y: B) -> C` becomes `(x: A) -> (y: B) -> C`
fn pi_to_term(params: &[ast::Param], codomain: &Exp, ctx: &mut NameCtx) -> KernelResult<Term> {
    match params.split_first() {
        None => codomain.to_term(ctx),
        Some((param, rest)) => Ok(Term::Pi {
            param: Binder::new(param.var.name.clone()),
            domain: Box::new(param.typ.to_term(ctx)?),
            codomain: Box::new(ctx.bind(std::slice::from_ref(&param.var), |ctx| {
                pi_to_term(rest, codomain, ctx)
            })?),
        }),
    }
}

fn to_terms(exps: &[Exp], ctx: &mut NameCtx) -> KernelResult<Vec<Term>> {
    exps.iter().map(|exp| exp.to_term(ctx)).collect()
}

// Core terms to named syntax
//
//

/// Named variables for the binders of enclosing telescopes
#[derive(Debug, Clone, Default)]
pub struct VarCtx {
    bound: Vec<Vec<Var>>,
}

impl VarCtx {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Run `f` with fresh variables for `binders`
    pub fn bind<T, F>(&mut self, binders: &[Binder], f: F) -> T
    where
        F: FnOnce(&mut VarCtx, &[Var]) -> T,
    {
        let vars: Vec<Var> = binders.iter().map(|binder| Var::fresh(binder.name.clone())).collect();
        self.bound.push(vars.clone());
        let res = f(self, &vars);
        self.bound.pop();
        res
    }

    fn lookup(&self, idx: Idx) -> KernelResult<&Var> {
        self.bound
            .len()
            .checked_sub(1 + idx.fst)
            .and_then(|fst| self.bound.get(fst))
            .and_then(|tel| tel.len().checked_sub(1 + idx.snd).and_then(|snd| tel.get(snd)))
            .ok_or_else(|| Box::new(KernelError::UnboundVariable { idx }))
    }
}

pub trait ToExp {
    fn to_exp(&self, ctx: &mut VarCtx) -> KernelResult<Exp>;
}

impl ToExp for Term {
    fn to_exp(&self, ctx: &mut VarCtx) -> KernelResult<Exp> {
        let res = match self {
            Term::Var { idx, .. } => Exp::var(ctx.lookup(*idx)?),
            Term::Free(var) => Exp::var(var),
            Term::Def(name) => Exp::def_call(name, vec![]),
            Term::TypCtor { name, args } => Exp::typ_ctor(name, to_exps(args, ctx)?),
            Term::Ctor { name, args } => Exp::ctor(name, to_exps(args, ctx)?),
            Term::Lam { params, body } => ctx.bind(params, |ctx, vars| {
                let body = Box::new(body.to_exp(ctx)?);
                Ok::<Exp, Box<KernelError>>(
                    ast::Lam { span: None, params: vars.to_vec(), body }.into(),
                )
            })?,
            Term::App { fun, args } => {
                let args = to_exps(args, ctx)?;
                match &**fun {
                    Term::Def(name) => Exp::def_call(name, args),
                    fun => ast::App { span: None, fun: Box::new(fun.to_exp(ctx)?), args }.into(),
                }
            }
            Term::Pi { param, domain, codomain } => {
                let domain = domain.to_exp(ctx)?;
                ctx.bind(std::slice::from_ref(param), |ctx, vars| {
                    let param =
                        ast::Param { span: None, var: vars[0].clone(), typ: Box::new(domain) };
                    Ok::<Exp, Box<KernelError>>(
                        ast::Pi {
                            span: None,
                            params: ast::Telescope { params: vec![param] },
                            codomain: Box::new(codomain.to_exp(ctx)?),
                        }
                        .into(),
                    )
                })?
            }
            Term::Type => ast::TypeUniv { span: None }.into(),
            Term::Cases { family, scrutinee, arms } => ast::Cases {
                span: None,
                family: ast::IdBound::from_string(family),
                scrutinee: Box::new(scrutinee.to_exp(ctx)?),
                arms: arms
                    .iter()
                    .map(|arm| {
                        ctx.bind(&arm.params, |ctx, vars| {
                            Ok(ast::Arm {
                                ctor: ast::IdBound::from_string(&arm.ctor),
                                params: vars.to_vec(),
                                refinements: vec![],
                                body: Box::new(arm.body.to_exp(ctx)?),
                            })
                        })
                    })
                    .collect::<KernelResult<_>>()?,
            }
            .into(),
            // A fixpoint stands for the definition it was compiled from
            Term::Fix { name, .. } => Exp::def_call(name, vec![]),
            Term::NoConfusion { family, lhs, rhs } => ast::Absurd {
                span: None,
                family: ast::IdBound::from_string(family),
                lhs: Box::new(lhs.to_exp(ctx)?),
                rhs: Box::new(rhs.to_exp(ctx)?),
            }
            .into(),
        };
        Ok(res)
    }
}

fn to_exps(terms: &[Term], ctx: &mut VarCtx) -> KernelResult<Vec<Exp>> {
    terms.iter().map(|term| term.to_exp(ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_and_free_variables() {
        let x = Var::fresh("x");
        let y = Var::fresh("y");
        let lam: Exp = ast::Lam {
            span: None,
            params: vec![x.clone()],
            body: Box::new(Exp::ctor("pair", vec![Exp::var(&x), Exp::var(&y)])),
        }
        .into();
        let term = lam.to_term(&mut NameCtx::empty()).unwrap();
        assert_eq!(
            term,
            Term::lam(&["x"], Term::ctor("pair", vec![Term::var("x", 0, 0), Term::Free(y)]))
        );
    }

    #[test]
    fn shadowing_uses_innermost_binder() {
        let x = Var::fresh("x");
        let mut ctx = NameCtx::empty();
        let idx = ctx.bind(&[x.clone()], |ctx| ctx.bind(&[x.clone()], |ctx| ctx.lookup(&x)));
        assert_eq!(idx, Some(Idx { fst: 0, snd: 0 }));
    }

    #[test]
    fn back_and_forth_is_alpha_equivalent() {
        let n = Var::fresh("n");
        let k = Var::fresh("k");
        let exp: Exp = ast::Lam {
            span: None,
            params: vec![n.clone()],
            body: Box::new(
                ast::Cases {
                    span: None,
                    family: ast::IdBound::from_string("Nat"),
                    scrutinee: Box::new(Exp::var(&n)),
                    arms: vec![
                        ast::Arm {
                            ctor: ast::IdBound::from_string("zero"),
                            params: vec![],
                            refinements: vec![],
                            body: Box::new(Exp::ctor("zero", vec![])),
                        },
                        ast::Arm {
                            ctor: ast::IdBound::from_string("succ"),
                            params: vec![k.clone()],
                            refinements: vec![],
                            body: Box::new(Exp::def_call("f", vec![Exp::var(&k)])),
                        },
                    ],
                }
                .into(),
            ),
        }
        .into();
        let term = exp.to_term(&mut NameCtx::empty()).unwrap();
        let back = term.to_exp(&mut VarCtx::empty()).unwrap();
        assert_eq!(back.to_term(&mut NameCtx::empty()).unwrap(), term);
    }
}
