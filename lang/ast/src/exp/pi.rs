use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg,
    tokens::{ARROW, COLON},
    util::{ParensIfExt, comma_separated},
};
use pretty::DocAllocator;

use super::Exp;
use crate::{BoundVars, FreeVars, Subst, Substitution, Var};

// Telescope
//
//

/// A dependent sequence of typed parameters, e.g. `(A: Type, n: Nat, v: Vec(A, n))`
#[derive(Debug, Clone, Default, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Telescope {
    pub params: Vec<Param>,
}

impl Telescope {
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.params.iter().map(|param| &param.var)
    }

    pub fn as_args(&self) -> Vec<Exp> {
        self.vars().map(Exp::var).collect()
    }

    /// Instantiate the telescope with fresh variables.
    ///
    /// Returns the fresh variables, their types and the renaming from the old variables
    /// to the fresh ones, which has to be applied to everything in scope of the telescope.
    pub fn instantiate_fresh(&self) -> (Telescope, Substitution) {
        let mut subst = Substitution::new();
        let mut params = Vec::with_capacity(self.params.len());
        for Param { span, var, typ } in &self.params {
            let fresh = var.refresh();
            params.push(Param { span: *span, var: fresh.clone(), typ: typ.subst(&subst) });
            subst.insert(var, Exp::var(&fresh));
        }
        (Telescope { params }, subst)
    }

    /// Apply `subst` to the parameter types, where each parameter shadows the
    /// substitution in the types of the following parameters.
    pub fn subst_types(&self, subst: &Substitution) -> Telescope {
        let mut params = Vec::with_capacity(self.params.len());
        let mut bound = Vec::new();
        for Param { span, var, typ } in &self.params {
            let subst = subst.without(&bound);
            params.push(Param { span: *span, var: var.clone(), typ: typ.subst(&subst) });
            bound.push(var.clone());
        }
        Telescope { params }
    }
}

impl Print for Telescope {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        if self.params.is_empty() {
            return alloc.nil();
        }
        comma_separated(alloc, self.params.iter().map(|param| param.print(cfg, alloc))).parens()
    }
}

impl FreeVars for Telescope {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        collect_telescope(&self.params, bound, out, |_, _| {})
    }
}

/// Collect free variables of a telescope and then of whatever is in its scope
pub(crate) fn collect_telescope<F>(
    params: &[Param],
    bound: &mut BoundVars,
    out: &mut Vec<Var>,
    scope: F,
) where
    F: FnOnce(&mut BoundVars, &mut Vec<Var>),
{
    match params.split_first() {
        None => scope(bound, out),
        Some((param, rest)) => {
            param.typ.collect_free_vars(bound, out);
            bound.bind([&param.var], |bound| collect_telescope(rest, bound, out, scope))
        }
    }
}

// Param
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Param {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub var: Var,
    pub typ: Box<Exp>,
}

impl Print for Param {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Param { span: _, var, typ } = self;
        var.print(cfg, alloc).append(COLON).append(alloc.space()).append(typ.print(cfg, alloc))
    }
}

// Pi
//
//

/// A dependent function type `(x: A, y: B) -> C`
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Pi {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub params: Telescope,
    pub codomain: Box<Exp>,
}

impl From<Pi> for Exp {
    fn from(val: Pi) -> Self {
        Exp::Pi(val)
    }
}

impl Print for Pi {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let Pi { span: _, params, codomain } = self;
        // `A -> B` if no parameter is referenced
        let non_dependent = params.params.iter().all(|param| {
            !codomain.occurs(param.var.id)
                && !params.params.iter().any(|other| other.typ.occurs(param.var.id))
        });
        let domain = if non_dependent && params.len() == 1 {
            params.params[0].typ.print_prec(cfg, alloc, 1)
        } else if non_dependent {
            comma_separated(alloc, params.params.iter().map(|param| param.typ.print(cfg, alloc)))
                .parens()
        } else {
            params.print(cfg, alloc)
        };
        domain
            .append(alloc.space())
            .append(ARROW)
            .append(alloc.line())
            .append(codomain.print(cfg, alloc))
            .group()
            .parens_if(prec > 0)
    }
}

impl Subst for Pi {
    fn subst(&self, subst: &Substitution) -> Self {
        let Pi { span, params, codomain } = self;
        let params = params.subst_types(subst);
        let subst = subst.without(params.vars());
        Pi { span: *span, codomain: codomain.subst(&subst), params }
    }
}

impl FreeVars for Pi {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        collect_telescope(&self.params.params, bound, out, |bound, out| {
            self.codomain.collect_free_vars(bound, out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeUniv;

    fn nat() -> Exp {
        Exp::typ_ctor("Nat", vec![])
    }

    #[test]
    fn print_non_dependent_arrow() {
        let x = Var::fresh("x");
        let pi = Pi {
            span: None,
            params: Telescope {
                params: vec![Param { span: None, var: x, typ: Box::new(nat()) }],
            },
            codomain: Box::new(nat()),
        };
        assert_eq!(pi.print_to_string(None), "Nat -> Nat");
    }

    #[test]
    fn print_dependent_pi() {
        let a = Var::fresh("A");
        let pi = Pi {
            span: None,
            params: Telescope {
                params: vec![Param {
                    span: None,
                    var: a.clone(),
                    typ: Box::new(TypeUniv { span: None }.into()),
                }],
            },
            codomain: Box::new(Exp::var(&a)),
        };
        assert_eq!(pi.print_to_string(None), "(A: Type) -> A");
    }

    #[test]
    fn fresh_instantiation_renames_dependencies() {
        let a = Var::fresh("A");
        let x = Var::fresh("x");
        let tel = Telescope {
            params: vec![
                Param { span: None, var: a.clone(), typ: Box::new(TypeUniv { span: None }.into()) },
                Param { span: None, var: x, typ: Box::new(Exp::var(&a)) },
            ],
        };
        let (fresh, subst) = tel.instantiate_fresh();
        let fresh_a = fresh.params[0].var.clone();
        assert_ne!(fresh_a, a);
        assert_eq!(*fresh.params[1].typ, Exp::var(&fresh_a));
        assert_eq!(Exp::var(&a).subst(&subst), Exp::var(&fresh_a));
    }
}
