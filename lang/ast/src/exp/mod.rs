use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::{BoundVars, FreeVars, HasSpan, Subst, Substitution, Var};

mod absurd;
mod anno;
mod app;
mod call;
mod cases;
mod lam;
mod local_match;
mod pi;
mod typ_ctor;
mod type_univ;
mod variable;

pub use absurd::*;
pub use anno::*;
pub use app::*;
pub use call::*;
pub use cases::*;
pub use lam::*;
pub use local_match::*;
pub use pi::*;
pub use typ_ctor::*;
pub use type_univ::*;
pub use variable::*;

// Exp
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Exp {
    Variable(Variable),
    TypCtor(TypCtor),
    Call(Call),
    App(App),
    Lam(Lam),
    Pi(Pi),
    TypeUniv(TypeUniv),
    Anno(Anno),
    LocalMatch(LocalMatch),
    /// Primitive case analysis, produced by the equation compiler
    Cases(Cases),
    /// Primitive no-confusion discriminator, produced by the equation compiler
    Absurd(Absurd),
}

impl Exp {
    pub fn var(var: &Var) -> Self {
        Variable::new(var).into()
    }

    /// A constructor call without source location
    pub fn ctor(name: &str, args: Vec<Exp>) -> Self {
        Call::new(CallKind::Constructor, name, args).into()
    }

    /// A definition call without source location
    pub fn def_call(name: &str, args: Vec<Exp>) -> Self {
        Call::new(CallKind::Definition, name, args).into()
    }

    pub fn typ_ctor(name: &str, args: Vec<Exp>) -> Self {
        TypCtor { span: None, name: crate::IdBound::from_string(name), args }.into()
    }

    /// If the expression is a local variable, return it
    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Exp::Variable(Variable { var, .. }) => Some(var),
            _ => None,
        }
    }

    /// If the expression is headed by a constructor, return its name and arguments
    pub fn as_ctor(&self) -> Option<(&str, &[Exp])> {
        match self {
            Exp::Call(Call { kind: CallKind::Constructor, name, args, .. }) => {
                Some((&name.id, args))
            }
            _ => None,
        }
    }

    /// Remove type annotations at the head of the expression
    pub fn strip_anno(&self) -> &Exp {
        match self {
            Exp::Anno(Anno { exp, .. }) => exp.strip_anno(),
            _ => self,
        }
    }

    /// Whether the expression contains a nested `match`
    pub fn contains_local_match(&self) -> bool {
        match self {
            Exp::Variable(_) | Exp::TypeUniv(_) => false,
            Exp::TypCtor(TypCtor { args, .. }) | Exp::Call(Call { args, .. }) => {
                args.iter().any(Exp::contains_local_match)
            }
            Exp::App(App { fun, args, .. }) => {
                fun.contains_local_match() || args.iter().any(Exp::contains_local_match)
            }
            Exp::Lam(Lam { body, .. }) => body.contains_local_match(),
            Exp::Pi(Pi { params, codomain, .. }) => {
                params.params.iter().any(|param| param.typ.contains_local_match())
                    || codomain.contains_local_match()
            }
            Exp::Anno(Anno { exp, typ, .. }) => {
                exp.contains_local_match() || typ.contains_local_match()
            }
            Exp::LocalMatch(_) => true,
            Exp::Cases(Cases { scrutinee, arms, .. }) => {
                scrutinee.contains_local_match()
                    || arms.iter().any(|arm| arm.body.contains_local_match())
            }
            Exp::Absurd(Absurd { lhs, rhs, .. }) => {
                lhs.contains_local_match() || rhs.contains_local_match()
            }
        }
    }
}

impl HasSpan for Exp {
    fn span(&self) -> Option<Span> {
        match self {
            Exp::Variable(e) => e.span,
            Exp::TypCtor(e) => e.span,
            Exp::Call(e) => e.span,
            Exp::App(e) => e.span,
            Exp::Lam(e) => e.span,
            Exp::Pi(e) => e.span,
            Exp::TypeUniv(e) => e.span,
            Exp::Anno(e) => e.span,
            Exp::LocalMatch(e) => e.span,
            Exp::Cases(e) => e.span,
            Exp::Absurd(e) => e.span,
        }
    }
}

impl Print for Exp {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Exp::Variable(e) => e.print_prec(cfg, alloc, prec),
            Exp::TypCtor(e) => e.print_prec(cfg, alloc, prec),
            Exp::Call(e) => e.print_prec(cfg, alloc, prec),
            Exp::App(e) => e.print_prec(cfg, alloc, prec),
            Exp::Lam(e) => e.print_prec(cfg, alloc, prec),
            Exp::Pi(e) => e.print_prec(cfg, alloc, prec),
            Exp::TypeUniv(e) => e.print_prec(cfg, alloc, prec),
            Exp::Anno(e) => e.print_prec(cfg, alloc, prec),
            Exp::LocalMatch(e) => e.print_prec(cfg, alloc, prec),
            Exp::Cases(e) => e.print_prec(cfg, alloc, prec),
            Exp::Absurd(e) => e.print_prec(cfg, alloc, prec),
        }
    }
}

impl Subst for Exp {
    fn subst(&self, subst: &Substitution) -> Self {
        if subst.is_empty() {
            return self.clone();
        }
        match self {
            Exp::Variable(e) => e.subst(subst),
            Exp::TypCtor(e) => e.subst(subst).into(),
            Exp::Call(e) => e.subst(subst).into(),
            Exp::App(e) => e.subst(subst).into(),
            Exp::Lam(e) => e.subst(subst).into(),
            Exp::Pi(e) => e.subst(subst).into(),
            Exp::TypeUniv(e) => e.clone().into(),
            Exp::Anno(e) => e.subst(subst).into(),
            Exp::LocalMatch(e) => e.subst(subst).into(),
            Exp::Cases(e) => e.subst(subst).into(),
            Exp::Absurd(e) => e.subst(subst).into(),
        }
    }
}

impl FreeVars for Exp {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        match self {
            Exp::Variable(e) => e.collect_free_vars(bound, out),
            Exp::TypCtor(e) => e.collect_free_vars(bound, out),
            Exp::Call(e) => e.collect_free_vars(bound, out),
            Exp::App(e) => e.collect_free_vars(bound, out),
            Exp::Lam(e) => e.collect_free_vars(bound, out),
            Exp::Pi(e) => e.collect_free_vars(bound, out),
            Exp::TypeUniv(_) => {}
            Exp::Anno(e) => e.collect_free_vars(bound, out),
            Exp::LocalMatch(e) => e.collect_free_vars(bound, out),
            Exp::Cases(e) => e.collect_free_vars(bound, out),
            Exp::Absurd(e) => e.collect_free_vars(bound, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_nested_calls() {
        let n = Var::fresh("n");
        let one = Exp::ctor("succ", vec![Exp::ctor("zero", vec![])]);
        let e = Exp::def_call("add", vec![Exp::var(&n), one]);
        assert_eq!(e.print_to_string(None), "add(n, succ(zero))");
    }

    #[test]
    fn free_vars_skip_binders() {
        let x = Var::fresh("x");
        let y = Var::fresh("y");
        let body = Box::new(Exp::def_call("f", vec![Exp::var(&x), Exp::var(&y)]));
        let lam: Exp = Lam { span: None, params: vec![x.clone()], body }.into();
        assert_eq!(lam.free_vars(), vec![y]);
    }

    #[test]
    fn subst_replaces_free_occurrences() {
        let x = Var::fresh("x");
        let e = Exp::ctor("succ", vec![Exp::var(&x)]);
        let res = e.subst(&Substitution::single(&x, Exp::ctor("zero", vec![])));
        assert_eq!(res, Exp::ctor("succ", vec![Exp::ctor("zero", vec![])]));
    }
}
