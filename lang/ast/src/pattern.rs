use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg,
    theme::ThemeExt,
    tokens::{DOT, FAT_ARROW, PIPE, UNDERSCORE},
    util::{comma_separated, print_args},
};
use pretty::DocAllocator;

use crate::{BoundVars, Exp, FreeVars, HasSpan, IdBound, Subst, Substitution, Var};

// Pattern
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Pattern {
    /// Matches anything and binds it
    Var(PatVar),
    /// Matches anything without binding it
    Wildcard(Wildcard),
    /// A constructor applied to sub-patterns
    Ctor(CtorPattern),
    /// A forced expression `.e`, checked but never matched upon
    Inaccessible(Inaccessible),
    /// An arbitrary expression in pattern position, which has to normalize to
    /// a constructor tree
    Term(TermPattern),
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct PatVar {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub var: Var,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Wildcard {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct CtorPattern {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBound,
    pub args: Vec<Pattern>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Inaccessible {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub exp: Box<Exp>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct TermPattern {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub exp: Box<Exp>,
    /// The pattern variables occurring in `exp`, e.g. `x` in `add(x, 2)`
    pub binders: Vec<Var>,
}

impl Pattern {
    pub fn var(var: Var) -> Self {
        Pattern::Var(PatVar { span: None, var })
    }

    pub fn wildcard() -> Self {
        Pattern::Wildcard(Wildcard { span: None })
    }

    pub fn ctor(name: &str, args: Vec<Pattern>) -> Self {
        Pattern::Ctor(CtorPattern { span: None, name: IdBound::from_string(name), args })
    }

    pub fn inaccessible(exp: Exp) -> Self {
        Pattern::Inaccessible(Inaccessible { span: None, exp: Box::new(exp) })
    }

    /// Whether the pattern matches every value without inspecting it
    pub fn is_irrefutable(&self) -> bool {
        matches!(self, Pattern::Var(_) | Pattern::Wildcard(_) | Pattern::Inaccessible(_))
    }

    /// Collect the variables bound by this pattern, in left-to-right order.
    /// Repeated occurrences are collected repeatedly.
    pub fn binders(&self, out: &mut Vec<Var>) {
        match self {
            Pattern::Var(PatVar { var, .. }) => out.push(var.clone()),
            Pattern::Ctor(CtorPattern { args, .. }) => {
                for arg in args {
                    arg.binders(out)
                }
            }
            Pattern::Term(TermPattern { binders, .. }) => out.extend(binders.iter().cloned()),
            Pattern::Wildcard(_) | Pattern::Inaccessible(_) => {}
        }
    }
}

impl HasSpan for Pattern {
    fn span(&self) -> Option<Span> {
        match self {
            Pattern::Var(p) => p.span,
            Pattern::Wildcard(p) => p.span,
            Pattern::Ctor(p) => p.span,
            Pattern::Inaccessible(p) => p.span,
            Pattern::Term(p) => p.span,
        }
    }
}

impl Print for Pattern {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Pattern::Var(PatVar { var, .. }) => var.print(cfg, alloc),
            Pattern::Wildcard(_) => alloc.text(UNDERSCORE),
            Pattern::Ctor(CtorPattern { name, args, .. }) => alloc
                .ctor(&name.id)
                .append(print_args(alloc, args.iter().map(|arg| arg.print(cfg, alloc)))),
            Pattern::Inaccessible(Inaccessible { exp, .. }) => {
                alloc.text(DOT).append(exp.print(cfg, alloc).parens())
            }
            Pattern::Term(TermPattern { exp, .. }) => exp.print(cfg, alloc),
        }
    }
}

impl Subst for Pattern {
    fn subst(&self, subst: &Substitution) -> Self {
        match self {
            Pattern::Var(_) | Pattern::Wildcard(_) => self.clone(),
            Pattern::Ctor(CtorPattern { span, name, args }) => {
                let args = args.subst(subst);
                Pattern::Ctor(CtorPattern { span: *span, name: name.clone(), args })
            }
            Pattern::Inaccessible(Inaccessible { span, exp }) => {
                Pattern::Inaccessible(Inaccessible { span: *span, exp: exp.subst(subst) })
            }
            Pattern::Term(TermPattern { span, exp, binders }) => Pattern::Term(TermPattern {
                span: *span,
                exp: exp.subst(&subst.without(binders)),
                binders: binders.clone(),
            }),
        }
    }
}

impl FreeVars for Pattern {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        match self {
            Pattern::Var(_) | Pattern::Wildcard(_) => {}
            Pattern::Ctor(CtorPattern { args, .. }) => args.collect_free_vars(bound, out),
            Pattern::Inaccessible(Inaccessible { exp, .. }) => exp.collect_free_vars(bound, out),
            Pattern::Term(TermPattern { exp, binders, .. }) => {
                bound.bind(binders, |bound| exp.collect_free_vars(bound, out))
            }
        }
    }
}

// Lhs
//
//

/// The left-hand side of a clause
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Lhs {
    /// The name of the defined function, if it was written out as in `f(p, q) => ..`
    pub head: Option<IdBound>,
    pub pats: Vec<Pattern>,
}

impl Print for Lhs {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Lhs { head, pats } = self;
        let pats = pats.iter().map(|pat| pat.print(cfg, alloc));
        match head {
            Some(head) => alloc.def(&head.id).append(print_args(alloc, pats)),
            None => comma_separated(alloc, pats),
        }
    }
}

// Clause
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Clause {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub lhs: Lhs,
    pub rhs: Box<Exp>,
}

impl Clause {
    /// The variables bound by the patterns of this clause
    pub fn binders(&self) -> Vec<Var> {
        let mut out = Vec::new();
        for pat in &self.lhs.pats {
            pat.binders(&mut out);
        }
        out
    }
}

impl HasSpan for Clause {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Print for Clause {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Clause { span: _, lhs, rhs } = self;
        alloc
            .text(PIPE)
            .append(alloc.space())
            .append(lhs.print(cfg, alloc))
            .append(alloc.space())
            .append(FAT_ARROW)
            .append(alloc.line().append(rhs.print(cfg, alloc)).nest(cfg.indent))
            .group()
    }
}

impl Subst for Clause {
    fn subst(&self, subst: &Substitution) -> Self {
        let Clause { span, lhs: Lhs { head, pats }, rhs } = self;
        let binders = self.binders();
        let subst = subst.without(&binders);
        Clause {
            span: *span,
            lhs: Lhs { head: head.clone(), pats: pats.subst(&subst) },
            rhs: rhs.subst(&subst),
        }
    }
}

impl FreeVars for Clause {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        let binders = self.binders();
        bound.bind(&binders, |bound| {
            self.lhs.pats.collect_free_vars(bound, out);
            self.rhs.collect_free_vars(bound, out);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_clause_with_inaccessible() {
        let n = Var::fresh("n");
        let x = Var::fresh("x");
        let clause = Clause {
            span: None,
            lhs: Lhs {
                head: None,
                pats: vec![
                    Pattern::inaccessible(Exp::var(&n)),
                    Pattern::ctor("succ", vec![Pattern::var(x.clone())]),
                    Pattern::wildcard(),
                ],
            },
            rhs: Box::new(Exp::var(&x)),
        };
        assert_eq!(clause.print_to_string(None), "| .(n), succ(x), _ => x");
    }

    #[test]
    fn clause_binders_are_not_free() {
        let n = Var::fresh("n");
        let x = Var::fresh("x");
        let clause = Clause {
            span: None,
            lhs: Lhs {
                head: None,
                pats: vec![Pattern::var(x.clone()), Pattern::inaccessible(Exp::var(&n))],
            },
            rhs: Box::new(Exp::def_call("f", vec![Exp::var(&x), Exp::var(&n)])),
        };
        assert_eq!(clause.free_vars(), vec![n]);
    }
}
