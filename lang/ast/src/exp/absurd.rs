use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg, theme::ThemeExt, tokens::NO_CONFUSION,
    util::print_args,
};

use super::Exp;
use crate::{BoundVars, FreeVars, IdBound, Subst, Substitution, Var};

/// An unreachable branch, discharged by the no-confusion principle of `family`:
/// `lhs` and `rhs` are provably distinct values which would have to be equal.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Absurd {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub family: IdBound,
    pub lhs: Box<Exp>,
    pub rhs: Box<Exp>,
}

impl From<Absurd> for Exp {
    fn from(val: Absurd) -> Self {
        Exp::Absurd(val)
    }
}

impl Print for Absurd {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let Absurd { span: _, family, lhs, rhs } = self;
        alloc
            .keyword(NO_CONFUSION)
            .append(alloc.typ(&family.id).brackets())
            .append(print_args(alloc, [lhs.print(cfg, alloc), rhs.print(cfg, alloc)]))
    }
}

impl Subst for Absurd {
    fn subst(&self, subst: &Substitution) -> Self {
        let Absurd { span, family, lhs, rhs } = self;
        Absurd { span: *span, family: family.clone(), lhs: lhs.subst(subst), rhs: rhs.subst(subst) }
    }
}

impl FreeVars for Absurd {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        self.lhs.collect_free_vars(bound, out);
        self.rhs.collect_free_vars(bound, out);
    }
}
