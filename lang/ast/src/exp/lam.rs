use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg,
    tokens::{BACKSLASH, DOT},
    util::{ParensIfExt, comma_separated},
};
use pretty::DocAllocator;

use super::Exp;
use crate::{BoundVars, FreeVars, Subst, Substitution, Var};

/// An anonymous function `\x, y. e`
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Lam {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub params: Vec<Var>,
    pub body: Box<Exp>,
}

impl From<Lam> for Exp {
    fn from(val: Lam) -> Self {
        Exp::Lam(val)
    }
}

impl Print for Lam {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let Lam { span: _, params, body } = self;
        alloc
            .text(BACKSLASH)
            .append(comma_separated(alloc, params.iter().map(|param| param.print(cfg, alloc))))
            .append(DOT)
            .append(alloc.line().append(body.print(cfg, alloc)).nest(cfg.indent))
            .group()
            .parens_if(prec > 0)
    }
}

impl Subst for Lam {
    fn subst(&self, subst: &Substitution) -> Self {
        let Lam { span, params, body } = self;
        let subst = subst.without(params);
        Lam { span: *span, params: params.clone(), body: body.subst(&subst) }
    }
}

impl FreeVars for Lam {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        bound.bind(&self.params, |bound| self.body.collect_free_vars(bound, out))
    }
}
