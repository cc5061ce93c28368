use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg, tokens::COLON, util::ParensIfExt,
};
use pretty::DocAllocator;

use super::Exp;
use crate::{BoundVars, FreeVars, Subst, Substitution, Var};

/// A type annotation `(e : T)`
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Anno {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub exp: Box<Exp>,
    pub typ: Box<Exp>,
}

impl From<Anno> for Exp {
    fn from(val: Anno) -> Self {
        Exp::Anno(val)
    }
}

impl Print for Anno {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let Anno { span: _, exp, typ } = self;
        exp.print_prec(cfg, alloc, 1)
            .append(alloc.space())
            .append(COLON)
            .append(alloc.space())
            .append(typ.print(cfg, alloc))
            .parens_if(prec > 0)
    }
}

impl Subst for Anno {
    fn subst(&self, subst: &Substitution) -> Self {
        let Anno { span, exp, typ } = self;
        Anno { span: *span, exp: exp.subst(subst), typ: typ.subst(subst) }
    }
}

impl FreeVars for Anno {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        self.exp.collect_free_vars(bound, out);
        self.typ.collect_free_vars(bound, out);
    }
}
