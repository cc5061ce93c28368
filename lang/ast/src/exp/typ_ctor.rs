use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg, theme::ThemeExt, util::print_args,
};

use super::Exp;
use crate::{BoundVars, FreeVars, IdBound, Subst, Substitution, Var};

/// A type constructor applied to its indices, e.g. `Vec(A, n)`
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct TypCtor {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBound,
    pub args: Vec<Exp>,
}

impl From<TypCtor> for Exp {
    fn from(val: TypCtor) -> Self {
        Exp::TypCtor(val)
    }
}

impl Print for TypCtor {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let TypCtor { span: _, name, args } = self;
        alloc.typ(&name.id).append(print_args(alloc, args.iter().map(|arg| arg.print(cfg, alloc))))
    }
}

impl Subst for TypCtor {
    fn subst(&self, subst: &Substitution) -> Self {
        let TypCtor { span, name, args } = self;
        TypCtor { span: *span, name: name.clone(), args: args.subst(subst) }
    }
}

impl FreeVars for TypCtor {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        self.args.collect_free_vars(bound, out)
    }
}
