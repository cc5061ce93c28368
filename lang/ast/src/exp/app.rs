use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{Alloc, Builder, Precedence, Print, PrintCfg, util::print_args};

use super::Exp;
use crate::{BoundVars, FreeVars, Subst, Substitution, Var};

/// Application of a local function, e.g. `g(x)` where `g` is a parameter
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct App {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub fun: Box<Exp>,
    pub args: Vec<Exp>,
}

impl From<App> for Exp {
    fn from(val: App) -> Self {
        Exp::App(val)
    }
}

impl Print for App {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let App { span: _, fun, args } = self;
        let args = print_args(alloc, args.iter().map(|arg| arg.print(cfg, alloc)));
        match **fun {
            Exp::Variable(_) | Exp::Call(_) | Exp::App(_) => fun.print_prec(cfg, alloc, 2),
            _ => fun.print(cfg, alloc).parens(),
        }
        .append(args)
    }
}

impl Subst for App {
    fn subst(&self, subst: &Substitution) -> Self {
        let App { span, fun, args } = self;
        App { span: *span, fun: fun.subst(subst), args: args.subst(subst) }
    }
}

impl FreeVars for App {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        self.fun.collect_free_vars(bound, out);
        self.args.collect_free_vars(bound, out);
    }
}
