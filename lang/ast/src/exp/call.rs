use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg, theme::ThemeExt, util::print_args,
};

use super::Exp;
use crate::{BoundVars, FreeVars, IdBound, Subst, Substitution, Var};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Constructor,
    Definition,
}

/// A call of a constructor or of a toplevel definition, e.g. `succ(n)` or `add(m, n)`
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Call {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub kind: CallKind,
    pub name: IdBound,
    pub args: Vec<Exp>,
}

impl Call {
    pub fn new(kind: CallKind, name: &str, args: Vec<Exp>) -> Self {
        Call { span: None, kind, name: IdBound::from_string(name), args }
    }
}

impl From<Call> for Exp {
    fn from(val: Call) -> Self {
        Exp::Call(val)
    }
}

impl Print for Call {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let Call { span: _, kind, name, args } = self;
        let head = match kind {
            CallKind::Constructor => alloc.ctor(&name.id),
            CallKind::Definition => alloc.def(&name.id),
        };
        head.append(print_args(alloc, args.iter().map(|arg| arg.print(cfg, alloc))))
    }
}

impl Subst for Call {
    fn subst(&self, subst: &Substitution) -> Self {
        let Call { span, kind, name, args } = self;
        Call { span: *span, kind: *kind, name: name.clone(), args: args.subst(subst) }
    }
}

impl FreeVars for Call {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        self.args.collect_free_vars(bound, out)
    }
}
