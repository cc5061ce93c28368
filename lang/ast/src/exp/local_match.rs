use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg,
    theme::ThemeExt,
    tokens::MATCH,
    util::{BracesExt, ParensIfExt, comma_separated},
};
use pretty::DocAllocator;

use super::Exp;
use crate::{BoundVars, Clause, FreeVars, Subst, Substitution, Var};

/// A nested pattern match `match e1, e2 { | p1, p2 => e }` inside a right-hand side
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct LocalMatch {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub scrutinees: Vec<Exp>,
    pub clauses: Vec<Clause>,
}

impl From<LocalMatch> for Exp {
    fn from(val: LocalMatch) -> Self {
        Exp::LocalMatch(val)
    }
}

impl Print for LocalMatch {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let LocalMatch { span: _, scrutinees, clauses } = self;
        let scrutinees = comma_separated(alloc, scrutinees.iter().map(|e| e.print(cfg, alloc)));
        let clauses = clauses.iter().map(|c| c.print(cfg, alloc));
        let body = alloc
            .hardline()
            .append(alloc.intersperse(clauses, alloc.hardline()))
            .nest(cfg.indent)
            .append(alloc.hardline());
        alloc
            .keyword(MATCH)
            .append(alloc.space())
            .append(scrutinees)
            .append(alloc.space())
            .append(body.braces_anno())
            .parens_if(prec > 0)
    }
}

impl Subst for LocalMatch {
    fn subst(&self, subst: &Substitution) -> Self {
        let LocalMatch { span, scrutinees, clauses } = self;
        LocalMatch {
            span: *span,
            scrutinees: scrutinees.subst(subst),
            clauses: clauses.subst(subst),
        }
    }
}

impl FreeVars for LocalMatch {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        self.scrutinees.collect_free_vars(bound, out);
        self.clauses.collect_free_vars(bound, out);
    }
}
