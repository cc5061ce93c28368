use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Precedence, Print, PrintCfg,
    theme::ThemeExt,
    tokens::{CASES, COMMA, FAT_ARROW},
    util::{BracesExt, ParensIfExt, print_args},
};
use pretty::DocAllocator;

use super::Exp;
use crate::{BoundVars, FreeVars, IdBound, Subst, Substitution, Var};

// Cases
//
//

/// Primitive case analysis on a value of an inductive family.
///
/// There is exactly one arm per constructor of the family, in declaration order.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Cases {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub family: IdBound,
    pub scrutinee: Box<Exp>,
    pub arms: Vec<Arm>,
}

impl From<Cases> for Exp {
    fn from(val: Cases) -> Self {
        Exp::Cases(val)
    }
}

impl Print for Cases {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let Cases { span: _, family, scrutinee, arms } = self;
        let sep = alloc.text(COMMA).append(alloc.hardline());
        let body = alloc
            .hardline()
            .append(alloc.intersperse(arms.iter().map(|arm| arm.print(cfg, alloc)), sep))
            .nest(cfg.indent)
            .append(alloc.hardline());
        alloc
            .keyword(CASES)
            .append(alloc.typ(&family.id).brackets())
            .append(alloc.space())
            .append(scrutinee.print_prec(cfg, alloc, 1))
            .append(alloc.space())
            .append(body.braces_anno())
            .parens_if(prec > 0)
    }
}

impl Subst for Cases {
    fn subst(&self, subst: &Substitution) -> Self {
        let Cases { span, family, scrutinee, arms } = self;
        Cases {
            span: *span,
            family: family.clone(),
            scrutinee: scrutinee.subst(subst),
            arms: arms.subst(subst),
        }
    }
}

impl FreeVars for Cases {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        self.scrutinee.collect_free_vars(bound, out);
        self.arms.collect_free_vars(bound, out);
    }
}

// Arm
//
//

/// One branch of [Cases], binding the fields of the constructor.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Arm {
    pub ctor: IdBound,
    pub params: Vec<Var>,
    /// Local variables which are known to have a more specific value in this branch,
    /// as determined by unifying the indices of the constructor.
    /// These are already substituted in `body`; they are kept for the termination checker.
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub refinements: Vec<(Var, Exp)>,
    pub body: Box<Exp>,
}

impl Print for Arm {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Arm { ctor, params, refinements: _, body } = self;
        alloc
            .ctor(&ctor.id)
            .append(print_args(alloc, params.iter().map(|param| param.print(cfg, alloc))))
            .append(alloc.space())
            .append(FAT_ARROW)
            .append(alloc.line().append(body.print(cfg, alloc)).nest(cfg.indent))
            .group()
    }
}

impl Subst for Arm {
    fn subst(&self, subst: &Substitution) -> Self {
        let Arm { ctor, params, refinements, body } = self;
        let subst = subst.without(params);
        let refinements = refinements
            .iter()
            .filter_map(|(var, exp)| {
                // A refined variable which is itself substituted stays a refinement
                // only if it is renamed to another variable.
                let var = match subst.get(&var.id) {
                    Some(Exp::Variable(v)) => v.var.clone(),
                    Some(_) => return None,
                    None => var.clone(),
                };
                Some((var, exp.subst(&subst)))
            })
            .collect();
        Arm { ctor: ctor.clone(), params: params.clone(), refinements, body: body.subst(&subst) }
    }
}

impl FreeVars for Arm {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        bound.bind(&self.params, |bound| self.body.collect_free_vars(bound, out))
    }
}
