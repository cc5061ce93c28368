use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use super::Exp;
use crate::{BoundVars, FreeVars, Substitution, Var, traits::push_free};

/// An occurrence of a local variable
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Variable {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub var: Var,
}

impl Variable {
    pub fn new(var: &Var) -> Self {
        Variable { span: None, var: var.clone() }
    }

    /// Substitution may replace a variable by an arbitrary expression
    pub fn subst(&self, subst: &Substitution) -> Exp {
        match subst.get(&self.var.id) {
            Some(exp) => exp.clone(),
            None => self.clone().into(),
        }
    }
}

impl From<Variable> for Exp {
    fn from(val: Variable) -> Self {
        Exp::Variable(val)
    }
}

impl Print for Variable {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.var.print(cfg, alloc)
    }
}

impl FreeVars for Variable {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        push_free(&self.var, bound, out)
    }
}
