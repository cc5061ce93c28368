use eqc_lang_ast::{Exp, Subst, Substitution, Var};

/// Types of the local variables in scope of a case tree node
#[derive(Debug, Clone, Default)]
pub struct TypeCtx {
    bound: Vec<(Var, Exp)>,
}

impl TypeCtx {
    pub fn insert(&mut self, var: &Var, typ: Exp) {
        self.bound.push((var.clone(), typ));
    }

    pub fn lookup(&self, var: &Var) -> Option<&Exp> {
        self.bound.iter().rev().find(|(other, _)| other == var).map(|(_, typ)| typ)
    }

    pub fn contains(&self, var: &Var) -> bool {
        self.lookup(var).is_some()
    }

    /// The variable with the given identity, if it is in scope
    pub fn var(&self, id: &eqc_lang_ast::VarId) -> Option<&Var> {
        self.bound.iter().rev().find(|(var, _)| var.id == *id).map(|(var, _)| var)
    }

    /// Refine the types of all variables
    pub fn refine(&mut self, subst: &Substitution) {
        for (_, typ) in self.bound.iter_mut() {
            *typ = typ.subst(subst);
        }
    }
}
