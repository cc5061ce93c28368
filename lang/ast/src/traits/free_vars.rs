use crate::{HashSet, Var, VarId};

/// Collect the free local variables of a syntactic item, in order of first occurrence.
pub trait FreeVars {
    /// Add the free variables to `out`, skipping those in `bound`.
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>);

    fn free_vars(&self) -> Vec<Var> {
        let mut out = Vec::new();
        self.collect_free_vars(&mut BoundVars::default(), &mut out);
        out
    }

    fn occurs(&self, id: VarId) -> bool {
        self.free_vars().iter().any(|var| var.id == id)
    }
}

/// Variables bound by enclosing binders
#[derive(Debug, Default)]
pub struct BoundVars {
    bound: HashSet<VarId>,
}

impl BoundVars {
    pub fn contains(&self, id: &VarId) -> bool {
        self.bound.contains(id)
    }

    /// Run `f` with `vars` additionally bound
    pub fn bind<'v, I, T, F>(&mut self, vars: I, f: F) -> T
    where
        I: IntoIterator<Item = &'v Var>,
        F: FnOnce(&mut BoundVars) -> T,
    {
        let added: Vec<VarId> =
            vars.into_iter().map(|var| var.id).filter(|id| self.bound.insert(*id)).collect();
        let res = f(self);
        for id in added {
            self.bound.remove(&id);
        }
        res
    }
}

pub(crate) fn push_free(var: &Var, bound: &BoundVars, out: &mut Vec<Var>) {
    if !bound.contains(&var.id) && !out.contains(var) {
        out.push(var.clone());
    }
}

impl<T: FreeVars> FreeVars for Box<T> {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        T::collect_free_vars(self, bound, out)
    }
}

impl<T: FreeVars> FreeVars for Option<T> {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        if let Some(x) = self {
            x.collect_free_vars(bound, out)
        }
    }
}

impl<T: FreeVars> FreeVars for Vec<T> {
    fn collect_free_vars(&self, bound: &mut BoundVars, out: &mut Vec<Var>) {
        for x in self {
            x.collect_free_vars(bound, out)
        }
    }
}
