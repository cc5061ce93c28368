use std::borrow::Cow;

use crate::{Exp, HashMap, Var, VarId};

// Substitution
//
//

/// A finite map from local variables to expressions.
///
/// Since every binder carries a globally unique [VarId], substituting under a binder
/// can never capture a variable. Binders whose variable is in the domain of the
/// substitution shadow the corresponding entry.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    map: HashMap<VarId, Exp>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(var: &Var, exp: Exp) -> Self {
        let mut subst = Self::new();
        subst.insert(var, exp);
        subst
    }

    pub fn insert(&mut self, var: &Var, exp: Exp) {
        self.map.insert(var.id, exp);
    }

    pub fn get(&self, id: &VarId) -> Option<&Exp> {
        self.map.get(id)
    }

    pub fn contains(&self, id: &VarId) -> bool {
        self.map.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VarId, &Exp)> {
        self.map.iter()
    }

    /// The substitution with the entries for `vars` removed.
    ///
    /// Used when going under a binder for `vars`.
    pub fn without<'a, I>(&self, vars: I) -> Cow<'_, Self>
    where
        I: IntoIterator<Item = &'a Var>,
    {
        let shadowed: Vec<VarId> =
            vars.into_iter().map(|var| var.id).filter(|id| self.map.contains_key(id)).collect();
        if shadowed.is_empty() {
            Cow::Borrowed(self)
        } else {
            let mut map = self.map.clone();
            for id in shadowed {
                map.remove(&id);
            }
            Cow::Owned(Substitution { map })
        }
    }

    /// Sequential composition: first apply `self`, then `other`.
    ///
    /// `e.subst(&self.then(other)) == e.subst(self).subst(other)`
    pub fn then(&self, other: &Substitution) -> Substitution {
        let mut map: HashMap<VarId, Exp> =
            self.map.iter().map(|(id, exp)| (*id, exp.subst(other))).collect();
        for (id, exp) in other.map.iter() {
            map.entry(*id).or_insert_with(|| exp.clone());
        }
        Substitution { map }
    }
}

pub trait Subst: Sized {
    fn subst(&self, subst: &Substitution) -> Self;
}

impl<T: Subst> Subst for Box<T> {
    fn subst(&self, subst: &Substitution) -> Self {
        Box::new(T::subst(self, subst))
    }
}

impl<T: Subst> Subst for Option<T> {
    fn subst(&self, subst: &Substitution) -> Self {
        self.as_ref().map(|x| x.subst(subst))
    }
}

impl<T: Subst> Subst for Vec<T> {
    fn subst(&self, subst: &Substitution) -> Self {
        self.iter().map(|x| x.subst(subst)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Call, CallKind, IdBound, Variable};

    fn succ(e: Exp) -> Exp {
        let name = IdBound::from_string("succ");
        Call { span: None, kind: CallKind::Constructor, name, args: vec![e] }.into()
    }

    #[test]
    fn compose_applies_second_to_first() {
        let x = Var::fresh("x");
        let y = Var::fresh("y");
        let z = Var::fresh("z");
        let first = Substitution::single(&x, succ(Variable::new(&y).into()));
        let second = Substitution::single(&y, Variable::new(&z).into());
        let composed = first.then(&second);

        let e: Exp = Variable::new(&x).into();
        assert_eq!(e.subst(&composed), e.subst(&first).subst(&second));
        assert_eq!(e.subst(&composed), succ(Variable::new(&z).into()));
    }

    #[test]
    fn without_removes_shadowed_entries() {
        let x = Var::fresh("x");
        let subst = Substitution::single(&x, Variable::new(&Var::fresh("y")).into());
        assert!(subst.without([&x]).is_empty());
        assert!(!subst.without([&Var::fresh("x")]).is_empty());
    }
}
