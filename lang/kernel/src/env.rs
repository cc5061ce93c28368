use std::rc::Rc;

use derivative::Derivative;

use crate::result::{KernelError, KernelResult};
use crate::term::Idx;
use crate::val::Val;

/// Values of the variables bound by enclosing binders, one vector per telescope
#[derive(Debug, Clone, Default, Derivative)]
#[derivative(Eq, PartialEq)]
pub struct Env {
    bound: Vec<Vec<Rc<Val>>>,
}

impl Env {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, idx: Idx) -> KernelResult<Rc<Val>> {
        self.bound
            .len()
            .checked_sub(1 + idx.fst)
            .and_then(|fst| self.bound.get(fst))
            .and_then(|tel| tel.len().checked_sub(1 + idx.snd).and_then(|snd| tel.get(snd)))
            .cloned()
            .ok_or_else(|| Box::new(KernelError::UnboundVariable { idx }))
    }

    /// The environment extended by one telescope
    pub fn extended(&self, tel: Vec<Rc<Val>>) -> Self {
        let mut bound = self.bound.clone();
        bound.push(tel);
        Env { bound }
    }
}

impl From<Vec<Vec<Rc<Val>>>> for Env {
    fn from(bound: Vec<Vec<Rc<Val>>>) -> Self {
        Self { bound }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_counts_from_the_right() {
        let a = Rc::new(Val::Type);
        let b = Rc::new(Val::Ctor { name: "zero".to_owned(), args: vec![] });
        let env = Env::empty().extended(vec![a.clone(), b.clone()]).extended(vec![]);
        assert_eq!(env.lookup(Idx { fst: 1, snd: 0 }).ok(), Some(b));
        assert_eq!(env.lookup(Idx { fst: 1, snd: 1 }).ok(), Some(a));
        assert!(env.lookup(Idx { fst: 0, snd: 0 }).is_err());
        assert!(env.lookup(Idx { fst: 2, snd: 0 }).is_err());
    }
}
