//! Discrimination of values by no-confusion and acyclicity of constructors

use std::rc::Rc;

use crate::dec::*;
use crate::val::{Neu, Val};

/// Why two values are distinct
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clash {
    /// Two different constructors
    Ctor { lhs: String, rhs: String },
    /// A stuck term equated with a constructor tree that strictly contains it
    Cycle,
}

/// Decide whether `lhs` and `rhs` are provably distinct
///
/// Constructors are injective, so equal heads are discriminated by their arguments.
/// `No` means that the values may still be equal for some instantiation of their free and
/// stuck subterms.
pub fn discriminate(lhs: &Val, rhs: &Val) -> Dec<Clash> {
    match (lhs, rhs) {
        (
            Val::Ctor { name: lhs_name, args: lhs_args },
            Val::Ctor { name: rhs_name, args: rhs_args },
        ) => {
            if lhs_name != rhs_name {
                return Yes(Clash::Ctor { lhs: lhs_name.clone(), rhs: rhs_name.clone() });
            }
            discriminate_args(lhs_args, rhs_args)
        }
        (
            Val::TypCtor { name: lhs_name, args: lhs_args },
            Val::TypCtor { name: rhs_name, args: rhs_args },
        ) if lhs_name == rhs_name => {
            discriminate_args(lhs_args, rhs_args)
        }
        (Val::Neu(neu), ctor @ Val::Ctor { .. }) | (ctor @ Val::Ctor { .. }, Val::Neu(neu)) => {
            if occurs_strictly(neu, ctor) { Yes(Clash::Cycle) } else { No(()) }
        }
        _ => No(()),
    }
}

fn discriminate_args(lhs: &[Rc<Val>], rhs: &[Rc<Val>]) -> Dec<Clash> {
    for (lhs, rhs) in lhs.iter().zip(rhs.iter()) {
        if let Yes(clash) = discriminate(lhs, rhs) {
            return Yes(clash);
        }
    }
    No(())
}

/// Whether `neu` occurs below at least one constructor in `val`
fn occurs_strictly(neu: &Neu, val: &Val) -> bool {
    match val {
        Val::Ctor { args, .. } => args.iter().any(|arg| match &**arg {
            Val::Neu(other) => other == neu,
            ctor @ Val::Ctor { .. } => occurs_strictly(neu, ctor),
            _ => false,
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqc_lang_ast::Var;

    fn zero() -> Rc<Val> {
        Rc::new(Val::Ctor { name: "zero".to_owned(), args: vec![] })
    }

    fn succ(val: Rc<Val>) -> Rc<Val> {
        Rc::new(Val::Ctor { name: "succ".to_owned(), args: vec![val] })
    }

    fn free(name: &str) -> Rc<Val> {
        Val::neu(Neu::Free(Var::fresh(name)))
    }

    #[test]
    fn different_constructors_clash() {
        let res = discriminate(&zero(), &succ(free("n")));
        assert!(matches!(res, Yes(Clash::Ctor { .. })));
    }

    #[test]
    fn injectivity_finds_nested_clash() {
        let n = free("n");
        let res = discriminate(&succ(succ(n.clone())), &succ(zero()));
        assert!(res.is_yes());
        assert!(!discriminate(&succ(n.clone()), &succ(zero())).is_yes());
    }

    #[test]
    fn cycles_are_distinct() {
        let n = free("n");
        assert!(matches!(discriminate(&n, &succ(succ(n.clone()))), Yes(Clash::Cycle)));
        assert!(!discriminate(&n, &succ(free("m"))).is_yes());
        assert!(!discriminate(&n, &n).is_yes());
    }
}
