use std::rc::Rc;

use derivative::Derivative;
use eqc_lang_ast::Var;

use crate::env::Env;
use crate::term::{Arm, Binder, Lvl, Term};

/// The result of evaluation
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq)]
pub enum Val {
    TypCtor { name: String, args: Vec<Rc<Val>> },
    Ctor { name: String, args: Vec<Rc<Val>> },
    Type,
    Pi { param: Binder, domain: Rc<Val>, codomain: Closure },
    Lam(Closure),
    /// A fixpoint which has not been applied yet
    Fix(Rc<FixClosure>),
    Neu(Neu),
}

/// A term whose evaluation is blocked
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq)]
pub enum Neu {
    Var {
        #[derivative(PartialEq = "ignore")]
        name: String,
        lvl: Lvl,
    },
    Free(Var),
    /// A definition which is not part of the signature
    Def(String),
    App { fun: Box<Neu>, args: Vec<Rc<Val>> },
    Cases { family: String, scrutinee: Box<Neu>, arms: Vec<Arm>, env: Env },
    /// A fixpoint which is under-applied or whose decreasing argument is not a constructor
    Fix { fix: Rc<FixClosure>, args: Vec<Rc<Val>> },
    NoConfusion { family: String, lhs: Rc<Val>, rhs: Rc<Val> },
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq)]
pub struct Closure {
    pub params: Vec<Binder>,
    pub env: Env,
    pub body: Term,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq)]
pub struct FixClosure {
    pub name: String,
    pub arity: usize,
    pub decrease: ValDecrease,
    pub env: Env,
    /// Evaluated in `env` extended by the fixpoint itself
    pub body: Term,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValDecrease {
    Structural { arg: usize },
    Measure { measure: Rc<Val> },
}

impl Val {
    pub fn neu(neu: Neu) -> Rc<Self> {
        Rc::new(Val::Neu(neu))
    }

    pub fn is_ctor(&self) -> bool {
        matches!(self, Val::Ctor { .. })
    }

    /// A short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Val::TypCtor { name, .. } => format!("type {name}"),
            Val::Ctor { name, .. } => format!("constructor {name}"),
            Val::Type => "Type".to_owned(),
            Val::Pi { .. } => "a function type".to_owned(),
            Val::Lam(_) => "a function".to_owned(),
            Val::Fix(fix) => format!("fixpoint {}", fix.name),
            Val::Neu(_) => "a stuck term".to_owned(),
        }
    }
}
