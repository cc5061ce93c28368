use std::fmt;

use derivative::Derivative;
use eqc_lang_ast::Var;
use eqc_lang_printer::{
    Alloc, Builder, DocAllocator, Precedence, Print, PrintCfg,
    theme::ThemeExt,
    tokens::*,
    util::{BracesExt, ParensIfExt, comma_separated, print_args},
};

// Variables
//
//

/// Two-level De Bruijn index
///
/// Every binder binds a whole telescope of variables.
/// `fst` counts the telescopes between the occurrence and its binder,
/// `snd` counts the variables of that telescope from the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Idx {
    pub fst: usize,
    pub snd: usize,
}

/// Two-level De Bruijn level
///
/// Like [Idx], but both components count from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lvl {
    pub fst: usize,
    pub snd: usize,
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.fst, self.snd)
    }
}

impl fmt::Display for Lvl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.fst, self.snd)
    }
}

/// The name of a bound variable, only used for printing
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Binder {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: String,
}

impl Binder {
    pub fn new(name: impl Into<String>) -> Self {
        Binder { name: name.into() }
    }
}

impl Print for Binder {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc.text(&self.name)
    }
}

// Terms
//
//

/// Core terms of the kernel
///
/// Equality is alpha-equivalence: binder names are ignored.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Term {
    /// A variable bound within the term
    Var {
        #[derivative(PartialEq = "ignore", Hash = "ignore")]
        name: String,
        idx: Idx,
    },
    /// A variable bound outside of the term
    Free(Var),
    /// A toplevel definition
    Def(String),
    TypCtor {
        name: String,
        args: Vec<Term>,
    },
    Ctor {
        name: String,
        args: Vec<Term>,
    },
    Lam {
        params: Vec<Binder>,
        body: Box<Term>,
    },
    App {
        fun: Box<Term>,
        args: Vec<Term>,
    },
    /// Dependent function type with a single parameter
    Pi {
        param: Binder,
        domain: Box<Term>,
        codomain: Box<Term>,
    },
    Type,
    /// Case analysis on a value of an inductive family
    Cases {
        family: String,
        scrutinee: Box<Term>,
        arms: Vec<Arm>,
    },
    /// Guarded fixpoint
    ///
    /// The body binds the fixpoint itself and is expected to be a [Term::Lam] with `arity`
    /// parameters. Unfolding is gated by `decrease`.
    Fix {
        name: String,
        arity: usize,
        decrease: Decrease,
        body: Box<Term>,
    },
    /// Proof of anything from an equation between provably distinct values
    NoConfusion {
        family: String,
        lhs: Box<Term>,
        rhs: Box<Term>,
    },
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Arm {
    pub ctor: String,
    pub params: Vec<Binder>,
    pub body: Term,
}

/// When a fixpoint may unfold
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decrease {
    /// The argument at position `arg` is constructor-headed
    Structural { arg: usize },
    /// The measure, a function of all arguments, evaluates to a constructor
    Measure { measure: Box<Term> },
}

impl Term {
    pub fn var(name: impl Into<String>, fst: usize, snd: usize) -> Self {
        Term::Var { name: name.into(), idx: Idx { fst, snd } }
    }

    pub fn ctor(name: &str, args: Vec<Term>) -> Self {
        Term::Ctor { name: name.to_owned(), args }
    }

    pub fn lam(params: &[&str], body: Term) -> Self {
        Term::Lam { params: params.iter().map(|p| Binder::new(*p)).collect(), body: Box::new(body) }
    }

    pub fn app(fun: Term, args: Vec<Term>) -> Self {
        if args.is_empty() {
            return fun;
        }
        Term::App { fun: Box::new(fun), args }
    }
}

// Printing
//
//

impl Print for Term {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Term::Var { name, idx } => {
                if cfg.de_bruijn {
                    alloc.text(format!("{name}@{idx}"))
                } else {
                    alloc.text(name)
                }
            }
            Term::Free(var) => var.print(cfg, alloc),
            Term::Def(name) => alloc.def(name),
            Term::TypCtor { name, args } => {
                alloc.typ(name).append(print_args(alloc, args.iter().map(|a| a.print(cfg, alloc))))
            }
            Term::Ctor { name, args } => {
                alloc.ctor(name).append(print_args(alloc, args.iter().map(|a| a.print(cfg, alloc))))
            }
            Term::Lam { params, body } => alloc
                .text(BACKSLASH)
                .append(comma_separated(alloc, params.iter().map(|p| p.print(cfg, alloc))))
                .append(DOT)
                .append(alloc.line().append(body.print(cfg, alloc)).nest(cfg.indent))
                .group()
                .parens_if(prec > 0),
            Term::App { fun, args } => fun
                .print_prec(cfg, alloc, 1)
                .append(comma_separated(alloc, args.iter().map(|a| a.print(cfg, alloc))).parens()),
            Term::Pi { param, domain, codomain } => param
                .print(cfg, alloc)
                .append(COLON)
                .append(alloc.space())
                .append(domain.print(cfg, alloc))
                .parens()
                .append(alloc.space())
                .append(ARROW)
                .append(alloc.line())
                .append(codomain.print(cfg, alloc))
                .group()
                .parens_if(prec > 0),
            Term::Type => alloc.typ(TYPE),
            Term::Cases { family, scrutinee, arms } => {
                let sep = alloc.text(COMMA).append(alloc.hardline());
                let body = alloc
                    .hardline()
                    .append(alloc.intersperse(arms.iter().map(|arm| arm.print(cfg, alloc)), sep))
                    .nest(cfg.indent)
                    .append(alloc.hardline());
                alloc
                    .keyword(CASES)
                    .append(alloc.typ(family).brackets())
                    .append(alloc.space())
                    .append(scrutinee.print_prec(cfg, alloc, 1))
                    .append(alloc.space())
                    .append(body.braces_anno())
                    .parens_if(prec > 0)
            }
            Term::Fix { name, arity: _, decrease, body } => {
                let decrease = match decrease {
                    Decrease::Structural { arg } => {
                        alloc.keyword(STRUCT).append(alloc.space()).append(arg.to_string())
                    }
                    Decrease::Measure { measure } => alloc
                        .keyword(MEASURE)
                        .append(alloc.space())
                        .append(measure.print_prec(cfg, alloc, 1)),
                };
                alloc
                    .keyword(FIX)
                    .append(alloc.space())
                    .append(alloc.def(name))
                    .append(decrease.brackets())
                    .append(alloc.space())
                    .append(FAT_ARROW)
                    .append(alloc.line().append(body.print(cfg, alloc)).nest(cfg.indent))
                    .group()
                    .parens_if(prec > 0)
            }
            Term::NoConfusion { family, lhs, rhs } => alloc
                .keyword(NO_CONFUSION)
                .append(alloc.typ(family).brackets())
                .append(print_args(alloc, [lhs.print(cfg, alloc), rhs.print(cfg, alloc)])),
        }
    }
}

impl Print for Arm {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Arm { ctor, params, body } = self;
        alloc
            .ctor(ctor)
            .append(print_args(alloc, params.iter().map(|p| p.print(cfg, alloc))))
            .append(alloc.space())
            .append(FAT_ARROW)
            .append(alloc.line().append(body.print(cfg, alloc)).nest(cfg.indent))
            .group()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_equivalence_ignores_names() {
        let lhs = Term::lam(&["x"], Term::var("x", 0, 0));
        let rhs = Term::lam(&["y"], Term::var("y", 0, 0));
        assert_eq!(lhs, rhs);
        assert_ne!(lhs, Term::lam(&["x", "y"], Term::var("x", 0, 1)));
    }

    #[test]
    fn print_fix() {
        let body = Term::lam(
            &["n"],
            Term::Cases {
                family: "Nat".to_owned(),
                scrutinee: Box::new(Term::var("n", 0, 0)),
                arms: vec![
                    Arm {
                        ctor: "zero".to_owned(),
                        params: vec![],
                        body: Term::ctor("zero", vec![]),
                    },
                    Arm {
                        ctor: "succ".to_owned(),
                        params: vec![Binder::new("k")],
                        body: Term::app(Term::var("pred", 2, 0), vec![Term::var("k", 0, 0)]),
                    },
                ],
            },
        );
        let fix = Term::Fix {
            name: "pred".to_owned(),
            arity: 1,
            decrease: Decrease::Structural { arg: 0 },
            body: Box::new(body),
        };
        let printed = fix.print_to_string(None);
        assert!(printed.starts_with("fix pred[struct 0] =>"));
        assert!(printed.contains("succ(k) => pred(k)"));
    }

    #[test]
    fn app_without_args_is_the_function() {
        assert_eq!(Term::app(Term::Def("f".to_owned()), vec![]), Term::Def("f".to_owned()));
    }
}
