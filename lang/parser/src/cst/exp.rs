use eqc_lang_miette_util::codespan::Span;
use num_bigint::BigUint;

use super::ident::*;

#[derive(Debug, Clone)]
pub enum Exp {
    Call(Call),
    App(App),
    TypeUniv(TypeUniv),
    NatLit(NatLit),
    Add(Add),
    Pi(Pi),
    Lam(Lam),
    Anno(Anno),
    LocalMatch(LocalMatch),
    Inaccessible(Inaccessible),
    Wildcard(Wildcard),
}

impl Exp {
    pub fn span(&self) -> Span {
        match self {
            Exp::Call(e) => e.span,
            Exp::App(e) => e.span,
            Exp::TypeUniv(e) => e.span,
            Exp::NatLit(e) => e.span,
            Exp::Add(e) => e.span,
            Exp::Pi(e) => e.span,
            Exp::Lam(e) => e.span,
            Exp::Anno(e) => e.span,
            Exp::LocalMatch(e) => e.span,
            Exp::Inaccessible(e) => e.span,
            Exp::Wildcard(e) => e.span,
        }
    }
}

#[derive(Debug, Clone)]
/// Either a variable, a constructor or a call of a toplevel definition.
/// `args` is `None` if no argument list was written.
pub struct Call {
    pub span: Span,
    pub name: Ident,
    pub args: Option<Vec<Exp>>,
}

#[derive(Debug, Clone)]
/// Application of an arbitrary expression, e.g. `(\x. x)(zero)` or `f(a)(b)`
pub struct App {
    pub span: Span,
    pub fun: Box<Exp>,
    pub args: Vec<Exp>,
}

#[derive(Debug, Clone)]
pub struct TypeUniv {
    pub span: Span,
}

#[derive(Debug, Clone)]
/// Literal for a natural number
pub struct NatLit {
    pub span: Span,
    pub val: BigUint,
}

#[derive(Debug, Clone)]
/// `lhs + rhs`
pub struct Add {
    pub span: Span,
    pub lhs: Box<Exp>,
    pub rhs: Box<Exp>,
}

#[derive(Debug, Clone)]
/// A parameter of a dependent function type; `name` is `None` for `A -> B`
pub struct PiParam {
    pub name: Option<Ident>,
    pub typ: Box<Exp>,
}

#[derive(Debug, Clone)]
/// `(x: A, y: B) -> C` or `A -> B`
pub struct Pi {
    pub span: Span,
    pub params: Vec<PiParam>,
    pub codomain: Box<Exp>,
}

#[derive(Debug, Clone)]
/// `\x, y. e`
pub struct Lam {
    pub span: Span,
    pub params: Vec<Ident>,
    pub body: Box<Exp>,
}

#[derive(Debug, Clone)]
/// Type annotations like `(e : T)`
pub struct Anno {
    pub span: Span,
    pub exp: Box<Exp>,
    pub typ: Box<Exp>,
}

#[derive(Debug, Clone)]
/// Pattern match, e.g. `match e1, e2 { | p1, p2 => e }`
pub struct LocalMatch {
    pub span: Span,
    pub scrutinees: Vec<Exp>,
    pub clauses: Vec<Clause>,
}

#[derive(Debug, Clone)]
/// `.e`, only meaningful in pattern position
pub struct Inaccessible {
    pub span: Span,
    pub exp: Box<Exp>,
}

#[derive(Debug, Clone)]
/// `_`, only meaningful in pattern position
pub struct Wildcard {
    pub span: Span,
}

#[derive(Debug, Clone)]
/// `| p1, .., pn => rhs`
pub struct Clause {
    pub span: Span,
    pub lhs: Vec<Exp>,
    pub rhs: Box<Exp>,
}
