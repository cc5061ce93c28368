use eqc_lang_miette_util::codespan::Span;

use super::exp::{Clause, Exp};
use super::ident::*;

#[derive(Debug, Clone)]
pub struct Module {
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Data(Data),
    Def(Def),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Data(data) => data.span,
            Decl::Def(def) => def.span,
        }
    }

    pub fn name(&self) -> &Ident {
        match self {
            Decl::Data(data) => &data.name,
            Decl::Def(def) => &def.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub span: Span,
    pub name: Ident,
    pub typ: Box<Exp>,
}

pub type Telescope = Vec<Param>;

#[derive(Debug, Clone)]
pub struct Data {
    pub span: Span,
    pub name: Ident,
    pub params: Telescope,
    pub ctors: Vec<Ctor>,
}

#[derive(Debug, Clone)]
pub struct Ctor {
    pub span: Span,
    pub name: Ident,
    pub params: Telescope,
    /// The result type; `None` if the family has no indices and it was omitted
    pub typ: Option<Box<Exp>>,
}

#[derive(Debug, Clone)]
pub struct Def {
    pub span: Span,
    pub name: Ident,
    pub params: Telescope,
    pub ret_typ: Box<Exp>,
    pub termination: Option<Box<Exp>>,
    pub clauses: Vec<Clause>,
}
