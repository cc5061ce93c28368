use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{
    Alloc, Builder, Print, PrintCfg,
    theme::ThemeExt,
    tokens::{COLON, COMMA, DATA, DEF, TERMINATION_BY},
    util::BracesExt,
};
use pretty::DocAllocator;

use crate::{Clause, Exp, HasSpan, IdBind, Telescope, TypCtor};

// Module
//
//

/// A checked source file: declarations in source order
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub decls: Vec<Decl>,
}

impl Module {
    pub fn data(&self, name: &str) -> Option<&Data> {
        self.decls.iter().find_map(|decl| match decl {
            Decl::Data(data) if data.name.id == name => Some(data),
            _ => None,
        })
    }

    /// Find a constructor together with the data type declaring it
    pub fn ctor(&self, name: &str) -> Option<(&Data, &Ctor)> {
        self.decls.iter().find_map(|decl| match decl {
            Decl::Data(data) => data.ctors.iter().find(|c| c.name.id == name).map(|c| (data, c)),
            Decl::Def(_) => None,
        })
    }

    pub fn def(&self, name: &str) -> Option<&Def> {
        self.decls.iter().find_map(|decl| match decl {
            Decl::Def(def) if def.name.id == name => Some(def),
            _ => None,
        })
    }

    pub fn defs(&self) -> impl Iterator<Item = &Def> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Def(def) => Some(def),
            Decl::Data(_) => None,
        })
    }
}

impl Print for Module {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let sep = if cfg.omit_decl_sep {
            alloc.hardline()
        } else {
            alloc.hardline().append(alloc.hardline())
        };
        alloc.intersperse(self.decls.iter().map(|decl| decl.print(cfg, alloc)), sep)
    }
}

// Decl
//
//

#[derive(Debug, Clone)]
pub enum Decl {
    Data(Data),
    Def(Def),
}

impl Decl {
    pub fn name(&self) -> &IdBind {
        match self {
            Decl::Data(data) => &data.name,
            Decl::Def(def) => &def.name,
        }
    }
}

impl HasSpan for Decl {
    fn span(&self) -> Option<Span> {
        match self {
            Decl::Data(data) => data.span,
            Decl::Def(def) => def.span,
        }
    }
}

impl Print for Decl {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Decl::Data(data) => data.print(cfg, alloc),
            Decl::Def(def) => def.print(cfg, alloc),
        }
    }
}

// Data
//
//

/// An indexed inductive family
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Data {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBind,
    /// The indices of the family
    pub params: Telescope,
    pub ctors: Vec<Ctor>,
}

impl Print for Data {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Data { span: _, name, params, ctors } = self;
        let head = alloc
            .keyword(DATA)
            .append(alloc.space())
            .append(alloc.typ(&name.id))
            .append(params.print(cfg, alloc));
        if ctors.is_empty() {
            return head.append(alloc.space()).append(alloc.nil().braces_anno());
        }
        let sep = alloc.text(COMMA).append(alloc.hardline());
        let body = alloc
            .hardline()
            .append(alloc.intersperse(ctors.iter().map(|ctor| ctor.print(cfg, alloc)), sep))
            .nest(cfg.indent)
            .append(alloc.hardline());
        head.append(alloc.space()).append(body.braces_anno())
    }
}

// Ctor
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Ctor {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBind,
    /// The fields of the constructor
    pub params: Telescope,
    /// The family applied to the indices of the constructed value
    pub typ: TypCtor,
}

impl Print for Ctor {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Ctor { span: _, name, params, typ } = self;
        alloc
            .ctor(&name.id)
            .append(params.print(cfg, alloc))
            .append(COLON)
            .append(alloc.space())
            .append(typ.print(cfg, alloc))
    }
}

// Def
//
//

/// A toplevel definition by pattern matching equations
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Def {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBind,
    pub params: Telescope,
    pub ret_typ: Box<Exp>,
    /// The measure given with `termination_by`, in scope of `params`
    pub termination: Option<Box<Exp>>,
    pub clauses: Vec<Clause>,
}

impl Print for Def {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Def { span: _, name, params, ret_typ, termination, clauses } = self;
        let mut head = alloc
            .keyword(DEF)
            .append(alloc.space())
            .append(alloc.def(&name.id))
            .append(params.print(cfg, alloc))
            .append(COLON)
            .append(alloc.space())
            .append(ret_typ.print(cfg, alloc));
        if let Some(measure) = termination {
            head = head
                .append(alloc.space())
                .append(alloc.keyword(TERMINATION_BY))
                .append(alloc.space())
                .append(measure.print(cfg, alloc));
        }
        let clauses = clauses.iter().map(|c| c.print(cfg, alloc));
        let body = alloc
            .hardline()
            .append(alloc.intersperse(clauses, alloc.hardline()))
            .nest(cfg.indent);
        head.append(body)
    }
}
