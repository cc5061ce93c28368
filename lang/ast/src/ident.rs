use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use derivative::Derivative;
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_printer::{Alloc, Builder, Print, PrintCfg, theme::ThemeExt};
use pretty::DocAllocator;

use crate::HasSpan;

// Local variables
//
//

static NEXT_VAR_ID: AtomicUsize = AtomicUsize::new(0);

/// The identity of a local variable.
///
/// Every binding site allocates a fresh id from a process-wide supply,
/// so two distinct binders never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn fresh() -> Self {
        VarId(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A local variable.
///
/// The name is only kept for prettyprinting and error messages;
/// equality and hashing only consider the id.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Var {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: String,
    pub id: VarId,
}

impl Var {
    pub fn fresh(name: impl Into<String>) -> Self {
        Var { name: name.into(), id: VarId::fresh() }
    }

    /// A new variable with the same name but a different identity
    pub fn refresh(&self) -> Self {
        Var::fresh(self.name.clone())
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Print for Var {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        if cfg.de_bruijn {
            alloc.text(format!("{}@{}", self.name, self.id))
        } else {
            alloc.text(&self.name)
        }
    }
}

// Global identifiers (binding site)
//
//

/// A global identifier binding
///
/// E.g. the names of data type declarations, constructors and definitions
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct IdBind {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl IdBind {
    pub fn from_string(id: &str) -> Self {
        IdBind { span: None, id: id.to_owned() }
    }
}

impl fmt::Display for IdBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for IdBind {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl From<IdBind> for IdBound {
    fn from(id: IdBind) -> Self {
        IdBound { span: id.span, id: id.id }
    }
}

// Global identifiers (bound occurence)
//
//

/// A bound occurence of a global identifier
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct IdBound {
    #[derivative(PartialEq = "ignore", Hash = "ignore", PartialOrd = "ignore", Ord = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl IdBound {
    pub fn from_string(id: &str) -> Self {
        IdBound { span: None, id: id.to_owned() }
    }
}

impl fmt::Display for IdBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for IdBound {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl PartialEq<IdBind> for IdBound {
    fn eq(&self, other: &IdBind) -> bool {
        self.id == other.id
    }
}

impl PartialEq<&str> for IdBound {
    fn eq(&self, other: &&str) -> bool {
        self.id == *other
    }
}

impl Print for IdBound {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc.typ(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_vars_are_distinct() {
        let x = Var::fresh("x");
        let y = x.refresh();
        assert_eq!(x.name, y.name);
        assert_ne!(x, y);
    }

    #[test]
    fn var_equality_ignores_name() {
        let x = Var::fresh("x");
        let renamed = Var { name: "y".to_owned(), id: x.id };
        assert_eq!(x, renamed);
    }
}
