use std::rc::Rc;

use eqc_lang_ast::{self as ast, HashMap};

use crate::term::Term;

/// An inductive family known to the kernel
#[derive(Debug, Clone)]
pub struct DataInfo {
    pub name: String,
    /// Number of indices
    pub arity: usize,
    pub ctors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CtorInfo {
    pub name: String,
    pub family: String,
    /// Number of fields
    pub arity: usize,
}

/// The global environment of the kernel
///
/// Definitions which have not (yet) been added evaluate to opaque constants.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    data: HashMap<String, DataInfo>,
    ctors: HashMap<String, CtorInfo>,
    defs: HashMap<String, Rc<Term>>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare all data types of a module
    pub fn from_module(module: &ast::Module) -> Self {
        let mut sig = Self::new();
        for decl in &module.decls {
            if let ast::Decl::Data(data) = decl {
                sig.add_data(data);
            }
        }
        sig
    }

    pub fn add_data(&mut self, data: &ast::Data) {
        let ctors: Vec<(&str, usize)> =
            data.ctors.iter().map(|ctor| (ctor.name.id.as_str(), ctor.params.len())).collect();
        self.add_family(&data.name.id, data.params.len(), &ctors);
    }

    /// Declare a family with the given number of indices and its constructors with their
    /// number of fields
    pub fn add_family(&mut self, name: &str, arity: usize, ctors: &[(&str, usize)]) {
        for (ctor, ctor_arity) in ctors {
            self.ctors.insert(
                (*ctor).to_owned(),
                CtorInfo { name: (*ctor).to_owned(), family: name.to_owned(), arity: *ctor_arity },
            );
        }
        let ctors = ctors.iter().map(|(ctor, _)| (*ctor).to_owned()).collect();
        self.data.insert(name.to_owned(), DataInfo { name: name.to_owned(), arity, ctors });
    }

    pub fn add_def(&mut self, name: &str, term: Term) {
        self.defs.insert(name.to_owned(), Rc::new(term));
    }

    pub fn data(&self, name: &str) -> Option<&DataInfo> {
        self.data.get(name)
    }

    pub fn ctor(&self, name: &str) -> Option<&CtorInfo> {
        self.ctors.get(name)
    }

    pub fn def(&self, name: &str) -> Option<&Rc<Term>> {
        self.defs.get(name)
    }
}
