use eqc_lang_ast::{HashMap, Var};
use eqc_lang_parser::cst::ident::Ident;

use crate::{DeclMeta, SymbolTable};

pub struct Ctx {
    /// Map that resolves local binder names to variables
    ///
    /// For each name, store a vector representing the different binders
    /// represented by this name. The last entry represents the binder currently in scope,
    /// the remaining entries represent the binders which are currently shadowed.
    local_map: HashMap<String, Vec<Var>>,
    /// Metadata for top-level names
    pub symbol_table: SymbolTable,
}

impl Ctx {
    pub fn empty(symbol_table: SymbolTable) -> Self {
        Self { local_map: HashMap::default(), symbol_table }
    }

    /// Lookup in the local variable context.
    pub fn lookup_local(&self, name: &Ident) -> Option<&Var> {
        self.local_map.get(&name.id).and_then(|vars| vars.last())
    }

    /// Lookup in the global context of declarations.
    pub fn lookup_global(&self, name: &Ident) -> Option<&DeclMeta> {
        self.symbol_table.lookup(&name.id)
    }

    /// Whether an identifier in pattern position binds a new variable
    pub fn is_pattern_binder(&self, name: &Ident) -> bool {
        self.lookup_global(name).is_none()
    }

    /// Run `f` with the given variables in scope, in order
    pub fn bind_fold<T, F>(&mut self, vars: &[Var], f: F) -> T
    where
        F: FnOnce(&mut Ctx) -> T,
    {
        for var in vars {
            self.local_map.entry(var.name.clone()).or_default().push(var.clone());
        }
        let res = f(self);
        for var in vars.iter().rev() {
            if let Some(stack) = self.local_map.get_mut(&var.name) {
                stack.pop();
            }
        }
        res
    }
}
