use eqc_lang_ast::HashMap;
use eqc_lang_miette_util::ToMiette;
use eqc_lang_parser::cst::{self, ident::Ident};

use crate::{LoweringError, LoweringResult};

/// Metadata for top-level names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclMeta {
    Data { arity: usize },
    Ctor { family: String, arity: usize },
    Def { arity: usize },
}

impl DeclMeta {
    pub fn arity(&self) -> usize {
        match self {
            DeclMeta::Data { arity } | DeclMeta::Ctor { arity, .. } | DeclMeta::Def { arity } => {
                *arity
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    map: HashMap<String, DeclMeta>,
}

impl SymbolTable {
    pub fn lookup(&self, name: &str) -> Option<&DeclMeta> {
        self.map.get(name)
    }

    fn insert(&mut self, name: &Ident, meta: DeclMeta) -> LoweringResult {
        if self.map.contains_key(&name.id) {
            return Err(Box::new(LoweringError::AlreadyDefined {
                name: name.id.clone(),
                span: name.span.to_miette(),
            }));
        }
        self.map.insert(name.id.clone(), meta);
        Ok(())
    }
}

/// Collect all top-level names of a module, so that declarations may refer to later ones
pub fn build_symbol_table(module: &cst::decls::Module) -> LoweringResult<SymbolTable> {
    let mut symbol_table = SymbolTable::default();
    for decl in &module.decls {
        match decl {
            cst::decls::Decl::Data(data) => {
                symbol_table.insert(&data.name, DeclMeta::Data { arity: data.params.len() })?;
                for ctor in &data.ctors {
                    let meta =
                        DeclMeta::Ctor { family: data.name.id.clone(), arity: ctor.params.len() };
                    symbol_table.insert(&ctor.name, meta)?;
                }
            }
            cst::decls::Decl::Def(def) => {
                symbol_table.insert(&def.name, DeclMeta::Def { arity: def.params.len() })?;
            }
        }
    }
    Ok(symbol_table)
}
