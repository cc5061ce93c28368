use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, info};

use eqc_lang_ast::{self as ast, Exp};
use eqc_lang_compiler::{CompileWarning, Compiled, Program, compile_def};
use eqc_lang_kernel::{Signature, normalize_exp};
use eqc_lang_lowering::{SymbolTable, build_symbol_table, lower_exp, lower_module_with_symbol_table};
use eqc_lang_parser::cst;

use crate::result::*;

/// The definitions of a module after compilation
#[derive(Debug, Clone)]
pub struct CompiledModule {
    /// The kernel signature holding the data types and compiled definitions
    pub sig: Signature,
    /// The compiled definitions in declaration order
    pub defs: Vec<Compiled>,
}

impl CompiledModule {
    pub fn def(&self, name: &str) -> Option<&Compiled> {
        self.defs.iter().find(|def| def.name == name)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CompileWarning> {
        self.defs.iter().flat_map(|def| def.warnings.iter())
    }
}

/// A source file and the results of the phases computed for it so far
pub struct Database {
    /// The name under which diagnostics refer to the source
    pub name: String,
    pub source: String,
    cst: Option<Rc<cst::decls::Module>>,
    symbol_table: Option<Rc<SymbolTable>>,
    ust: Option<Rc<ast::Module>>,
    compiled: Option<Rc<CompiledModule>>,
}

impl Database {
    // Core API
    //
    // Every phase `xxx` is computed on demand by `xxx(&mut self)`, which returns the cached
    // result if there is one and otherwise calls `recompute_xxx`. Failed phases are not cached.

    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            cst: None,
            symbol_table: None,
            ust: None,
            compiled: None,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> MainResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| DriverError::Io {
            path: path.to_path_buf(),
            source: Arc::new(err),
        })?;
        Ok(Self::from_source(path.display().to_string(), source))
    }

    /// Replace the source text and drop all results computed from the old one
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.cst = None;
        self.symbol_table = None;
        self.ust = None;
        self.compiled = None;
    }

    // Core API: CST (Concrete Syntax Tree)
    //
    //

    pub fn cst(&mut self) -> MainResult<Rc<cst::decls::Module>> {
        match &self.cst {
            Some(cst) => Ok(cst.clone()),
            None => self.recompute_cst(),
        }
    }

    fn recompute_cst(&mut self) -> MainResult<Rc<cst::decls::Module>> {
        debug!("Parsing {}", self.name);
        let cst = Rc::new(eqc_lang_parser::parse_module(&self.source)?);
        self.cst = Some(cst.clone());
        Ok(cst)
    }

    // Core API: Symbol table
    //
    //

    pub fn symbol_table(&mut self) -> MainResult<Rc<SymbolTable>> {
        match &self.symbol_table {
            Some(symbol_table) => Ok(symbol_table.clone()),
            None => self.recompute_symbol_table(),
        }
    }

    fn recompute_symbol_table(&mut self) -> MainResult<Rc<SymbolTable>> {
        let cst = self.cst()?;
        let symbol_table = Rc::new(build_symbol_table(&cst)?);
        self.symbol_table = Some(symbol_table.clone());
        Ok(symbol_table)
    }

    // Core API: UST (lowered, not yet compiled syntax tree)
    //
    //

    pub fn ust(&mut self) -> MainResult<Rc<ast::Module>> {
        match &self.ust {
            Some(ust) => Ok(ust.clone()),
            None => self.recompute_ust(),
        }
    }

    fn recompute_ust(&mut self) -> MainResult<Rc<ast::Module>> {
        debug!("Lowering {}", self.name);
        let cst = self.cst()?;
        let symbol_table = self.symbol_table()?;
        let ust = Rc::new(lower_module_with_symbol_table(&cst, &symbol_table)?);
        self.ust = Some(ust.clone());
        Ok(ust)
    }

    // Core API: Compiled definitions
    //
    //

    pub fn compiled(&mut self) -> MainResult<Rc<CompiledModule>> {
        match &self.compiled {
            Some(compiled) => Ok(compiled.clone()),
            None => self.recompute_compiled(),
        }
    }

    fn recompute_compiled(&mut self) -> MainResult<Rc<CompiledModule>> {
        let module = self.ust()?;
        let mut sig = Signature::from_module(&module);
        let mut defs = Vec::new();
        // Definitions may only call definitions compiled before them
        for def in module.defs() {
            let compiled = compile_def(Program { module: &module, sig: &sig }, def)?;
            for warning in &compiled.warnings {
                info!("{warning}");
            }
            sig.add_def(&compiled.name, compiled.term.clone());
            defs.push(compiled);
        }
        debug!("Compiled {} definitions of {}", defs.len(), self.name);
        let compiled = Rc::new(CompiledModule { sig, defs });
        self.compiled = Some(compiled.clone());
        Ok(compiled)
    }

    pub fn compiled_def(&mut self, name: &str) -> MainResult<Compiled> {
        let compiled = self.compiled()?;
        compiled
            .def(name)
            .cloned()
            .ok_or_else(|| DriverError::UnknownDefinition { name: name.to_owned() }.into())
    }

    /// Normalize a closed expression in the scope of the compiled definitions
    pub fn normalize(&mut self, input: &str) -> MainResult<Exp> {
        let cst = eqc_lang_parser::parse_exp(input)?;
        let symbol_table = self.symbol_table()?;
        let exp = lower_exp(&cst, &symbol_table)?;
        let compiled = self.compiled()?;
        Ok(normalize_exp(&exp, &compiled.sig)?)
    }

    // Diagnostics
    //
    //

    pub fn pretty_error(&self, err: MainError) -> miette::Report {
        let report: miette::Report = err.into();
        report.with_source_code(miette::NamedSource::new(&self.name, self.source.clone()))
    }

    pub fn pretty_warnings(&self, compiled: &CompiledModule) -> Vec<miette::Report> {
        compiled
            .warnings()
            .map(|warning| {
                miette::Report::new(warning.clone())
                    .with_source_code(miette::NamedSource::new(&self.name, self.source.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "
data Nat { zero, succ(n: Nat) }

def add(m: Nat, n: Nat): Nat
    | m, zero => m
    | m, succ(n) => succ(add(m, n))

def double(n: Nat): Nat
    | n => add(n, n)
";

    #[test]
    fn later_definitions_call_earlier_ones() {
        let mut db = Database::from_source("test.eqc", SRC);
        let nf = db.normalize("double(3)").unwrap();
        let expected = db.normalize("6").unwrap();
        assert_eq!(nf, expected);
    }

    #[test]
    fn results_are_cached_until_the_source_changes() {
        let mut db = Database::from_source("test.eqc", SRC);
        let first = db.compiled().unwrap();
        assert!(Rc::ptr_eq(&first, &db.compiled().unwrap()));
        db.set_source("data Nat { zero, succ(n: Nat) }");
        assert!(db.compiled().unwrap().defs.is_empty());
    }

    #[test]
    fn unknown_definitions_are_reported() {
        let mut db = Database::from_source("test.eqc", SRC);
        let err = db.compiled_def("mul").unwrap_err();
        assert!(matches!(err, MainError::Driver(DriverError::UnknownDefinition { .. })));
    }

    #[test]
    fn missing_files_are_reported() {
        let err = Database::from_path("does/not/exist.eqc").err().unwrap();
        assert!(matches!(err, MainError::Driver(DriverError::Io { .. })));
    }
}
