mod ctx;
mod lower;
mod result;
mod symbol_table;

use eqc_lang_ast as ast;
use eqc_lang_parser::cst;

use crate::lower::Lower;

pub use ctx::*;
pub use result::*;
pub use symbol_table::*;

/// Lower a module
pub fn lower_module(prg: &cst::decls::Module) -> LoweringResult<ast::Module> {
    let symbol_table = build_symbol_table(prg)?;
    lower_module_with_symbol_table(prg, &symbol_table)
}

/// Lower a module, given the symbol table of all its declarations
pub fn lower_module_with_symbol_table(
    prg: &cst::decls::Module,
    symbol_table: &SymbolTable,
) -> LoweringResult<ast::Module> {
    let mut ctx = Ctx::empty(symbol_table.clone());
    let decls = prg.decls.lower(&mut ctx)?;
    log::debug!("Lowered {} declarations", decls.len());
    Ok(ast::Module { decls })
}

/// Lower a closed expression in the scope of the declarations in `symbol_table`
pub fn lower_exp(exp: &cst::exp::Exp, symbol_table: &SymbolTable) -> LoweringResult<ast::Exp> {
    let mut ctx = Ctx::empty(symbol_table.clone());
    exp.lower(&mut ctx)
}

#[cfg(test)]
mod tests;
