pub mod cst;
mod grammar;
mod lexer;
mod result;

use grammar::Parser;
pub use lexer::Token;
pub use result::*;

pub fn parse_exp(s: &str) -> Result<cst::exp::Exp, ParseError> {
    let mut parser = Parser::new(s)?;
    let exp = parser.exp()?;
    parser.eof()?;
    Ok(exp)
}

pub fn parse_module(s: &str) -> Result<cst::decls::Module, ParseError> {
    let mut parser = Parser::new(s)?;
    let decls = parser.decls()?;
    Ok(cst::decls::Module { decls })
}
