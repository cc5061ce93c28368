//! Concrete syntax trees produced by the parser.
//!
//! Patterns are parsed as expressions; the lowering decides which identifiers
//! are constructors and which ones bind variables.

pub mod decls;
pub mod exp;
pub mod ident;
