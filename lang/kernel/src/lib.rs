//! The host kernel consumed by the equation compiler.
//!
//! Core terms are locally nameless: variables bound within a term are two-level De Bruijn
//! indices, variables bound outside of it are [Term::Free]. Evaluation is normalization by
//! evaluation into [val::Val], followed by [read_back::ReadBack].

pub mod conversion;
pub mod dec;
pub mod env;
pub mod eval;
pub mod no_confusion;
pub mod normalize;
pub mod read_back;
pub mod result;
pub mod signature;
pub mod term;
pub mod val;

pub use conversion::{NameCtx, ToExp, ToTerm, VarCtx};
pub use dec::*;
pub use no_confusion::Clash;
pub use normalize::{Normalize, convert, convert_exp, discriminate_exp, normalize, normalize_exp};
pub use result::*;
pub use signature::*;
pub use term::*;

#[cfg(test)]
mod testing;
