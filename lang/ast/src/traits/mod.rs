mod free_vars;
mod has_span;
mod subst;

pub use free_vars::*;
pub use has_span::*;
pub use subst::*;
