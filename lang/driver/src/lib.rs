//! Orchestration of the compilation phases for a single source file

mod database;
mod render_reports;
mod result;

pub use database::*;
pub use render_reports::*;
pub use result::*;
