use std::path::PathBuf;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

pub type MainResult<T = ()> = Result<T, MainError>;

#[derive(Error, Diagnostic, Debug, Clone)]
#[error(transparent)]
#[diagnostic(transparent)]
pub enum MainError {
    Parser(#[from] eqc_lang_parser::ParseError),
    Lowering(#[from] Box<eqc_lang_lowering::LoweringError>),
    Compile(#[from] Box<eqc_lang_compiler::CompileError>),
    Kernel(#[from] Box<eqc_lang_kernel::KernelError>),
    Driver(#[from] DriverError),
}

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum DriverError {
    #[error("Could not read {}", path.display())]
    #[diagnostic(code("D-001"))]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
    #[error("Definition {name} is not declared")]
    #[diagnostic(code("D-002"))]
    UnknownDefinition { name: String },
}
