use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum AppError {
    #[error("Could not write to {}", path.display())]
    #[diagnostic(code("A-001"))]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write to stdout")]
    #[diagnostic(code("A-002"))]
    Stdout(#[source] io::Error),
}
