use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::term::Idx;

pub type KernelResult<T = ()> = Result<T, Box<KernelError>>;

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum KernelError {
    #[error("Unbound variable {idx}")]
    #[diagnostic(code("K-001"))]
    UnboundVariable { idx: Idx },
    #[error("Expected a function, but got {what}")]
    #[diagnostic(code("K-002"))]
    NotAFunction { what: String },
    #[error("Function with {expected} parameters applied to only {actual} arguments")]
    #[diagnostic(code("K-003"))]
    PartialApplication { expected: usize, actual: usize },
    #[error("Case analysis on {family} has no arm for constructor {ctor}")]
    #[diagnostic(code("K-004"))]
    MissingArm { family: String, ctor: String },
    #[error("Constructor {ctor} carries {expected} fields, but its arm binds {actual}")]
    #[diagnostic(code("K-005"))]
    ArmArityMismatch { ctor: String, expected: usize, actual: usize },
    #[error("Case analysis on {family} expected a constructor, but got {what}")]
    #[diagnostic(code("K-006"))]
    ScrutineeNotACtor { family: String, what: String },
    #[error("{family}: no_confusion applied to arguments which are not provably distinct")]
    #[diagnostic(code("K-007"))]
    NotDistinct { family: String },
    #[error("A nested match cannot be represented as a kernel term")]
    #[diagnostic(code("K-008"), help("Nested matches are compiled away by the equation compiler"))]
    LocalMatch {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The impossible happened: {message}")]
    #[diagnostic(code("K-XXX"))]
    /// This error should not occur.
    /// Some internal invariant has been violated.
    Impossible { message: String },
}

impl KernelError {
    pub fn impossible(message: impl Into<String>) -> Box<Self> {
        Box::new(KernelError::Impossible { message: message.into() })
    }
}
