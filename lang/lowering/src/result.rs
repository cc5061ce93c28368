use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type LoweringResult<T = ()> = Result<T, Box<LoweringError>>;

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum LoweringError {
    #[error("Undefined identifier {name}")]
    #[diagnostic(code("L-001"))]
    UndefinedIdent {
        name: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Duplicate definition of {name}")]
    #[diagnostic(code("L-002"))]
    AlreadyDefined {
        name: String,
        #[label]
        span: SourceSpan,
    },
    #[error("{name} expects {expected} arguments, but {actual} were given")]
    #[diagnostic(code("L-003"))]
    WrongNumberOfArgs {
        name: String,
        expected: usize,
        actual: usize,
        #[label]
        span: SourceSpan,
    },
    #[error("The result type of constructor {ctor} must be the type constructor {typ}")]
    #[diagnostic(code("L-004"))]
    ExpectedTypCtor {
        ctor: String,
        typ: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Arguments to type constructor {typ} must be provided for {ctor}")]
    #[diagnostic(code("L-005"))]
    MustProvideArgs {
        ctor: String,
        typ: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Literal cannot be desugared because zero/succ are not in program")]
    #[diagnostic(code("L-006"))]
    NatLiteralCannotBeDesugared {
        #[label]
        span: SourceSpan,
    },
    #[error("Addition cannot be desugared because there is no definition add with two parameters")]
    #[diagnostic(code("L-007"))]
    AddCannotBeDesugared {
        #[label]
        span: SourceSpan,
    },
    #[error("Wildcards and inaccessible terms may only occur in patterns")]
    #[diagnostic(code("L-008"))]
    PatternInExpression {
        #[label]
        span: SourceSpan,
    },
    #[error("An unexpected internal error occurred: {message}")]
    #[diagnostic(code("L-XXX"))]
    /// This error should not occur.
    /// Some internal invariant has been violated.
    Impossible {
        message: String,
        #[label]
        span: Option<SourceSpan>,
    },
}
