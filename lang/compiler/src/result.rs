use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use eqc_lang_kernel::KernelError;

pub type CompileResult<T = ()> = Result<T, Box<CompileError>>;

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum CompileError {
    #[error("Non-exhaustive match in {name}: {missing} is not covered")]
    #[diagnostic(code("E-001"))]
    NonExhaustiveMatch {
        name: String,
        missing: String,
        #[help]
        help: Option<String>,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Inaccessible pattern {found} does not match the forced value {expected}")]
    #[diagnostic(code("E-002"))]
    InaccessiblePatternMismatch {
        expected: String,
        found: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Recursive call {call} in {name} is not structurally decreasing")]
    #[diagnostic(code("E-003"))]
    NonStructuralRecursion {
        name: String,
        call: String,
        #[help]
        help: Option<String>,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Malformed pattern: {reason}")]
    #[diagnostic(code("E-004"))]
    MalformedPattern {
        reason: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Pattern variable {name} is bound more than once")]
    #[diagnostic(
        code("E-005"),
        help("Use an inaccessible pattern .{name} for repeated occurrences")
    )]
    NonLinearPattern {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("{what} expects {expected} patterns, but {actual} were given")]
    #[diagnostic(code("E-006"))]
    ArityMismatch {
        what: String,
        expected: usize,
        actual: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Cannot decide whether {lhs} and {rhs} unify")]
    #[diagnostic(code("E-007"))]
    CannotDecide {
        lhs: String,
        rhs: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Cannot split on {exp} of type {typ}")]
    #[diagnostic(code("E-008"))]
    CannotSplit {
        exp: String,
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Cannot infer the type of the scrutinee {exp}")]
    #[diagnostic(code("E-009"), help("Annotate the scrutinee: (e : T)"))]
    CannotInferMatch {
        exp: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Kernel(#[from] KernelError),
    #[error("The impossible happened: {message}")]
    #[diagnostic(code("E-XXX"))]
    /// This error should not occur.
    /// Some internal invariant has been violated.
    Impossible {
        message: String,
        #[label]
        span: Option<SourceSpan>,
    },
}

impl CompileError {
    pub fn impossible(message: impl Into<String>) -> Box<Self> {
        Box::new(CompileError::Impossible { message: message.into(), span: None })
    }
}

impl From<Box<KernelError>> for Box<CompileError> {
    fn from(err: Box<KernelError>) -> Self {
        Box::new(CompileError::Kernel(*err))
    }
}

/// Diagnostics which do not prevent compilation
#[derive(Error, Diagnostic, Debug, Clone)]
pub enum CompileWarning {
    #[error("Clause {clause} of {name} overlaps with clause {shadowed_by}, which takes priority")]
    #[diagnostic(code("W-001"), severity(Advice))]
    OverlapAmbiguity {
        name: String,
        clause: usize,
        shadowed_by: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Clause {clause} of {name} is never selected")]
    #[diagnostic(code("W-002"), severity(Warning))]
    RedundantClause {
        name: String,
        clause: usize,
        #[label]
        span: Option<SourceSpan>,
    },
}
