use eqc_lang_miette_util::{ToMiette, codespan::Span};
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum ParseError {
    #[error("Invalid token")]
    #[diagnostic(code("P-001"))]
    InvalidToken {
        #[label]
        span: SourceSpan,
    },
    #[error("Unexpected end of file. Expected {expected}")]
    #[diagnostic(code("P-002"))]
    UnrecognizedEof {
        expected: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Unexpected \"{token}\". Expected {expected}")]
    #[diagnostic(code("P-003"))]
    UnrecognizedToken {
        token: String,
        expected: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Invalid numeral {literal}")]
    #[diagnostic(code("P-004"))]
    InvalidNumeral {
        literal: String,
        #[label]
        span: SourceSpan,
    },
}

impl ParseError {
    pub fn invalid_token(span: Span) -> Self {
        ParseError::InvalidToken { span: span.to_miette() }
    }

    pub fn unrecognized_eof(expected: &str, span: Span) -> Self {
        ParseError::UnrecognizedEof { expected: expected.to_owned(), span: span.to_miette() }
    }

    pub fn unrecognized_token(token: String, expected: &str, span: Span) -> Self {
        ParseError::UnrecognizedToken {
            token,
            expected: expected.to_owned(),
            span: span.to_miette(),
        }
    }
}
