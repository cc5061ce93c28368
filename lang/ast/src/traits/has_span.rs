use eqc_lang_miette_util::codespan::Span;

/// Syntax which may remember where it was written.
///
/// Expressions built by the compiler, such as refined indices and case trees, have no span.
pub trait HasSpan {
    fn span(&self) -> Option<Span>;
}

impl HasSpan for Option<Span> {
    fn span(&self) -> Option<Span> {
        *self
    }
}
