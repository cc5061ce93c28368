use eqc_lang_miette_util::codespan::{ByteIndex, Span};

pub fn span(l: ByteIndex, r: ByteIndex) -> Span {
    Span::new(l, r)
}
