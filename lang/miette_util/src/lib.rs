pub mod codespan;

pub trait ToMiette {
    type Target;

    fn to_miette(self) -> Self::Target;
}

pub trait FromMiette {
    type Target;

    #[allow(clippy::wrong_self_convention)]
    fn from_miette(self) -> Self::Target;
}

impl ToMiette for codespan::ByteIndex {
    type Target = miette::SourceOffset;

    fn to_miette(self) -> Self::Target {
        self.to_usize().into()
    }
}

impl ToMiette for codespan::Span {
    type Target = miette::SourceSpan;

    fn to_miette(self) -> Self::Target {
        miette::SourceSpan::new(self.start.to_miette(), self.len())
    }
}

impl<T: ToMiette> ToMiette for Option<T> {
    type Target = Option<T::Target>;

    fn to_miette(self) -> Self::Target {
        self.map(ToMiette::to_miette)
    }
}

impl<T: ToMiette + Copy> ToMiette for &T {
    type Target = T::Target;

    fn to_miette(self) -> Self::Target {
        (*self).to_miette()
    }
}

impl FromMiette for miette::SourceSpan {
    type Target = codespan::Span;

    fn from_miette(self) -> Self::Target {
        let start = codespan::ByteIndex(self.offset() as u32);
        let end = codespan::ByteIndex((self.offset() + self.len()) as u32);
        codespan::Span { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan::{ByteIndex, Span};

    #[test]
    fn span_round_trips_through_miette() {
        let span = Span::new(ByteIndex(3), ByteIndex(11));
        let miette_span = span.to_miette();
        assert_eq!(miette_span.offset(), 3);
        assert_eq!(miette_span.len(), 8);
        assert_eq!(miette_span.from_miette(), span);
    }
}
