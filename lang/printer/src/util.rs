use pretty::DocAllocator;

use super::tokens::COMMA;
use super::types::*;

pub trait ParensIfExt<'a> {
    /// Enclose in parentheses if the enclosing context binds tighter than `prec`
    fn parens_if(self, cond: bool) -> Builder<'a>;
}

impl<'a> ParensIfExt<'a> for Builder<'a> {
    fn parens_if(self, cond: bool) -> Builder<'a> {
        if cond { self.parens() } else { self }
    }
}

pub trait BracesExt<'a> {
    fn braces_anno(self) -> Builder<'a>;
}

impl<'a> BracesExt<'a> for Builder<'a> {
    fn braces_anno(self) -> Builder<'a> {
        self.enclose("{", "}")
    }
}

/// Print a comma-separated list of items, breaking after the commas if necessary
pub fn comma_separated<'a, I>(alloc: &'a Alloc<'a>, items: I) -> Builder<'a>
where
    I: IntoIterator<Item = Builder<'a>>,
{
    let sep = alloc.text(COMMA).append(alloc.line());
    alloc.intersperse(items, sep).align().group()
}

/// Print `items` as an argument list `(a, b, c)`; nothing is printed for an empty list
pub fn print_args<'a, I>(alloc: &'a Alloc<'a>, items: I) -> Builder<'a>
where
    I: IntoIterator<Item = Builder<'a>>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() { alloc.nil() } else { comma_separated(alloc, items).parens() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_WIDTH;

    fn render(doc: Builder<'_>) -> String {
        let mut buf = Vec::new();
        doc.1.render(DEFAULT_WIDTH, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn args_are_comma_separated() {
        let alloc = Alloc::new();
        let doc = print_args(&alloc, ["a", "b", "c"].into_iter().map(|s| alloc.text(s)));
        assert_eq!(render(doc), "(a, b, c)");
    }

    #[test]
    fn empty_args_print_nothing() {
        let alloc = Alloc::new();
        let doc = print_args(&alloc, std::iter::empty());
        assert_eq!(render(doc), "");
    }

    #[test]
    fn parens_only_when_requested() {
        let alloc = Alloc::new();
        assert_eq!(render(alloc.text("x").parens_if(true)), "(x)");
        let alloc = Alloc::new();
        assert_eq!(render(alloc.text("x").parens_if(false)), "x");
    }
}
