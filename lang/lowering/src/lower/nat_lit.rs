use eqc_lang_ast as ast;
use eqc_lang_miette_util::{ToMiette, codespan::Span};
use num_bigint::BigUint;

use crate::{Ctx, DeclMeta, LoweringError, LoweringResult};

const ZERO: &str = "zero";
const SUCC: &str = "succ";

/// Check that `zero` and `succ` are the constructors of one natural number type
fn check_nat_ctors(ctx: &Ctx, span: Span) -> LoweringResult {
    match (ctx.symbol_table.lookup(ZERO), ctx.symbol_table.lookup(SUCC)) {
        (
            Some(DeclMeta::Ctor { family: zero_family, arity: 0 }),
            Some(DeclMeta::Ctor { family: succ_family, arity: 1 }),
        ) if zero_family == succ_family => Ok(()),
        _ => Err(Box::new(LoweringError::NatLiteralCannotBeDesugared { span: span.to_miette() })),
    }
}

fn ctor(name: &str, span: Span, args: Vec<ast::Exp>) -> ast::Exp {
    ast::Call {
        span: Some(span),
        kind: ast::CallKind::Constructor,
        name: ast::IdBound { span: Some(span), id: name.to_owned() },
        args,
    }
    .into()
}

/// `succ^n(base)`
pub fn succ_n(base: ast::Exp, n: &BigUint, span: Span, ctx: &Ctx) -> LoweringResult<ast::Exp> {
    check_nat_ctors(ctx, span)?;
    let mut out = base;
    let mut i = BigUint::from(0usize);
    while &i != n {
        i += 1usize;
        out = ctor(SUCC, span, vec![out]);
    }
    Ok(out)
}

/// The numeral `n` as `succ^n(zero)`
pub fn nat_lit(n: &BigUint, span: Span, ctx: &Ctx) -> LoweringResult<ast::Exp> {
    check_nat_ctors(ctx, span)?;
    succ_n(ctor(ZERO, span, vec![]), n, span, ctx)
}

fn ctor_pattern(name: &str, span: Span, args: Vec<ast::Pattern>) -> ast::Pattern {
    ast::Pattern::Ctor(ast::CtorPattern {
        span: Some(span),
        name: ast::IdBound { span: Some(span), id: name.to_owned() },
        args,
    })
}

/// The pattern `succ^n(base)`
pub fn succ_n_pattern(
    base: ast::Pattern,
    n: &BigUint,
    span: Span,
    ctx: &Ctx,
) -> LoweringResult<ast::Pattern> {
    check_nat_ctors(ctx, span)?;
    let mut out = base;
    let mut i = BigUint::from(0usize);
    while &i != n {
        i += 1usize;
        out = ctor_pattern(SUCC, span, vec![out]);
    }
    Ok(out)
}

/// The numeral `n` in pattern position
pub fn nat_lit_pattern(n: &BigUint, span: Span, ctx: &Ctx) -> LoweringResult<ast::Pattern> {
    check_nat_ctors(ctx, span)?;
    succ_n_pattern(ctor_pattern(ZERO, span, vec![]), n, span, ctx)
}
