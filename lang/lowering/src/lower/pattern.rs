//! Lowering of clauses.
//!
//! Pattern variables are bound in two passes: first all binding occurrences of a
//! left-hand side are collected, then the patterns are lowered with all of them in scope.
//! This way inaccessible terms may refer to variables bound further to the right,
//! as in `cons(.n, .A, x, xs), n`.

use std::vec::IntoIter;

use eqc_lang_ast::{self as ast, Var};
use eqc_lang_miette_util::ToMiette;
use eqc_lang_parser::cst::{self, ident::Ident};

use super::Lower;
use super::nat_lit::{nat_lit_pattern, succ_n_pattern};
use crate::{Ctx, DeclMeta, LoweringError, LoweringResult};

/// Lower a clause of the definition `def_name`, or of a nested match if `def_name` is `None`
pub fn lower_clause(
    clause: &cst::exp::Clause,
    ctx: &mut Ctx,
    def_name: Option<&str>,
) -> LoweringResult<ast::Clause> {
    let cst::exp::Clause { span, lhs, rhs } = clause;

    // `f(p1, .., pn) => ..` explicitly names the defined function
    let (head, pats) = match (def_name, lhs.as_slice()) {
        (Some(def_name), [cst::exp::Exp::Call(cst::exp::Call { name, args: Some(args), .. })])
            if name.id == def_name =>
        {
            (Some(ast::IdBound { span: Some(name.span), id: name.id.clone() }), args.as_slice())
        }
        _ => (None, lhs.as_slice()),
    };

    let mut names = Vec::new();
    for pat in pats {
        collect_binders(pat, ctx, &mut names);
    }
    let vars: Vec<Var> = names.iter().map(|name| Var::fresh(&name.id)).collect();

    ctx.bind_fold(&vars, |ctx| {
        let mut binders = vars.clone().into_iter();
        let pats = pats
            .iter()
            .map(|pat| lower_pattern(pat, ctx, &mut binders))
            .collect::<LoweringResult<Vec<_>>>()?;
        Ok(ast::Clause {
            span: Some(*span),
            lhs: ast::Lhs { head, pats },
            rhs: rhs.lower(ctx)?,
        })
    })
}

// Pass 1
//
//

/// Collect the binding occurrences of variables in a pattern, from left to right
fn collect_binders(pat: &cst::exp::Exp, ctx: &Ctx, out: &mut Vec<Ident>) {
    match pat {
        cst::exp::Exp::Call(cst::exp::Call { name, args: None, .. }) => {
            if ctx.is_pattern_binder(name) {
                out.push(name.clone())
            }
        }
        cst::exp::Exp::Call(cst::exp::Call { name, args: Some(args), .. }) => {
            match ctx.lookup_global(name) {
                Some(DeclMeta::Ctor { .. }) => {
                    args.iter().for_each(|arg| collect_binders(arg, ctx, out))
                }
                Some(_) => args.iter().for_each(|arg| collect_term_binders(arg, ctx, out)),
                None => {}
            }
        }
        cst::exp::Exp::Add(cst::exp::Add { lhs, rhs, .. }) => match &**rhs {
            cst::exp::Exp::NatLit(_) => collect_binders(lhs, ctx, out),
            _ => {
                collect_term_binders(lhs, ctx, out);
                collect_term_binders(rhs, ctx, out);
            }
        },
        cst::exp::Exp::Anno(cst::exp::Anno { exp, .. }) => collect_binders(exp, ctx, out),
        _ => {}
    }
}

/// Collect the binding occurrences of variables in a term pattern such as `add(x, 2)`
fn collect_term_binders(exp: &cst::exp::Exp, ctx: &Ctx, out: &mut Vec<Ident>) {
    match exp {
        cst::exp::Exp::Call(cst::exp::Call { name, args: None, .. }) => {
            if ctx.is_pattern_binder(name) {
                out.push(name.clone())
            }
        }
        cst::exp::Exp::Call(cst::exp::Call { args: Some(args), .. }) => {
            args.iter().for_each(|arg| collect_term_binders(arg, ctx, out))
        }
        cst::exp::Exp::Add(cst::exp::Add { lhs, rhs, .. }) => {
            collect_term_binders(lhs, ctx, out);
            collect_term_binders(rhs, ctx, out);
        }
        cst::exp::Exp::Anno(cst::exp::Anno { exp, .. }) => collect_term_binders(exp, ctx, out),
        _ => {}
    }
}

// Pass 2
//
//

fn next_binder(binders: &mut IntoIter<Var>, name: &Ident) -> LoweringResult<Var> {
    binders.next().ok_or_else(|| {
        Box::new(LoweringError::Impossible {
            message: format!("No binder collected for pattern variable {}", name.id),
            span: Some(name.span.to_miette()),
        })
    })
}

fn lower_pattern(
    pat: &cst::exp::Exp,
    ctx: &mut Ctx,
    binders: &mut IntoIter<Var>,
) -> LoweringResult<ast::Pattern> {
    match pat {
        cst::exp::Exp::Call(cst::exp::Call { span, name, args }) => {
            match (ctx.lookup_global(name).cloned(), args) {
                (None, None) => {
                    let var = next_binder(binders, name)?;
                    Ok(ast::Pattern::Var(ast::PatVar { span: Some(*span), var }))
                }
                (None, Some(_)) => Err(Box::new(LoweringError::UndefinedIdent {
                    name: name.id.clone(),
                    span: name.span.to_miette(),
                })),
                (Some(DeclMeta::Ctor { .. }), args) => {
                    let args = match args {
                        Some(args) => args
                            .iter()
                            .map(|arg| lower_pattern(arg, ctx, binders))
                            .collect::<LoweringResult<Vec<_>>>()?,
                        None => Vec::new(),
                    };
                    Ok(ast::Pattern::Ctor(ast::CtorPattern {
                        span: Some(*span),
                        name: ast::IdBound { span: Some(name.span), id: name.id.clone() },
                        args,
                    }))
                }
                (Some(_), _) => lower_term_pattern(pat, ctx, binders),
            }
        }
        cst::exp::Exp::NatLit(cst::exp::NatLit { span, val }) => nat_lit_pattern(val, *span, ctx),
        cst::exp::Exp::Add(cst::exp::Add { span, lhs, rhs }) => match &**rhs {
            cst::exp::Exp::NatLit(cst::exp::NatLit { val, .. }) => {
                let base = lower_pattern(lhs, ctx, binders)?;
                succ_n_pattern(base, val, *span, ctx)
            }
            _ => lower_term_pattern(pat, ctx, binders),
        },
        cst::exp::Exp::Inaccessible(cst::exp::Inaccessible { span, exp }) => {
            Ok(ast::Pattern::Inaccessible(ast::Inaccessible {
                span: Some(*span),
                exp: exp.lower(ctx)?,
            }))
        }
        cst::exp::Exp::Wildcard(cst::exp::Wildcard { span }) => {
            Ok(ast::Pattern::Wildcard(ast::Wildcard { span: Some(*span) }))
        }
        cst::exp::Exp::Anno(cst::exp::Anno { exp, .. }) => lower_pattern(exp, ctx, binders),
        _ => lower_term_pattern(pat, ctx, binders),
    }
}

/// An expression in pattern position which is not a constructor pattern.
/// The binders collected for it in the first pass are already in scope.
fn lower_term_pattern(
    pat: &cst::exp::Exp,
    ctx: &mut Ctx,
    binders: &mut IntoIter<Var>,
) -> LoweringResult<ast::Pattern> {
    let mut names = Vec::new();
    match pat {
        cst::exp::Exp::Call(cst::exp::Call { args: Some(args), .. }) => {
            args.iter().for_each(|arg| collect_term_binders(arg, ctx, &mut names))
        }
        cst::exp::Exp::Add(cst::exp::Add { lhs, rhs, .. }) => {
            collect_term_binders(lhs, ctx, &mut names);
            collect_term_binders(rhs, ctx, &mut names);
        }
        _ => {}
    }
    let term_binders =
        names.iter().map(|name| next_binder(binders, name)).collect::<LoweringResult<Vec<_>>>()?;
    Ok(ast::Pattern::Term(ast::TermPattern {
        span: Some(pat.span()),
        exp: Box::new(pat.lower(ctx)?),
        binders: term_binders,
    }))
}
