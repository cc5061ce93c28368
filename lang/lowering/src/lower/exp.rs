use eqc_lang_ast::{self as ast, Var};
use eqc_lang_miette_util::ToMiette;
use eqc_lang_parser::cst;

use super::nat_lit::{nat_lit, succ_n};
use super::{Lower, lower_clause};
use crate::{Ctx, DeclMeta, LoweringError, LoweringResult};

const ADD: &str = "add";

impl Lower for cst::exp::Exp {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        match self {
            cst::exp::Exp::Call(e) => e.lower(ctx),
            cst::exp::Exp::App(e) => e.lower(ctx),
            cst::exp::Exp::TypeUniv(cst::exp::TypeUniv { span }) => {
                Ok(ast::TypeUniv { span: Some(*span) }.into())
            }
            cst::exp::Exp::NatLit(cst::exp::NatLit { span, val }) => nat_lit(val, *span, ctx),
            cst::exp::Exp::Add(e) => e.lower(ctx),
            cst::exp::Exp::Pi(e) => e.lower(ctx),
            cst::exp::Exp::Lam(e) => e.lower(ctx),
            cst::exp::Exp::Anno(e) => e.lower(ctx),
            cst::exp::Exp::LocalMatch(e) => e.lower(ctx),
            cst::exp::Exp::Inaccessible(cst::exp::Inaccessible { span, .. })
            | cst::exp::Exp::Wildcard(cst::exp::Wildcard { span }) => {
                Err(Box::new(LoweringError::PatternInExpression { span: span.to_miette() }))
            }
        }
    }
}

impl Lower for cst::exp::Call {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        let cst::exp::Call { span, name, args } = self;

        if let Some(var) = ctx.lookup_local(name) {
            let fun = ast::Exp::Variable(ast::Variable { span: Some(name.span), var: var.clone() });
            return match args {
                None => Ok(fun),
                Some(args) => {
                    Ok(ast::App { span: Some(*span), fun: Box::new(fun), args: args.lower(ctx)? }
                        .into())
                }
            };
        }

        let Some(meta) = ctx.lookup_global(name).cloned() else {
            return Err(Box::new(LoweringError::UndefinedIdent {
                name: name.id.clone(),
                span: name.span.to_miette(),
            }));
        };
        let args = args.lower(ctx)?.unwrap_or_default();
        if args.len() != meta.arity() {
            return Err(Box::new(LoweringError::WrongNumberOfArgs {
                name: name.id.clone(),
                expected: meta.arity(),
                actual: args.len(),
                span: span.to_miette(),
            }));
        }
        let name = ast::IdBound { span: Some(name.span), id: name.id.clone() };
        Ok(match meta {
            DeclMeta::Data { .. } => ast::TypCtor { span: Some(*span), name, args }.into(),
            DeclMeta::Ctor { .. } => {
                ast::Call { span: Some(*span), kind: ast::CallKind::Constructor, name, args }.into()
            }
            DeclMeta::Def { .. } => {
                ast::Call { span: Some(*span), kind: ast::CallKind::Definition, name, args }.into()
            }
        })
    }
}

impl Lower for cst::exp::App {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        let cst::exp::App { span, fun, args } = self;
        Ok(ast::App { span: Some(*span), fun: fun.lower(ctx)?, args: args.lower(ctx)? }.into())
    }
}

impl Lower for cst::exp::Add {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        let cst::exp::Add { span, lhs, rhs } = self;
        if let cst::exp::Exp::NatLit(cst::exp::NatLit { val, .. }) = &**rhs {
            let lhs = lhs.lower(ctx)?;
            return succ_n(*lhs, val, *span, ctx);
        }
        if ctx.symbol_table.lookup(ADD) != Some(&DeclMeta::Def { arity: 2 }) {
            return Err(Box::new(LoweringError::AddCannotBeDesugared { span: span.to_miette() }));
        }
        Ok(ast::Call {
            span: Some(*span),
            kind: ast::CallKind::Definition,
            name: ast::IdBound { span: Some(*span), id: ADD.to_owned() },
            args: vec![*lhs.lower(ctx)?, *rhs.lower(ctx)?],
        }
        .into())
    }
}

impl Lower for cst::exp::Pi {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        let cst::exp::Pi { span, params, codomain } = self;
        lower_pi_params(params, ctx, Vec::new(), |ctx, params| {
            Ok(ast::Pi {
                span: Some(*span),
                params: ast::Telescope { params },
                codomain: codomain.lower(ctx)?,
            }
            .into())
        })
    }
}

fn lower_pi_params<T, F>(
    params: &[cst::exp::PiParam],
    ctx: &mut Ctx,
    mut acc: Vec<ast::Param>,
    f: F,
) -> LoweringResult<T>
where
    F: FnOnce(&mut Ctx, Vec<ast::Param>) -> LoweringResult<T>,
{
    match params.split_first() {
        None => f(ctx, acc),
        Some((cst::exp::PiParam { name, typ }, rest)) => {
            let span = typ.span();
            let typ = typ.lower(ctx)?;
            match name {
                Some(name) => {
                    let var = Var::fresh(&name.id);
                    let span = Some(name.span.merge(span));
                    acc.push(ast::Param { span, var: var.clone(), typ });
                    ctx.bind_fold(&[var], |ctx| lower_pi_params(rest, ctx, acc, f))
                }
                None => {
                    // `A -> B`: the parameter cannot be referenced
                    acc.push(ast::Param { span: Some(span), var: Var::fresh("_"), typ });
                    lower_pi_params(rest, ctx, acc, f)
                }
            }
        }
    }
}

impl Lower for cst::exp::Lam {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        let cst::exp::Lam { span, params, body } = self;
        let params: Vec<Var> = params.iter().map(|param| Var::fresh(&param.id)).collect();
        ctx.bind_fold(&params, |ctx| {
            let body = body.lower(ctx)?;
            Ok(ast::Lam { span: Some(*span), params: params.clone(), body }.into())
        })
    }
}

impl Lower for cst::exp::Anno {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        let cst::exp::Anno { span, exp, typ } = self;
        Ok(ast::Anno { span: Some(*span), exp: exp.lower(ctx)?, typ: typ.lower(ctx)? }.into())
    }
}

impl Lower for cst::exp::LocalMatch {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        let cst::exp::LocalMatch { span, scrutinees, clauses } = self;
        let scrutinees = scrutinees.lower(ctx)?;
        let clauses = clauses
            .iter()
            .map(|clause| lower_clause(clause, ctx, None))
            .collect::<LoweringResult<Vec<_>>>()?;
        Ok(ast::LocalMatch { span: Some(*span), scrutinees, clauses }.into())
    }
}
