use eqc_lang_ast::{self as ast, Var};
use eqc_lang_miette_util::ToMiette;
use eqc_lang_parser::cst;

use super::{Lower, lower_clause};
use crate::{Ctx, LoweringError, LoweringResult};

impl Lower for cst::decls::Decl {
    type Target = ast::Decl;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        match self {
            cst::decls::Decl::Data(data) => Ok(ast::Decl::Data(data.lower(ctx)?)),
            cst::decls::Decl::Def(def) => Ok(ast::Decl::Def(def.lower(ctx)?)),
        }
    }
}

impl Lower for cst::decls::Data {
    type Target = ast::Data;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        log::trace!("Lowering data declaration: {}", self.name.id);
        let cst::decls::Data { span, name, params, ctors } = self;

        let params = lower_telescope(params, ctx, |_, params| Ok(params))?;
        let ctors = ctors
            .iter()
            .map(|ctor| lower_ctor(ctor, name, params.len(), ctx))
            .collect::<LoweringResult<Vec<_>>>()?;

        Ok(ast::Data {
            span: Some(*span),
            name: ast::IdBind { span: Some(name.span), id: name.id.clone() },
            params,
            ctors,
        })
    }
}

fn lower_ctor(
    ctor: &cst::decls::Ctor,
    family: &cst::ident::Ident,
    arity: usize,
    ctx: &mut Ctx,
) -> LoweringResult<ast::Ctor> {
    let cst::decls::Ctor { span, name, params, typ } = ctor;

    lower_telescope(params, ctx, |ctx, params| {
        let typ = match typ {
            None if arity == 0 => ast::TypCtor {
                span: Some(name.span),
                name: ast::IdBound { span: Some(family.span), id: family.id.clone() },
                args: Vec::new(),
            },
            None => {
                return Err(Box::new(LoweringError::MustProvideArgs {
                    ctor: name.id.clone(),
                    typ: family.id.clone(),
                    span: span.to_miette(),
                }));
            }
            Some(typ) => match *typ.lower(ctx)? {
                ast::Exp::TypCtor(typ) if typ.name.id == family.id => typ,
                _ => {
                    return Err(Box::new(LoweringError::ExpectedTypCtor {
                        ctor: name.id.clone(),
                        typ: family.id.clone(),
                        span: typ.span().to_miette(),
                    }));
                }
            },
        };
        Ok(ast::Ctor {
            span: Some(*span),
            name: ast::IdBind { span: Some(name.span), id: name.id.clone() },
            params,
            typ,
        })
    })
}

impl Lower for cst::decls::Def {
    type Target = ast::Def;

    fn lower(&self, ctx: &mut Ctx) -> LoweringResult<Self::Target> {
        log::trace!("Lowering definition: {}", self.name.id);
        let cst::decls::Def { span, name, params, ret_typ, termination, clauses } = self;

        let (params, ret_typ, termination) = lower_telescope(params, ctx, |ctx, params| {
            Ok((params, ret_typ.lower(ctx)?, termination.lower(ctx)?))
        })?;

        // Clauses bind their own variables, the parameters are not in scope
        let clauses = clauses
            .iter()
            .map(|clause| lower_clause(clause, ctx, Some(&name.id)))
            .collect::<LoweringResult<Vec<_>>>()?;

        Ok(ast::Def {
            span: Some(*span),
            name: ast::IdBind { span: Some(name.span), id: name.id.clone() },
            params,
            ret_typ,
            termination,
            clauses,
        })
    }
}

/// Lower a telescope, binding each parameter in the types of the following ones,
/// and run `f` with all parameters in scope.
pub fn lower_telescope<T, F>(
    params: &[cst::decls::Param],
    ctx: &mut Ctx,
    f: F,
) -> LoweringResult<T>
where
    F: FnOnce(&mut Ctx, ast::Telescope) -> LoweringResult<T>,
{
    fn go<T, F>(
        params: &[cst::decls::Param],
        ctx: &mut Ctx,
        mut acc: Vec<ast::Param>,
        f: F,
    ) -> LoweringResult<T>
    where
        F: FnOnce(&mut Ctx, ast::Telescope) -> LoweringResult<T>,
    {
        match params.split_first() {
            None => f(ctx, ast::Telescope { params: acc }),
            Some((cst::decls::Param { span, name, typ }, rest)) => {
                let typ = typ.lower(ctx)?;
                let var = Var::fresh(&name.id);
                acc.push(ast::Param { span: Some(*span), var: var.clone(), typ });
                ctx.bind_fold(&[var], |ctx| go(rest, ctx, acc, f))
            }
        }
    }
    go(params, ctx, Vec::new(), f)
}
