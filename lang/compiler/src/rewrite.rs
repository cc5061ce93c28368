//! Generic rewriting of expressions

use eqc_lang_ast::*;

use crate::result::*;

/// Rewrite `exp` top-down.
///
/// Wherever `f` returns a replacement, the replacement is used as is and the subexpressions
/// of the original are not visited.
pub fn rewrite<F>(exp: &Exp, f: &mut F) -> CompileResult<Exp>
where
    F: FnMut(&Exp) -> CompileResult<Option<Exp>>,
{
    if let Some(res) = f(exp)? {
        return Ok(res);
    }
    let res = match exp {
        Exp::Variable(_) | Exp::TypeUniv(_) => exp.clone(),
        Exp::TypCtor(TypCtor { span, name, args }) => {
            TypCtor { span: *span, name: name.clone(), args: rewrite_all(args, f)? }.into()
        }
        Exp::Call(Call { span, kind, name, args }) => {
            let args = rewrite_all(args, f)?;
            Call { span: *span, kind: *kind, name: name.clone(), args }.into()
        }
        Exp::App(App { span, fun, args }) => App {
            span: *span,
            fun: Box::new(rewrite(fun, f)?),
            args: rewrite_all(args, f)?,
        }
        .into(),
        Exp::Lam(Lam { span, params, body }) => {
            Lam { span: *span, params: params.clone(), body: Box::new(rewrite(body, f)?) }.into()
        }
        Exp::Pi(Pi { span, params, codomain }) => Pi {
            span: *span,
            params: Telescope {
                params: params
                    .params
                    .iter()
                    .map(|Param { span, var, typ }| {
                        Ok(Param { span: *span, var: var.clone(), typ: Box::new(rewrite(typ, f)?) })
                    })
                    .collect::<CompileResult<_>>()?,
            },
            codomain: Box::new(rewrite(codomain, f)?),
        }
        .into(),
        Exp::Anno(Anno { span, exp, typ }) => Anno {
            span: *span,
            exp: Box::new(rewrite(exp, f)?),
            typ: Box::new(rewrite(typ, f)?),
        }
        .into(),
        Exp::LocalMatch(LocalMatch { span, scrutinees, clauses }) => LocalMatch {
            span: *span,
            scrutinees: rewrite_all(scrutinees, f)?,
            clauses: clauses
                .iter()
                .map(|clause| {
                    Ok(Clause {
                        span: clause.span,
                        lhs: clause.lhs.clone(),
                        rhs: Box::new(rewrite(&clause.rhs, f)?),
                    })
                })
                .collect::<CompileResult<_>>()?,
        }
        .into(),
        Exp::Cases(Cases { span, family, scrutinee, arms }) => Cases {
            span: *span,
            family: family.clone(),
            scrutinee: Box::new(rewrite(scrutinee, f)?),
            arms: arms
                .iter()
                .map(|arm| {
                    Ok(Arm {
                        ctor: arm.ctor.clone(),
                        params: arm.params.clone(),
                        refinements: arm.refinements.clone(),
                        body: Box::new(rewrite(&arm.body, f)?),
                    })
                })
                .collect::<CompileResult<_>>()?,
        }
        .into(),
        Exp::Absurd(Absurd { span, family, lhs, rhs }) => Absurd {
            span: *span,
            family: family.clone(),
            lhs: Box::new(rewrite(lhs, f)?),
            rhs: Box::new(rewrite(rhs, f)?),
        }
        .into(),
    };
    Ok(res)
}

pub fn rewrite_all<F>(exps: &[Exp], f: &mut F) -> CompileResult<Vec<Exp>>
where
    F: FnMut(&Exp) -> CompileResult<Option<Exp>>,
{
    exps.iter().map(|exp| rewrite(exp, f)).collect()
}

/// The direct subexpressions of `exp`
pub fn children(exp: &Exp) -> Vec<&Exp> {
    match exp {
        Exp::Variable(_) | Exp::TypeUniv(_) => vec![],
        Exp::TypCtor(TypCtor { args, .. }) | Exp::Call(Call { args, .. }) => args.iter().collect(),
        Exp::App(App { fun, args, .. }) => std::iter::once(&**fun).chain(args.iter()).collect(),
        Exp::Lam(Lam { body, .. }) => vec![&**body],
        Exp::Pi(Pi { params, codomain, .. }) => {
            let typs = params.params.iter().map(|param| &*param.typ);
            typs.chain(std::iter::once(&**codomain)).collect()
        }
        Exp::Anno(Anno { exp, typ, .. }) => vec![&**exp, &**typ],
        Exp::LocalMatch(LocalMatch { scrutinees, clauses, .. }) => {
            scrutinees.iter().chain(clauses.iter().map(|clause| &*clause.rhs)).collect()
        }
        Exp::Cases(Cases { scrutinee, arms, .. }) => {
            std::iter::once(&**scrutinee).chain(arms.iter().map(|arm| &*arm.body)).collect()
        }
        Exp::Absurd(Absurd { lhs, rhs, .. }) => vec![&**lhs, &**rhs],
    }
}

/// Replace calls of the definition `name` by applications of the local variable `var`
pub fn calls_to_var(exp: &Exp, name: &str, var: &Var) -> CompileResult<Exp> {
    rewrite(exp, &mut |exp| match exp {
        Exp::Call(Call { span, kind: CallKind::Definition, name: callee, args })
            if callee.id == name =>
        {
            let args = args
                .iter()
                .map(|arg| calls_to_var(arg, name, var))
                .collect::<CompileResult<_>>()?;
            let fun = Box::new(Variable { span: *span, var: var.clone() }.into());
            Ok(Some(App { span: *span, fun, args }.into()))
        }
        _ => Ok(None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_recursive_calls_are_replaced() {
        let n = Var::fresh("n");
        let this = Var::fresh("ack");
        let inner_call = Exp::def_call("ack", vec![Exp::var(&n)]);
        let exp = Exp::def_call("ack", vec![Exp::var(&n), inner_call]);
        let res = calls_to_var(&exp, "ack", &this).unwrap();
        let apply = |args: Vec<Exp>| -> Exp {
            App { span: None, fun: Box::new(Exp::var(&this)), args }.into()
        };
        let expected = apply(vec![Exp::var(&n), apply(vec![Exp::var(&n)])]);
        assert_eq!(res, expected);
    }

    #[test]
    fn other_calls_are_kept() {
        let n = Var::fresh("n");
        let exp = Exp::def_call("add", vec![Exp::var(&n)]);
        assert_eq!(calls_to_var(&exp, "ack", &Var::fresh("ack")).unwrap(), exp);
    }
}
