//! Nested pattern matching
//!
//! A `match` in a right-hand side is compiled as a function of its own, taking the
//! scrutinees as arguments. The variables in scope which occur in the types of the
//! scrutinees are passed as additional leading arguments, so that splitting on a
//! scrutinee may refine them. The resulting case tree is inlined at the position of
//! the `match`.

use log::debug;

use eqc_lang_ast::*;
use eqc_lang_miette_util::{ToMiette, codespan::Span};
use eqc_lang_printer::Print;

use crate::Program;
use crate::ctx::TypeCtx;
use crate::preprocess::preprocess;
use crate::result::*;
use crate::rewrite::rewrite;
use crate::split::Compiler;

impl Compiler<'_> {
    /// Replace every nested match in `exp` by its case tree
    pub(crate) fn eliminate_matches(&mut self, exp: &Exp, types: &TypeCtx) -> CompileResult<Exp> {
        rewrite(exp, &mut |exp| match exp {
            Exp::LocalMatch(m) => Ok(Some(self.compile_local_match(m, types)?)),
            _ => Ok(None),
        })
    }

    fn compile_local_match(&mut self, m: &LocalMatch, types: &TypeCtx) -> CompileResult<Exp> {
        let LocalMatch { span, scrutinees, clauses } = m;
        let prg = self.prg();
        let scrutinees = scrutinees
            .iter()
            .map(|exp| self.eliminate_matches(exp, types))
            .collect::<CompileResult<Vec<_>>>()?;
        let typs = scrutinees
            .iter()
            .map(|exp| infer(prg, types, exp, *span))
            .collect::<CompileResult<Vec<_>>>()?;

        // Variables in scope which the scrutinee types depend on
        let mut outer: Vec<Var> = Vec::new();
        for typ in &typs {
            for var in typ.free_vars() {
                if types.contains(&var) && !outer.contains(&var) {
                    outer.push(var);
                }
            }
        }

        let mut params = Vec::with_capacity(outer.len() + scrutinees.len());
        let mut renaming = Substitution::new();
        for var in &outer {
            let fresh = var.refresh();
            let typ = types.lookup(var).map(|typ| typ.subst(&renaming)).ok_or_else(|| {
                CompileError::impossible(format!("No type for variable {var} in scope"))
            })?;
            params.push(Param { span: None, var: fresh.clone(), typ: Box::new(typ) });
            renaming.insert(var, Exp::var(&fresh));
        }
        for (exp, typ) in scrutinees.iter().zip(&typs) {
            let name = exp.strip_anno().as_var().map(|var| var.name.clone());
            params.push(Param {
                span: None,
                var: Var::fresh(name.unwrap_or_else(|| "x".to_owned())),
                typ: Box::new(typ.subst(&renaming)),
            });
        }

        let name = self.next_match_name();
        debug!("Compiling nested match {name}");
        let clauses = preprocess(&prg, &name, scrutinees.len(), clauses)?
            .into_iter()
            .map(|clause| {
                // The clause matches the additional arguments with fresh variables
                // and refers to them instead of the variables in scope
                let vars: Vec<Var> = outer.iter().map(Var::refresh).collect();
                let mut to_pattern_vars = Substitution::new();
                for (var, pattern_var) in outer.iter().zip(&vars) {
                    to_pattern_vars.insert(var, Exp::var(pattern_var));
                }
                let mut clause = clause.subst(&to_pattern_vars);
                clause.lhs.pats =
                    vars.into_iter().map(Pattern::var).chain(clause.lhs.pats).collect();
                clause
            })
            .collect();

        let mut compiler = Compiler::new(prg, &name, *span, clauses).with_hidden(outer.len());
        let tree = compiler.compile_params(&Telescope { params: params.clone() }, types)?;
        self.add_warnings(compiler.finish());

        let mut inline = Substitution::new();
        for (param, var) in params.iter().zip(&outer) {
            inline.insert(&param.var, Exp::var(var));
        }
        for (param, exp) in params[outer.len()..].iter().zip(&scrutinees) {
            inline.insert(&param.var, exp.strip_anno().clone());
        }
        Ok(tree.subst(&inline))
    }
}

/// The type of a scrutinee
fn infer(prg: Program, types: &TypeCtx, exp: &Exp, span: Option<Span>) -> CompileResult<Exp> {
    let res = match exp {
        Exp::Anno(Anno { typ, .. }) => Some((**typ).clone()),
        Exp::Variable(Variable { var, .. }) => types.lookup(var).cloned(),
        Exp::Call(Call { kind: CallKind::Constructor, name, args, .. }) => {
            prg.module.ctor(&name.id).map(|(_, ctor)| {
                Exp::from(ctor.typ.clone()).subst(&instantiate(&ctor.params, args))
            })
        }
        Exp::Call(Call { kind: CallKind::Definition, name, args, .. }) => {
            prg.module.def(&name.id).map(|def| *def.ret_typ.subst(&instantiate(&def.params, args)))
        }
        _ => None,
    };
    res.ok_or_else(|| {
        Box::new(CompileError::CannotInferMatch {
            exp: exp.print_to_string(None),
            span: span.to_miette(),
        })
    })
}

fn instantiate(params: &Telescope, args: &[Exp]) -> Substitution {
    let mut subst = Substitution::new();
    for (var, arg) in params.vars().zip(args) {
        subst.insert(var, arg.clone());
    }
    subst
}
