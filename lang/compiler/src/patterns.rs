//! Checking of patterns and resolution of term patterns

use log::trace;

use eqc_lang_ast::*;
use eqc_lang_kernel::normalize_exp;
use eqc_lang_miette_util::{ToMiette, codespan::Span};
use eqc_lang_printer::Print;

use crate::Program;
use crate::result::*;

/// Check the constructors of a pattern and turn term patterns into constructor patterns
pub fn resolve(prg: &Program, pat: &Pattern) -> CompileResult<Pattern> {
    match pat {
        Pattern::Var(_) | Pattern::Wildcard(_) | Pattern::Inaccessible(_) => Ok(pat.clone()),
        Pattern::Ctor(CtorPattern { span, name, args }) => {
            check_ctor(prg, &name.id, args.len(), *span)?;
            let args = args.iter().map(|arg| resolve(prg, arg)).collect::<CompileResult<_>>()?;
            Ok(Pattern::Ctor(CtorPattern { span: *span, name: name.clone(), args }))
        }
        Pattern::Term(term) => resolve_term(prg, term),
    }
}

fn check_ctor(prg: &Program, name: &str, arity: usize, span: Option<Span>) -> CompileResult {
    let Some((_, ctor)) = prg.module.ctor(name) else {
        return Err(Box::new(CompileError::MalformedPattern {
            reason: format!("{name} is not a constructor"),
            span: span.to_miette(),
        }));
    };
    if ctor.params.len() != arity {
        return Err(Box::new(CompileError::ArityMismatch {
            what: format!("Constructor {name}"),
            expected: ctor.params.len(),
            actual: arity,
            span: span.to_miette(),
        }));
    }
    Ok(())
}

/// A term pattern such as `add(x, 2)` has to normalize to a constructor tree, here
/// `succ(succ(x))`. Each of its binders has to survive normalization.
fn resolve_term(prg: &Program, term: &TermPattern) -> CompileResult<Pattern> {
    let TermPattern { span, exp, binders } = term;
    let nf = normalize_exp(exp, prg.sig)?;
    trace!("term pattern {} ▷ {}", exp.print_to_string(None), nf.print_to_string(None));
    let mut used = Vec::new();
    let pat = exp_to_pattern(prg, &nf, binders, &mut used, *span)?;
    if let Some(lost) = binders.iter().find(|var| !used.contains(&var.id)) {
        return Err(Box::new(CompileError::MalformedPattern {
            reason: format!(
                "The pattern variable {lost} does not occur in the normal form {} of {}",
                nf.print_to_string(None),
                exp.print_to_string(None)
            ),
            span: span.to_miette(),
        }));
    }
    resolve(prg, &pat)
}

fn exp_to_pattern(
    prg: &Program,
    exp: &Exp,
    binders: &[Var],
    used: &mut Vec<VarId>,
    span: Option<Span>,
) -> CompileResult<Pattern> {
    match exp {
        Exp::Variable(Variable { var, .. }) => {
            if binders.contains(var) && !used.contains(&var.id) {
                used.push(var.id);
                Ok(Pattern::Var(PatVar { span, var: var.clone() }))
            } else {
                Ok(Pattern::Inaccessible(Inaccessible { span, exp: Box::new(exp.clone()) }))
            }
        }
        Exp::Call(Call { kind: CallKind::Constructor, name, args, .. }) => {
            let args = args
                .iter()
                .map(|arg| exp_to_pattern(prg, arg, binders, used, span))
                .collect::<CompileResult<_>>()?;
            Ok(Pattern::Ctor(CtorPattern { span, name: name.clone(), args }))
        }
        _ => Err(Box::new(CompileError::MalformedPattern {
            reason: format!("{} is not a constructor pattern", exp.print_to_string(None)),
            span: span.to_miette(),
        })),
    }
}
