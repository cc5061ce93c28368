//! Termination checking of case trees
//!
//! Every recursive call is compared with the arguments of the function at the position of
//! the call, as determined by the enclosing splits. A definition is accepted if one argument
//! is a strict subterm in every call, or otherwise if the measure given with
//! `termination_by` decreases in every call.

use std::fmt;

use log::trace;

use eqc_lang_ast::*;
use eqc_lang_kernel::normalize_exp;
use eqc_lang_miette_util::{ToMiette, codespan::Span};
use eqc_lang_printer::Print;

use crate::Program;
use crate::result::*;
use crate::rewrite::children;

const ZERO: &str = "zero";
const SUCC: &str = "succ";

/// Why a definition terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    NonRecursive,
    /// The argument at position `arg` decreases structurally
    Structural { arg: usize },
    /// The measure decreases
    Measure,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::NonRecursive => write!(f, "non-recursive"),
            Termination::Structural { arg } => write!(f, "structural on argument {}", arg + 1),
            Termination::Measure => write!(f, "measure"),
        }
    }
}

/// A recursive call together with the arguments of the function at its position
#[derive(Debug, Clone)]
struct RecCall {
    args: Vec<Exp>,
    shape: Vec<Exp>,
    span: Option<Span>,
}

fn collect_calls(exp: &Exp, name: &str, shape: &[Exp], out: &mut Vec<RecCall>) {
    match exp {
        Exp::Cases(Cases { scrutinee, arms, .. }) => {
            collect_calls(scrutinee, name, shape, out);
            for arm in arms {
                let mut subst = Substitution::new();
                if let Some(var) = scrutinee.strip_anno().as_var() {
                    let fields = arm.params.iter().map(Exp::var).collect();
                    subst.insert(var, Exp::ctor(&arm.ctor.id, fields));
                }
                for (var, exp) in &arm.refinements {
                    subst.insert(var, exp.clone());
                }
                collect_calls(&arm.body, name, &shape.to_vec().subst(&subst), out);
            }
        }
        Exp::Call(Call { span, kind: CallKind::Definition, name: callee, args })
            if callee.id == name =>
        {
            out.push(RecCall { args: args.clone(), shape: shape.to_vec(), span: *span });
            for arg in args {
                collect_calls(arg, name, shape, out);
            }
        }
        _ => {
            for child in children(exp) {
                collect_calls(child, name, shape, out);
            }
        }
    }
}

/// Whether `exp` occurs below a constructor in `of`
fn is_strict_subterm(exp: &Exp, of: &Exp) -> bool {
    match of.as_ctor() {
        Some((_, args)) => args.iter().any(|arg| arg == exp || is_strict_subterm(exp, arg)),
        None => false,
    }
}

/// `succ^k(base)` as `(k, base)`
fn split_succs(exp: &Exp) -> (usize, &Exp) {
    match exp.as_ctor() {
        Some((SUCC, [pred])) => {
            let (k, base) = split_succs(pred);
            (k + 1, base)
        }
        _ => (0, exp),
    }
}

pub fn check(
    prg: Program,
    name: &str,
    params: &[Var],
    measure: Option<&Exp>,
    tree: &Exp,
    span: Option<Span>,
) -> CompileResult<Termination> {
    let mut calls = Vec::new();
    let shape: Vec<Exp> = params.iter().map(Exp::var).collect();
    collect_calls(tree, name, &shape, &mut calls);
    if calls.is_empty() {
        return Ok(Termination::NonRecursive);
    }

    let normalize_all = |exps: Vec<Exp>| -> CompileResult<Vec<Exp>> {
        Ok(exps.iter().map(|exp| normalize_exp(exp, prg.sig)).collect::<Result<_, _>>()?)
    };
    let calls = calls
        .into_iter()
        .map(|RecCall { args, shape, span }| {
            Ok(RecCall { args: normalize_all(args)?, shape: normalize_all(shape)?, span })
        })
        .collect::<CompileResult<Vec<_>>>()?;

    let decreases = |call: &RecCall, arg: usize| match (call.args.get(arg), call.shape.get(arg)) {
        (Some(arg), Some(current)) => is_strict_subterm(arg, current),
        _ => false,
    };

    // The argument decreasing in most calls is used for error messages
    let mut best: Option<(usize, usize)> = None;
    for arg in 0..params.len() {
        let accepted = calls.iter().filter(|call| decreases(call, arg)).count();
        if accepted == calls.len() {
            trace!("{name} is structurally recursive on {}", params[arg]);
            return Ok(Termination::Structural { arg });
        }
        if best.is_none_or(|(_, most)| accepted > most) {
            best = Some((arg, accepted));
        }
    }

    if let Some(measure) = measure {
        for call in &calls {
            if !measure_decreases(prg, params, measure, call)? {
                return Err(non_structural(
                    name,
                    call,
                    span,
                    format!("The measure {} does not decrease", measure.print_to_string(None)),
                ));
            }
        }
        trace!("{name} terminates by the measure {}", measure.print_to_string(None));
        return Ok(Termination::Measure);
    }

    let failing = match best {
        Some((arg, _)) => calls.iter().find(|call| !decreases(call, arg)),
        None => calls.first(),
    };
    let Some(call) = failing else {
        return Err(CompileError::impossible("No failing recursive call"));
    };
    Err(non_structural(
        name,
        call,
        span,
        "No argument is a strict subterm in every recursive call. \
         Use termination_by to give a decreasing measure"
            .to_owned(),
    ))
}

fn measure_decreases(
    prg: Program,
    params: &[Var],
    measure: &Exp,
    call: &RecCall,
) -> CompileResult<bool> {
    let at = |args: &[Exp]| -> CompileResult<Exp> {
        let mut subst = Substitution::new();
        for (var, arg) in params.iter().zip(args) {
            subst.insert(var, arg.clone());
        }
        Ok(normalize_exp(&measure.subst(&subst), prg.sig)?)
    };
    let current = at(&call.shape)?;
    let next = at(&call.args)?;
    let (k_current, base_current) = split_succs(&current);
    let (k_next, base_next) = split_succs(&next);
    trace!("measure {} ~> {}", current.print_to_string(None), next.print_to_string(None));
    let base_is_zero = matches!(base_next.as_ctor(), Some((ZERO, [])));
    Ok(k_next < k_current && (base_next == base_current || base_is_zero))
}

fn non_structural(
    name: &str,
    call: &RecCall,
    span: Option<Span>,
    help: String,
) -> Box<CompileError> {
    Box::new(CompileError::NonStructuralRecursion {
        name: name.to_owned(),
        call: Exp::def_call(name, call.args.clone()).print_to_string(None),
        help: Some(help),
        span: call.span.or(span).to_miette(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn succ(exp: Exp) -> Exp {
        Exp::ctor(SUCC, vec![exp])
    }

    #[test]
    fn strict_subterms() {
        let n = Var::fresh("n");
        let m = Var::fresh("m");
        let shape = Exp::ctor("pair", vec![succ(Exp::var(&n)), Exp::var(&m)]);
        assert!(is_strict_subterm(&Exp::var(&n), &shape));
        assert!(is_strict_subterm(&succ(Exp::var(&n)), &shape));
        assert!(!is_strict_subterm(&shape, &shape));
        assert!(!is_strict_subterm(&Exp::var(&n), &Exp::var(&n)));
    }

    #[test]
    fn succ_depth() {
        let n = Var::fresh("n");
        let exp = succ(succ(Exp::var(&n)));
        let (k, base) = split_succs(&exp);
        assert_eq!(k, 2);
        assert_eq!(base, &Exp::var(&n));
    }
}
