//! Preparation of clauses for the case splitting algorithm
//!
//! Every clause is brought into the form `f(p1, .., pn) => rhs` where `f` is the name of the
//! compiled function and the patterns contain no term patterns.

use log::trace;

use eqc_lang_ast::*;
use eqc_lang_miette_util::{ToMiette, codespan::Span};
use eqc_lang_printer::Print;

use crate::Program;
use crate::patterns::resolve;
use crate::result::*;

pub fn preprocess(
    prg: &Program,
    name: &str,
    arity: usize,
    clauses: &[Clause],
) -> CompileResult<Vec<Clause>> {
    clauses.iter().map(|clause| preprocess_clause(prg, name, arity, clause)).collect()
}

fn preprocess_clause(
    prg: &Program,
    name: &str,
    arity: usize,
    clause: &Clause,
) -> CompileResult<Clause> {
    let Clause { span, lhs: Lhs { head, pats }, rhs } = clause;

    let head = match head {
        None => IdBound { span: *span, id: name.to_owned() },
        Some(head) if head.id == name => head.clone(),
        Some(head) => {
            return Err(Box::new(CompileError::MalformedPattern {
                reason: format!("Expected a clause of {name}, found a clause of {head}"),
                span: head.span.to_miette(),
            }));
        }
    };

    if pats.len() != arity {
        return Err(Box::new(CompileError::ArityMismatch {
            what: name.to_owned(),
            expected: arity,
            actual: pats.len(),
            span: span.to_miette(),
        }));
    }

    let pats = pats.iter().map(|pat| resolve(prg, pat)).collect::<CompileResult<Vec<_>>>()?;
    check_linear(&pats)?;

    let clause = Clause { span: *span, lhs: Lhs { head: Some(head), pats }, rhs: rhs.clone() };
    trace!("preprocessed {}", clause.print_to_string(None));
    Ok(clause)
}

/// Every pattern variable of a clause has to be bound at most once
fn check_linear(pats: &[Pattern]) -> CompileResult {
    fn go<'a>(pat: &'a Pattern, seen: &mut Vec<&'a str>) -> CompileResult {
        match pat {
            Pattern::Var(PatVar { span, var }) => {
                if seen.contains(&var.name.as_str()) {
                    return Err(non_linear(&var.name, *span));
                }
                seen.push(&var.name);
                Ok(())
            }
            Pattern::Ctor(CtorPattern { args, .. }) => {
                args.iter().try_for_each(|arg| go(arg, seen))
            }
            Pattern::Wildcard(_) | Pattern::Inaccessible(_) | Pattern::Term(_) => Ok(()),
        }
    }
    let mut seen = Vec::new();
    pats.iter().try_for_each(|pat| go(pat, &mut seen))
}

fn non_linear(name: &str, span: Option<Span>) -> Box<CompileError> {
    Box::new(CompileError::NonLinearPattern { name: name.to_owned(), span: span.to_miette() })
}
