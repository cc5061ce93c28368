//! Compilation of clauses into case trees
//!
//! The clauses form the rows of a matrix whose columns are the values being matched.
//! As long as the first row is refutable, the leftmost column with a constructor pattern
//! is split: for each constructor of its type the indices are unified with those of the
//! column, compatible rows are kept in order and the subproblem is compiled recursively.
//! Constructors whose indices cannot match become no-confusion leaves. Once the first row
//! only consists of irrefutable patterns, it is selected and its right-hand side becomes
//! a leaf of the tree.

use log::trace;

use eqc_lang_ast::*;
use eqc_lang_kernel::{No, Yes, convert_exp, normalize_exp};
use eqc_lang_miette_util::{ToMiette, codespan::Span};
use eqc_lang_printer::Print;

use crate::Program;
use crate::ctx::TypeCtx;
use crate::result::*;
use crate::unify::{Eqn, unify};

#[derive(Debug, Clone)]
struct Column {
    value: Exp,
    typ: Exp,
}

#[derive(Debug, Clone)]
struct Row {
    /// Index of the clause this row stems from
    clause: usize,
    pats: Vec<Pattern>,
    /// Values of the pattern variables matched so far
    bindings: Substitution,
    /// Inaccessible patterns matched so far, checked once the row is selected
    constraints: Vec<Constraint>,
}

#[derive(Debug, Clone)]
struct Constraint {
    pattern: Exp,
    value: Exp,
    span: Option<Span>,
}

#[derive(Debug, Clone)]
struct Problem {
    columns: Vec<Column>,
    rows: Vec<Row>,
    /// The arguments of the compiled function, as refined by the enclosing splits
    shape: Vec<Exp>,
    types: TypeCtx,
    /// The constructor and argument position of the innermost enclosing split
    last_split: Option<(String, Option<usize>)>,
}

impl Problem {
    fn refine(&mut self, subst: &Substitution) {
        for column in self.columns.iter_mut() {
            column.value = column.value.subst(subst);
            column.typ = column.typ.subst(subst);
        }
        self.shape = self.shape.subst(subst);
        self.types.refine(subst);
        for row in self.rows.iter_mut() {
            row.bindings = row.bindings.then(subst);
            for constraint in row.constraints.iter_mut() {
                constraint.value = constraint.value.subst(subst);
            }
        }
    }

    /// The first variable name each row gives to the fields of `ctor` in column `j`
    fn field_names(&self, j: usize, ctor: &Ctor) -> Vec<Option<String>> {
        let mut names = vec![None; ctor.params.params.len()];
        for row in &self.rows {
            let Pattern::Ctor(CtorPattern { name, args, .. }) = &row.pats[j] else {
                continue;
            };
            if name.id != ctor.name.id {
                continue;
            }
            for (name, arg) in names.iter_mut().zip(args) {
                match arg {
                    Pattern::Var(PatVar { var, .. }) if name.is_none() => {
                        *name = Some(var.name.clone())
                    }
                    _ => {}
                }
            }
        }
        names
    }

    /// Replace column `j` by the fields of `ctor` applied to `args`
    fn match_ctor(&mut self, j: usize, ctor: &Ctor, args: &[Exp]) -> CompileResult {
        let value = Exp::ctor(&ctor.name.id, args.to_vec());
        let fields = args
            .iter()
            .zip(field_types(ctor, args))
            .map(|(value, typ)| Column { value: value.clone(), typ });
        self.columns.splice(j..=j, fields);

        let mut rows = Vec::with_capacity(self.rows.len());
        for mut row in std::mem::take(&mut self.rows) {
            let sub = match row.pats[j].clone() {
                Pattern::Ctor(CtorPattern { name, args, .. }) => {
                    if name.id != ctor.name.id {
                        continue;
                    }
                    args
                }
                Pattern::Var(PatVar { var, .. }) => {
                    row.bindings.insert(&var, value.clone());
                    wildcards(args.len())
                }
                Pattern::Wildcard(_) => wildcards(args.len()),
                Pattern::Inaccessible(Inaccessible { span, exp }) => {
                    row.constraints.push(Constraint { pattern: *exp, value: value.clone(), span });
                    wildcards(args.len())
                }
                Pattern::Term(_) => {
                    return Err(CompileError::impossible("Unresolved term pattern"));
                }
            };
            row.pats.splice(j..=j, sub);
            rows.push(row);
        }
        self.rows = rows;
        Ok(())
    }
}

fn wildcards(n: usize) -> Vec<Pattern> {
    (0..n).map(|_| Pattern::wildcard()).collect()
}

/// The types of the fields of `ctor` when applied to `args`
fn field_types(ctor: &Ctor, args: &[Exp]) -> Vec<Exp> {
    let mut subst = Substitution::new();
    ctor.params
        .params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let typ = param.typ.subst(&subst);
            subst.insert(&param.var, arg.clone());
            *typ
        })
        .collect()
}

/// Compiles the clauses of one function into a case tree
pub struct Compiler<'a> {
    prg: Program<'a>,
    name: String,
    span: Option<Span>,
    clauses: Vec<Clause>,
    /// Number of leading parameters which are omitted in error messages
    hidden: usize,
    used: Vec<bool>,
    /// Pairs of a clause and the clause which took priority over it at some leaf
    overlaps: Vec<(usize, usize)>,
    /// Number of nested matches compiled so far
    matches: usize,
    warnings: Vec<CompileWarning>,
}

impl<'a> Compiler<'a> {
    pub fn new(prg: Program<'a>, name: &str, span: Option<Span>, clauses: Vec<Clause>) -> Self {
        let used = vec![false; clauses.len()];
        Compiler {
            prg,
            name: name.to_owned(),
            span,
            clauses,
            hidden: 0,
            used,
            overlaps: Vec::new(),
            matches: 0,
            warnings: Vec::new(),
        }
    }

    pub fn with_hidden(mut self, hidden: usize) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn prg(&self) -> Program<'a> {
        self.prg
    }

    /// A name for the next nested match of this function
    pub(crate) fn next_match_name(&mut self) -> String {
        self.matches += 1;
        format!("{}.match{}", self.name, self.matches)
    }

    pub(crate) fn add_warnings(&mut self, warnings: Vec<CompileWarning>) {
        self.warnings.extend(warnings)
    }

    /// Compile the clauses as a function of `params`
    pub fn compile_params(&mut self, params: &Telescope, types: &TypeCtx) -> CompileResult<Exp> {
        let mut types = types.clone();
        for Param { var, typ, .. } in &params.params {
            types.insert(var, (**typ).clone());
        }
        let columns = params
            .params
            .iter()
            .map(|param| Column { value: Exp::var(&param.var), typ: (*param.typ).clone() })
            .collect();
        let rows = self
            .clauses
            .iter()
            .enumerate()
            .map(|(clause, c)| Row {
                clause,
                pats: c.lhs.pats.clone(),
                bindings: Substitution::new(),
                constraints: Vec::new(),
            })
            .collect();
        let problem =
            Problem { columns, rows, shape: params.as_args(), types, last_split: None };
        self.compile(problem)
    }

    /// The warnings collected during compilation
    pub fn finish(self) -> Vec<CompileWarning> {
        let mut warnings = Vec::new();
        for (clause, used) in self.used.iter().enumerate() {
            if !used {
                warnings.push(CompileWarning::RedundantClause {
                    name: self.name.clone(),
                    clause: clause + 1,
                    span: self.clauses[clause].span.to_miette(),
                });
            }
        }
        for (clause, shadowed_by) in &self.overlaps {
            if self.used[*clause] {
                warnings.push(CompileWarning::OverlapAmbiguity {
                    name: self.name.clone(),
                    clause: clause + 1,
                    shadowed_by: shadowed_by + 1,
                    span: self.clauses[*clause].span.to_miette(),
                });
            }
        }
        warnings.extend(self.warnings);
        warnings
    }

    fn compile(&mut self, problem: Problem) -> CompileResult<Exp> {
        let Some(first) = problem.rows.first() else {
            return self.refute(problem);
        };
        if first.pats.iter().all(Pattern::is_irrefutable) {
            return self.leaf(problem);
        }
        let j = (0..problem.columns.len())
            .find(|j| problem.rows.iter().any(|row| matches!(row.pats[*j], Pattern::Ctor(_))))
            .ok_or_else(|| CompileError::impossible("No column to split on"))?;
        self.split(problem, j)
    }

    fn split(&mut self, mut problem: Problem, j: usize) -> CompileResult<Exp> {
        let sig = self.prg.sig;
        let value = normalize_exp(&problem.columns[j].value, sig)?;

        // The column has been refined to a constructor by an earlier split
        if let Some((name, args)) = value.as_ctor() {
            trace!("{}: column {j} is {}", self.name, value.print_to_string(None));
            let ctor = self.lookup_ctor(name)?;
            problem.match_ctor(j, ctor, args)?;
            return self.compile(problem);
        }

        let typ = normalize_exp(&problem.columns[j].typ, sig)?;
        let cannot_split = || {
            Box::new(CompileError::CannotSplit {
                exp: value.print_to_string(None),
                typ: typ.print_to_string(None),
                span: self.span.to_miette(),
            })
        };
        let Some(x) = value.as_var() else {
            return Err(cannot_split());
        };
        let Exp::TypCtor(TypCtor { name: family, args: indices, .. }) = &typ else {
            return Err(cannot_split());
        };
        let Some(data) = self.prg.module.data(&family.id) else {
            return Err(cannot_split());
        };

        trace!("{}: split {} : {}", self.name, x, typ.print_to_string(None));
        let arms = data
            .ctors
            .iter()
            .map(|ctor| self.split_ctor(&problem, j, x, &data.name.id, ctor, indices))
            .collect::<CompileResult<_>>()?;
        Ok(Cases {
            span: None,
            family: IdBound::from_string(&data.name.id),
            scrutinee: Box::new(Exp::var(x)),
            arms,
        }
        .into())
    }

    fn split_ctor(
        &mut self,
        problem: &Problem,
        j: usize,
        x: &Var,
        family: &str,
        ctor: &Ctor,
        indices: &[Exp],
    ) -> CompileResult<Arm> {
        let names = problem.field_names(j, ctor);
        let (fields, eqns) = instantiate_ctor(ctor, indices, &names);
        let solution = match unify(self.prg.sig, eqns, self.span)? {
            Yes(solution) => solution,
            No(eqn) => return Ok(self.absurd_arm(family, ctor, &fields, eqn)),
        };

        let field_vars: Vec<Var> = fields.vars().cloned().collect();
        let refinement =
            Substitution::single(x, Exp::ctor(&ctor.name.id, fields.as_args())).then(&solution);
        let position =
            problem.shape.iter().skip(self.hidden).position(|arg| arg.occurs(x.id)).map(|i| i + 1);

        let mut sub = problem.clone();
        for Param { var, typ, .. } in &fields.params {
            sub.types.insert(var, (**typ).clone());
        }
        sub.refine(&refinement);
        sub.last_split = Some((ctor.name.id.clone(), position));
        sub.match_ctor(j, ctor, &fields.as_args().subst(&refinement))?;

        let mut refinements: Vec<(Var, Exp)> = solution
            .iter()
            .filter(|(id, _)| !field_vars.iter().any(|field| field.id == **id))
            .filter_map(|(id, exp)| problem.types.var(id).map(|var| (var.clone(), exp.clone())))
            .collect();
        refinements.sort_by_key(|(var, _)| var.id);

        Ok(Arm {
            ctor: IdBound::from_string(&ctor.name.id),
            params: field_vars,
            refinements,
            body: Box::new(self.compile(sub)?),
        })
    }

    fn absurd_arm(&self, family: &str, ctor: &Ctor, fields: &Telescope, eqn: Eqn) -> Arm {
        trace!(
            "{}: {} is impossible since {} and {} are distinct",
            self.name,
            ctor.name,
            eqn.lhs.print_to_string(None),
            eqn.rhs.print_to_string(None)
        );
        let family = eqn
            .lhs
            .as_ctor()
            .or(eqn.rhs.as_ctor())
            .and_then(|(name, _)| self.prg.sig.ctor(name))
            .map(|info| info.family.clone())
            .unwrap_or_else(|| family.to_owned());
        Arm {
            ctor: IdBound::from_string(&ctor.name.id),
            params: fields.vars().cloned().collect(),
            refinements: Vec::new(),
            body: Box::new(
                Absurd {
                    span: None,
                    family: IdBound::from_string(&family),
                    lhs: Box::new(eqn.lhs),
                    rhs: Box::new(eqn.rhs),
                }
                .into(),
            ),
        }
    }

    /// No clause is left: the case is only covered if some column has no possible constructor
    fn refute(&mut self, problem: Problem) -> CompileResult<Exp> {
        for j in 0..problem.columns.len() {
            if let Some(tree) = self.try_refute(&problem, j)? {
                return Ok(tree);
            }
        }
        Err(self.non_exhaustive(&problem))
    }

    fn try_refute(&mut self, problem: &Problem, j: usize) -> CompileResult<Option<Exp>> {
        let sig = self.prg.sig;
        let value = normalize_exp(&problem.columns[j].value, sig)?;
        let typ = normalize_exp(&problem.columns[j].typ, sig)?;
        let (Some(x), Exp::TypCtor(TypCtor { name: family, args: indices, .. })) =
            (value.as_var(), &typ)
        else {
            return Ok(None);
        };
        let Some(data) = self.prg.module.data(&family.id) else {
            return Ok(None);
        };
        let mut arms = Vec::with_capacity(data.ctors.len());
        for ctor in &data.ctors {
            let (fields, eqns) = instantiate_ctor(ctor, indices, &[]);
            match unify(sig, eqns, self.span) {
                Ok(No(eqn)) => arms.push(self.absurd_arm(&data.name.id, ctor, &fields, eqn)),
                Ok(Yes(_)) => return Ok(None),
                Err(err) if matches!(*err, CompileError::CannotDecide { .. }) => return Ok(None),
                Err(err) => return Err(err),
            }
        }
        trace!("{}: {} has no possible constructor", self.name, x);
        Ok(Some(
            Cases {
                span: None,
                family: IdBound::from_string(&data.name.id),
                scrutinee: Box::new(Exp::var(x)),
                arms,
            }
            .into(),
        ))
    }

    fn leaf(&mut self, problem: Problem) -> CompileResult<Exp> {
        let Problem { columns, rows, types, .. } = problem;
        let mut rows = rows.into_iter();
        let Some(Row { clause, pats, mut bindings, mut constraints }) = rows.next() else {
            return Err(CompileError::impossible("Leaf without clause"));
        };

        for (pat, column) in pats.iter().zip(&columns) {
            match pat {
                Pattern::Var(PatVar { var, .. }) => bindings.insert(var, column.value.clone()),
                Pattern::Inaccessible(Inaccessible { span, exp }) => constraints.push(Constraint {
                    pattern: (**exp).clone(),
                    value: column.value.clone(),
                    span: *span,
                }),
                Pattern::Wildcard(_) => {}
                Pattern::Ctor(_) | Pattern::Term(_) => {
                    return Err(CompileError::impossible("Refutable pattern in selected clause"));
                }
            }
        }
        for constraint in &constraints {
            self.check_constraint(constraint, &bindings)?;
        }

        self.used[clause] = true;
        for other in rows {
            if !self.overlaps.contains(&(other.clause, clause)) {
                self.overlaps.push((other.clause, clause));
            }
        }

        let rhs = self.clauses[clause].rhs.subst(&bindings);
        trace!("{}: clause {} selected: {}", self.name, clause + 1, rhs.print_to_string(None));
        if rhs.contains_local_match() { self.eliminate_matches(&rhs, &types) } else { Ok(*rhs) }
    }

    fn check_constraint(&self, constraint: &Constraint, bindings: &Substitution) -> CompileResult {
        let Constraint { pattern, value, span } = constraint;
        let found = pattern.subst(bindings);
        if convert_exp(&found, value, self.prg.sig)? {
            return Ok(());
        }
        let expected = normalize_exp(value, self.prg.sig)?;
        Err(Box::new(CompileError::InaccessiblePatternMismatch {
            expected: expected.print_to_string(None),
            found: found.print_to_string(None),
            span: span.to_miette(),
        }))
    }

    fn non_exhaustive(&self, problem: &Problem) -> Box<CompileError> {
        let args: Vec<String> =
            problem.shape.iter().skip(self.hidden).map(|arg| arg.print_to_string(None)).collect();
        let missing = if args.is_empty() {
            self.name.clone()
        } else {
            format!("{}({})", self.name, args.join(", "))
        };
        let help = problem.last_split.as_ref().map(|(ctor, position)| match position {
            Some(position) => format!("Add a clause for {ctor} at argument {position}"),
            None => format!("Add a clause for {ctor}"),
        });
        Box::new(CompileError::NonExhaustiveMatch {
            name: self.name.clone(),
            missing,
            help,
            span: self.span.to_miette(),
        })
    }

    fn lookup_ctor(&self, name: &str) -> CompileResult<&'a Ctor> {
        self.prg
            .module
            .ctor(name)
            .map(|(_, ctor)| ctor)
            .ok_or_else(|| CompileError::impossible(format!("Unknown constructor {name}")))
    }
}

/// Fresh fields for `ctor` and the equations between its indices and `indices`
///
/// A field is named after `names` where given, and after the constructor's parameter otherwise.
fn instantiate_ctor(
    ctor: &Ctor,
    indices: &[Exp],
    names: &[Option<String>],
) -> (Telescope, Vec<Eqn>) {
    let mut renaming = Substitution::new();
    let mut params = Vec::with_capacity(ctor.params.params.len());
    for (i, Param { span, var, typ }) in ctor.params.params.iter().enumerate() {
        let fresh = match names.get(i) {
            Some(Some(name)) => Var::fresh(name.clone()),
            _ => var.refresh(),
        };
        params.push(Param { span: *span, var: fresh.clone(), typ: typ.subst(&renaming) });
        renaming.insert(var, Exp::var(&fresh));
    }
    let fields = Telescope { params };
    let eqns = ctor
        .typ
        .args
        .iter()
        .zip(indices)
        .map(|(lhs, rhs)| Eqn::new(lhs.subst(&renaming), rhs.clone()))
        .collect();
    (fields, eqns)
}
