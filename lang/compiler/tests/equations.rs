use eqc_lang_ast::{self as ast, Exp, Var};
use eqc_lang_compiler::{
    CompileError, CompileResult, CompileWarning, Compiled, Program, Termination, compile_def,
};
use eqc_lang_kernel::{Signature, normalize_exp};
use eqc_lang_lowering::lower_module;
use eqc_lang_parser::parse_module;

const NAT: &str = "
data Nat { zero, succ(n: Nat) }

def add(m: Nat, n: Nat): Nat
    | m, zero => m
    | m, succ(n) => succ(add(m, n))
";

const VEC: &str = "
data Vec(A: Type, n: Nat) {
    nil(A: Type): Vec(A, 0),
    cons(A: Type, n: Nat, x: A, xs: Vec(A, n)): Vec(A, n + 1)
}
";

struct Env {
    sig: Signature,
    compiled: Vec<Compiled>,
}

impl Env {
    fn get(&self, name: &str) -> &Compiled {
        self.compiled.iter().find(|def| def.name == name).unwrap()
    }

    fn eval(&self, exp: &Exp) -> Exp {
        normalize_exp(exp, &self.sig).unwrap()
    }

    fn assert_eval(&self, lhs: Exp, rhs: Exp) {
        assert_eq!(self.eval(&lhs), self.eval(&rhs));
    }
}

/// Compile all definitions of `src` in order
fn compile(src: &str) -> CompileResult<Env> {
    let cst = parse_module(src).unwrap();
    let module = lower_module(&cst).unwrap();
    let mut sig = Signature::from_module(&module);
    let mut compiled = Vec::new();
    for def in module.defs() {
        let res = compile_def(Program { module: &module, sig: &sig }, def)?;
        sig.add_def(&res.name, res.term.clone());
        compiled.push(res);
    }
    Ok(Env { sig, compiled })
}

fn compile_err(src: &str) -> CompileError {
    match compile(src) {
        Ok(_) => panic!("expected a compile error"),
        Err(err) => *err,
    }
}

fn nat(n: usize) -> Exp {
    (0..n).fold(Exp::ctor("zero", vec![]), |acc, _| succ(acc))
}

fn succ(exp: Exp) -> Exp {
    Exp::ctor("succ", vec![exp])
}

fn call(name: &str, args: Vec<Exp>) -> Exp {
    Exp::def_call(name, args)
}

fn var(name: &str) -> (Var, Exp) {
    let var = Var::fresh(name);
    let exp = Exp::var(&var);
    (var, exp)
}

fn contains_absurd(exp: &Exp) -> bool {
    match exp {
        Exp::Absurd(_) => true,
        Exp::Cases(ast::Cases { arms, .. }) => arms.iter().any(|arm| contains_absurd(&arm.body)),
        _ => false,
    }
}

#[test]
fn add_computes_by_its_equations() {
    let env = compile(NAT).unwrap();
    let add = env.get("add");
    assert_eq!(add.termination, Termination::Structural { arg: 1 });
    assert!(add.warnings.is_empty());

    env.assert_eval(call("add", vec![nat(2), nat(3)]), nat(5));

    let (_, x) = var("x");
    let (_, y) = var("y");
    env.assert_eval(call("add", vec![x.clone(), nat(0)]), x.clone());
    env.assert_eval(
        call("add", vec![x.clone(), succ(y.clone())]),
        succ(call("add", vec![x, y])),
    );
}

#[test]
fn explicit_heads_are_accepted() {
    let src = "
data Nat { zero, succ(n: Nat) }

def plus(m: Nat, n: Nat): Nat
    | plus(m, zero) => m
    | plus(m, succ(n)) => succ(plus(m, n))
";
    let env = compile(src).unwrap();
    env.assert_eval(call("plus", vec![nat(1), nat(2)]), nat(3));
}

#[test]
fn overlapping_clauses_follow_clause_order() {
    let src = "
data Nat { zero, succ(n: Nat) }

def f(m: Nat, n: Nat): Nat
    | 0, y => 1
    | x, 0 => 2
    | x + 1, y + 1 => 3
";
    let env = compile(src).unwrap();
    let (_, a) = var("a");
    let (_, b) = var("b");
    env.assert_eval(call("f", vec![nat(0), nat(0)]), nat(1));
    env.assert_eval(call("f", vec![nat(0), succ(a.clone())]), nat(1));
    env.assert_eval(call("f", vec![succ(a.clone()), nat(0)]), nat(2));
    env.assert_eval(call("f", vec![succ(a), succ(b)]), nat(3));

    let warnings = &env.get("f").warnings;
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0],
        CompileWarning::OverlapAmbiguity { clause: 2, shadowed_by: 1, .. }
    ));
}

#[test]
fn wildcards_behave_like_unused_variables() {
    let src = "
data Nat { zero, succ(n: Nat) }

def pred1(m: Nat, n: Nat): Nat
    | _, zero => zero
    | _, succ(k) => k

def pred2(m: Nat, n: Nat): Nat
    | a, zero => zero
    | b, succ(k) => k
";
    let env = compile(src).unwrap();
    assert_eq!(env.get("pred1").term, env.get("pred2").term);
    assert_eq!(env.get("pred1").termination, Termination::NonRecursive);
}

#[test]
fn impossible_constructors_become_absurd_arms() {
    let src = format!(
        "{NAT}{VEC}
def head(A: Type, n: Nat, v: Vec(A, n + 1)): A
    | A, n, cons(.A, .n, x, xs) => x
"
    );
    let env = compile(&src).unwrap();
    let head = env.get("head");
    assert!(contains_absurd(&head.tree));

    let (_, a) = var("A");
    let (_, n) = var("n");
    let (_, x) = var("x");
    let (_, xs) = var("xs");
    let v = Exp::ctor("cons", vec![a.clone(), n.clone(), x.clone(), xs]);
    env.assert_eval(call("head", vec![a, n, v]), x);
}

#[test]
fn empty_families_need_no_clauses() {
    let src = "
data Nat { zero, succ(n: Nat) }

data Fin(n: Nat) {
    fzero(n: Nat): Fin(n + 1),
    fsucc(n: Nat, i: Fin(n)): Fin(n + 1)
}

def fin_zero(i: Fin(0)): Nat
";
    let env = compile(src).unwrap();
    let fin_zero = env.get("fin_zero");
    match &fin_zero.tree {
        Exp::Cases(ast::Cases { arms, .. }) => {
            assert_eq!(arms.len(), 2);
            assert!(arms.iter().all(|arm| matches!(*arm.body, Exp::Absurd(_))));
        }
        other => panic!("expected a case split, found {other:?}"),
    }
}

#[test]
fn missing_constructor_is_reported() {
    let src = "
data Nat { zero, succ(n: Nat) }

def pred(n: Nat): Nat
    | zero => zero
";
    match compile_err(src) {
        CompileError::NonExhaustiveMatch { name, missing, help, .. } => {
            assert_eq!(name, "pred");
            assert!(missing.starts_with("pred(succ("), "{missing}");
            let help = help.unwrap();
            assert!(help.contains("succ") && help.contains("argument 1"), "{help}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn redundant_clauses_are_reported() {
    let src = "
data Nat { zero, succ(n: Nat) }

def pred(n: Nat): Nat
    | zero => zero
    | succ(k) => k
    | k => k
";
    let env = compile(src).unwrap();
    let warnings = &env.get("pred").warnings;
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], CompileWarning::RedundantClause { clause: 3, .. }));
}

#[test]
fn non_decreasing_recursion_is_rejected() {
    let src = "
data Nat { zero, succ(n: Nat) }

def loop(n: Nat): Nat
    | zero => zero
    | succ(k) => loop(succ(k))
";
    assert!(matches!(
        compile_err(src),
        CompileError::NonStructuralRecursion { name, .. } if name == "loop"
    ));
}

const SUM_TO: &str = "
data Pair { pair(a: Nat, b: Nat) }

def first(p: Pair): Nat
    | pair(a, b) => a
";

#[test]
fn measure_justifies_recursion() {
    let rejected = format!(
        "{NAT}{SUM_TO}
def sumTo(p: Pair): Nat
    | pair(zero, m) => m
    | pair(succ(n), m) => sumTo(pair(n, add(m, succ(n))))
"
    );
    assert!(matches!(compile_err(&rejected), CompileError::NonStructuralRecursion { .. }));

    let accepted = format!(
        "{NAT}{SUM_TO}
def sumTo(p: Pair): Nat termination_by first(p)
    | pair(zero, m) => m
    | pair(succ(n), m) => sumTo(pair(n, add(m, succ(n))))
"
    );
    let env = compile(&accepted).unwrap();
    assert_eq!(env.get("sumTo").termination, Termination::Measure);
    env.assert_eval(call("sumTo", vec![Exp::ctor("pair", vec![nat(3), nat(0)])]), nat(6));
}

#[test]
fn recursive_calls_are_reported_with_pattern_names() {
    let src = "
data Nat { zero, succ(n: Nat) }

def add2(n: Nat): Nat
    | n => succ(succ(n))

def f(n: Nat): Nat
    | zero => zero
    | succ(k) => f(add2(k))
";
    match compile_err(src) {
        CompileError::NonStructuralRecursion { call, .. } => {
            assert_eq!(call, "f(succ(succ(k)))");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn repeated_pattern_variables_are_rejected() {
    let src = "
data Nat { zero, succ(n: Nat) }

def same(m: Nat, n: Nat): Nat
    | x, x => x
";
    assert!(matches!(compile_err(src), CompileError::NonLinearPattern { name, .. } if name == "x"));
}

#[test]
fn term_patterns_reduce_to_constructor_patterns() {
    let src = format!(
        "{NAT}
def minus2(n: Nat): Nat
    | add(x, 2) => x
    | _ => zero
"
    );
    let env = compile(&src).unwrap();
    env.assert_eval(call("minus2", vec![nat(5)]), nat(3));
    env.assert_eval(call("minus2", vec![nat(1)]), nat(0));
}

#[test]
fn stuck_term_patterns_are_rejected() {
    let src = format!(
        "{NAT}
def g(m: Nat, n: Nat): Nat
    | m, add(x, y) => x
"
    );
    match compile_err(&src) {
        CompileError::MalformedPattern { reason, .. } => {
            assert!(reason.contains("add(x, y)"), "{reason}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn constructor_patterns_need_an_inductive_type() {
    let src = "
data Nat { zero, succ(n: Nat) }

def f(A: Type, x: A): A
    | A, zero => x
";
    assert!(matches!(compile_err(src), CompileError::CannotSplit { .. }));
}

#[test]
fn nested_matches_need_a_known_scrutinee_type() {
    let src = "
data Nat { zero, succ(n: Nat) }

def f(g: Nat -> Nat, n: Nat): Nat
    | g, n => match g(n) {
        | zero => zero
        | succ(k) => k
    }
";
    assert!(matches!(compile_err(src), CompileError::CannotInferMatch { .. }));

    let annotated = "
data Nat { zero, succ(n: Nat) }

def f(g: Nat -> Nat, n: Nat): Nat
    | g, n => match (g(n) : Nat) {
        | zero => zero
        | succ(k) => k
    }
";
    assert!(compile(annotated).is_ok());
}

#[test]
fn inaccessible_patterns_must_be_forced() {
    let src = "
data Nat { zero, succ(n: Nat) }

def bad(m: Nat, n: Nat): Nat
    | .(zero), n => n
";
    assert!(matches!(compile_err(src), CompileError::InaccessiblePatternMismatch { .. }));
}

#[test]
fn nested_matches_are_compiled_away() {
    let src = "
data Nat { zero, succ(n: Nat) }
data Bool { true, false }

def isZero(n: Nat): Bool
    | n => match n {
        | zero => true
        | succ(_) => false
    }
";
    let env = compile(src).unwrap();
    assert!(!env.get("isZero").tree.contains_local_match());
    env.assert_eval(call("isZero", vec![nat(0)]), Exp::ctor("true", vec![]));
    env.assert_eval(call("isZero", vec![nat(2)]), Exp::ctor("false", vec![]));
}

#[test]
fn nested_matches_refine_outer_indices() {
    let src = format!(
        "{NAT}{VEC}
def head(A: Type, n: Nat, v: Vec(A, n + 1)): A
    | A, n, v => match v {{
        | cons(.A, .n, x, xs) => x
    }}
"
    );
    let env = compile(&src).unwrap();
    let (_, a) = var("A");
    let (_, n) = var("n");
    let (_, x) = var("x");
    let (_, xs) = var("xs");
    let v = Exp::ctor("cons", vec![a.clone(), n.clone(), x.clone(), xs]);
    env.assert_eval(call("head", vec![a, n, v]), x);
}

#[test]
fn constructor_arity_is_checked() {
    let src = "
data Nat { zero, succ(n: Nat) }

def f(n: Nat): Nat
    | succ(a, b) => a
    | _ => zero
";
    assert!(matches!(
        compile_err(src),
        CompileError::ArityMismatch { expected: 1, actual: 2, .. }
    ));
}

#[test]
fn clause_arity_is_checked() {
    let src = "
data Nat { zero, succ(n: Nat) }

def f(m: Nat, n: Nat): Nat
    | m => m
";
    assert!(matches!(
        compile_err(src),
        CompileError::ArityMismatch { expected: 2, actual: 1, .. }
    ));
}
