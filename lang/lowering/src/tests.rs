use eqc_lang_ast::{self as ast, FreeVars, HasSpan};
use eqc_lang_miette_util::codespan::Span;
use eqc_lang_parser::{parse_exp, parse_module};

use crate::{LoweringError, build_symbol_table, lower_exp, lower_module};

const NAT: &str = "data Nat { zero, succ(n: Nat) }\n";

fn lower(src: &str) -> Result<ast::Module, Box<LoweringError>> {
    lower_module(&parse_module(src).unwrap())
}

fn def<'a>(module: &'a ast::Module, name: &str) -> &'a ast::Def {
    module.def(name).unwrap()
}

#[test]
fn nat_literals_are_desugared() {
    let prg = parse_module(NAT).unwrap();
    let table = build_symbol_table(&prg).unwrap();
    let exp = lower_exp(&parse_exp("2").unwrap(), &table).unwrap();
    let one = ast::Exp::ctor("succ", vec![ast::Exp::ctor("zero", vec![])]);
    assert_eq!(exp, ast::Exp::ctor("succ", vec![one]));
}

#[test]
fn lowered_expressions_keep_their_spans() {
    let table = build_symbol_table(&parse_module(NAT).unwrap()).unwrap();
    let exp = lower_exp(&parse_exp("succ(zero)").unwrap(), &table).unwrap();
    assert_eq!(exp.span(), Some(Span::from(0..10)));
    let ast::Exp::Call(call) = &exp else { panic!("expected a call") };
    assert_eq!(call.args[0].span(), Some(Span::from(5..9)));
    assert_eq!(ast::Exp::ctor("zero", vec![]).span(), None);
}

#[test]
fn nat_literal_without_nat_is_rejected() {
    let err = lower("def f(n: Type): Type | n => 1").unwrap_err();
    assert!(matches!(*err, LoweringError::NatLiteralCannotBeDesugared { .. }));
}

#[test]
fn ctor_without_result_type() {
    let module = lower(NAT).unwrap();
    let data = module.data("Nat").unwrap();
    assert_eq!(data.ctors[1].typ.name.id, "Nat");
    assert!(data.ctors[1].typ.args.is_empty());
}

#[test]
fn indexed_ctor_result_type() {
    let module = lower(&format!(
        "{NAT}data Vec(A: Type, n: Nat) {{
            nil(A: Type): Vec(A, 0),
            cons(A: Type, n: Nat, x: A, xs: Vec(A, n)): Vec(A, n + 1)
        }}"
    ))
    .unwrap();
    let (data, cons) = module.ctor("cons").unwrap();
    assert_eq!(data.name.id, "Vec");
    let n = &cons.params.params[1].var;
    assert_eq!(cons.typ.args[1], ast::Exp::ctor("succ", vec![ast::Exp::var(n)]));
}

#[test]
fn ctor_must_return_its_family() {
    let err = lower(&format!("{NAT}data Bad {{ mk: Nat }}")).unwrap_err();
    assert!(matches!(*err, LoweringError::ExpectedTypCtor { .. }));
}

#[test]
fn duplicate_declarations() {
    let err = lower(&format!("{NAT}def zero: Nat")).unwrap_err();
    assert!(matches!(*err, LoweringError::AlreadyDefined { .. }));
}

#[test]
fn undefined_identifier() {
    let err = lower(&format!("{NAT}def f(n: Nat): Nat | n => m")).unwrap_err();
    assert!(matches!(*err, LoweringError::UndefinedIdent { ref name, .. } if name == "m"));
}

#[test]
fn wrong_number_of_args() {
    let err = lower(&format!("{NAT}def f(n: Nat): Nat | n => succ(n, n)")).unwrap_err();
    assert!(matches!(*err, LoweringError::WrongNumberOfArgs { expected: 1, actual: 2, .. }));
}

#[test]
fn unknown_identifiers_in_patterns_bind_variables() {
    let module =
        lower(&format!("{NAT}def pred(n: Nat): Nat | zero => zero | succ(m) => m")).unwrap();
    let clause = &def(&module, "pred").clauses[1];
    let binders = clause.binders();
    assert_eq!(binders.len(), 1);
    assert_eq!(*clause.rhs, ast::Exp::var(&binders[0]));
    assert!(clause.free_vars().is_empty());
}

#[test]
fn inaccessible_may_refer_to_later_binders() {
    let module = lower(&format!("{NAT}def f(m: Nat, n: Nat): Nat | .n, n => n")).unwrap();
    let clause = &def(&module, "f").clauses[0];
    let ast::Pattern::Inaccessible(inacc) = &clause.lhs.pats[0] else {
        panic!("expected inaccessible")
    };
    let n = &clause.binders()[0];
    assert_eq!(*inacc.exp, ast::Exp::var(n));
}

#[test]
fn explicit_self_reference_is_recorded() {
    let module = lower(&format!("{NAT}def id(n: Nat): Nat | id(n) => n")).unwrap();
    let clause = &def(&module, "id").clauses[0];
    assert_eq!(clause.lhs.head.as_ref().map(|h| h.id.as_str()), Some("id"));
    assert_eq!(clause.lhs.pats.len(), 1);
}

#[test]
fn numerals_in_patterns() {
    let module =
        lower(&format!("{NAT}def f(n: Nat): Nat | 1 => zero | k + 2 => k | _ => zero")).unwrap();
    let f = def(&module, "f");
    let one = ast::Pattern::ctor("succ", vec![ast::Pattern::ctor("zero", vec![])]);
    assert_eq!(f.clauses[0].lhs.pats[0], one);
    let k = f.clauses[1].binders()[0].clone();
    assert_eq!(
        f.clauses[1].lhs.pats[0],
        ast::Pattern::ctor("succ", vec![ast::Pattern::ctor("succ", vec![ast::Pattern::var(k)])])
    );
}

#[test]
fn term_patterns_bind_their_variables() {
    let module = lower(&format!(
        "{NAT}def add(m: Nat, n: Nat): Nat | m, zero => m | m, succ(n) => succ(add(m, n))
         def f(n: Nat): Nat | add(x, 2) => x | _ => zero"
    ))
    .unwrap();
    let clause = &def(&module, "f").clauses[0];
    let ast::Pattern::Term(term) = &clause.lhs.pats[0] else { panic!("expected term pattern") };
    assert_eq!(term.binders.len(), 1);
    assert_eq!(*clause.rhs, ast::Exp::var(&term.binders[0]));
}

#[test]
fn addition_needs_add() {
    let err = lower(&format!("{NAT}def f(m: Nat, n: Nat): Nat | m, n => m + n")).unwrap_err();
    assert!(matches!(*err, LoweringError::AddCannotBeDesugared { .. }));
}

#[test]
fn wildcard_in_expression() {
    let err = lower(&format!("{NAT}def f(n: Nat): Nat | n => _")).unwrap_err();
    assert!(matches!(*err, LoweringError::PatternInExpression { .. }));
}

#[test]
fn nested_match_binds_locally() {
    let module = lower(&format!(
        "{NAT}def f(n: Nat): Nat | n => match n {{ | zero => n | succ(k) => k }}"
    ))
    .unwrap();
    let clause = &def(&module, "f").clauses[0];
    let ast::Exp::LocalMatch(m) = &*clause.rhs else { panic!("expected match") };
    assert_eq!(m.scrutinees[0], ast::Exp::var(&clause.binders()[0]));
    assert_eq!(m.clauses[1].binders().len(), 1);
}
