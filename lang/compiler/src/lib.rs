//! The equation compiler
//!
//! A definition by pattern matching equations is compiled in four steps:
//!
//! 1. The clauses are preprocessed: the name of the function is inserted into every
//!    left-hand side and term patterns are resolved to constructor patterns.
//! 2. The clauses are compiled into a case tree by splitting on columns, see [Compiler].
//!    Nested matches in right-hand sides are compiled into case trees of their own and
//!    inlined.
//! 3. The recursive calls in the case tree are checked for termination.
//! 4. The case tree is translated into a closed kernel term.

use log::debug;

use eqc_lang_ast::{self as ast, Exp, Subst, Var};
use eqc_lang_kernel::{Binder, Decrease, NameCtx, Signature, Term, ToTerm};
use eqc_lang_printer::{
    Alloc, Builder, DocAllocator, Print, PrintCfg,
    theme::ThemeExt,
    tokens::{DEF, FAT_ARROW, MEASURE, STRUCT},
    util::print_args,
};

mod ctx;
mod nested;
mod patterns;
mod preprocess;
mod result;
mod rewrite;
mod split;
mod termination;
mod unify;

pub use ctx::TypeCtx;
pub use result::*;
pub use split::Compiler;
pub use termination::Termination;
pub use unify::{Eqn, unify};

/// The declarations a definition is compiled against
#[derive(Debug, Clone, Copy)]
pub struct Program<'a> {
    pub module: &'a ast::Module,
    /// The kernel signature containing the definitions compiled so far
    pub sig: &'a Signature,
}

/// A compiled definition
#[derive(Debug, Clone)]
pub struct Compiled {
    pub name: String,
    pub params: Vec<Var>,
    /// The case tree in scope of `params`
    pub tree: Exp,
    pub termination: Termination,
    /// The closed kernel term
    pub term: Term,
    pub warnings: Vec<CompileWarning>,
}

pub fn compile_def(prg: Program, def: &ast::Def) -> CompileResult<Compiled> {
    let name = &def.name.id;
    debug!("Compiling definition {name}");

    let clauses = preprocess::preprocess(&prg, name, def.params.len(), &def.clauses)?;
    let (params, renaming) = def.params.instantiate_fresh();
    let measure = def.termination.as_ref().map(|measure| measure.subst(&renaming));

    let mut compiler = Compiler::new(prg, name, def.span, clauses);
    let tree = compiler.compile_params(&params, &TypeCtx::default())?;
    let warnings = compiler.finish();

    let params: Vec<Var> = params.vars().cloned().collect();
    let termination =
        termination::check(prg, name, &params, measure.as_deref(), &tree, def.span)?;
    debug!("{name} is {termination}");

    let term = to_term(name, &params, &tree, termination, measure.as_deref())?;
    Ok(Compiled { name: name.clone(), params, tree, termination, term, warnings })
}

/// Translate a case tree into a closed kernel term
fn to_term(
    name: &str,
    params: &[Var],
    tree: &Exp,
    termination: Termination,
    measure: Option<&Exp>,
) -> CompileResult<Term> {
    let binders: Vec<Binder> = params.iter().map(|var| Binder::new(var.name.clone())).collect();
    let lam = |ctx: &mut NameCtx, body: &Exp| -> CompileResult<Term> {
        Ok(Term::Lam {
            params: binders.clone(),
            body: Box::new(ctx.bind(params, |ctx| body.to_term(ctx))?),
        })
    };

    let decrease = match termination {
        Termination::NonRecursive if params.is_empty() => {
            return Ok(tree.to_term(&mut NameCtx::empty())?);
        }
        Termination::NonRecursive => return lam(&mut NameCtx::empty(), tree),
        Termination::Structural { arg } => Decrease::Structural { arg },
        Termination::Measure => {
            let measure = measure
                .ok_or_else(|| CompileError::impossible("Measure termination without measure"))?;
            Decrease::Measure { measure: Box::new(lam(&mut NameCtx::empty(), measure)?) }
        }
    };

    // The fixpoint binds itself outside of the parameters
    let this = Var::fresh(name);
    let tree = rewrite::calls_to_var(tree, name, &this)?;
    let body = NameCtx::empty().bind(std::slice::from_ref(&this), |ctx| lam(ctx, &tree))?;
    Ok(Term::Fix { name: name.to_owned(), arity: params.len(), decrease, body: Box::new(body) })
}

impl Print for Compiled {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Compiled { name, params, tree, termination, .. } = self;
        let mut head = alloc
            .keyword(DEF)
            .append(alloc.space())
            .append(alloc.def(name))
            .append(print_args(alloc, params.iter().map(|param| param.print(cfg, alloc))));
        match termination {
            Termination::NonRecursive => {}
            Termination::Structural { arg } => {
                let param = params.get(*arg).map(|param| param.name.as_str()).unwrap_or("?");
                head = head.append(alloc.space()).append(
                    alloc.keyword(STRUCT).append(alloc.space()).append(param).brackets(),
                );
            }
            Termination::Measure => {
                head = head.append(alloc.space()).append(alloc.keyword(MEASURE).brackets());
            }
        }
        head.append(alloc.space())
            .append(FAT_ARROW)
            .append(alloc.hardline().append(tree.print(cfg, alloc)).nest(cfg.indent))
    }
}
