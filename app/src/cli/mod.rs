use std::io;
use std::rc::Rc;

use clap::{Parser, Subcommand};

use eqc_lang_driver::{CompiledModule, Database, render_reports_io};

use crate::global_settings::GlobalSettings;

mod check;
mod compile;
mod norm;

pub fn exec() -> miette::Result<()> {
    use Command::*;
    let cli = Cli::parse();
    let settings = GlobalSettings::from_env();

    let log_level = if cli.trace {
        log::LevelFilter::Trace
    } else if cli.debug {
        log::LevelFilter::Debug
    } else {
        settings.log_level
    };
    env_logger::builder()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match cli.command {
        Check(args) => check::exec(args, &settings),
        Compile(args) => compile::exec(args, &settings),
        Norm(args) => norm::exec(args, &settings),
    }
}

#[derive(Parser)]
#[clap(version, author, about, long_about = None)]
struct Cli {
    /// Enable trace logging
    #[clap(long, num_args = 0, global = true)]
    trace: bool,
    /// Enable debug logging
    #[clap(long, num_args = 0, global = true)]
    debug: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile all definitions of a file and report errors and warnings
    Check(check::Args),
    /// Print the compiled definitions of a file
    Compile(compile::Args),
    /// Normalize an expression in the scope of a file
    Norm(norm::Args),
}

/// Compile all definitions and render their warnings to stderr
fn load(db: &mut Database, settings: &GlobalSettings) -> miette::Result<Rc<CompiledModule>> {
    let compiled = db.compiled().map_err(|err| db.pretty_error(err))?;
    let warnings = db.pretty_warnings(&compiled);
    if !warnings.is_empty() {
        let _ = render_reports_io(&mut io::stderr(), &warnings, settings.colorize);
    }
    Ok(compiled)
}
