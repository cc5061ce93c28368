use std::fs::File;
use std::path::PathBuf;

use eqc_lang_compiler::Compiled;
use eqc_lang_driver::{Database, DriverError};
use eqc_lang_printer::{
    Alloc, Builder, DocAllocator, Print, PrintCfg, StandardStream, WriteColor,
    theme::ThemeExt,
    tokens::{DEF, EQ},
};

use crate::global_settings::GlobalSettings;
use crate::result::AppError;
use crate::utils::ignore_colors::IgnoreColors;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
    /// Print the case trees instead of the kernel terms
    #[clap(long, num_args = 0)]
    tree: bool,
    /// Print kernel variables with their de Bruijn indices
    #[clap(long, num_args = 0)]
    de_bruijn: bool,
    #[clap(long, default_value_t = eqc_lang_printer::DEFAULT_WIDTH)]
    width: usize,
    #[clap(long, default_value_t = 4)]
    indent: isize,
    /// Only print the definition with this name
    #[clap(long, value_name = "NAME")]
    def: Option<String>,
    #[clap(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> miette::Result<()> {
    let mut db = Database::from_path(&cmd.filepath).map_err(miette::Report::from)?;
    let compiled = super::load(&mut db, settings)?;

    let defs: Vec<&Compiled> = match &cmd.def {
        Some(name) => {
            let def = compiled
                .def(name)
                .ok_or_else(|| DriverError::UnknownDefinition { name: name.clone() })?;
            vec![def]
        }
        None => compiled.defs.iter().collect(),
    };
    let listing = Listing { defs, tree: cmd.tree };

    let cfg = PrintCfg {
        width: cmd.width,
        omit_decl_sep: false,
        de_bruijn: cmd.de_bruijn,
        indent: cmd.indent,
    };

    match &cmd.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|source| AppError::Output { path: path.clone(), source })?;
            let mut stream = IgnoreColors::new(file);
            print_listing(&listing, &cfg, &mut stream)
                .map_err(|source| AppError::Output { path: path.clone(), source })?;
        }
        None => {
            let mut stream = StandardStream::stdout(settings.colorize);
            print_listing(&listing, &cfg, &mut stream).map_err(AppError::Stdout)?;
        }
    }
    Ok(())
}

fn print_listing<W: WriteColor>(
    listing: &Listing,
    cfg: &PrintCfg,
    stream: &mut W,
) -> std::io::Result<()> {
    listing.print_colored(cfg, stream)?;
    writeln!(stream)
}

/// The compiled definitions of a file, either as case trees or as kernel terms
struct Listing<'a> {
    defs: Vec<&'a Compiled>,
    tree: bool,
}

impl Print for Listing<'_> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let sep = if cfg.omit_decl_sep {
            alloc.hardline()
        } else {
            alloc.hardline().append(alloc.hardline())
        };
        let defs = self.defs.iter().map(|def| {
            if self.tree { def.print(cfg, alloc) } else { print_term(def, cfg, alloc) }
        });
        alloc.intersperse(defs, sep)
    }
}

fn print_term<'a>(def: &'a Compiled, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
    alloc
        .keyword(DEF)
        .append(alloc.space())
        .append(alloc.def(&def.name))
        .append(alloc.space())
        .append(EQ)
        .append(alloc.line().append(def.term.print(cfg, alloc)).nest(cfg.indent))
        .group()
}
