use std::io::Write;
use std::path::PathBuf;

use eqc_lang_driver::Database;
use eqc_lang_printer::{Print, PrintCfg, StandardStream};

use crate::global_settings::GlobalSettings;
use crate::result::AppError;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
    /// The expression to normalize, e.g. "add(2, 3)"
    #[clap(value_name = "EXP")]
    exp: String,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> miette::Result<()> {
    let mut db = Database::from_path(&cmd.filepath).map_err(miette::Report::from)?;
    super::load(&mut db, settings)?;

    // Remaining errors point into the expression, not into the file
    let nf = db.normalize(&cmd.exp).map_err(|err| {
        miette::Report::from(err)
            .with_source_code(miette::NamedSource::new("<expression>", cmd.exp.clone()))
    })?;

    let mut stream = StandardStream::stdout(settings.colorize);
    nf.print_colored(&PrintCfg::default(), &mut stream).map_err(AppError::Stdout)?;
    writeln!(stream).map_err(AppError::Stdout)?;
    Ok(())
}
