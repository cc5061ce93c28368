use std::path::PathBuf;

use eqc_lang_driver::Database;

use crate::global_settings::GlobalSettings;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> miette::Result<()> {
    let mut db = Database::from_path(&cmd.filepath).map_err(miette::Report::from)?;
    let compiled = super::load(&mut db, settings)?;
    log::debug!("{} definitions", compiled.defs.len());
    println!("{} compiled successfully!", cmd.filepath.display());
    Ok(())
}
