//! rpncalc - interactive RPN calculator
//!
//! A thin wrapper around rpncalc-core: it reads settings, opens the file store,
//! and runs the line-editing REPL.

mod config;
mod console_output;
mod file_store;
mod logging;
mod repl;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Config};
use console_output::ConsoleOutput;
use file_store::FileStore;
use rpncalc_core::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config_path = args.config.clone().or_else(config::default_config_path);
    let config = Config::load(config_path.as_deref())?.with_args(&args);
    if !config.color {
        colored::control::set_override(false);
    }
    let settings = config.settings()?;
    let filter = logging::init(args.debug)?;

    let data_dir = config
        .data_dir
        .clone()
        .or_else(FileStore::default_dir)
        .context("No data directory; set data_dir in config.toml or RPNCALC_DATA_DIR")?;
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("Cannot open data directory {}", data_dir.display()))?;

    let output = ConsoleOutput::new(Some(filter));
    let mut session = Session::with_parts(Box::new(store), Box::new(output), settings);

    if args.version {
        session.execute("version");
        return Ok(());
    }
    if args.license {
        session.execute("license");
        return Ok(());
    }

    session.restore(&config.stack);
    if args.debug {
        session.set_debug(true);
    }

    repl::run_repl(session).await
}
