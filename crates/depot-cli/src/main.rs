//! depot CLI
//!
//! Command-line interface for the depot download cache.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::Context;
use error::{EXIT_OK, EXIT_USAGE, Result};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_OK };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli)?;
    tracing::debug!(command = ?cli.command, "dispatching");
    execute_command(&ctx, cli.command)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cmd {
        Commands::Init { import } => commands::run_init(ctx, import.as_deref()),
        Commands::LocateRoot => commands::run_locate_root(ctx, &mut out),
        Commands::CatalogList { json } => commands::run_catalog_list(ctx, json, &mut out),
        Commands::CatalogAdd {
            name,
            url,
            checksum,
        } => commands::run_catalog_add(ctx, &name, &url, &checksum),
        Commands::CatalogRemove { name } => commands::run_catalog_remove(ctx, &name),
        Commands::CatalogGet { name } => commands::run_catalog_get(ctx, &name, &mut out),
        Commands::CatalogImport { file } => commands::run_catalog_import(ctx, &file),
        Commands::Fetch { name } => commands::run_fetch(ctx, &name, &mut out),
        Commands::FetchAll { names } => commands::run_fetch_all(ctx, &names, &mut out),
    }
}
