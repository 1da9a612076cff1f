//! Init command implementation

use std::path::Path;

use colored::Colorize;
use depot_core::Repository;

use crate::commands::read_source;
use crate::context::Context;
use crate::error::Result;

/// Create a repository in the start directory, optionally importing a catalog.
pub fn run_init(ctx: &Context, import: Option<&Path>) -> Result<()> {
    let source = import.map(read_source).transpose()?;
    let repo = Repository::init(ctx.config().clone(), ctx.start(), source.as_deref())?;

    eprintln!(
        "{} Initialized depot repository in {}",
        "OK".green().bold(),
        repo.root().display().to_string().cyan()
    );
    Ok(())
}
