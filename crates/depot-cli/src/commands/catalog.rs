//! Catalog command implementations
//!
//! Every command here runs under the repository lock.

use std::io::Write;
use std::path::Path;

use colored::Colorize;

use crate::commands::read_source;
use crate::context::Context;
use crate::error::Result;

/// Print the catalog verbatim, or as a JSON array with `json`.
pub fn run_catalog_list(ctx: &Context, json: bool, out: &mut dyn Write) -> Result<()> {
    let (repo, _lock) = ctx.locked()?;
    let catalog = repo.catalog();

    if json {
        let entries = catalog.entries()?;
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        out.write_all(catalog.raw()?.as_bytes())?;
    }
    Ok(())
}

pub fn run_catalog_add(ctx: &Context, name: &str, url: &str, checksum: &str) -> Result<()> {
    let (repo, _lock) = ctx.locked()?;
    repo.catalog().add(name, url, checksum)?;

    eprintln!("{} Added {}", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Remove a package; removing an absent one only warns.
pub fn run_catalog_remove(ctx: &Context, name: &str) -> Result<()> {
    let (repo, _lock) = ctx.locked()?;

    if repo.catalog().remove(name)? {
        eprintln!("{} Removed {}", "OK".green().bold(), name.cyan());
    } else {
        eprintln!(
            "{} {} is not in the catalog",
            "warning:".yellow().bold(),
            name.cyan()
        );
    }
    Ok(())
}

/// Print the catalog line for `name`; prints nothing when it is absent.
pub fn run_catalog_get(ctx: &Context, name: &str, out: &mut dyn Write) -> Result<()> {
    let (repo, _lock) = ctx.locked()?;

    if let Some(entry) = repo.catalog().lookup(name)? {
        writeln!(out, "{} {} {}", entry.name, entry.url, entry.checksum)?;
    }
    Ok(())
}

pub fn run_catalog_import(ctx: &Context, file: &Path) -> Result<()> {
    let source = read_source(file)?;
    let (repo, _lock) = ctx.locked()?;
    let names = repo.catalog().import_bulk(&source)?;

    eprintln!(
        "{} Imported {} package(s)",
        "OK".green().bold(),
        names.len().to_string().cyan()
    );
    Ok(())
}
