//! Fetch command implementations

use std::io::Write;

use colored::Colorize;
use depot_core::{DefaultTransport, FetchCache};

use crate::context::Context;
use crate::error::Result;

/// Fetch one package and print its local path.
pub fn run_fetch(ctx: &Context, name: &str, out: &mut dyn Write) -> Result<()> {
    let (repo, lock) = ctx.locked()?;
    let cache = FetchCache::new(&repo, &lock, DefaultTransport::new()?);

    let path = cache.get(name)?;
    writeln!(out, "{}", path.display())?;
    Ok(())
}

/// Fetch `names` (the whole catalog when empty), printing `<name> <path>` for
/// each success as it happens. Failures are listed on stderr at the end.
pub fn run_fetch_all(ctx: &Context, names: &[String], out: &mut dyn Write) -> Result<()> {
    let (repo, lock) = ctx.locked()?;
    let cache = FetchCache::new(&repo, &lock, DefaultTransport::new()?);
    let targets = (!names.is_empty()).then_some(names);

    let mut write_error = None;
    let result = cache.load_all(targets, |name, path| {
        if write_error.is_none() {
            write_error = writeln!(out, "{} {}", name, path.display()).err();
        }
    });

    if let Err(depot_core::Error::BulkFetchPartialFailure { failures }) = &result {
        for (name, cause) in failures {
            eprintln!("  {} {}: {}", "x".red().bold(), name.cyan(), cause);
        }
    }
    result?;
    if let Some(e) = write_error {
        return Err(e.into());
    }
    Ok(())
}
