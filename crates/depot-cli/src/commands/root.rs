//! locate-root command implementation

use std::io::Write;

use depot_core::Repository;

use crate::context::Context;
use crate::error::Result;

/// Print the repository root (the marker directory).
///
/// Only reads directory metadata, so it does not take the repository lock.
pub fn run_locate_root(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    match Repository::find_root(ctx.config(), ctx.start())? {
        Some(root) => {
            writeln!(out, "{}", root.display())?;
            Ok(())
        }
        None => Err(depot_core::Error::NotARepository {
            path: ctx.start().to_path_buf(),
        }
        .into()),
    }
}
