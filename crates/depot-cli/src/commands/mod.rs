//! Command implementations for depot-cli

pub mod catalog;
pub mod fetch;
pub mod init;
pub mod root;

pub use catalog::{
    run_catalog_add, run_catalog_get, run_catalog_import, run_catalog_list, run_catalog_remove,
};
pub use fetch::{run_fetch, run_fetch_all};
pub use init::run_init;
pub use root::run_locate_root;

use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Read a catalog source file, or stdin when the path is `-`.
pub(crate) fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    std::fs::read_to_string(path).map_err(|e| depot_fs::Error::io(path, e).into())
}
