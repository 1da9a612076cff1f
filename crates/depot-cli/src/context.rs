//! Command context
//!
//! Resolves the start directory and repository configuration once, then hands
//! them explicitly to every command. Nothing below reads or changes the
//! process working directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use depot_core::Repository;
use depot_fs::{RepositoryConfig, RepositoryLock};

use crate::cli::Cli;
use crate::error::Result;

/// Start directory and configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    start: PathBuf,
    config: RepositoryConfig,
}

impl Context {
    pub fn new(start: PathBuf, config: RepositoryConfig) -> Self {
        Self { start, config }
    }

    /// Build the context from global flags, falling back to the working directory.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let start = match &cli.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let mut config = match &cli.config {
            Some(path) => RepositoryConfig::load(path)?,
            None => RepositoryConfig::default(),
        };
        if let Some(secs) = cli.lock_timeout {
            config = config.with_lock_timeout(Duration::from_secs(secs));
        }
        tracing::debug!(start = %start.display(), ?config, "resolved context");

        Ok(Self::new(start, config))
    }

    pub fn start(&self) -> &Path {
        &self.start
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Locate the enclosing repository.
    pub fn repository(&self) -> Result<Repository> {
        Ok(Repository::discover(self.config.clone(), &self.start)?)
    }

    /// Locate the enclosing repository and take its lock.
    ///
    /// The lock is released when the returned guard is dropped, which every
    /// command does on its way out, error or not.
    pub fn locked(&self) -> Result<(Repository, RepositoryLock)> {
        let repo = self.repository()?;
        let lock = repo.lock()?;
        Ok((repo, lock))
    }
}
