//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// depot - a local download cache for build-time dependencies
#[derive(Parser, Debug)]
#[command(name = "depot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// TOML file overriding repository names and limits
    #[arg(long, global = true, env = "DEPOT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait for the repository lock
    #[arg(long, global = true, env = "DEPOT_LOCK_TIMEOUT", value_name = "SECS")]
    pub lock_timeout: Option<u64>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a repository in the current directory
    ///
    /// Examples:
    ///   depot init                 # Empty catalog
    ///   depot init deps.list       # Import entries from deps.list
    Init {
        /// Catalog file to import right away ('-' for stdin)
        import: Option<PathBuf>,
    },

    /// Print the repository root, if there is one
    LocateRoot,

    /// Print the catalog
    CatalogList {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Add a package to the catalog
    ///
    /// Examples:
    ///   depot catalog-add zlib https://zlib.net/zlib-1.3.tar.gz MD5:60373b133d630f74f4a1f94c1185a53f
    ///   depot catalog-add tool file:///srv/mirror/tool.tgz none
    CatalogAdd {
        /// Short name (no whitespace or ':', may not start with '.')
        name: String,
        /// Source URL
        url: String,
        /// 'none' or '<ALGO>:<hex>' (MD5, SHA256)
        checksum: String,
    },

    /// Remove a package from the catalog
    CatalogRemove {
        /// Short name of the package
        name: String,
    },

    /// Print the catalog line for a package
    CatalogGet {
        /// Short name of the package
        name: String,
    },

    /// Import catalog lines from a file, all or nothing
    CatalogImport {
        /// Catalog file to import ('-' for stdin)
        file: PathBuf,
    },

    /// Fetch a package and print its local path
    Fetch {
        /// Short name of the package
        name: String,
    },

    /// Fetch several packages (all by default), continuing past failures
    FetchAll {
        /// Packages to fetch; the whole catalog when omitted
        names: Vec<String>,
    },
}
