//! [`TestRepo`] builder for depot test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use depot_core::Repository;
use depot_fs::RepositoryConfig;
use tempfile::TempDir;

/// A temporary project directory with helpers for setting up a repository
/// and local artifact sources.
///
/// # Example
///
/// ```rust,no_run
/// use depot_test_utils::TestRepo;
///
/// let test = TestRepo::new();
/// let repo = test.init();
/// let url = test.source_file("zlib.tar.gz", b"bytes");
/// repo.catalog().add("zlib", &url, "none").unwrap();
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
    config: RepositoryConfig,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty temporary directory using the default config with a
    /// short lock timeout.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            config: RepositoryConfig::default().with_lock_timeout(Duration::from_secs(30)),
        }
    }

    /// Project directory (the parent of the marker directory).
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Create `rel` (and its parents) below the project directory.
    pub fn subdir(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Initialise a repository in the project directory.
    pub fn init(&self) -> Repository {
        Repository::init(self.config.clone(), self.root(), None)
            .expect("TestRepo::init: failed to create repository")
    }

    /// Re-discover the repository, as a fresh command invocation would.
    pub fn open(&self) -> Repository {
        Repository::discover(self.config.clone(), self.root())
            .expect("TestRepo::open: no repository found")
    }

    /// Write `content` under a `sources/` directory outside the repository and
    /// return its `file://` URL.
    pub fn source_file(&self, name: &str, content: &[u8]) -> String {
        let path = self.subdir("sources").join(name);
        fs::write(&path, content).unwrap();
        format!("file://{}", path.display())
    }

    /// Names of the files stored in the marker directory, sorted.
    pub fn repository_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root().join(&self.config.marker_dir))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
