//! On-disk cache layout
//!
//! ```text
//! <root>/bin/version.txt
//! <root>/bin/<cache_name>/build/Release/<binding>
//! ```

use crate::error::{StcError, StcResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides the cache root
pub const ROOT_ENV: &str = "STC_HOME";

/// Directory name under the home directory when nothing overrides it
const DEFAULT_ROOT_DIR: &str = ".stc";

/// Paths inside a cache root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the cache root: `STC_HOME`, then the configured root, then `~/.stc`
    pub fn resolve(configured: Option<&Path>) -> StcResult<Self> {
        if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
            debug!("Cache root from {}: {:?}", ROOT_ENV, root);
            return Ok(Self::new(root));
        }

        if let Some(root) = configured {
            return Ok(Self::new(root));
        }

        dirs::home_dir()
            .map(|home| Self::new(home.join(DEFAULT_ROOT_DIR)))
            .ok_or(StcError::HomeDirMissing)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding installed slots and the manifest
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.bin_dir().join("version.txt")
    }

    /// Final slot for one artifact
    pub fn slot_dir(&self, cache_name: &str) -> PathBuf {
        self.bin_dir().join(cache_name)
    }

    /// The file whose presence marks a slot as installed
    pub fn binding_path(&self, cache_name: &str, binding: &str) -> PathBuf {
        self.slot_dir(cache_name)
            .join("build")
            .join("Release")
            .join(binding)
    }
}
