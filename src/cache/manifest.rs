//! Version manifest
//!
//! A single-line file recording which artifact-set version the cache holds.
//! Reads never fail: anything unreadable counts as "no manifest".

use crate::cache::scratch::{remove_quietly, unique_suffix};
use crate::error::{StcError, StcResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Accessor for `<root>/bin/version.txt`
#[derive(Debug, Clone)]
pub struct VersionManifest {
    path: PathBuf,
}

impl VersionManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Installed version, if the manifest exists and is readable
    pub async fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let version = content.trim();
                if version.is_empty() {
                    None
                } else {
                    Some(version.to_string())
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Ignoring unreadable manifest {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Record `version`, replacing the file atomically
    pub async fn write(&self, version: &str) -> StcResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StcError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }

        let tmp = self
            .path
            .with_file_name(format!(".version.txt.{}", unique_suffix()));
        fs::write(&tmp, version)
            .await
            .map_err(|e| StcError::io(format!("writing {}", tmp.display()), e))?;

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            remove_quietly(&tmp).await;
            return Err(StcError::io(
                format!("replacing manifest {}", self.path.display()),
                e,
            ));
        }

        debug!("Wrote manifest {} = {}", self.path.display(), version);
        Ok(())
    }
}
