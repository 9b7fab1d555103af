//! Temporary archive files and staging directories

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Timestamp plus a random tag, unique across concurrent installers
pub fn unique_suffix() -> String {
    let tag = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &tag[..8])
}

/// Remove a file or directory tree, ignoring every error
pub async fn remove_quietly(path: &Path) {
    let result = match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
        Ok(_) => tokio::fs::remove_file(path).await,
        Err(e) if e.kind() == ErrorKind::NotFound => return,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        debug!("Cleanup of {} failed: {}", path.display(), e);
    }
}

/// A temporary path removed when dropped
///
/// Covers every exit path of a per-artifact pipeline, including early
/// returns. Call [`Scratch::keep`] once the path has been handed off.
#[derive(Debug)]
pub struct Scratch {
    path: PathBuf,
    armed: bool,
}

impl Scratch {
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop tracking the path; it will not be removed on drop
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let result = match std::fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&self.path),
            Ok(_) => std::fs::remove_file(&self.path),
            Err(_) => return,
        };
        if let Err(e) = result {
            debug!("Cleanup of {} failed: {}", self.path.display(), e);
        }
    }
}
