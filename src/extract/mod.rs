//! Archive extraction
//!
//! Unpacks a gzip-compressed tarball with the system `tar`. Any non-zero
//! exit is a total failure for that artifact; partial output is not
//! inspected.

use crate::error::{StcError, StcResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Abstract extraction strategy
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Unpack `archive` into `dest`, which must already exist
    async fn extract(&self, archive: &Path, dest: &Path) -> StcResult<()>;
}

/// Extracts `.tar.gz` archives with an external `tar`
#[derive(Debug, Clone)]
pub struct TarExtractor {
    program: String,
}

impl TarExtractor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for TarExtractor {
    fn default() -> Self {
        Self::new("tar")
    }
}

#[async_trait]
impl Extractor for TarExtractor {
    async fn extract(&self, archive: &Path, dest: &Path) -> StcResult<()> {
        debug!(
            "Executing: {} -xzf {} -C {}",
            self.program,
            archive.display(),
            dest.display()
        );

        let output = Command::new(&self.program)
            .arg("-xzf")
            .arg(archive)
            .arg("-C")
            .arg(dest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| StcError::Extract {
                archive: archive.to_path_buf(),
                code: None,
                stderr: format!("{}: {}", self.program, e),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(StcError::Extract {
                archive: archive.to_path_buf(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}
