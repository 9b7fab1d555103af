//! Install outcomes and progress events

use crate::artifact::{Arch, ArtifactKey, ArtifactLocation, Platform};
use crate::error::StcError;
use serde::Serialize;
use std::fmt;

/// Why an artifact could not be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The release has no archive for this combination
    NotFound,
    /// Download tool failed, timed out or is missing
    NetworkError,
    /// Archive could not be unpacked
    ExtractError,
    /// Local create/remove/rename failed
    FilesystemError,
}

impl FailureReason {
    /// Classify a per-artifact error
    pub fn of(err: &StcError) -> Self {
        match err {
            StcError::NotFound { .. } => Self::NotFound,
            StcError::Timeout { .. } | StcError::ToolMissing { .. } | StcError::ToolExit { .. } => {
                Self::NetworkError
            }
            StcError::Extract { .. } => Self::ExtractError,
            _ => Self::FilesystemError,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::NetworkError => write!(f, "network error"),
            Self::ExtractError => write!(f, "extract error"),
            Self::FilesystemError => write!(f, "filesystem error"),
        }
    }
}

/// Outcome for one artifact
#[derive(Debug)]
pub enum InstallResult {
    AlreadyCached,
    Installed,
    Failed {
        reason: FailureReason,
        error: StcError,
    },
}

impl InstallResult {
    pub fn failed(error: StcError) -> Self {
        Self::Failed {
            reason: FailureReason::of(&error),
            error,
        }
    }

    /// Whether a usable binding is in place after this step
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::AlreadyCached | Self::Installed)
    }
}

/// One processed artifact
#[derive(Debug)]
pub struct KeyOutcome {
    pub key: ArtifactKey,
    pub location: ArtifactLocation,
    pub result: InstallResult,
}

/// Aggregate of a full install run
#[derive(Debug)]
pub struct InstallSummary {
    pub platform: Platform,
    pub target_version: String,
    /// Manifest contents before the run
    pub previous_version: Option<String>,
    /// Per-artifact outcomes in processing order
    pub results: Vec<KeyOutcome>,
    /// Whether the manifest now records `target_version`
    pub manifest_written: bool,
}

impl InstallSummary {
    pub fn installed(&self) -> usize {
        self.count(|r| matches!(r, InstallResult::Installed))
    }

    pub fn cached(&self) -> usize {
        self.count(|r| matches!(r, InstallResult::AlreadyCached))
    }

    /// Failed artifacts with their errors, in processing order
    pub fn failed(&self) -> Vec<(&ArtifactKey, &StcError)> {
        self.results
            .iter()
            .filter_map(|o| match &o.result {
                InstallResult::Failed { error, .. } => Some((&o.key, error)),
                _ => None,
            })
            .collect()
    }

    /// At least one artifact installed or already cached
    pub fn any_usable(&self) -> bool {
        self.results.iter().any(|o| o.result.is_usable())
    }

    /// No artifact usable (including when there was nothing to try)
    pub fn all_failed(&self) -> bool {
        !self.any_usable()
    }

    fn count(&self, pred: impl Fn(&InstallResult) -> bool) -> usize {
        self.results.iter().filter(|o| pred(&o.result)).count()
    }
}

/// Result of [`Installer::install`](crate::install::Installer::install)
#[derive(Debug)]
pub enum InstallOutcome {
    /// Manifest already records the target version; nothing was touched
    UpToDate { version: String },
    /// Artifacts were processed
    Completed(InstallSummary),
}

/// Progress notifications emitted during a run
#[derive(Debug)]
pub enum InstallEvent<'a> {
    UpToDate {
        version: &'a str,
    },
    Upgrading {
        from: &'a str,
        to: &'a str,
    },
    Started {
        platform: Platform,
        archs: &'a [Arch],
    },
    KeyStarted {
        key: &'a ArtifactKey,
        location: &'a ArtifactLocation,
        index: usize,
        total: usize,
    },
    KeyFinished {
        key: &'a ArtifactKey,
        location: &'a ArtifactLocation,
        result: &'a InstallResult,
    },
}
