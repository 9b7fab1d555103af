//! Configuration schema for stc
//!
//! Configuration is stored at `~/.config/stc/config.toml`. Every section
//! is optional; missing keys take the published defaults.

use crate::artifact::{AbiId, AbiSet, ArtifactSpec};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Artifact identity
    pub artifact: ArtifactConfig,

    /// ABI generations to install
    pub abi: AbiConfig,

    /// Release download location
    pub release: ReleaseConfig,

    /// Download tools
    pub fetch: FetchConfig,

    /// Extraction tool
    pub extract: ExtractConfig,

    /// Cache location
    pub cache: CacheConfig,
}

impl Config {
    /// Package identity and release location for name/URL derivation
    pub fn artifact_spec(&self) -> ArtifactSpec {
        ArtifactSpec {
            package: self.artifact.package.clone(),
            runtime: self.artifact.runtime.clone(),
            host: self.release.host.clone(),
            repo: self.release.repo.clone(),
            binaries_version: self.artifact.binaries_version.clone(),
        }
    }

    pub fn abi_set(&self) -> AbiSet {
        AbiSet {
            legacy: AbiId(self.abi.legacy),
            stable: AbiId(self.abi.stable),
        }
    }

    /// Check constraints serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.abi.legacy == self.abi.stable {
            return Err(format!(
                "abi.legacy and abi.stable must differ (both are {})",
                self.abi.legacy
            ));
        }
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Artifact identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Package name used as the artifact name prefix
    pub package: String,

    /// Target runtime name
    pub runtime: String,

    /// Artifact-set version (selects the `binaries-v<version>` release)
    pub binaries_version: String,

    /// Binding file inside `build/Release`
    pub binding: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            package: "thread-sleep-compat".to_string(),
            runtime: "node".to_string(),
            binaries_version: "1.0.0".to_string(),
            binding: "thread_sleep.node".to_string(),
        }
    }
}

/// ABI generations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbiConfig {
    /// Legacy-and-earlier runtimes (0.8.x and below)
    pub legacy: u32,

    /// The following stable generation (0.10.x)
    pub stable: u32,
}

impl Default for AbiConfig {
    fn default() -> Self {
        Self {
            legacy: 1,
            stable: 11,
        }
    }
}

/// Release location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    pub host: String,

    /// Repository path ("owner/name")
    pub repo: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            repo: "kmalakoff/thread-sleep-compat".to_string(),
        }
    }
}

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// curl executable
    pub curl: String,

    /// PowerShell executable (Windows fallback)
    pub powershell: String,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Total time budget per download in seconds
    pub max_time_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            curl: "curl".to_string(),
            powershell: "powershell".to_string(),
            connect_timeout_secs: 30,
            max_time_secs: 300,
        }
    }
}

/// Extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// tar executable
    pub tar: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            tar: "tar".to_string(),
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root (default: ~/.stc; STC_HOME takes precedence)
    pub root: Option<PathBuf>,

    /// Directory for downloads and staging (default: system temp dir)
    pub temp_dir: Option<PathBuf>,
}
