//! Artifact naming and download URL derivation
//!
//! Names are deterministic: the same key, platform and package identity
//! always produce byte-identical `cache_name` and `url` values, which is
//! what makes the on-disk cache-hit test meaningful.

use crate::artifact::platform::{Arch, Platform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary-compatibility generation of the consuming runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbiId(pub u32);

impl fmt::Display for AbiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// The two ABI generations that ship prebuilt binaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiSet {
    /// Legacy-and-earlier runtimes
    pub legacy: AbiId,
    /// The next stable generation
    pub stable: AbiId,
}

impl AbiSet {
    /// ABIs in install order, oldest first
    pub fn ordered(&self) -> [AbiId; 2] {
        [self.legacy, self.stable]
    }
}

/// One required binary variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactKey {
    pub abi: AbiId,
    pub arch: Arch,
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.abi, self.arch)
    }
}

/// Cross product of the ABI set and architectures, ABI-major
///
/// A key that repeats (equal ABIs, or an arch listed twice) is kept only at
/// its first position.
pub fn enumerate_keys(abis: &AbiSet, archs: &[Arch]) -> Vec<ArtifactKey> {
    let mut keys = Vec::with_capacity(2 * archs.len());
    for abi in abis.ordered() {
        for &arch in archs {
            let key = ArtifactKey { abi, arch };
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

/// Package identity and release location shared by every artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// Package name prefix (e.g. "thread-sleep-compat")
    pub package: String,
    /// Target runtime name (e.g. "node")
    pub runtime: String,
    /// Release host (e.g. "github.com")
    pub host: String,
    /// Repository path on the host ("owner/name")
    pub repo: String,
    /// Artifact-set version; selects the release tag
    pub binaries_version: String,
}

/// Where an artifact lives remotely and in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLocation {
    pub url: String,
    pub cache_name: String,
}

impl ArtifactLocation {
    /// Remote archive file name
    pub fn archive_name(&self) -> String {
        format!("{}.tar.gz", self.cache_name)
    }
}

/// Derive the cache name and download URL for one artifact
///
/// `<package>-<runtime>-v<abi>-<platform>-<arch>` and
/// `https://<host>/<repo>/releases/download/binaries-v<version>/<name>.tar.gz`.
pub fn derive_location(
    spec: &ArtifactSpec,
    abi: AbiId,
    platform: Platform,
    arch: Arch,
) -> ArtifactLocation {
    let cache_name = [
        spec.package.as_str(),
        spec.runtime.as_str(),
        &abi.to_string(),
        platform.as_str(),
        arch.as_str(),
    ]
    .join("-");

    let mut location = ArtifactLocation {
        url: String::new(),
        cache_name,
    };
    location.url = format!(
        "https://{}/{}/releases/download/binaries-v{}/{}",
        spec.host,
        spec.repo,
        spec.binaries_version,
        location.archive_name()
    );
    location
}
