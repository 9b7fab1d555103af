//! Runtime version → ABI lookup and binding location
//!
//! The installer never needs this: it fetches every ABI generation up
//! front. The loader side does, to pick which installed binding matches
//! the runtime that is actually running.

use crate::artifact::{derive_location, AbiId, Arch, ArtifactSpec, Platform};
use crate::cache::CacheLayout;
use crate::error::{StcError, StcResult};
use semver::Version;
use std::path::PathBuf;

/// Maps a runtime version to its ABI generation
pub trait AbiLookup {
    fn abi_for(&self, runtime_version: &str) -> Option<AbiId>;
}

impl<F> AbiLookup for F
where
    F: Fn(&str) -> Option<AbiId>,
{
    fn abi_for(&self, runtime_version: &str) -> Option<AbiId> {
        self(runtime_version)
    }
}

/// First runtime version of each ABI generation, ascending
const LEGACY_ABIS: &[(u64, u64, u64, u32)] = &[
    (0, 2, 0, 1),
    (0, 9, 1, 10),
    (0, 9, 9, 11),
    (0, 11, 0, 12),
    (0, 11, 8, 13),
    (0, 11, 11, 14),
    (1, 0, 0, 42),
    (4, 0, 0, 46),
];

/// Static ABI table for the runtime's early releases
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyAbiTable;

impl LegacyAbiTable {
    /// Parse `0.10.48`, `v0.10.48` or a bare `0.10`
    fn parse(runtime_version: &str) -> Option<Version> {
        let trimmed = runtime_version.trim().trim_start_matches('v');
        Version::parse(trimmed)
            .or_else(|_| Version::parse(&format!("{}.0", trimmed)))
            .ok()
    }
}

impl AbiLookup for LegacyAbiTable {
    fn abi_for(&self, runtime_version: &str) -> Option<AbiId> {
        let version = Self::parse(runtime_version)?;
        LEGACY_ABIS
            .iter()
            .take_while(|(major, minor, patch, _)| Version::new(*major, *minor, *patch) <= version)
            .last()
            .map(|(_, _, _, abi)| AbiId(*abi))
    }
}

/// Finds the installed binding for a runtime version
pub struct Locator<'a, L: AbiLookup> {
    layout: &'a CacheLayout,
    spec: &'a ArtifactSpec,
    binding: &'a str,
    lookup: L,
}

impl<'a, L: AbiLookup> Locator<'a, L> {
    pub fn new(layout: &'a CacheLayout, spec: &'a ArtifactSpec, binding: &'a str, lookup: L) -> Self {
        Self {
            layout,
            spec,
            binding,
            lookup,
        }
    }

    /// Expected binding path, whether or not it is installed
    pub fn binding_path(
        &self,
        runtime_version: &str,
        platform: Platform,
        arch: Arch,
    ) -> StcResult<PathBuf> {
        let abi = self
            .lookup
            .abi_for(runtime_version)
            .ok_or_else(|| StcError::AbiUnknown(runtime_version.to_string()))?;
        let location = derive_location(self.spec, abi, platform, arch);
        Ok(self.layout.binding_path(&location.cache_name, self.binding))
    }

    /// Installed binding path, or `BindingMissing`
    pub fn locate(&self, runtime_version: &str, platform: Platform, arch: Arch) -> StcResult<PathBuf> {
        let path = self.binding_path(runtime_version, platform, arch)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(StcError::BindingMissing(path))
        }
    }
}
