//! Artifact identity: which binaries exist and what they are called
//!
//! An artifact is one prebuilt binding for an (ABI, platform, architecture)
//! combination, published as `<cache_name>.tar.gz` under a release tag.

mod location;
mod platform;

pub use location::{
    derive_location, enumerate_keys, AbiId, AbiSet, ArtifactKey, ArtifactLocation, ArtifactSpec,
};
pub use platform::{Arch, ArchTable, Platform};
