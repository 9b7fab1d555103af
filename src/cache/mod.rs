//! Persistent binary cache
//!
//! One directory per installed artifact plus a version manifest, all under
//! a single cache root. Slots are replaced wholesale, never merged.
//!
//! # Cache States
//!
//! | Manifest | Slot binding | Meaning |
//! |----------|--------------|---------|
//! | = target | any | Up to date, no work |
//! | absent | present | Cached, slot reused |
//! | absent | missing | Fetch needed |
//! | ≠ target | any | Upgrade, every slot refetched |

pub mod layout;
pub mod manifest;
pub mod promote;
pub mod scratch;

pub use layout::{CacheLayout, ROOT_ENV};
pub use manifest::VersionManifest;
pub use promote::{copy_tree, is_cross_device, promote};
pub use scratch::{remove_quietly, unique_suffix, Scratch};
