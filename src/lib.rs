//! stc - prebuilt native binding installer
//!
//! Fetches the thread-sleep-compat bindings for every ABI generation and
//! architecture a platform can run, and keeps them in a per-user cache
//! keyed by artifact name.

pub mod abi;
pub mod artifact;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod install;
pub mod ui;

pub use error::{StcError, StcResult};
