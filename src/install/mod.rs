//! Installing prebuilt bindings into the cache

mod installer;
mod report;

pub use installer::{InstallSettings, Installer};
pub use report::{
    FailureReason, InstallEvent, InstallOutcome, InstallResult, InstallSummary, KeyOutcome,
};
