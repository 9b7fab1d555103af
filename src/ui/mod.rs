//! Terminal output for install reports
//!
//! Interactive terminals get `cliclack` log lines and an `indicatif`
//! progress bar. Everywhere else (CI, package-manager hooks, pipes) output
//! falls back to plain `stc:`-prefixed lines that survive log capture.
//!
//! # Example
//!
//! ```rust,ignore
//! use stc::ui::{self, ArtifactProgress, UiContext};
//!
//! let ctx = UiContext::detect();
//! ui::intro(&ctx, "Installing thread-sleep-compat binaries for linux");
//!
//! let progress = ArtifactProgress::new(&ctx);
//! progress.start(0, 6, "v1-arm64");
//! progress.suspend(|| ui::step_ok(&ctx, "Installed thread-sleep-compat-node-v1-linux-arm64"));
//! progress.finish();
//!
//! ui::outro_success(&ctx, "Downloaded 6 binaries");
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, outro_success, outro_warn, remark, step_error_detail,
    step_info, step_ok, step_warn,
};
pub use progress::ArtifactProgress;
