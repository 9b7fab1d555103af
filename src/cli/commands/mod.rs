//! CLI command implementations

pub mod clean;
pub mod completions;
pub mod config;
pub mod install;
pub mod locate;
pub mod status;

pub use clean::execute as clean;
pub use completions::execute as completions;
pub use config::execute as config;
pub use install::execute as install;
pub use locate::execute as locate;
pub use status::execute as status;
