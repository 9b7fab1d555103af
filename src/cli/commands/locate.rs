//! Locate command - print the installed binding for a runtime version

use crate::abi::{LegacyAbiTable, Locator};
use crate::artifact::{Arch, Platform};
use crate::cache::CacheLayout;
use crate::cli::args::LocateArgs;
use crate::config::Config;
use crate::error::StcResult;
use tracing::debug;

/// Execute the locate command
///
/// Prints only the path so the output can be consumed by scripts.
pub async fn execute(args: LocateArgs, config: &Config) -> StcResult<()> {
    let layout = CacheLayout::resolve(config.cache.root.as_deref())?;
    let platform = match args.platform {
        Some(platform) => platform,
        None => Platform::detect()?,
    };
    let arch = match args.arch {
        Some(arch) => arch,
        None => Arch::detect()?,
    };

    let spec = config.artifact_spec();
    let locator = Locator::new(&layout, &spec, &config.artifact.binding, LegacyAbiTable);

    debug!(
        "Locating binding for runtime {} on {}-{}",
        args.runtime_version, platform, arch
    );
    let path = locator.locate(&args.runtime_version, platform, arch)?;
    println!("{}", path.display());

    Ok(())
}
