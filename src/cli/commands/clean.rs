//! Clean command - remove installed binaries

use crate::cache::CacheLayout;
use crate::cli::args::CleanArgs;
use crate::config::Config;
use crate::error::{StcError, StcResult};
use crate::ui::{self, UiContext};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Execute the clean command
pub async fn execute(args: CleanArgs, config: &Config) -> StcResult<()> {
    let ctx = UiContext::detect();
    let layout = CacheLayout::resolve(config.cache.root.as_deref())?;
    let bin_dir = layout.bin_dir();

    let entries = list_entries(&bin_dir).await?;
    if entries.is_empty() {
        ui::step_info(
            &ctx,
            &format!("Nothing to clean in {}", bin_dir.display()),
        );
        return Ok(());
    }

    if args.dry_run {
        for entry in &entries {
            ui::remark(&ctx, &format!("Would remove {}", entry.display()));
        }
        ui::step_info(&ctx, &format!("{} entries would be removed", entries.len()));
        return Ok(());
    }

    fs::remove_dir_all(&bin_dir)
        .await
        .map_err(|e| StcError::io(format!("removing {}", bin_dir.display()), e))?;
    info!("Removed {}", bin_dir.display());

    ui::step_ok(
        &ctx,
        &format!("Removed {} entries from {}", entries.len(), bin_dir.display()),
    );
    Ok(())
}

/// Entries directly under `dir`, sorted; empty if it does not exist
async fn list_entries(dir: &Path) -> StcResult<Vec<PathBuf>> {
    let mut read = match fs::read_dir(dir).await {
        Ok(read) => read,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StcError::io(format!("reading {}", dir.display()), e)),
    };

    let mut entries = Vec::new();
    while let Some(entry) = read
        .next_entry()
        .await
        .map_err(|e| StcError::io(format!("reading {}", dir.display()), e))?
    {
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}
