//! Promotion of a staging directory into its final cache slot
//!
//! The final path is only ever absent, the previous slot, or the complete
//! new slot. A previous slot is renamed aside first and restored if the
//! move fails. When staging lives on another device the tree is copied
//! next to the final path and then renamed, never copied in place.

use crate::cache::scratch::{remove_quietly, unique_suffix, Scratch};
use crate::error::{StcError, StcResult};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[cfg(windows)]
const ERROR_NOT_SAME_DEVICE: i32 = 17;

/// Whether a rename failed because source and target are on different devices
pub fn is_cross_device(err: &io::Error) -> bool {
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(libc::EXDEV)
    }
    #[cfg(windows)]
    {
        err.raw_os_error() == Some(ERROR_NOT_SAME_DEVICE)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = err;
        false
    }
}

/// Move `staging` to `final_dir`, replacing any previous contents
pub async fn promote(staging: &Path, final_dir: &Path) -> StcResult<()> {
    let parent = final_dir.parent().ok_or_else(|| {
        StcError::io(
            format!("promoting into {}", final_dir.display()),
            io::Error::new(io::ErrorKind::InvalidInput, "slot has no parent directory"),
        )
    })?;
    let name = final_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    fs::create_dir_all(parent)
        .await
        .map_err(|e| StcError::io(format!("creating directory {}", parent.display()), e))?;

    let suffix = unique_suffix();
    let retired = parent.join(format!(".{}.retired-{}", name, suffix));
    let had_previous = fs::symlink_metadata(final_dir).await.is_ok();

    if had_previous {
        debug!("Retiring previous slot {}", final_dir.display());
        fs::rename(final_dir, &retired).await.map_err(|e| {
            StcError::io(format!("moving aside {}", final_dir.display()), e)
        })?;
    }

    match move_into_place(staging, final_dir, parent.join(format!(".{}.incoming-{}", name, suffix))).await {
        Ok(()) => {
            if had_previous {
                remove_quietly(&retired).await;
            }
            Ok(())
        }
        Err(e) => {
            if had_previous {
                if let Err(restore) = fs::rename(&retired, final_dir).await {
                    warn!(
                        "Could not restore previous slot {}: {}",
                        final_dir.display(),
                        restore
                    );
                }
            }
            Err(e)
        }
    }
}

async fn move_into_place(staging: &Path, final_dir: &Path, incoming: PathBuf) -> StcResult<()> {
    match fs::rename(staging, final_dir).await {
        Ok(()) => return Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!(
                "{} and {} are on different devices, copying",
                staging.display(),
                final_dir.display()
            );
        }
        Err(e) => {
            return Err(StcError::io(
                format!("renaming {} to {}", staging.display(), final_dir.display()),
                e,
            ))
        }
    }

    copy_into_place(staging, final_dir, incoming).await
}

/// Copy `staging` to `incoming` beside `final_dir`, then rename it into place
///
/// `incoming` must be on the same device as `final_dir` and is removed if
/// any step fails. `final_dir` must not exist.
async fn copy_into_place(staging: &Path, final_dir: &Path, incoming: PathBuf) -> StcResult<()> {
    let incoming = Scratch::new(incoming);
    let (src, dst) = (staging.to_path_buf(), incoming.path().to_path_buf());
    tokio::task::spawn_blocking(move || copy_tree(&src, &dst))
        .await
        .map_err(|e| StcError::io("copying staging tree", io::Error::other(e)))??;

    fs::rename(incoming.path(), final_dir).await.map_err(|e| {
        StcError::io(
            format!("renaming {} to {}", incoming.path().display(), final_dir.display()),
            e,
        )
    })?;
    incoming.keep();

    remove_quietly(staging).await;
    Ok(())
}

/// Recursively copy `src` into a new directory `dst`
pub fn copy_tree(src: &Path, dst: &Path) -> StcResult<()> {
    std::fs::create_dir_all(dst)
        .map_err(|e| StcError::io(format!("creating directory {}", dst.display()), e))?;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| StcError::io(format!("walking {}", src.display()), e.into()))?;
        let rel = entry.path().strip_prefix(src).map_err(|_| {
            StcError::io(
                format!("walking {}", src.display()),
                io::Error::new(io::ErrorKind::InvalidData, "entry outside tree"),
            )
        })?;
        let target = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|e| StcError::io(format!("creating directory {}", target.display()), e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| {
                StcError::io(
                    format!("copying {} to {}", entry.path().display(), target.display()),
                    e,
                )
            })?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> StcResult<()> {
    let link = std::fs::read_link(src)
        .map_err(|e| StcError::io(format!("reading link {}", src.display()), e))?;
    std::os::unix::fs::symlink(&link, dst)
        .map_err(|e| StcError::io(format!("creating link {}", dst.display()), e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> StcResult<()> {
    std::fs::copy(src, dst)
        .map(|_| ())
        .map_err(|e| StcError::io(format!("copying {} to {}", src.display(), dst.display()), e))
}
