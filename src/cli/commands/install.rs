//! Install command - fetch and cache prebuilt binaries

use crate::artifact::Platform;
use crate::cli::args::InstallArgs;
use crate::config::Config;
use crate::error::StcResult;
use crate::install::{
    FailureReason, InstallEvent, InstallOutcome, InstallResult, InstallSummary, Installer,
};
use crate::ui::{self, ArtifactProgress, UiContext};

/// Execute the install command
///
/// Per-artifact failures are part of the report, not errors.
pub async fn execute(args: InstallArgs, config: &Config) -> StcResult<()> {
    let ctx = UiContext::detect();

    let mut config = config.clone();
    if let Some(version) = args.binaries_version {
        config.artifact.binaries_version = version;
    }
    let package = config.artifact.package.clone();

    let platform = Platform::detect()?;
    let installer = Installer::from_config(&config, platform)?.with_force(args.force);

    let mut progress: Option<ArtifactProgress> = None;
    let outcome = installer
        .install(&mut |event| report_event(&ctx, &package, &mut progress, event))
        .await;
    if let Some(progress) = progress {
        progress.finish();
    }

    if let InstallOutcome::Completed(summary) = outcome {
        report_summary(&ctx, &package, &summary);
    }

    Ok(())
}

fn report_event(
    ctx: &UiContext,
    package: &str,
    progress: &mut Option<ArtifactProgress>,
    event: InstallEvent<'_>,
) {
    match event {
        InstallEvent::UpToDate { version } => {
            ui::step_ok(
                ctx,
                &format!("{} binaries {} already installed", package, version),
            );
        }
        InstallEvent::Upgrading { from, to } => {
            ui::step_info(
                ctx,
                &format!("Upgrading {} binaries from {} to {}", package, from, to),
            );
        }
        InstallEvent::Started { platform, archs } => {
            let archs: Vec<&str> = archs.iter().map(|a| a.as_str()).collect();
            ui::intro(
                ctx,
                &format!(
                    "Installing {} binaries for {} ({})",
                    package,
                    platform,
                    archs.join(", ")
                ),
            );
            if !archs.is_empty() {
                *progress = Some(ArtifactProgress::new(ctx));
            }
        }
        InstallEvent::KeyStarted {
            key, index, total, ..
        } => {
            if let Some(progress) = progress {
                progress.start(index, total, &key.to_string());
            }
        }
        InstallEvent::KeyFinished {
            location, result, ..
        } => {
            let name = location.cache_name.as_str();
            let line = || match result {
                InstallResult::Installed => ui::step_ok(ctx, &format!("Installed {}", name)),
                InstallResult::AlreadyCached => {
                    ui::step_ok(ctx, &format!("{} already cached", name))
                }
                InstallResult::Failed {
                    reason: FailureReason::NotFound,
                    ..
                } => ui::step_info(ctx, &format!("{} not available", name)),
                InstallResult::Failed { error, .. } => ui::step_error_detail(
                    ctx,
                    &format!("Failed to install {}", name),
                    &error.to_string(),
                ),
            };
            match progress {
                Some(progress) => progress.suspend(line),
                None => line(),
            }
        }
    }
}

fn report_summary(ctx: &UiContext, package: &str, summary: &InstallSummary) {
    let installed = summary.installed();
    let cached = summary.cached();

    if installed > 0 {
        ui::step_ok(ctx, &format!("Downloaded {}", binaries(installed)));
    }
    if cached > 0 {
        ui::step_info(ctx, &format!("{} already existed", binaries(cached)));
    }

    if summary.all_failed() {
        ui::outro_warn(
            ctx,
            &format!("No binaries available for {}", summary.platform),
        );
        ui::remark(
            ctx,
            &format!(
                "{} will still work on newer runtimes but not on older versions",
                package
            ),
        );
    } else if !summary.manifest_written {
        ui::outro_warn(
            ctx,
            "Binaries installed but the version manifest could not be written",
        );
    } else {
        ui::outro_success(
            ctx,
            &format!("{} binaries {} ready", package, summary.target_version),
        );
    }
}

fn binaries(n: usize) -> String {
    if n == 1 {
        "1 binary".to_string()
    } else {
        format!("{} binaries", n)
    }
}
