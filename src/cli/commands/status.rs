//! Status command - show cached binaries for this platform

use crate::artifact::Platform;
use crate::cli::args::{OutputFormat, StatusArgs};
use crate::config::Config;
use crate::error::StcResult;
use crate::install::Installer;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct StatusReport {
    platform: Platform,
    cache_root: PathBuf,
    manifest: PathBuf,
    installed_version: Option<String>,
    target_version: String,
    up_to_date: bool,
    artifacts: Vec<ArtifactStatus>,
}

#[derive(Debug, Serialize)]
struct ArtifactStatus {
    key: String,
    cache_name: String,
    url: String,
    cached: bool,
}

/// Execute the status command
pub async fn execute(args: StatusArgs, config: &Config) -> StcResult<()> {
    let platform = Platform::detect()?;
    let installer = Installer::from_config(config, platform)?;
    let report = build_report(&installer).await;

    match args.format {
        OutputFormat::Table => print_table(&report),
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}

async fn build_report(installer: &Installer) -> StatusReport {
    let settings = installer.settings();
    let manifest = installer.manifest();
    let installed_version = manifest.read().await;
    let target_version = settings.spec.binaries_version.clone();

    let artifacts = installer
        .plan()
        .into_iter()
        .map(|(key, location)| ArtifactStatus {
            key: key.to_string(),
            cached: installer.is_cached(&location),
            cache_name: location.cache_name,
            url: location.url,
        })
        .collect();

    StatusReport {
        platform: installer.platform(),
        cache_root: settings.layout.root().to_path_buf(),
        manifest: manifest.path().to_path_buf(),
        up_to_date: installed_version.as_deref() == Some(target_version.as_str()),
        installed_version,
        target_version,
        artifacts,
    }
}

fn print_table(report: &StatusReport) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "stc status");

    ui::key_value(&ctx, "Platform", report.platform.as_str());
    ui::key_value(&ctx, "Cache", &report.cache_root.display().to_string());
    ui::key_value_status(
        &ctx,
        "Binaries",
        &match &report.installed_version {
            Some(v) if report.up_to_date => v.clone(),
            Some(v) => format!("{} (target {})", v, report.target_version),
            None => format!("not installed (target {})", report.target_version),
        },
        report.up_to_date,
    );

    println!();
    println!(
        "{:<12} {:<8} {}",
        style("KEY").bold(),
        style("CACHED").bold(),
        style("NAME").bold()
    );
    println!("{}", "-".repeat(60));

    for artifact in &report.artifacts {
        let cached = if artifact.cached {
            style("yes").green()
        } else {
            style("no").yellow()
        };
        println!("{:<12} {:<8} {}", artifact.key, cached, artifact.cache_name);
    }

    if report.artifacts.is_empty() {
        ui::remark(&ctx, "No prebuilt binaries are published for this platform");
    }
}

fn print_json(report: &StatusReport) -> StcResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}
