//! PowerShell download strategy
//!
//! Used on Windows hosts without curl. Old Windows PowerShell defaults to
//! TLS 1.0, which release hosts reject, so the script opts into TLS 1.2.

use crate::error::{StcError, StcResult};
use crate::fetch::Fetcher;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Downloads with `Invoke-WebRequest`
#[derive(Debug, Clone)]
pub struct PowerShellFetcher {
    program: String,
    max_time: Duration,
}

impl PowerShellFetcher {
    pub fn new(program: impl Into<String>, max_time: Duration) -> Self {
        Self {
            program: program.into(),
            max_time,
        }
    }

    fn script(&self, url: &str, dest: &Path) -> String {
        format!(
            "$ProgressPreference = 'SilentlyContinue'; \
             [Net.ServicePointManager]::SecurityProtocol = [Net.SecurityProtocolType]::Tls12; \
             Invoke-WebRequest -Uri {} -OutFile {} -UseBasicParsing -TimeoutSec {}",
            quote(url),
            quote(&dest.display().to_string()),
            self.max_time.as_secs().max(1)
        )
    }
}

/// Single-quote a PowerShell string literal
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[async_trait]
impl Fetcher for PowerShellFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> StcResult<()> {
        let script = self.script(url, dest);
        debug!("Executing: {} -Command {}", self.program, script);

        let output = Command::new(&self.program)
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StcError::ToolMissing {
                    tool: self.program.clone(),
                },
                _ => StcError::io(format!("spawning {}", self.program), e),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{} exited with {}: {}", self.program, output.status, stderr.trim());
        Err(StcError::ToolExit {
            tool: self.program.clone(),
            code: output.status.code(),
        })
    }

    fn name(&self) -> &str {
        &self.program
    }
}
