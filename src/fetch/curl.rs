//! curl download strategy

use crate::error::{StcError, StcResult};
use crate::fetch::Fetcher;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// curl: HTTP error with `--fail` (4xx/5xx)
const CURL_HTTP_ERROR: i32 = 22;
/// curl: operation timed out
const CURL_TIMEOUT: i32 = 28;
/// curl: failure receiving network data (a 404 body cut short under `--fail`)
const CURL_RECV_ERROR: i32 = 56;

/// Downloads with an external `curl` binary
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    program: String,
    connect_timeout: Duration,
    max_time: Duration,
}

impl CurlFetcher {
    pub fn new(program: impl Into<String>, connect_timeout: Duration, max_time: Duration) -> Self {
        Self {
            program: program.into(),
            connect_timeout,
            max_time,
        }
    }

    /// Arguments: follow redirects, fail on HTTP errors, no progress output
    fn args(&self, url: &str, dest: &Path) -> Vec<String> {
        vec![
            "-L".to_string(),
            "-f".to_string(),
            "-s".to_string(),
            "-S".to_string(),
            "--connect-timeout".to_string(),
            self.connect_timeout.as_secs().max(1).to_string(),
            "--max-time".to_string(),
            self.max_time.as_secs().max(1).to_string(),
            "-o".to_string(),
            dest.display().to_string(),
            url.to_string(),
        ]
    }
}

/// Map a non-zero curl exit onto the fetch error taxonomy
pub fn classify_curl_exit(tool: &str, url: &str, status: ExitStatus) -> StcError {
    match status.code() {
        Some(CURL_HTTP_ERROR) | Some(CURL_RECV_ERROR) => StcError::NotFound {
            url: url.to_string(),
        },
        Some(CURL_TIMEOUT) => StcError::Timeout {
            url: url.to_string(),
        },
        code => StcError::ToolExit {
            tool: tool.to_string(),
            code,
        },
    }
}

#[async_trait]
impl Fetcher for CurlFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> StcResult<()> {
        debug!("Executing: {} {:?}", self.program, self.args(url, dest));

        let output = Command::new(&self.program)
            .args(self.args(url, dest))
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
        Err(classify_curl_exit(&self.program, url, output.status))
    }

    fn name(&self) -> &str {
        &self.program
    }
}
