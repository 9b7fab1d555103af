//! Archive download
//!
//! A [`Fetcher`] writes one URL to one local path. The system fetcher runs
//! curl and, on Windows only, retries through PowerShell when curl itself
//! is missing. HTTP-level failures never trigger the fallback, and nothing
//! here retries.
//!
//! A failed fetch may leave a partial file at the destination; removing it
//! is the caller's job.

mod curl;
mod powershell;

pub use curl::{classify_curl_exit, CurlFetcher};
pub use powershell::PowerShellFetcher;

use crate::artifact::Platform;
use crate::error::{StcError, StcResult};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

/// Abstract download strategy
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download `url` to `dest`
    async fn fetch(&self, url: &str, dest: &Path) -> StcResult<()>;

    /// Human-readable tool name for diagnostics
    fn name(&self) -> &str;
}

/// Primary download tool with a platform-gated fallback
pub struct SystemFetcher {
    primary: Box<dyn Fetcher>,
    fallback: Option<Box<dyn Fetcher>>,
}

impl SystemFetcher {
    /// Build the fetcher for a platform
    ///
    /// The fallback is only wired up where the primary tool is commonly
    /// absent (see [`Platform::needs_shell_fallback`]).
    pub fn for_platform(
        platform: Platform,
        primary: Box<dyn Fetcher>,
        fallback: Box<dyn Fetcher>,
    ) -> Self {
        let fallback = platform.needs_shell_fallback().then_some(fallback);
        Self { primary, fallback }
    }
}

#[async_trait]
impl Fetcher for SystemFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> StcResult<()> {
        match self.primary.fetch(url, dest).await {
            Err(StcError::ToolMissing { tool }) => match &self.fallback {
                Some(fallback) => {
                    info!("{} not found, downloading with {}", tool, fallback.name());
                    fallback.fetch(url, dest).await
                }
                None => Err(StcError::ToolMissing { tool }),
            },
            other => {
                if let Err(ref e) = other {
                    debug!("{} failed for {}: {}", self.primary.name(), url, e);
                }
                other
            }
        }
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Canned strategy that records how often it ran
    struct Scripted {
        calls: Arc<AtomicUsize>,
        result: fn() -> StcResult<()>,
    }

    #[async_trait]
    impl Fetcher for Scripted {
        async fn fetch(&self, _url: &str, _dest: &Path) -> StcResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn scripted(result: fn() -> StcResult<()>) -> (Box<dyn Fetcher>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Scripted {
                calls: calls.clone(),
                result,
            }),
            calls,
        )
    }

    fn missing() -> StcResult<()> {
        Err(StcError::ToolMissing {
            tool: "curl".to_string(),
        })
    }

    fn not_found() -> StcResult<()> {
        Err(StcError::NotFound {
            url: "u".to_string(),
        })
    }

    #[tokio::test]
    async fn fallback_on_missing_tool_for_windows() {
        let (primary, primary_calls) = scripted(missing);
        let (fallback, fallback_calls) = scripted(|| Ok(()));
        let fetcher = SystemFetcher::for_platform(Platform::Win32, primary, fallback);

        fetcher.fetch("u", Path::new("d")).await.unwrap();
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_fallback_on_http_error() {
        let (primary, _) = scripted(not_found);
        let (fallback, fallback_calls) = scripted(|| Ok(()));
        let fetcher = SystemFetcher::for_platform(Platform::Win32, primary, fallback);

        let err = fetcher.fetch("u", Path::new("d")).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_fallback_off_windows() {
        let (primary, _) = scripted(missing);
        let (fallback, fallback_calls) = scripted(|| Ok(()));
        let fetcher = SystemFetcher::for_platform(Platform::Linux, primary, fallback);

        let err = fetcher.fetch("u", Path::new("d")).await.unwrap_err();
        assert!(matches!(err, StcError::ToolMissing { .. }));
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }
}
