//! Per-artifact progress with CI fallback

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress across the artifacts of one install run
///
/// Shows an indicatif bar in interactive mode. In plain mode each artifact
/// start is a single line.
pub struct ArtifactProgress {
    bar: Option<ProgressBar>,
}

impl ArtifactProgress {
    pub fn new(ctx: &UiContext) -> Self {
        let bar = ctx.use_fancy_output().then(|| {
            let bar = ProgressBar::new(0);
            // The template is a constant; a parse failure falls back to the default style
            if let Ok(style) = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} {bar:20.cyan/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}")
            {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ").progress_chars("━╸─"));
            }
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        Self { bar }
    }

    /// Mark artifact `index` of `total` as in progress
    pub fn start(&self, index: usize, total: usize, label: &str) {
        match &self.bar {
            Some(bar) => {
                bar.set_length(total as u64);
                bar.set_position(index as u64);
                bar.set_message(format!("Downloading {}", label));
            }
            None => println!("stc: Downloading {} ({}/{})", label, index + 1, total),
        }
    }

    /// Print above the bar without tearing it
    pub fn suspend<F: FnOnce()>(&self, f: F) {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_non_interactive() {
        let ctx = UiContext::non_interactive();
        let progress = ArtifactProgress::new(&ctx);
        progress.start(0, 2, "v1-x64");
        let mut called = false;
        progress.suspend(|| called = true);
        progress.finish();
        assert!(called);
    }
}
