//! UI context for detecting interactive vs captured output

use std::io::IsTerminal;

/// Set by npm, yarn and pnpm while running lifecycle scripts
const LIFECYCLE_VAR: &str = "npm_lifecycle_event";

const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TF_BUILD",
];

/// Determines whether output may use spinners, colors and redraws
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(std::io::stdout().is_terminal(), |name| {
                std::env::var_os(name).is_some()
            }),
        }
    }

    /// Create a non-interactive context (for testing or explicit CI mode)
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Whether to use fancy output (spinners, colors)
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    fn detect_interactive(is_terminal: bool, is_set: impl Fn(&str) -> bool) -> bool {
        if !is_terminal {
            return false;
        }

        // Hook output is usually captured and replayed by the package manager
        if is_set(LIFECYCLE_VAR) {
            return false;
        }

        !CI_VARS.iter().any(|&var| is_set(var))
    }
}
