//! UI context for detecting interactive vs lifecycle environments

use std::io::IsTerminal;

/// UI context that determines output behavior
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    /// Whether running in an interactive terminal
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(),
        }
    }

    /// Create a non-interactive context (for testing or lifecycle runs)
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Check if we should use fancy output (spinners, colors)
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    /// Detect if running in an interactive environment
    fn detect_interactive() -> bool {
        if !std::io::stderr().is_terminal() {
            return false;
        }

        if std::env::var("CI").is_ok() {
            return false;
        }

        // Set by the CNB lifecycle for every buildpack invocation
        let lifecycle_vars = ["CNB_LAYERS_DIR", "CNB_PLATFORM_DIR", "CNB_STACK_ID"];
        !lifecycle_vars.iter().any(|var| std::env::var(var).is_ok())
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::non_interactive()
    }
}
