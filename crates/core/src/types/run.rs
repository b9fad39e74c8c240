//! Outcome of one invocation

/// Everything the process wrapper needs to finish a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub exit_code: i32,
    /// Rendered mapping, written verbatim to stdout
    pub stdout: String,
    /// Diagnostic lines, each written to stderr with a trailing newline
    pub stderr: Vec<String>,
}

impl RunResult {
    #[must_use]
    pub fn success(stdout: impl Into<String>, stderr: Vec<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr,
        }
    }

    /// A failed run never carries stdout
    #[must_use]
    pub fn failure(exit_code: i32, stderr: Vec<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
