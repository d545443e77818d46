//! Internal state of the server process.

use std::process::Child;

use super::transport::StdioTransport;

/// Lifecycle state of a [`super::ProcessLanguageClient`].
pub enum ProcessState {
    /// The process has not been started.
    NotStarted,
    /// The process is running and initialised.
    Running {
        /// Child process handle.
        child: Child,
        /// Transport over the child's stdio.
        transport: StdioTransport,
    },
    /// The process has been stopped; it may be started again.
    Stopped,
}

impl ProcessState {
    /// Short name used in logs and `Debug` output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running { .. } => "running",
            Self::Stopped => "stopped",
        }
    }
}
