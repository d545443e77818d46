//! The command produced by a successful resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Executable and arguments used to start the language server.
///
/// Built once by the locator and consumed once by whichever component spawns
/// the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCommand {
    command: PathBuf,
    args: Vec<String>,
}

impl ServerCommand {
    /// Creates a command from an executable and its arguments.
    #[must_use]
    pub fn new(command: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Runs `archive` with `runtime -jar <archive>`.
    ///
    /// `archive` is expected to be valid UTF-8; other bytes are replaced.
    #[must_use]
    pub fn archive(runtime: impl Into<PathBuf>, archive: &Path) -> Self {
        Self::new(
            runtime,
            vec![
                String::from("-jar"),
                archive.to_string_lossy().into_owned(),
            ],
        )
    }

    /// Runs `script` with `launcher <script>`.
    ///
    /// `script` is expected to be valid UTF-8; other bytes are replaced.
    #[must_use]
    pub fn script(launcher: &str, script: &Path) -> Self {
        Self::new(launcher, vec![script.to_string_lossy().into_owned()])
    }

    /// The executable path or bare command name.
    #[must_use]
    pub fn command(&self) -> &Path {
        self.command.as_path()
    }

    /// Arguments in the order they are passed to the executable.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

}

impl fmt::Display for ServerCommand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.command.display())?;
        for arg in &self.args {
            write!(formatter, " {arg}")?;
        }
        Ok(())
    }
}
