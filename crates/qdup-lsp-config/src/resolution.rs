//! Immutable settings snapshot handed to server resolution.

use std::path::{Path, PathBuf};

use crate::Config;
use crate::defaults::default_launcher_string;

/// Settings consulted while locating the language server.
///
/// Editors report unset string settings as empty strings, so empty values are
/// normalised to "not configured" on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionConfig {
    jar_path: Option<PathBuf>,
    java_home: Option<PathBuf>,
    launcher: String,
}

impl ResolutionConfig {
    /// Builds a snapshot with nothing configured and the default launcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            jar_path: None,
            java_home: None,
            launcher: default_launcher_string(),
        }
    }

    /// Sets the explicit server archive.
    #[must_use]
    pub fn with_jar_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.jar_path = non_empty(path.into());
        self
    }

    /// Sets the runtime home directory.
    #[must_use]
    pub fn with_java_home(mut self, path: impl Into<PathBuf>) -> Self {
        self.java_home = non_empty(path.into());
        self
    }

    /// Overrides the launcher executable name or path.
    #[must_use]
    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        let launcher = launcher.into();
        self.launcher = if launcher.trim().is_empty() {
            default_launcher_string()
        } else {
            launcher
        };
        self
    }

    /// Explicit server archive, when configured.
    #[must_use]
    pub fn jar_path(&self) -> Option<&Path> {
        self.jar_path.as_deref()
    }

    /// Runtime home directory, when configured.
    #[must_use]
    pub fn java_home(&self) -> Option<&Path> {
        self.java_home.as_deref()
    }

    /// Launcher executable name or path.
    #[must_use]
    pub fn launcher(&self) -> &str {
        self.launcher.as_str()
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Config> for ResolutionConfig {
    fn from(config: &Config) -> Self {
        let mut snapshot = Self::new().with_launcher(config.jbang_path());
        if let Some(path) = config.jar_path() {
            snapshot = snapshot.with_jar_path(path);
        }
        if let Some(path) = config.java_home() {
            snapshot = snapshot.with_java_home(path);
        }
        snapshot
    }
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}
