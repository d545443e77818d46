//! Shared configuration for the qDup language server integration.
//!
//! Settings live under a single group (`qdup.lsp` in editor terms) and are
//! layered by `ortho_config`: built-in defaults, then a TOML file named by
//! `--config-path` or `QDUP_LSP_CONFIG_PATH`, then `QDUP_LSP_*` environment
//! variables, then command-line flags. The server locator never reads
//! [`Config`] directly; it takes the immutable [`ResolutionConfig`] snapshot
//! produced by [`Config::resolution`].

mod defaults;
mod logging;
mod resolution;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LAUNCHER, DEFAULT_LOG_FILTER, default_launcher, default_launcher_string,
    default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use ortho_config::{OrthoConfig, OrthoError};
pub use resolution::ResolutionConfig;

/// Editor settings group holding every user-facing key.
pub const SETTINGS_SECTION: &str = "qdup.lsp";

/// Environment variable prefix used by the layered loader.
pub const ENV_PREFIX: &str = "QDUP_LSP_";

/// Layered configuration for the language server integration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "QDUP_LSP")]
pub struct Config {
    /// Explicit path to a server archive (`qdup.lsp.jarPath`).
    #[serde(default)]
    pub jar_path: Option<PathBuf>,
    /// Runtime home whose `bin` directory holds `java` (`qdup.lsp.javaHome`).
    #[serde(default)]
    pub java_home: Option<PathBuf>,
    /// Launcher used to run the bundled server script (`qdup.lsp.jbangPath`).
    #[serde(default = "defaults::default_launcher_string")]
    #[ortho_config(default = defaults::default_launcher_string())]
    pub jbang_path: String,
    /// Directory holding the bundled `server/` artefacts.
    #[serde(default)]
    pub install_dir: Option<PathBuf>,
    /// Tracing filter expression applied to the binary's logs.
    #[serde(default = "defaults::default_log_filter_string")]
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format for the binary's logs.
    #[serde(default = "defaults::default_log_format")]
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Config {
    /// Explicit server archive, when configured.
    #[must_use]
    pub fn jar_path(&self) -> Option<&Path> {
        self.jar_path.as_deref()
    }

    /// Configured runtime home, when set.
    #[must_use]
    pub fn java_home(&self) -> Option<&Path> {
        self.java_home.as_deref()
    }

    /// Launcher executable name or path.
    #[must_use]
    pub fn jbang_path(&self) -> &str {
        self.jbang_path.as_str()
    }

    /// Configured install directory, when set.
    #[must_use]
    pub fn install_dir(&self) -> Option<&Path> {
        self.install_dir.as_deref()
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Takes the read-only snapshot consumed by server resolution.
    #[must_use]
    pub fn resolution(&self) -> ResolutionConfig {
        ResolutionConfig::from(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jar_path: None,
            java_home: None,
            jbang_path: default_launcher_string(),
            install_dir: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}
