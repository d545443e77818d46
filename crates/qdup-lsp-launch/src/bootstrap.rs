//! Configuration loading seam.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::OrthoError;
use qdup_lsp_config::{Config, OrthoConfig};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader {
    /// Loads the configuration, treating `args` as the process arguments
    /// (program name first).
    ///
    /// # Errors
    ///
    /// Returns the loader's [`OrthoError`] when a layer fails to parse.
    fn load(&self, args: &[OsString]) -> Result<Config, Arc<OrthoError>>;
}

/// Loader merging defaults, config file, environment and `args`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter(args.iter().cloned())
    }
}

/// Loader returning a fixed configuration and ignoring `args`.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Creates a loader that always yields `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}
