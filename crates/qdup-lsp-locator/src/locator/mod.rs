//! Priority-ordered server resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use qdup_lsp_config::ResolutionConfig;
use tracing::{debug, info, warn};

use crate::command::ServerCommand;
use crate::environment::{HostEnvironment, SystemEnvironment};
use crate::probe::{LauncherProbe, SystemLauncherProbe};
use crate::runtime::find_runtime;

/// Tracing target for resolution.
const RESOLVE_TARGET: &str = "qdup_lsp_locator::resolve";

/// Directory under the install root that holds bundled server artefacts.
pub const SERVER_DIR: &str = "server";

/// File name of the bundled server archive.
pub const BUNDLED_ARCHIVE: &str = "qDup-lsp.jar";

/// File name of the bundled server script run through the launcher.
pub const BUNDLED_SCRIPT: &str = "qdup-lsp.java";

/// Path of the bundled archive below `install_dir`.
#[must_use]
pub fn bundled_archive_path(install_dir: &Path) -> PathBuf {
    install_dir.join(SERVER_DIR).join(BUNDLED_ARCHIVE)
}

/// Path of the bundled script below `install_dir`.
#[must_use]
pub fn bundled_script_path(install_dir: &Path) -> PathBuf {
    install_dir.join(SERVER_DIR).join(BUNDLED_SCRIPT)
}

/// Candidate strategies, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResolutionTier {
    /// Archive named by the `jar_path` setting.
    ExplicitArchive,
    /// Archive shipped in the install directory.
    BundledArchive,
    /// Script shipped in the install directory, run by the launcher.
    BundledScript,
}

impl ResolutionTier {
    /// Every tier, highest priority first.
    pub const ALL: [Self; 3] = [
        Self::ExplicitArchive,
        Self::BundledArchive,
        Self::BundledScript,
    ];

    /// Stable identifier used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExplicitArchive => "explicit_archive",
            Self::BundledArchive => "bundled_archive",
            Self::BundledScript => "bundled_script",
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Result of a resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// A tier produced a runnable command.
    Found {
        /// Tier that won.
        tier: ResolutionTier,
        /// Command to spawn.
        command: ServerCommand,
    },
    /// No tier matched; the user should be told how to configure a server.
    NotFound,
}

impl ResolutionOutcome {
    /// Returns the command when one was found.
    #[must_use]
    pub const fn command(&self) -> Option<&ServerCommand> {
        match self {
            Self::Found { command, .. } => Some(command),
            Self::NotFound => None,
        }
    }

    /// Returns the winning tier when one was found.
    #[must_use]
    pub const fn tier(&self) -> Option<ResolutionTier> {
        match self {
            Self::Found { tier, .. } => Some(*tier),
            Self::NotFound => None,
        }
    }

    /// Consumes the outcome, yielding the command when one was found.
    #[must_use]
    pub fn into_command(self) -> Option<ServerCommand> {
        match self {
            Self::Found { command, .. } => Some(command),
            Self::NotFound => None,
        }
    }
}

/// Resolves the server command from configuration and a machine snapshot.
#[derive(Debug, Clone)]
pub struct ServerLocator<E, P> {
    environment: E,
    probe: P,
}

impl ServerLocator<SystemEnvironment, SystemLauncherProbe> {
    /// Locator backed by the real filesystem, environment and search path.
    #[must_use]
    pub const fn system() -> Self {
        Self::new(SystemEnvironment, SystemLauncherProbe)
    }
}

impl<E, P> ServerLocator<E, P> {
    /// Creates a locator over the supplied collaborators.
    #[must_use]
    pub const fn new(environment: E, probe: P) -> Self {
        Self { environment, probe }
    }

    /// The environment view used for existence checks.
    #[must_use]
    pub const fn environment(&self) -> &E {
        &self.environment
    }
}

impl<E, P> ServerLocator<E, P>
where
    E: HostEnvironment,
    P: LauncherProbe,
{
    /// Walks the tiers in priority order and returns the first match.
    ///
    /// Later tiers are not inspected once an earlier one matches. The
    /// launcher is only probed when the bundled script exists.
    pub fn resolve(&self, config: &ResolutionConfig, install_dir: &Path) -> ResolutionOutcome {
        for tier in ResolutionTier::ALL {
            if let Some(command) = self.try_tier(tier, config, install_dir) {
                info!(
                    target: RESOLVE_TARGET,
                    tier = %tier,
                    command = %command,
                    "resolved language server command"
                );
                return ResolutionOutcome::Found { tier, command };
            }
        }

        warn!(
            target: RESOLVE_TARGET,
            install_dir = %install_dir.display(),
            "no language server candidate matched"
        );
        ResolutionOutcome::NotFound
    }

    /// Picks the runtime that would launch an archive.
    pub fn find_runtime(&self, config: &ResolutionConfig) -> PathBuf {
        find_runtime(config, &self.environment)
    }

    fn try_tier(
        &self,
        tier: ResolutionTier,
        config: &ResolutionConfig,
        install_dir: &Path,
    ) -> Option<ServerCommand> {
        match tier {
            ResolutionTier::ExplicitArchive => {
                let archive = config.jar_path()?;
                self.archive_command(tier, archive, config)
            }
            ResolutionTier::BundledArchive => {
                let archive = bundled_archive_path(install_dir);
                self.archive_command(tier, &archive, config)
            }
            ResolutionTier::BundledScript => {
                let script = bundled_script_path(install_dir);
                if !self.present(tier, &script) {
                    return None;
                }
                let launcher = config.launcher();
                if self.probe.is_on_search_path(launcher) {
                    Some(ServerCommand::script(launcher, &script))
                } else {
                    debug!(
                        target: RESOLVE_TARGET,
                        tier = %tier,
                        launcher,
                        "bundled script present but launcher is not on the search path"
                    );
                    None
                }
            }
        }
    }

    fn archive_command(
        &self,
        tier: ResolutionTier,
        archive: &Path,
        config: &ResolutionConfig,
    ) -> Option<ServerCommand> {
        self.present(tier, archive)
            .then(|| ServerCommand::archive(self.find_runtime(config), archive))
    }

    /// Arguments are passed on as UTF-8 text, so a candidate whose path is
    /// not valid UTF-8 could not be named faithfully and counts as absent.
    fn present(&self, tier: ResolutionTier, path: &Path) -> bool {
        if path.to_str().is_none() {
            warn!(
                target: RESOLVE_TARGET,
                tier = %tier,
                path = %path.display(),
                "skipping candidate whose path is not valid UTF-8"
            );
            return false;
        }
        let exists = self.environment.exists(path);
        debug!(
            target: RESOLVE_TARGET,
            tier = %tier,
            path = %path.display(),
            exists,
            "checked resolution candidate"
        );
        exists
    }
}
