//! Resolves the language server and runs it in the foreground.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use std::sync::Arc;

use ortho_config::OrthoError;
use qdup_lsp_client::{Notifier, TracingNotifier, notify_server_not_found};
use qdup_lsp_config::Config;
use qdup_lsp_locator::{
    HostEnvironment, LauncherProbe, ResolutionOutcome, ServerCommand, ServerLocator,
};
use thiserror::Error;
use tracing::{error, info};

use crate::bootstrap::{ConfigLoader, SystemConfigLoader};
use crate::telemetry::{self, TelemetryError};

pub(crate) const LAUNCH_TARGET: &str = "qdup_lsp_launch::launch";

/// Errors surfaced while launching the language server.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Config {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// No install directory was configured and the executable's own
    /// directory could not be determined.
    #[error("failed to determine the install directory: {source}")]
    InstallDir {
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
    /// No resolution tier produced a server command.
    #[error("no qDup language server found under '{}'", .install_dir.display())]
    ServerNotFound {
        /// Install directory that was searched.
        install_dir: PathBuf,
    },
    /// The server process could not be spawned.
    #[error("failed to start '{command}': {source}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
    /// Waiting for the server process failed.
    #[error("failed to wait for '{command}': {source}")]
    Wait {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

/// How the server process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerExit {
    code: Option<i32>,
}

impl ServerExit {
    /// Exit with the given status code; `None` means terminated by a signal.
    #[must_use]
    pub const fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// Raw status code, when the process exited normally.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        self.code
    }

    /// Exit code propagated by the launcher.
    ///
    /// Codes outside `0..=255` and signal terminations map to failure.
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        self.code
            .and_then(|code| u8::try_from(code).ok())
            .map_or(ExitCode::FAILURE, ExitCode::from)
    }
}

/// Runs a resolved server command to completion.
#[cfg_attr(test, mockall::automock)]
pub trait ServerRunner {
    /// Runs `command` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Spawn`] or [`LaunchError::Wait`].
    fn run(&self, command: &ServerCommand) -> Result<ServerExit, LaunchError>;
}

/// Runs the server with the launcher's own stdin, stdout and stderr, so the
/// editor talks to the server directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritedStdioRunner;

impl ServerRunner for InheritedStdioRunner {
    fn run(&self, command: &ServerCommand) -> Result<ServerExit, LaunchError> {
        let mut child = Command::new(command.command())
            .args(command.args())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                command: command.to_string(),
                source: Arc::new(source),
            })?;
        info!(target: LAUNCH_TARGET, pid = child.id(), %command, "language server started");

        let status = child.wait().map_err(|source| LaunchError::Wait {
            command: command.to_string(),
            source: Arc::new(source),
        })?;
        info!(target: LAUNCH_TARGET, ?status, "language server exited");
        Ok(ServerExit::new(status.code()))
    }
}

/// Picks the install directory: the configured one, else the directory
/// holding `current_exe`.
///
/// # Errors
///
/// Returns [`LaunchError::InstallDir`] when no directory is configured and
/// `current_exe` is an error or has no parent.
pub fn install_dir(
    config: &Config,
    current_exe: io::Result<PathBuf>,
) -> Result<PathBuf, LaunchError> {
    if let Some(dir) = config.install_dir() {
        return Ok(dir.to_path_buf());
    }
    let exe = current_exe.map_err(|source| LaunchError::InstallDir {
        source: Arc::new(source),
    })?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| LaunchError::InstallDir {
            source: Arc::new(io::Error::other(format!(
                "executable path '{}' has no parent directory",
                exe.display()
            ))),
        })
}

/// Resolves the server command and runs it.
///
/// When nothing is found the user is told once through `notifier`.
///
/// # Errors
///
/// Returns [`LaunchError::ServerNotFound`] when no tier matched, and the
/// runner's error when the server cannot be run.
pub fn launch<E, P>(
    config: &Config,
    install_dir: &Path,
    locator: &ServerLocator<E, P>,
    runner: &dyn ServerRunner,
    notifier: &dyn Notifier,
) -> Result<ServerExit, LaunchError>
where
    E: HostEnvironment,
    P: LauncherProbe,
{
    match locator.resolve(&config.resolution(), install_dir) {
        ResolutionOutcome::Found { tier, command } => {
            info!(target: LAUNCH_TARGET, %tier, %command, "launching language server");
            runner.run(&command)
        }
        ResolutionOutcome::NotFound => {
            notify_server_not_found(notifier);
            Err(LaunchError::ServerNotFound {
                install_dir: install_dir.to_path_buf(),
            })
        }
    }
}

/// Entry point of the `qdup-lsp` binary.
///
/// Errors raised before telemetry is installed are written to `stderr`;
/// later ones are logged.
pub fn run<I, T, W>(args: I, stderr: &mut W) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    W: Write,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    run_with(
        &SystemConfigLoader,
        &ServerLocator::system(),
        &InheritedStdioRunner,
        &args,
        stderr,
    )
}

/// [`run`] over explicit collaborators.
pub fn run_with<E, P, W>(
    loader: &dyn ConfigLoader,
    locator: &ServerLocator<E, P>,
    runner: &dyn ServerRunner,
    args: &[OsString],
    stderr: &mut W,
) -> ExitCode
where
    E: HostEnvironment,
    P: LauncherProbe,
    W: Write,
{
    let config = match loader.load(args) {
        Ok(config) => config,
        Err(source) => return report(stderr, &LaunchError::Config { source }),
    };
    if let Err(source) = telemetry::initialise(&config) {
        return report(stderr, &LaunchError::Telemetry { source });
    }

    let result = install_dir(&config, env::current_exe())
        .and_then(|dir| launch(&config, &dir, locator, runner, &TracingNotifier));
    match result {
        Ok(exit) => exit.exit_code(),
        Err(error) => {
            error!(target: LAUNCH_TARGET, %error, "qdup-lsp failed");
            ExitCode::FAILURE
        }
    }
}

fn report<W: Write>(stderr: &mut W, error: &LaunchError) -> ExitCode {
    // A closed stderr leaves nowhere else to report to.
    drop(writeln!(stderr, "qdup-lsp: {error}"));
    ExitCode::FAILURE
}
