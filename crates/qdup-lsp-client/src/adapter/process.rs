//! Process-backed language client owning the server's stdio.

use std::fmt;
use std::io;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use qdup_lsp_locator::ServerCommand;
use tracing::debug;

use super::error::ClientError;
use super::lifecycle::{ADAPTER_TARGET, kill_and_reap, terminate_child};
use super::messaging::{send_notification, send_request};
use super::state::ProcessState;
use super::transport::StdioTransport;
use crate::client::{ClientFactory, LanguageClient};
use crate::options::ClientOptions;

/// A language client that spawns the resolved server command and speaks
/// JSON-RPC 2.0 over its stdin and stdout.
///
/// The server's stderr is inherited so its diagnostics reach the host log.
pub struct ProcessLanguageClient {
    command: ServerCommand,
    options: ClientOptions,
    state: Mutex<ProcessState>,
}

impl ProcessLanguageClient {
    /// Creates a client for `command`. Nothing is spawned until
    /// [`LanguageClient::start`].
    #[must_use]
    pub const fn new(command: ServerCommand, options: ClientOptions) -> Self {
        Self {
            command,
            options,
            state: Mutex::new(ProcessState::NotStarted),
        }
    }

    /// Command the client runs.
    #[must_use]
    pub const fn command(&self) -> &ServerCommand {
        &self.command
    }

    /// Options announced to the server.
    #[must_use]
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Label identifying the server process in logs.
    pub(super) fn label(&self) -> String {
        self.command.command().display().to_string()
    }

    /// Locks the process state, recovering from poisoning so shutdown still
    /// works after a panic.
    pub(super) fn state(&self) -> MutexGuard<'_, ProcessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawns the server process with piped stdin and stdout.
    pub(super) fn spawn_process(&self) -> Result<(Child, StdioTransport), ClientError> {
        debug!(
            target: ADAPTER_TARGET,
            client = self.options.id(),
            command = %self.command,
            "spawning language server process"
        );

        let mut child = Command::new(self.command.command())
            .args(self.command.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            kill_and_reap(&mut child, &self.label());
            return Err(ClientError::SpawnFailed {
                message: format!("failed to capture stdio of {}", self.label()),
                source: Arc::new(io::Error::other("stdio not piped")),
            });
        };

        debug!(
            target: ADAPTER_TARGET,
            client = self.options.id(),
            pid = child.id(),
            "language server process spawned"
        );
        Ok((child, StdioTransport::new(stdout, stdin)))
    }

    fn spawn_error(&self, source: io::Error) -> ClientError {
        if source.kind() == io::ErrorKind::NotFound {
            ClientError::BinaryNotFound {
                command: self.label(),
                source: Arc::new(source),
            }
        } else {
            ClientError::SpawnFailed {
                message: format!("failed to start {}", self.label()),
                source: Arc::new(source),
            }
        }
    }

    /// Runs `f` against the transport of the running process.
    pub(super) fn with_running_transport<F, T>(&self, f: F) -> Result<T, ClientError>
    where
        F: FnOnce(&mut StdioTransport) -> Result<T, ClientError>,
    {
        match &mut *self.state() {
            ProcessState::Running { transport, .. } => f(transport),
            ProcessState::NotStarted | ProcessState::Stopped => Err(ClientError::NotRunning),
        }
    }

    /// Records a spawned and initialised process as running.
    pub(super) fn set_running_state(&self, child: Child, transport: StdioTransport) {
        *self.state() = ProcessState::Running { child, transport };
    }

    /// Performs the LSP shutdown handshake and reaps the process.
    ///
    /// Sends a `shutdown` request followed by an `exit` notification; failures
    /// of either are logged, and the process is killed if it does not exit
    /// within the grace period. Shutting down a client that is not running is
    /// a no-op.
    pub fn shutdown(&self) {
        let mut state = self.state();
        let ProcessState::Running {
            mut child,
            mut transport,
        } = std::mem::replace(&mut *state, ProcessState::Stopped)
        else {
            debug!(target: ADAPTER_TARGET, client = self.options.id(), "client not running");
            return;
        };
        drop(state);

        debug!(
            target: ADAPTER_TARGET,
            client = self.options.id(),
            "initiating graceful shutdown"
        );
        if let Err(error) = send_request(&mut transport, "shutdown", ()) {
            debug!(target: ADAPTER_TARGET, operation = "shutdown", ?error, "shutdown request failed");
        }
        if let Err(error) = send_notification(&mut transport, "exit", ()) {
            debug!(target: ADAPTER_TARGET, operation = "exit", ?error, "exit notification failed");
        }
        // Closing stdin lets servers that wait for EOF exit too.
        drop(transport);
        terminate_child(&mut child, &self.label());
    }
}

impl Drop for ProcessLanguageClient {
    fn drop(&mut self) {
        if let ProcessState::Running { mut child, .. } =
            std::mem::replace(&mut *self.state(), ProcessState::Stopped)
        {
            kill_and_reap(&mut child, &self.label());
        }
    }
}

impl fmt::Debug for ProcessLanguageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state.try_lock() {
            Ok(guard) => match &*guard {
                ProcessState::Running { child, .. } => format!("running (pid: {})", child.id()),
                other => other.name().to_owned(),
            },
            Err(_) => String::from("locked"),
        };
        f.debug_struct("ProcessLanguageClient")
            .field("command", &self.command)
            .field("state", &state)
            .finish_non_exhaustive()
    }
}

/// Factory producing [`ProcessLanguageClient`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessClientFactory;

impl ClientFactory for ProcessClientFactory {
    fn create(&self, command: ServerCommand, options: &ClientOptions) -> Box<dyn LanguageClient> {
        Box::new(ProcessLanguageClient::new(command, options.clone()))
    }
}
