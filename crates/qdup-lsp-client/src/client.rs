//! Seams between the extension and the language client implementation.

use lsp_types::FileEvent;
use qdup_lsp_locator::ServerCommand;
use serde_json::Value;

use crate::adapter::ClientError;
use crate::options::ClientOptions;

/// A connection to one language server process.
///
/// The extension only drives the lifecycle; protocol traffic beyond the
/// lifecycle handshakes goes through [`LanguageClient::request`] and
/// [`LanguageClient::notify`].
pub trait LanguageClient {
    /// Starts the server and completes the initialise handshake.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the process cannot be spawned or the
    /// handshake fails.
    fn start(&mut self) -> Result<(), ClientError>;

    /// Shuts the server down. Stopping a client that is not running is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when shutdown could not be attempted.
    fn stop(&mut self) -> Result<(), ClientError>;

    /// Stops and starts the server again.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`LanguageClient::stop`] and
    /// [`LanguageClient::start`].
    fn restart(&mut self) -> Result<(), ClientError> {
        self.stop()?;
        self.start()
    }

    /// Returns whether the server process is running.
    fn is_running(&self) -> bool;

    /// Sends a request and returns the raw result (`null` when absent).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the client is not running, the
    /// transport fails, or the server answers with an error.
    fn request(&mut self, method: &str, params: Value) -> Result<Value, ClientError>;

    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the client is not running or the
    /// transport fails.
    fn notify(&mut self, method: &str, params: Value) -> Result<(), ClientError>;

    /// Forwards watched-file changes as `workspace/didChangeWatchedFiles`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the notification cannot be sent.
    fn did_change_watched_files(&mut self, changes: Vec<FileEvent>) -> Result<(), ClientError>;
}

/// Builds clients for resolved server commands.
pub trait ClientFactory {
    /// Creates a client that will run `command` once started.
    fn create(&self, command: ServerCommand, options: &ClientOptions) -> Box<dyn LanguageClient>;
}
