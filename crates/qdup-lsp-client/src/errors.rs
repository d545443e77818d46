//! Error types surfaced by the extension.

use thiserror::Error;

use crate::adapter::ClientError;

/// Errors returned by [`crate::Extension::activate`].
///
/// A missing server is not an error: it yields
/// [`crate::Activation::ServerNotFound`] and a user notification.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// The extension already owns a running client.
    #[error("extension is already active; deactivate it first")]
    AlreadyActive,

    /// The server was found but the client failed to start.
    #[error("failed to start language client: {source}")]
    ClientStart {
        /// Underlying client error.
        #[source]
        source: ClientError,
    },
}

/// Errors returned by [`crate::Extension::execute_command`].
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command identifier is not registered by the extension.
    #[error("unknown command '{command}'")]
    Unknown {
        /// Identifier that was invoked.
        command: String,
    },

    /// The command reached the client and the client failed.
    #[error("command failed: {0}")]
    Client(#[from] ClientError),
}
