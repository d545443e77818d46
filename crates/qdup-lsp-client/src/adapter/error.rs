//! Error types for the process-backed language client.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use super::jsonrpc::JsonRpcError;

/// Errors raised while owning and talking to the server process.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server executable was not found.
    #[error("language server binary not found: {command}")]
    BinaryNotFound {
        /// Command that was not found.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Spawning the server process failed for another reason.
    #[error("failed to spawn language server process: {message}")]
    SpawnFailed {
        /// Description of the spawn failure.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON serialisation or deserialisation failed.
    #[error("JSON codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The server answered with an error response.
    #[error("server returned error: {message} (code: {code})")]
    ServerError {
        /// JSON-RPC error code.
        code: i64,
        /// Error message from the server.
        message: String,
    },

    /// The initialise handshake did not complete.
    #[error("initialization failed: {message}")]
    InitializationFailed {
        /// Description of the failure.
        message: String,
    },

    /// No matching response arrived within the bounded read loop.
    #[error("no response for request {request_id} after reading the maximum number of messages")]
    MaxResponseIterations {
        /// Identifier of the unanswered request.
        request_id: i64,
    },

    /// The client has not been started or was stopped.
    #[error("language server is not running")]
    NotRunning,
}

impl ClientError {
    /// Creates a server error from a JSON-RPC error object.
    #[must_use]
    pub fn from_jsonrpc(error: JsonRpcError) -> Self {
        Self::ServerError {
            code: error.code,
            message: error.message,
        }
    }
}

/// Transport-layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The header block carried no `Content-Length`.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// A header line was malformed.
    #[error("invalid header format")]
    InvalidHeader,
}
