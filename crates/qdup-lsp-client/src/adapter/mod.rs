//! Process-backed language client.
//!
//! [`ProcessLanguageClient`] spawns a resolved
//! [`ServerCommand`](qdup_lsp_locator::ServerCommand) and talks JSON-RPC 2.0
//! to it over stdio with LSP header framing. It owns the child process: the
//! `initialize`/`initialized` handshake on start, `shutdown`/`exit` on stop,
//! and a kill on drop.
//!
//! - [`ClientError`] and [`TransportError`]: failures while owning the process
//! - [`JsonRpcRequest`], [`JsonRpcResponse`], [`JsonRpcMessage`]: message types
//! - [`StdioTransport`]: `Content-Length` framed transport
//! - [`ProcessClientFactory`]: the [`ClientFactory`](crate::ClientFactory)
//!   used by [`Extension::system`](crate::Extension::system)
//!
//! Server-initiated requests received while waiting for a response are
//! answered: capability registration and progress creation are
//! acknowledged, `workspace/configuration` gets one `null` per item, and
//! anything else is rejected with "method not found".

mod error;
mod jsonrpc;
mod lifecycle;
mod messaging;
mod process;
mod state;
mod trait_impl;
mod transport;

pub use error::{ClientError, TransportError};
pub use jsonrpc::{
    JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    METHOD_NOT_FOUND, ServerRequest,
};
pub use process::{ProcessClientFactory, ProcessLanguageClient};
pub use state::ProcessState;
pub use transport::StdioTransport;
