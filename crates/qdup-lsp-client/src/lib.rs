//! Client lifecycle for the qDup language server.
//!
//! [`Extension`] is the host integration object: it resolves the server
//! command through [`qdup_lsp_locator::ServerLocator`], starts a
//! [`LanguageClient`] for it, and exposes explicit `activate`, `deactivate`
//! and `restart_server` operations. There is no ambient client handle; the
//! host owns the `Extension` and therefore the client.
//!
//! When no server can be found the extension stays loaded but inactive and
//! raises a single error notification through the [`Notifier`] seam, offering
//! to open the `qdup.lsp` settings.
//!
//! The [`adapter`] module provides [`adapter::ProcessLanguageClient`], which
//! spawns the resolved command and owns its stdio, performing the LSP
//! initialise and shutdown handshakes.

pub mod adapter;
mod client;
mod errors;
mod extension;
mod notify;
mod options;

#[cfg(test)]
mod tests;

pub use client::{ClientFactory, LanguageClient};
pub use errors::{ActivationError, CommandError};
pub use extension::{Activation, Extension, RESTART_SERVER_COMMAND};
pub use notify::{
    NotificationAction, Notifier, SERVER_NOT_FOUND_MESSAGE, TracingNotifier,
    notify_server_not_found,
};
pub use options::{
    CLIENT_ID, CLIENT_NAME, ClientOptions, LANGUAGE_ID, WATCHED_FILES_GLOB, file_uri,
};
