//! [`LanguageClient`] implementation for [`ProcessLanguageClient`].

use std::io::{Read, Write};

use lsp_types::{
    ClientCapabilities, ClientInfo, DidChangeWatchedFilesClientCapabilities,
    DidChangeWatchedFilesParams, FileEvent, InitializeParams, InitializeResult, InitializedParams,
    WorkspaceClientCapabilities,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::ClientError;
use super::lifecycle::{ADAPTER_TARGET, kill_and_reap};
use super::messaging::{send_notification, send_request, send_typed_request};
use super::process::ProcessLanguageClient;
use super::state::ProcessState;
use super::transport::StdioTransport;
use crate::client::LanguageClient;
use crate::options::ClientOptions;

impl LanguageClient for ProcessLanguageClient {
    fn start(&mut self) -> Result<(), ClientError> {
        if matches!(*self.state(), ProcessState::Running { .. }) {
            debug!(target: ADAPTER_TARGET, client = self.options().id(), "client already running");
            return Ok(());
        }

        let (mut child, mut transport) = self.spawn_process()?;
        match initialize(&mut transport, self.options()) {
            Ok(result) => {
                info!(
                    target: ADAPTER_TARGET,
                    client = self.options().id(),
                    server = result.server_info.as_ref().map_or("unknown", |info| info.name.as_str()),
                    "language server initialised"
                );
                self.set_running_state(child, transport);
                Ok(())
            }
            Err(error) => {
                warn!(
                    target: ADAPTER_TARGET,
                    client = self.options().id(),
                    %error,
                    "initialisation handshake failed"
                );
                kill_and_reap(&mut child, &self.label());
                *self.state() = ProcessState::Stopped;
                Err(error)
            }
        }
    }

    fn stop(&mut self) -> Result<(), ClientError> {
        self.shutdown();
        Ok(())
    }

    fn is_running(&self) -> bool {
        match &mut *self.state() {
            ProcessState::Running { child, .. } => matches!(child.try_wait(), Ok(None)),
            ProcessState::NotStarted | ProcessState::Stopped => false,
        }
    }

    fn request(&mut self, method: &str, params: Value) -> Result<Value, ClientError> {
        self.with_running_transport(|transport| send_request(transport, method, params))
    }

    fn notify(&mut self, method: &str, params: Value) -> Result<(), ClientError> {
        self.with_running_transport(|transport| send_notification(transport, method, params))
    }

    fn did_change_watched_files(&mut self, changes: Vec<FileEvent>) -> Result<(), ClientError> {
        let params = DidChangeWatchedFilesParams { changes };
        self.with_running_transport(|transport| {
            send_notification(transport, "workspace/didChangeWatchedFiles", params)
        })
    }
}

/// Runs the `initialize` request and `initialized` notification.
pub(super) fn initialize<R: Read, W: Write>(
    transport: &mut StdioTransport<R, W>,
    options: &ClientOptions,
) -> Result<InitializeResult, ClientError> {
    let result: InitializeResult =
        send_typed_request(transport, "initialize", initialize_params(options))?;
    send_notification(transport, "initialized", InitializedParams {})?;
    Ok(result)
}

/// Parameters announcing the client identity and its watched-file support.
pub(super) fn initialize_params(options: &ClientOptions) -> InitializeParams {
    InitializeParams {
        process_id: Some(std::process::id()),
        client_info: Some(ClientInfo {
            name: options.name().to_owned(),
            version: Some(env!("CARGO_PKG_VERSION").to_owned()),
        }),
        capabilities: ClientCapabilities {
            workspace: Some(WorkspaceClientCapabilities {
                did_change_watched_files: Some(DidChangeWatchedFilesClientCapabilities {
                    dynamic_registration: Some(false),
                    relative_pattern_support: Some(false),
                }),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}
