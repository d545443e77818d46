//! Standalone launcher for the qDup language server.
//!
//! The `qdup-lsp` binary loads the layered configuration, installs stderr
//! telemetry, resolves the server command with
//! [`qdup_lsp_locator::ServerLocator`], and runs it with inherited stdio. An
//! editor can therefore point its generic LSP client at `qdup-lsp` and get
//! the same fallback order as the editor extension. The server's exit code
//! becomes the launcher's.

mod bootstrap;
mod launch;
mod telemetry;

pub use bootstrap::{ConfigLoader, StaticConfigLoader, SystemConfigLoader};
pub use launch::{
    InheritedStdioRunner, LaunchError, ServerExit, ServerRunner, install_dir, launch, run,
    run_with,
};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};

#[cfg(test)]
mod tests;
