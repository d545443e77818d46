//! Locates a runnable command for the qDup language server.
//!
//! Resolution walks a fixed priority chain and stops at the first tier that
//! yields a candidate:
//!
//! 1. an explicitly configured server archive, run by a Java runtime;
//! 2. the archive bundled under `<install_dir>/server/`;
//! 3. the source script bundled next to it, run by the JBang launcher when
//!    that launcher is on the search path.
//!
//! When no tier matches the outcome is [`ResolutionOutcome::NotFound`]; the
//! caller decides how to tell the user. Existence checks are presence tests
//! only, so an empty or unreadable archive still counts as found.
//!
//! The filesystem and environment view ([`HostEnvironment`]) and the launcher
//! probe ([`LauncherProbe`]) are injected so tests can describe a machine
//! without touching the real one.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use qdup_lsp_config::ResolutionConfig;
//! use qdup_lsp_locator::{ResolutionOutcome, ServerLocator};
//!
//! let locator = ServerLocator::system();
//! let config = ResolutionConfig::new().with_jar_path("/opt/qdup/qDup-lsp.jar");
//! match locator.resolve(&config, Path::new("/opt/qdup-editor")) {
//!     ResolutionOutcome::Found { command, .. } => println!("{command}"),
//!     ResolutionOutcome::NotFound => eprintln!("no server available"),
//! }
//! ```

mod command;
mod environment;
mod locator;
mod probe;
mod runtime;

#[cfg(test)]
mod tests;

pub use command::ServerCommand;
pub use environment::{HostEnvironment, SystemEnvironment};
pub use locator::{
    BUNDLED_ARCHIVE, BUNDLED_SCRIPT, ResolutionOutcome, ResolutionTier, SERVER_DIR,
    ServerLocator, bundled_archive_path, bundled_script_path,
};
pub use probe::{LauncherProbe, SystemLauncherProbe, search_tool};
pub use runtime::{JAVA_HOME_VAR, RUNTIME_EXECUTABLE, find_runtime, runtime_in_home};
