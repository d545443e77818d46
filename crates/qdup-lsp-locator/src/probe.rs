//! Search-path probe for the script launcher.

use std::process::{Command, Stdio};

use tracing::debug;

/// Tracing target for probe operations.
const PROBE_TARGET: &str = "qdup_lsp_locator::probe";

/// Decides whether an executable can be found on the system search path.
///
/// The answer is a plain boolean: failures to run the probe itself count as
/// "not found" and never reach the caller as errors.
#[cfg_attr(test, mockall::automock)]
pub trait LauncherProbe {
    /// Returns whether `name` resolves to an executable.
    fn is_on_search_path(&self, name: &str) -> bool;
}

impl<T> LauncherProbe for &T
where
    T: LauncherProbe + ?Sized,
{
    fn is_on_search_path(&self, name: &str) -> bool {
        (**self).is_on_search_path(name)
    }
}

/// Probe that asks the platform's locate-executable tool.
///
/// Runs `which <name>` (`where <name>` on Windows) with all standard streams
/// discarded and treats exit status zero as success.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncherProbe;

impl LauncherProbe for SystemLauncherProbe {
    fn is_on_search_path(&self, name: &str) -> bool {
        let tool = search_tool();
        let status = Command::new(tool)
            .arg(name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => {
                debug!(target: PROBE_TARGET, tool, name, "launcher found on search path");
                true
            }
            Ok(status) => {
                debug!(
                    target: PROBE_TARGET,
                    tool,
                    name,
                    code = ?status.code(),
                    "launcher not found on search path"
                );
                false
            }
            Err(error) => {
                debug!(
                    target: PROBE_TARGET,
                    tool,
                    name,
                    %error,
                    "search path probe could not run"
                );
                false
            }
        }
    }
}

/// Name of the platform tool used to locate executables.
#[must_use]
pub const fn search_tool() -> &'static str {
    if cfg!(windows) { "where" } else { "which" }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn search_tool_matches_platform() {
        let expected = if cfg!(windows) { "where" } else { "which" };

        assert_eq!(search_tool(), expected);
    }

    #[rstest]
    fn unknown_executables_are_not_found() {
        let probe = SystemLauncherProbe;

        assert!(!probe.is_on_search_path("qdup-lsp-definitely-missing-launcher"));
    }
}
