//! Child process termination.

use std::process::Child;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

/// Log target for adapter operations.
pub(crate) const ADAPTER_TARGET: &str = "qdup_lsp_client::adapter";

/// Time a server gets to exit on its own after `exit` before it is killed.
const EXIT_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// Reaps `child`, killing it if it outlives the grace period.
///
/// `server` labels the process in log events.
pub(super) fn terminate_child(child: &mut Child, server: &str) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(target: ADAPTER_TARGET, server, ?status, "language server exited");
            return;
        }
        Ok(None) => {
            warn!(
                target: ADAPTER_TARGET,
                server,
                "language server did not exit gracefully, waiting before killing"
            );
        }
        Err(error) => {
            warn!(
                target: ADAPTER_TARGET,
                server,
                %error,
                "failed to check process status, waiting before killing"
            );
        }
    }

    thread::sleep(EXIT_GRACE_PERIOD);
    if let Ok(Some(status)) = child.try_wait() {
        debug!(
            target: ADAPTER_TARGET,
            server,
            ?status,
            "language server exited during grace period"
        );
        return;
    }
    kill_and_reap(child, server);
}

/// Kills `child` and waits for it so no zombie is left behind.
pub(super) fn kill_and_reap(child: &mut Child, server: &str) {
    if let Err(error) = child.kill() {
        warn!(
            target: ADAPTER_TARGET,
            server,
            %error,
            "failed to kill language server process"
        );
        return;
    }
    if let Err(error) = child.wait() {
        debug!(target: ADAPTER_TARGET, server, %error, "failed to reap language server process");
    }
}
