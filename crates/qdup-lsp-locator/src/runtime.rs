//! Java runtime discovery.

use std::path::{Path, PathBuf};

use qdup_lsp_config::ResolutionConfig;
use tracing::debug;

use crate::environment::HostEnvironment;

/// Tracing target for runtime discovery.
const RUNTIME_TARGET: &str = "qdup_lsp_locator::runtime";

/// Environment variable naming the default runtime home.
pub const JAVA_HOME_VAR: &str = "JAVA_HOME";

/// Bare runtime executable name, resolved by the OS at spawn time.
pub const RUNTIME_EXECUTABLE: &str = "java";

/// Builds `<home>/bin/java` (with the platform executable suffix).
#[must_use]
pub fn runtime_in_home(home: &Path) -> PathBuf {
    home.join("bin")
        .join(format!("{RUNTIME_EXECUTABLE}{}", std::env::consts::EXE_SUFFIX))
}

/// Picks the runtime used to launch a server archive.
///
/// Prefers the configured runtime home, then `JAVA_HOME`, each only when its
/// `bin/java` exists. Otherwise returns the bare `java` name and leaves the
/// lookup to the process spawner, so this never fails.
pub fn find_runtime<E>(config: &ResolutionConfig, environment: &E) -> PathBuf
where
    E: HostEnvironment + ?Sized,
{
    if let Some(home) = config.java_home() {
        let candidate = runtime_in_home(home);
        if environment.exists(&candidate) {
            debug!(
                target: RUNTIME_TARGET,
                runtime = %candidate.display(),
                "using runtime from configured home"
            );
            return candidate;
        }
        debug!(
            target: RUNTIME_TARGET,
            home = %home.display(),
            "configured runtime home has no java executable"
        );
    }

    if let Some(home) = environment
        .var(JAVA_HOME_VAR)
        .filter(|value| !value.is_empty())
    {
        let candidate = runtime_in_home(Path::new(&home));
        if environment.exists(&candidate) {
            debug!(
                target: RUNTIME_TARGET,
                runtime = %candidate.display(),
                "using runtime from {JAVA_HOME_VAR}"
            );
            return candidate;
        }
    }

    debug!(
        target: RUNTIME_TARGET,
        "falling back to {RUNTIME_EXECUTABLE} on the search path"
    );
    PathBuf::from(RUNTIME_EXECUTABLE)
}
