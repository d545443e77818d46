use crate::logging::LogFormat;

/// Launcher executable probed when no `jbang_path` is configured.
pub const DEFAULT_LAUNCHER: &str = "jbang";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default launcher executable name.
#[must_use]
pub const fn default_launcher() -> &'static str {
    DEFAULT_LAUNCHER
}

/// Owned launcher name used where allocation is required (e.g. serde).
#[must_use]
pub fn default_launcher_string() -> String {
    DEFAULT_LAUNCHER.to_owned()
}

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
