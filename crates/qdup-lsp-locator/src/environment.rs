//! Read-only view of the host filesystem and process environment.

use std::ffi::OsString;
use std::path::Path;

/// Answers the questions resolution asks about the machine.
///
/// Implementations must not mutate anything: resolution is a pure function
/// of configuration and this snapshot.
pub trait HostEnvironment {
    /// Returns whether something exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Reads an environment variable.
    fn var(&self, key: &str) -> Option<OsString>;
}

impl<T> HostEnvironment for &T
where
    T: HostEnvironment + ?Sized,
{
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn var(&self, key: &str) -> Option<OsString> {
        (**self).var(key)
    }
}

/// Environment backed by the real filesystem and process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl HostEnvironment for SystemEnvironment {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn var(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}
