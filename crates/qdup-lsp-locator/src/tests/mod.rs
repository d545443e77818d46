//! Crate-level test doubles and behaviour tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::environment::HostEnvironment;
use crate::probe::LauncherProbe;


/// In-memory machine: a set of existing paths plus environment variables.
///
/// Every existence check is recorded so tests can assert which candidates
/// resolution looked at.
#[derive(Debug, Default)]
pub(crate) struct FakeEnvironment {
    paths: HashSet<PathBuf>,
    vars: HashMap<String, OsString>,
    checked: RefCell<Vec<PathBuf>>,
}

impl FakeEnvironment {
    pub(crate) fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_path(path);
        self
    }

    pub(crate) fn with_var(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.set_var(key, value);
        self
    }

    pub(crate) fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.paths.insert(path.into());
    }

    pub(crate) fn set_var(&mut self, key: &str, value: impl Into<OsString>) {
        self.vars.insert(key.to_owned(), value.into());
    }

    pub(crate) fn checked(&self) -> Vec<PathBuf> {
        self.checked.borrow().clone()
    }
}

impl HostEnvironment for FakeEnvironment {
    fn exists(&self, path: &Path) -> bool {
        self.checked.borrow_mut().push(path.to_path_buf());
        self.paths.contains(path)
    }

    fn var(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }
}

/// Probe that finds exactly the launchers it was given.
#[derive(Debug, Default)]
pub(crate) struct StubProbe {
    available: HashSet<String>,
    probed: RefCell<Vec<String>>,
}

impl StubProbe {
    pub(crate) fn add_launcher(&mut self, name: &str) {
        self.available.insert(name.to_owned());
    }

    pub(crate) fn probed(&self) -> Vec<String> {
        self.probed.borrow().clone()
    }
}

impl LauncherProbe for StubProbe {
    fn is_on_search_path(&self, name: &str) -> bool {
        self.probed.borrow_mut().push(name.to_owned());
        self.available.contains(name)
    }
}
