//! Test doubles shared by the extension tests.


use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lsp_types::FileEvent;
use qdup_lsp_locator::{HostEnvironment, LauncherProbe, ServerCommand, ServerLocator};
use serde_json::Value;

use crate::adapter::ClientError;
use crate::client::{ClientFactory, LanguageClient};
use crate::notify::{NotificationAction, Notifier};
use crate::options::ClientOptions;

/// Install directory used by every test.
pub(crate) const INSTALL_DIR: &str = "/ext/qdup";

// ---------------------------------------------------------------------------
// Machine view
// ---------------------------------------------------------------------------

/// Filesystem and search-path view backed by in-memory sets.
#[derive(Debug, Default, Clone)]
pub(crate) struct StubMachine {
    paths: HashSet<PathBuf>,
    launchers: HashSet<String>,
}

impl StubMachine {
    pub(crate) fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.paths.insert(path.into());
    }

    pub(crate) fn add_launcher(&mut self, name: &str) {
        self.launchers.insert(name.to_owned());
    }

    /// Locator reading from a snapshot of this machine.
    pub(crate) fn locator(&self) -> ServerLocator<Self, Self> {
        ServerLocator::new(self.clone(), self.clone())
    }
}

impl HostEnvironment for StubMachine {
    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    fn var(&self, _name: &str) -> Option<OsString> {
        None
    }
}

impl LauncherProbe for StubMachine {
    fn is_on_search_path(&self, name: &str) -> bool {
        self.launchers.contains(name)
    }
}

// ---------------------------------------------------------------------------
// Recording client
// ---------------------------------------------------------------------------

/// Calls observed by [`RecordingClient`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ClientCall {
    /// The factory built a client for this command.
    Created(ServerCommand),
    Start,
    Stop,
    /// Watched-file notification carrying these URIs.
    WatchedFiles(Vec<String>),
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<ClientCall>,
    running: bool,
    start_failure: Option<String>,
}

type Shared = Arc<Mutex<RecordingState>>;

fn lock(shared: &Shared) -> MutexGuard<'_, RecordingState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Client double recording lifecycle calls into shared state.
struct RecordingClient {
    shared: Shared,
}

impl LanguageClient for RecordingClient {
    fn start(&mut self) -> Result<(), ClientError> {
        let mut state = lock(&self.shared);
        state.calls.push(ClientCall::Start);
        if let Some(message) = state.start_failure.clone() {
            return Err(ClientError::InitializationFailed { message });
        }
        state.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ClientError> {
        let mut state = lock(&self.shared);
        state.calls.push(ClientCall::Stop);
        state.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        lock(&self.shared).running
    }

    fn request(&mut self, _method: &str, _params: Value) -> Result<Value, ClientError> {
        Ok(Value::Null)
    }

    fn notify(&mut self, _method: &str, _params: Value) -> Result<(), ClientError> {
        Ok(())
    }

    fn did_change_watched_files(&mut self, changes: Vec<FileEvent>) -> Result<(), ClientError> {
        let uris = changes
            .iter()
            .map(|event| event.uri.as_str().to_owned())
            .collect();
        lock(&self.shared).calls.push(ClientCall::WatchedFiles(uris));
        Ok(())
    }
}

/// Factory handing out [`RecordingClient`]s that share one call log.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingFactory {
    shared: Shared,
}

impl RecordingFactory {
    /// Factory whose clients fail to start with `message`.
    pub(crate) fn failing_start(message: &str) -> Self {
        let factory = Self::default();
        factory.fail_next_starts(message);
        factory
    }

    /// Makes every later start of this factory's clients fail with
    /// `message`.
    pub(crate) fn fail_next_starts(&self, message: &str) {
        lock(&self.shared).start_failure = Some(message.to_owned());
    }

    /// Lets later starts succeed again.
    pub(crate) fn clear_start_failure(&self) {
        lock(&self.shared).start_failure = None;
    }

    /// Calls recorded so far, in order.
    pub(crate) fn calls(&self) -> Vec<ClientCall> {
        lock(&self.shared).calls.clone()
    }

    /// Whether the most recent client reports itself running.
    pub(crate) fn running(&self) -> bool {
        lock(&self.shared).running
    }
}

impl ClientFactory for RecordingFactory {
    fn create(&self, command: ServerCommand, _options: &ClientOptions) -> Box<dyn LanguageClient> {
        lock(&self.shared).calls.push(ClientCall::Created(command));
        Box::new(RecordingClient {
            shared: Arc::clone(&self.shared),
        })
    }
}

// ---------------------------------------------------------------------------
// Recording notifier
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct NotifierState {
    errors: Vec<(String, Vec<NotificationAction>)>,
    opened_sections: Vec<String>,
    choice: Option<NotificationAction>,
}

/// Notifier double that records messages and answers with a preset choice.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingNotifier {
    shared: Arc<Mutex<NotifierState>>,
}

impl RecordingNotifier {
    fn state(&self) -> MutexGuard<'_, NotifierState> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every later notification answer with `choice`.
    pub(crate) fn choose(&self, choice: NotificationAction) {
        self.state().choice = Some(choice);
    }

    /// Error messages shown so far.
    pub(crate) fn errors(&self) -> Vec<(String, Vec<NotificationAction>)> {
        self.state().errors.clone()
    }

    /// Settings sections opened so far.
    pub(crate) fn opened_sections(&self) -> Vec<String> {
        self.state().opened_sections.clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(
        &self,
        message: &str,
        actions: &[NotificationAction],
    ) -> Option<NotificationAction> {
        let mut state = self.state();
        state.errors.push((message.to_owned(), actions.to_vec()));
        state.choice
    }

    fn open_settings(&self, section: &str) {
        self.state().opened_sections.push(section.to_owned());
    }
}
