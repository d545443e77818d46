//! Host integration object owning the language client.

use std::fmt;
use std::path::Path;

use lsp_types::{FileChangeType, FileEvent};
use qdup_lsp_config::ResolutionConfig;
use qdup_lsp_locator::{
    HostEnvironment, LauncherProbe, ResolutionOutcome, ResolutionTier, ServerLocator,
    SystemEnvironment, SystemLauncherProbe,
};
use tracing::{debug, info, warn};

use crate::adapter::{ClientError, ProcessClientFactory};
use crate::client::{ClientFactory, LanguageClient};
use crate::errors::{ActivationError, CommandError};
use crate::notify::{Notifier, notify_server_not_found};
use crate::options::{ClientOptions, file_uri};


/// Tracing target for lifecycle events.
const EXTENSION_TARGET: &str = "qdup_lsp_client::extension";

/// Command restarting the managed language server.
pub const RESTART_SERVER_COMMAND: &str = "qdup.restartServer";

/// Result of a successful [`Extension::activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A server command was found and its client started.
    Started {
        /// Tier that produced the command.
        tier: ResolutionTier,
    },
    /// No tier matched; the user was notified and no client runs.
    ServerNotFound,
}

/// Owns at most one language client for the lifetime of a host session.
///
/// Activation resolves the server command afresh every time; nothing is
/// cached between activations.
pub struct Extension<E = SystemEnvironment, P = SystemLauncherProbe> {
    locator: ServerLocator<E, P>,
    factory: Box<dyn ClientFactory>,
    notifier: Box<dyn Notifier>,
    options: ClientOptions,
    client: Option<Box<dyn LanguageClient>>,
}

impl Extension {
    /// Extension backed by the real machine and process-spawning clients.
    #[must_use]
    pub fn system(notifier: Box<dyn Notifier>) -> Self {
        Self::new(
            ServerLocator::system(),
            Box::new(ProcessClientFactory),
            notifier,
        )
    }
}

impl<E, P> Extension<E, P> {
    /// Creates an inactive extension over the supplied collaborators.
    #[must_use]
    pub fn new(
        locator: ServerLocator<E, P>,
        factory: Box<dyn ClientFactory>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            locator,
            factory,
            notifier,
            options: ClientOptions::qdup(),
            client: None,
        }
    }

    /// Replaces the options handed to created clients.
    #[must_use]
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Options handed to created clients.
    #[must_use]
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Returns whether a client is currently owned.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.client.is_some()
    }

    /// The owned client, if any.
    #[must_use]
    pub fn client(&self) -> Option<&dyn LanguageClient> {
        self.client.as_deref()
    }

    /// Stops and releases the client. Deactivating an inactive extension is
    /// a no-op.
    ///
    /// The client is released even when stopping it fails.
    ///
    /// # Errors
    ///
    /// Returns the client's stop failure.
    pub fn deactivate(&mut self) -> Result<(), ClientError> {
        let Some(mut client) = self.client.take() else {
            debug!(target: EXTENSION_TARGET, "deactivate ignored: no client");
            return Ok(());
        };
        info!(target: EXTENSION_TARGET, client = self.options.id(), "stopping language client");
        client.stop()
    }

    /// Restarts the client by stopping and starting it. Restarting while
    /// inactive does nothing.
    ///
    /// A failed restart releases the client, leaving the extension inactive
    /// so a later [`Extension::activate`] can start afresh.
    ///
    /// # Errors
    ///
    /// Returns the client's stop or start failure.
    pub fn restart_server(&mut self) -> Result<(), ClientError> {
        let Some(client) = self.client.as_mut() else {
            debug!(target: EXTENSION_TARGET, "restart ignored: no client");
            return Ok(());
        };
        info!(target: EXTENSION_TARGET, client = self.options.id(), "restarting language client");
        let result = client.restart();
        if let Err(error) = &result {
            warn!(
                target: EXTENSION_TARGET,
                client = self.options.id(),
                %error,
                "restart failed; releasing language client"
            );
            self.client = None;
        }
        result
    }

    /// Runs a registered command by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Unknown`] for unregistered identifiers and
    /// [`CommandError::Client`] when the command fails in the client.
    pub fn execute_command(&mut self, command: &str) -> Result<(), CommandError> {
        match command {
            RESTART_SERVER_COMMAND => self.restart_server().map_err(CommandError::from),
            other => Err(CommandError::Unknown {
                command: other.to_owned(),
            }),
        }
    }

    /// Forwards changes to watched files to the running server.
    ///
    /// Paths outside the watched pattern, and paths that cannot be expressed
    /// as `file:` URIs, are dropped. Returns the number of events forwarded;
    /// nothing is sent while inactive or when no event survives filtering.
    ///
    /// # Errors
    ///
    /// Returns the client's failure to send the notification.
    pub fn files_changed<'a, I>(&mut self, changes: I) -> Result<usize, ClientError>
    where
        I: IntoIterator<Item = (&'a Path, FileChangeType)>,
    {
        let Some(client) = self.client.as_mut() else {
            return Ok(0);
        };
        let events: Vec<FileEvent> = changes
            .into_iter()
            .filter(|(path, _)| self.options.is_watched(path))
            .filter_map(|(path, change)| file_uri(path).map(|uri| FileEvent::new(uri, change)))
            .collect();
        if events.is_empty() {
            return Ok(0);
        }
        let forwarded = events.len();
        client.did_change_watched_files(events)?;
        Ok(forwarded)
    }
}

impl<E, P> Extension<E, P>
where
    E: HostEnvironment,
    P: LauncherProbe,
{
    /// Resolves the server command and starts a client for it.
    ///
    /// When no tier matches, the user receives exactly one error
    /// notification offering to open the settings and no client is started;
    /// the extension stays loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::AlreadyActive`] if a client is already
    /// owned, and [`ActivationError::ClientStart`] if the found server fails
    /// to start. A failed start leaves the extension inactive.
    pub fn activate(
        &mut self,
        config: &ResolutionConfig,
        install_dir: &Path,
    ) -> Result<Activation, ActivationError> {
        if self.is_active() {
            return Err(ActivationError::AlreadyActive);
        }

        let ResolutionOutcome::Found { tier, command } = self.locator.resolve(config, install_dir)
        else {
            warn!(target: EXTENSION_TARGET, "language server not found");
            notify_server_not_found(self.notifier.as_ref());
            return Ok(Activation::ServerNotFound);
        };

        info!(
            target: EXTENSION_TARGET,
            client = self.options.id(),
            %tier,
            %command,
            "starting language client"
        );
        let mut client = self.factory.create(command, &self.options);
        client
            .start()
            .map_err(|source| ActivationError::ClientStart { source })?;
        self.client = Some(client);
        Ok(Activation::Started { tier })
    }
}

impl<E, P> fmt::Debug for Extension<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("options", &self.options)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
