//! User-facing notifications raised by the extension.

use qdup_lsp_config::SETTINGS_SECTION;
use tracing::{error, info};

/// Tracing target for notifications.
const NOTIFY_TARGET: &str = "qdup_lsp_client::notify";

/// Message shown when no tier produced a server command.
pub const SERVER_NOT_FOUND_MESSAGE: &str =
    "qDup LSP server not found. Set \"qdup.lsp.jarPath\" in settings or install JBang.";

/// Choices offered alongside a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Open the extension's settings section.
    OpenSettings,
}

impl NotificationAction {
    /// Button label shown to the user.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenSettings => "Open Settings",
        }
    }
}

/// Surface through which the extension talks to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// Shows an error message and returns the action the user picked, if any.
    fn show_error(
        &self,
        message: &str,
        actions: &[NotificationAction],
    ) -> Option<NotificationAction>;

    /// Opens the settings UI filtered to `section`.
    fn open_settings(&self, section: &str);
}

/// Notifier for hosts without interactive UI: logs and never picks an action.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(
        &self,
        message: &str,
        actions: &[NotificationAction],
    ) -> Option<NotificationAction> {
        let labels: Vec<&str> = actions.iter().map(|action| action.label()).collect();
        error!(target: NOTIFY_TARGET, actions = ?labels, "{message}");
        None
    }

    fn open_settings(&self, section: &str) {
        info!(target: NOTIFY_TARGET, section, "settings requested");
    }
}

/// Tells the user that no server could be found.
///
/// Emits exactly one error notification with a single "Open Settings"
/// choice; picking it opens the `qdup.lsp` settings section.
pub fn notify_server_not_found(notifier: &dyn Notifier) {
    let choice = notifier.show_error(
        SERVER_NOT_FOUND_MESSAGE,
        &[NotificationAction::OpenSettings],
    );
    if choice == Some(NotificationAction::OpenSettings) {
        notifier.open_settings(SETTINGS_SECTION);
    }
}
