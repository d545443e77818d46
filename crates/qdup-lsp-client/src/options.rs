//! Identity and watched-file scope of the language client.

use std::path::Path;

use lsp_types::Uri;
use url::Url;

/// Identifier of the language client.
pub const CLIENT_ID: &str = "qdup-lsp";

/// Human-readable client name, reported to the server as `clientInfo.name`.
pub const CLIENT_NAME: &str = "qDup Language Server";

/// Language identifier of documents served by the client.
pub const LANGUAGE_ID: &str = "qdup-yaml";

/// Glob of workspace files whose changes are forwarded to the server.
pub const WATCHED_FILES_GLOB: &str = "**/*.qdup.{yaml,yml}";

/// Options shared by every client the extension creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    id: String,
    name: String,
    watched_suffixes: Vec<String>,
}

impl ClientOptions {
    /// Options for the qDup language server.
    #[must_use]
    pub fn qdup() -> Self {
        Self {
            id: CLIENT_ID.to_owned(),
            name: CLIENT_NAME.to_owned(),
            watched_suffixes: file_name_suffixes(WATCHED_FILES_GLOB),
        }
    }

    /// Client identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Client display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether changes to `path` are forwarded to the server.
    ///
    /// Matches the file name against [`WATCHED_FILES_GLOB`] at any depth.
    #[must_use]
    pub fn is_watched(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                self.watched_suffixes
                    .iter()
                    .any(|suffix| name.ends_with(suffix.as_str()))
            })
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::qdup()
    }
}

/// Expands a `**/*<stem>{a,b}` glob into the file name suffixes it matches.
fn file_name_suffixes(glob: &str) -> Vec<String> {
    let file_pattern = glob.rsplit('/').next().unwrap_or(glob);
    let tail = file_pattern.strip_prefix('*').unwrap_or(file_pattern);
    match tail.split_once('{') {
        Some((stem, alternatives)) => alternatives
            .trim_end_matches('}')
            .split(',')
            .map(|alternative| format!("{stem}{alternative}"))
            .collect(),
        None => vec![tail.to_owned()],
    }
}

/// Builds a `file:` URI for an absolute path.
///
/// Returns `None` for relative paths or when the result does not parse.
#[must_use]
pub fn file_uri(path: &Path) -> Option<Uri> {
    let url = Url::from_file_path(path).ok()?;
    url.as_str().parse().ok()
}
