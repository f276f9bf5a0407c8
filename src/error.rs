use std::path::PathBuf;
use thiserror::Error;

/// Problems found while resolving the run configuration.
///
/// All of these abort the run before a browser session is opened.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration override in {origin} must be a JSON object")]
    NotAnObject { origin: String },

    #[error("searchTerm is required and must not be empty")]
    EmptySearchTerm,

    #[error("invalid {list} selector {selector:?}: {reason}")]
    Selector {
        list: &'static str,
        selector: String,
        reason: String,
    },

    #[error("the {0} selector list must not be empty")]
    EmptySelectors(&'static str),

    #[error("invalid base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
}

/// Browser session failures: launch, navigation and WebDriver commands.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not open a browser session (tried {tried}): {reason}")]
    Launch { tried: String, reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("browser command {command} failed: {reason}")]
    Command {
        command: &'static str,
        reason: String,
    },
}

impl SessionError {
    /// Wraps a WebDriver command error with the name of the command that failed
    pub fn command(command: &'static str, error: impl std::fmt::Display) -> Self {
        SessionError::Command {
            command,
            reason: error.to_string(),
        }
    }
}

/// No listing container selector matched the loaded page.
///
/// Treated as the natural end of the results, never as a run failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no listing container selector matched the page")]
pub struct ExtractionGap;

/// Failure to persist the collected records.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error reported by a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("run interrupted before completion")]
    Interrupted,
}
