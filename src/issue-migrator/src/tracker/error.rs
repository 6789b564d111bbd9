//! Tracker error types.

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Errors that can occur while talking to an issue tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {message}")]
    NetworkTimeout { message: String },

    /// The tracker answered with an error status.
    #[error("Tracker rejected request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// The response payload could not be parsed.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// No client was built for the credential's actor.
    #[error("No client configured for actor '{actor}'")]
    UnknownCredential { actor: String },

    /// Any other client or transport failure.
    #[error("Tracker client error: {message}")]
    Transport { message: String },
}

impl TrackerError {
    /// Returns true for timeouts, which interrupt a run instead of being
    /// recorded against a single item.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::NetworkTimeout { .. })
    }
}

impl From<octocrab::Error> for TrackerError {
    fn from(error: octocrab::Error) -> Self {
        match error {
            octocrab::Error::GitHub { source, .. } => Self::RemoteRejected {
                status: source.status_code.as_u16(),
                message: source.message.clone(),
            },
            octocrab::Error::Serde { source, .. } => Self::MalformedResponse {
                message: source.to_string(),
            },
            octocrab::Error::Json { source, .. } => Self::MalformedResponse {
                message: source.to_string(),
            },
            other => {
                let message = describe_chain(&other);
                if is_timeout_chain(&other) {
                    Self::NetworkTimeout { message }
                } else {
                    Self::Transport { message }
                }
            }
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedResponse {
            message: error.to_string(),
        }
    }
}

/// Checks whether any error in the source chain is an elapsed timeout.
///
/// The client's timeout connector fails the read or connect with an
/// [`io::ErrorKind::TimedOut`] error, which surfaces a few levels below the
/// octocrab error.
fn is_timeout_chain(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io_error) = err.downcast_ref::<io::Error>() {
            if io_error.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        if err.is::<tokio::time::error::Elapsed>() {
            return true;
        }
        current = err.source();
    }
    false
}

/// Joins the first line of every error in the source chain.
///
/// octocrab appends a backtrace to its own message, so only the first line
/// of each level is kept.
fn describe_chain(error: &(dyn StdError + 'static)) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut current = Some(error);
    while let Some(err) = current {
        let text = err.to_string();
        let line = text.lines().next().unwrap_or_default().trim().to_string();
        if !line.is_empty() && !parts.contains(&line) {
            parts.push(line);
        }
        current = err.source();
    }
    parts.join(": ")
}
