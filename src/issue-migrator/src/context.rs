//! Shared state threaded through every migration step.

use crate::archive::ArchiveSink;
use crate::credentials::{Credential, CredentialPool};
use crate::tracker::{IssueTracker, RepositoryRef};

/// Marker appended to the title of migrated pull requests, since the
/// destination can only create plain issues.
pub const DEFAULT_PULL_REQUEST_MARKER: &str = " (originally a pull request)";

/// Collaborators and endpoints of one migration run.
#[derive(Clone, Copy)]
pub struct MigrationContext<'a> {
    /// Tracker used for both source reads and destination writes.
    pub tracker: &'a dyn IssueTracker,
    /// Sink for raw snapshots of fetched pages and comment feeds.
    pub archive: &'a dyn ArchiveSink,
    /// Credentials used to act as each original author.
    pub credentials: &'a CredentialPool,
    /// Repository issues are read from.
    pub source: &'a RepositoryRef,
    /// Repository issues are replayed into.
    pub destination: &'a RepositoryRef,
    /// Suffix appended to titles of former pull requests.
    pub pull_request_marker: &'a str,
}

impl<'a> MigrationContext<'a> {
    /// Credential used for reads against the source repository.
    pub fn source_reader(&self) -> &'a Credential {
        self.credentials.resolve(&self.source.owner)
    }

    /// Credential used for reads against the destination repository.
    pub fn destination_reader(&self) -> &'a Credential {
        self.credentials.default_credential()
    }
}
