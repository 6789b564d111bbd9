//! Issue replication error types.

use super::IssueStage;
use crate::tracker::TrackerError;
use thiserror::Error;

/// Errors that stop issue replication altogether.
///
/// Every other failure is recorded as an
/// [`IssueOutcome::Failed`](super::IssueOutcome::Failed) and processing moves
/// on to the next issue.
#[derive(Debug, Error)]
pub enum IssueError {
    /// A request timed out; the run must be resumed by the operator.
    #[error("Issue #{source_number} interrupted during {stage}: {source}")]
    Interrupted {
        source_number: u64,
        destination_number: Option<u64>,
        stage: IssueStage,
        #[source]
        source: TrackerError,
    },
}

