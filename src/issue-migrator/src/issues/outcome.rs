//! Per-issue outcome types.

use std::fmt;

/// Step of the per-issue pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStage {
    /// Creating the destination issue.
    Create,
    /// Setting the destination issue's state to the source state.
    AlignState,
    /// Fetching the source issue's comment feed.
    FetchComments,
}

impl fmt::Display for IssueStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::AlignState => write!(f, "state alignment"),
            Self::FetchComments => write!(f, "comment fetch"),
        }
    }
}

/// Result of processing one source issue. Exactly one is produced per issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// At or below the retry threshold; no calls were made.
    Skipped {
        /// Source issue number.
        source_number: u64,
    },

    /// Created, state aligned and comments replayed.
    Migrated {
        /// Source issue number.
        source_number: u64,
        /// Number assigned by the destination.
        destination_number: u64,
        /// Comments replayed successfully.
        comments_created: usize,
        /// Comments whose replay failed.
        comments_failed: usize,
    },

    /// A pipeline step failed; the remaining steps were not run.
    Failed {
        /// Source issue number.
        source_number: u64,
        /// Destination number, if the issue was created before the failure.
        destination_number: Option<u64>,
        /// Step that failed.
        stage: IssueStage,
        /// Error message.
        error: String,
    },
}

impl IssueOutcome {
    /// Returns the source issue number.
    pub fn source_number(&self) -> u64 {
        match self {
            Self::Skipped { source_number }
            | Self::Migrated { source_number, .. }
            | Self::Failed { source_number, .. } => *source_number,
        }
    }
}
