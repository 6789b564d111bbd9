//! Runner error types.

use crate::config::{ConfigError, ResumePoint};
use crate::issues::IssueError;
use crate::tracker::TrackerError;

/// Errors that abort a migration run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration and credential loading errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// The source milestones could not be listed.
    #[error("Failed to migrate milestones: {0}")]
    Milestones(#[source] TrackerError),

    /// The source labels could not be listed.
    #[error("Failed to migrate labels: {0}")]
    Labels(#[source] TrackerError),

    /// The destination milestones could not be read back.
    #[error("Failed to build milestone map: {0}")]
    MilestoneMap(#[source] TrackerError),

    /// An issue page could not be fetched.
    #[error("Failed to fetch issue page {}: {source}", .resume.start_page)]
    PageFetch {
        resume: ResumePoint,
        #[source]
        source: TrackerError,
    },

    /// Issue processing timed out.
    #[error("Migration interrupted on page {}: {source}", .resume.start_page)]
    Interrupted {
        resume: ResumePoint,
        #[source]
        source: IssueError,
    },
}

impl RunnerError {
    /// Returns where a resume run should continue, if the run got as far as
    /// the issue pages.
    pub fn resume_point(&self) -> Option<ResumePoint> {
        match self {
            Self::PageFetch { resume, .. } | Self::Interrupted { resume, .. } => Some(*resume),
            _ => None,
        }
    }
}
