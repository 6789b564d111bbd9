//! Run summary types.

use super::batch::BatchResult;
use crate::issues::IssueOutcome;

/// Summary of a complete (or interrupted) run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of milestones created at the destination.
    pub milestones_created: usize,

    /// Number of milestones that failed to create.
    pub milestones_failed: usize,

    /// Number of labels created at the destination.
    pub labels_created: usize,

    /// Number of labels that failed to create.
    pub labels_failed: usize,

    /// Number of issue pages fully processed.
    pub pages_processed: usize,

    /// Last issue page fully processed.
    pub last_page: Option<u32>,

    /// Number of issues migrated.
    pub issues_migrated: usize,

    /// Number of issues skipped because an earlier run migrated them.
    pub issues_skipped: usize,

    /// Number of issues that failed to migrate.
    pub issues_failed: usize,

    /// Number of comments replayed.
    pub comments_created: usize,

    /// Number of comments that failed to replay.
    pub comments_failed: usize,

    /// Highest source issue number that completed (migrated or failed).
    pub last_completed_issue: Option<u64>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Records the result of the milestone migration.
    pub fn record_milestones<T>(&mut self, result: &BatchResult<T>) {
        self.milestones_created += result.created;
        self.milestones_failed += result.failed;
    }

    /// Records the result of the label migration.
    pub fn record_labels<T>(&mut self, result: &BatchResult<T>) {
        self.labels_created += result.created;
        self.labels_failed += result.failed;
    }

    /// Records that `page` was fully processed.
    pub fn record_page(&mut self, page: u32) {
        self.pages_processed += 1;
        self.last_page = Some(page);
    }

    /// Updates the summary with one issue's outcome.
    pub fn record_issue(&mut self, outcome: &IssueOutcome) {
        match outcome {
            IssueOutcome::Skipped { .. } => {
                self.issues_skipped += 1;
                return;
            }
            IssueOutcome::Migrated {
                comments_created,
                comments_failed,
                ..
            } => {
                self.issues_migrated += 1;
                self.comments_created += comments_created;
                self.comments_failed += comments_failed;
            }
            IssueOutcome::Failed { .. } => self.issues_failed += 1,
        }

        let number = outcome.source_number();
        self.last_completed_issue = Some(self.last_completed_issue.map_or(number, |n| n.max(number)));
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.milestones_failed > 0
            || self.labels_failed > 0
            || self.issues_failed > 0
            || self.comments_failed > 0
    }

    /// Returns true if all operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}
