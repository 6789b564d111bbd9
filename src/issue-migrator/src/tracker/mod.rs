//! Issue tracker capability consumed by the migration.
//!
//! The migration never talks HTTP directly; it calls an [`IssueTracker`].
//! [`GitHubTracker`] is the production implementation on top of `octocrab`,
//! and [`DryRunTracker`] wraps any tracker to suppress writes.

mod dry_run;
mod error;
mod github;
mod types;
mod wire;

pub use dry_run::DryRunTracker;
pub use error::TrackerError;
pub use github::{GitHubTracker, GitHubTrackerOptions, ISSUES_PER_PAGE};
pub use types::{
    Comment, CommentFeed, Issue, IssuePage, ItemState, Label, Milestone, NewIssue, NewLabel,
    NewMilestone, RepositoryRef,
};

use crate::credentials::Credential;
use async_trait::async_trait;

/// Calls against a remote issue tracker.
///
/// Every call acts as the actor of the supplied credential. Implementations
/// must not reorder or parallelise calls; the migration awaits each one before
/// issuing the next.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists every milestone of `repo`, open and closed.
    async fn list_milestones(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
    ) -> Result<Vec<Milestone>, TrackerError>;

    /// Creates a milestone and returns the number the tracker assigned.
    async fn create_milestone(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        milestone: &NewMilestone,
    ) -> Result<u64, TrackerError>;

    /// Lists every label of `repo`.
    async fn list_labels(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
    ) -> Result<Vec<Label>, TrackerError>;

    /// Creates a label.
    async fn create_label(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        label: &NewLabel,
    ) -> Result<(), TrackerError>;

    /// Fetches one page of issues (all states, oldest first).
    async fn list_issues_page(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        page: u32,
    ) -> Result<IssuePage, TrackerError>;

    /// Creates an issue and returns the number the tracker assigned.
    async fn create_issue(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        issue: &NewIssue,
    ) -> Result<u64, TrackerError>;

    /// Sets the lifecycle state of an existing issue.
    async fn update_issue_state(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        number: u64,
        state: ItemState,
    ) -> Result<(), TrackerError>;

    /// Fetches the full comment feed at `comments_url`.
    async fn list_comments(
        &self,
        comments_url: &str,
        credential: &Credential,
    ) -> Result<CommentFeed, TrackerError>;

    /// Creates a comment on issue `number` and returns the comment id.
    async fn create_comment(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        number: u64,
        body: &str,
    ) -> Result<u64, TrackerError>;
}
