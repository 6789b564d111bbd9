//! Tracker wrapper that performs reads and only logs writes.

use super::{
    CommentFeed, IssuePage, IssueTracker, ItemState, Label, Milestone, NewIssue, NewLabel,
    NewMilestone, RepositoryRef, TrackerError,
};
use crate::credentials::Credential;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Delegates reads to the inner tracker and answers writes with synthetic
/// numbers, so a full migration can be previewed without touching the
/// destination.
pub struct DryRunTracker<T> {
    inner: T,
    next_number: AtomicU64,
}

impl<T: IssueTracker> DryRunTracker<T> {
    /// Wraps `inner`.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            next_number: AtomicU64::new(1),
        }
    }

    /// The wrapped tracker.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn synthetic_number(&self) -> u64 {
        self.next_number.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl<T: IssueTracker> IssueTracker for DryRunTracker<T> {
    async fn list_milestones(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
    ) -> Result<Vec<Milestone>, TrackerError> {
        self.inner.list_milestones(repo, credential).await
    }

    async fn create_milestone(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        milestone: &NewMilestone,
    ) -> Result<u64, TrackerError> {
        info!(repo = %repo, actor = credential.actor(), title = %milestone.title, "[DRY RUN] Would create milestone");
        Ok(self.synthetic_number())
    }

    async fn list_labels(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
    ) -> Result<Vec<Label>, TrackerError> {
        self.inner.list_labels(repo, credential).await
    }

    async fn create_label(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        label: &NewLabel,
    ) -> Result<(), TrackerError> {
        info!(repo = %repo, actor = credential.actor(), name = %label.name, "[DRY RUN] Would create label");
        Ok(())
    }

    async fn list_issues_page(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        page: u32,
    ) -> Result<IssuePage, TrackerError> {
        self.inner.list_issues_page(repo, credential, page).await
    }

    async fn create_issue(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        issue: &NewIssue,
    ) -> Result<u64, TrackerError> {
        info!(
            repo = %repo,
            actor = credential.actor(),
            title = %issue.title,
            assignees = ?issue.assignees,
            milestone = ?issue.milestone,
            labels = ?issue.labels,
            "[DRY RUN] Would create issue"
        );
        Ok(self.synthetic_number())
    }

    async fn update_issue_state(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        number: u64,
        state: ItemState,
    ) -> Result<(), TrackerError> {
        info!(repo = %repo, actor = credential.actor(), number, %state, "[DRY RUN] Would set issue state");
        Ok(())
    }

    async fn list_comments(
        &self,
        comments_url: &str,
        credential: &Credential,
    ) -> Result<CommentFeed, TrackerError> {
        self.inner.list_comments(comments_url, credential).await
    }

    async fn create_comment(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        number: u64,
        _body: &str,
    ) -> Result<u64, TrackerError> {
        info!(repo = %repo, actor = credential.actor(), number, "[DRY RUN] Would create comment");
        Ok(self.synthetic_number())
    }
}
