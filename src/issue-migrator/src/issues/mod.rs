//! Issue replication.
//!
//! Each source issue goes through one pipeline, strictly one issue at a
//! time: create at the destination, align the state, then replay the comment
//! thread under the new destination number. Every issue ends in exactly one
//! [`IssueOutcome`], so a failing issue never stalls the page it is on.

mod error;
mod outcome;

pub use error::IssueError;
pub use outcome::{IssueOutcome, IssueStage};

use crate::archive::{comments_name, write_snapshot};
use crate::context::MigrationContext;
use crate::credentials::CredentialPool;
use crate::milestones::MilestoneMap;
use crate::summary::RunSummary;
use crate::tracker::{Comment, Issue, NewIssue, TrackerError};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Returns the destination title, marking former pull requests.
pub fn decorate_title(issue: &Issue, marker: &str) -> String {
    if issue.is_pull_request {
        format!("{}{}", issue.title, marker)
    } else {
        issue.title.clone()
    }
}

/// Keeps only the assignees that have a credential, since unknown users
/// cannot be assigned at the destination.
pub fn filter_assignees(assignees: &[String], credentials: &CredentialPool) -> Vec<String> {
    assignees
        .iter()
        .filter(|login| credentials.contains(login))
        .cloned()
        .collect()
}

/// Builds the destination create payload for a source issue.
pub fn build_new_issue(ctx: &MigrationContext<'_>, milestones: &MilestoneMap, issue: &Issue) -> NewIssue {
    NewIssue {
        title: decorate_title(issue, ctx.pull_request_marker),
        body: issue.body.clone(),
        assignees: filter_assignees(&issue.assignees, ctx.credentials),
        milestone: milestones.resolve(issue.milestone.as_deref()),
        labels: issue.labels.clone(),
    }
}

/// Processes one page of source issues, in order, one issue at a time.
///
/// Every outcome is recorded in `summary` as soon as the issue completes.
///
/// # Errors
///
/// Returns [`IssueError::Interrupted`] when a request times out; issues
/// after it on the page are not processed.
pub async fn process_page(
    ctx: &MigrationContext<'_>,
    milestones: &MilestoneMap,
    retry_threshold: u64,
    page: u32,
    issues: &[Issue],
    summary: &mut RunSummary,
) -> Result<(), IssueError> {
    info!(page, count = issues.len(), "Processing issue page");
    for issue in issues {
        let outcome = replicate_issue(ctx, milestones, retry_threshold, page, issue).await?;
        summary.record_issue(&outcome);
    }
    Ok(())
}

/// Replicates a single source issue to the destination.
///
/// Issues numbered at or below `retry_threshold` were migrated by an earlier
/// run and are skipped without any call.
///
/// # Errors
///
/// Returns [`IssueError::Interrupted`] when creating the issue, aligning its
/// state or fetching its comments times out. Any other failure is returned as
/// [`IssueOutcome::Failed`].
pub async fn replicate_issue(
    ctx: &MigrationContext<'_>,
    milestones: &MilestoneMap,
    retry_threshold: u64,
    page: u32,
    issue: &Issue,
) -> Result<IssueOutcome, IssueError> {
    if issue.number <= retry_threshold {
        debug!(source_number = issue.number, retry_threshold, "Already migrated, skipping");
        return Ok(IssueOutcome::Skipped {
            source_number: issue.number,
        });
    }

    let span = info_span!("issue", page, source_number = issue.number);

    async {
        let credential = ctx.credentials.resolve(&issue.author);
        let new_issue = build_new_issue(ctx, milestones, issue);
        info!(title = %new_issue.title, actor = credential.actor(), "Creating issue");

        let destination_number = match ctx
            .tracker
            .create_issue(ctx.destination, credential, &new_issue)
            .await
        {
            Ok(number) => number,
            Err(e) => return failed(issue.number, None, IssueStage::Create, e),
        };

        if let Err(e) = ctx
            .tracker
            .update_issue_state(ctx.destination, credential, destination_number, issue.state)
            .await
        {
            return failed(issue.number, Some(destination_number), IssueStage::AlignState, e);
        }

        let feed = match ctx
            .tracker
            .list_comments(&issue.comments_url, ctx.source_reader())
            .await
        {
            Ok(feed) => feed,
            Err(e) => {
                return failed(
                    issue.number,
                    Some(destination_number),
                    IssueStage::FetchComments,
                    e,
                )
            }
        };
        write_snapshot(ctx.archive, &comments_name(page, issue.number), &feed.raw).await;

        let (comments_created, comments_failed) =
            replay_comments(ctx, destination_number, &feed.comments).await;

        info!(
            destination_number,
            comments_created, comments_failed, "Issue migrated"
        );
        Ok(IssueOutcome::Migrated {
            source_number: issue.number,
            destination_number,
            comments_created,
            comments_failed,
        })
    }
    .instrument(span)
    .await
}

/// Replays comments in order under the destination issue, each as its
/// author. Returns `(created, failed)`; a failed comment does not stop the
/// ones after it.
async fn replay_comments(
    ctx: &MigrationContext<'_>,
    destination_number: u64,
    comments: &[Comment],
) -> (usize, usize) {
    let mut created = 0;
    let mut failed = 0;

    for (index, comment) in comments.iter().enumerate() {
        let credential = ctx.credentials.resolve(&comment.author);
        match ctx
            .tracker
            .create_comment(ctx.destination, credential, destination_number, &comment.body)
            .await
        {
            Ok(id) => {
                debug!(index, id, actor = credential.actor(), "Comment created");
                created += 1;
            }
            Err(e) => {
                warn!(index, author = %comment.author, error = %e, "Failed to create comment");
                failed += 1;
            }
        }
    }

    (created, failed)
}

/// Converts a pipeline failure into an outcome, or an interruption for
/// timeouts.
fn failed(
    source_number: u64,
    destination_number: Option<u64>,
    stage: IssueStage,
    error: TrackerError,
) -> Result<IssueOutcome, IssueError> {
    if error.is_timeout() {
        return Err(IssueError::Interrupted {
            source_number,
            destination_number,
            stage,
            source: error,
        });
    }

    error!(?destination_number, %stage, error = %error, "Failed to migrate issue");
    Ok(IssueOutcome::Failed {
        source_number,
        destination_number,
        stage,
        error: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::ItemState;

    fn issue(number: u64, is_pull_request: bool) -> Issue {
        Issue {
            number,
            title: "Add retry support".to_string(),
            body: None,
            state: ItemState::Open,
            assignees: Vec::new(),
            milestone: None,
            labels: Vec::new(),
            author: "user1".to_string(),
            comments_url: String::new(),
            is_pull_request,
        }
    }

    #[test]
    fn test_decorate_pull_request_title() {
        let marker = crate::context::DEFAULT_PULL_REQUEST_MARKER;
        assert_eq!(
            decorate_title(&issue(42, true), marker),
            "Add retry support (originally a pull request)"
        );
        assert_eq!(decorate_title(&issue(43, false), marker), "Add retry support");
    }

    #[test]
    fn test_filter_unknown_assignees() {
        let pool = CredentialPool::new([("user1", "t1"), ("user2", "t2")], "user1").unwrap();
        let assignees = vec!["user2".to_string(), "ghost".to_string()];

        assert_eq!(filter_assignees(&assignees, &pool), vec!["user2"]);
        assert!(filter_assignees(&[], &pool).is_empty());
    }

    #[test]
    fn test_timeouts_interrupt_instead_of_failing() {
        let result = failed(
            7,
            Some(3),
            IssueStage::AlignState,
            TrackerError::NetworkTimeout {
                message: "timed out".to_string(),
            },
        );
        assert!(matches!(
            result,
            Err(IssueError::Interrupted {
                source_number: 7,
                destination_number: Some(3),
                ..
            })
        ));
    }

    #[test]
    fn test_rejections_become_failed_outcomes() {
        let outcome = failed(
            7,
            None,
            IssueStage::Create,
            TrackerError::RemoteRejected {
                status: 422,
                message: "Validation Failed".to_string(),
            },
        )
        .unwrap();
        assert!(matches!(
            outcome,
            IssueOutcome::Failed {
                source_number: 7,
                destination_number: None,
                stage: IssueStage::Create,
                ..
            }
        ));
    }
}
