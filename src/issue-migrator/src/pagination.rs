//! Page-by-page walk over the source issue list.

use crate::archive::{issue_page_name, write_snapshot};
use crate::config::ResumePoint;
use crate::context::MigrationContext;
use crate::issues::{process_page, IssueError};
use crate::milestones::MilestoneMap;
use crate::runner::RunnerError;
use crate::summary::RunSummary;
use tracing::{info, info_span, warn, Instrument};

/// Replicates every source issue from `start_page` onward.
///
/// Pages are fetched oldest first. Each page is archived, then fully
/// processed, and only then is the next page requested, and only if the
/// tracker reported a continuation. The walk ends at the first page without
/// one.
///
/// # Errors
///
/// Returns [`RunnerError::PageFetch`] when a page cannot be fetched and
/// [`RunnerError::Interrupted`] when issue processing times out. Both carry
/// the point from which a resume run should continue.
pub async fn run(
    ctx: &MigrationContext<'_>,
    milestones: &MilestoneMap,
    start_page: u32,
    retry_threshold: u64,
    summary: &mut RunSummary,
) -> Result<(), RunnerError> {
    let mut page = start_page;

    loop {
        let span = info_span!("page", page);
        let has_next = async {
            let listing = ctx
                .tracker
                .list_issues_page(ctx.source, ctx.source_reader(), page)
                .await
                .map_err(|source| RunnerError::PageFetch {
                    resume: resume_point(page, retry_threshold, summary),
                    source,
                })?;
            write_snapshot(ctx.archive, &issue_page_name(page), &listing.raw).await;

            process_page(ctx, milestones, retry_threshold, page, &listing.issues, summary)
                .await
                .map_err(|source: IssueError| RunnerError::Interrupted {
                    resume: interrupted_resume_point(page, retry_threshold, summary, &source),
                    source,
                })?;

            summary.record_page(page);
            Ok::<_, RunnerError>(listing.has_next)
        }
        .instrument(span)
        .await?;

        if !has_next {
            info!(page, "Last issue page processed");
            return Ok(());
        }
        page += 1;
    }
}

/// Point from which a resume run continues after a failure on `page`.
fn resume_point(page: u32, retry_threshold: u64, summary: &RunSummary) -> ResumePoint {
    ResumePoint {
        start_page: page,
        retry_threshold: summary
            .last_completed_issue
            .map_or(retry_threshold, |n| n.max(retry_threshold)),
    }
}

/// Resume point after issue processing was interrupted on `page`.
///
/// An issue that was created before the interruption must not be created
/// again, so the threshold moves past it and it is left for manual follow-up.
fn interrupted_resume_point(
    page: u32,
    retry_threshold: u64,
    summary: &RunSummary,
    error: &IssueError,
) -> ResumePoint {
    let mut resume = resume_point(page, retry_threshold, summary);
    if let IssueError::Interrupted {
        source_number,
        destination_number: Some(destination_number),
        stage,
        ..
    } = error
    {
        warn!(
            source_number,
            destination_number,
            %stage,
            "Issue was created but left incomplete; align its state and comments manually"
        );
        resume.retry_threshold = resume.retry_threshold.max(*source_number);
    }
    resume
}
