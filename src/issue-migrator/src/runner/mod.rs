//! Orchestrates a migration run.
//!
//! A fresh run replays milestones, then labels, then reads the destination
//! milestones back into a map, then replicates every issue page by page. A
//! resume run only rebuilds the map and continues the issue pages from the
//! configured resume point.

mod config;
mod error;

pub use config::{RunMode, RunnerConfig};
pub use error::RunnerError;

use crate::archive::{ArchiveSink, DirectoryArchive, NoArchive};
use crate::context::MigrationContext;
use crate::credentials::CredentialPool;
use crate::labels::migrate_labels;
use crate::milestones::{migrate_milestones, rebuild_milestone_map};
use crate::pagination;
use crate::summary::RunSummary;
use crate::tracker::{DryRunTracker, GitHubTracker, IssueTracker};
use tracing::{error, info};

/// Sequences the migration steps over a [`MigrationContext`].
pub struct MigrationOrchestrator<'a> {
    ctx: MigrationContext<'a>,
}

impl<'a> MigrationOrchestrator<'a> {
    /// Creates an orchestrator for `ctx`.
    pub fn new(ctx: MigrationContext<'a>) -> Self {
        Self { ctx }
    }

    /// Runs the migration in `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when a listing the run depends on fails or when
    /// issue processing is interrupted; the latter carries the resume point.
    pub async fn run(&self, mode: RunMode, dry_run: bool) -> Result<RunSummary, RunnerError> {
        let ctx = &self.ctx;
        let mut summary = RunSummary::new(dry_run);

        let (start_page, retry_threshold) = match mode {
            RunMode::Fresh => {
                info!(source = %ctx.source, destination = %ctx.destination, "Starting fresh migration");

                let milestones = migrate_milestones(ctx)
                    .await
                    .map_err(RunnerError::Milestones)?;
                summary.record_milestones(&milestones);

                let labels = migrate_labels(ctx).await.map_err(RunnerError::Labels)?;
                summary.record_labels(&labels);

                (1, 0)
            }
            RunMode::Resume(resume) => {
                info!(
                    source = %ctx.source,
                    destination = %ctx.destination,
                    start_page = resume.start_page,
                    retry_threshold = resume.retry_threshold,
                    "Resuming migration"
                );
                (resume.start_page, resume.retry_threshold)
            }
        };

        let milestones = rebuild_milestone_map(ctx)
            .await
            .map_err(RunnerError::MilestoneMap)?;

        pagination::run(ctx, &milestones, start_page, retry_threshold, &mut summary).await?;

        info!(
            pages = summary.pages_processed,
            migrated = summary.issues_migrated,
            skipped = summary.issues_skipped,
            failed = summary.issues_failed,
            "Migration complete"
        );
        Ok(summary)
    }
}

/// Runs a migration against GitHub from a [`RunnerConfig`].
pub struct Runner {
    config: RunnerConfig,
    credentials: CredentialPool,
    tracker: Box<dyn IssueTracker>,
    archive: Box<dyn ArchiveSink>,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if a token cannot be resolved or a GitHub
    /// client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let migration = config.migration();
        let credentials = migration.credential_pool()?;
        let github = GitHubTracker::new(&credentials, &migration.tracker_options())?;

        let tracker: Box<dyn IssueTracker> = if config.dry_run() {
            Box::new(DryRunTracker::new(github))
        } else {
            Box::new(github)
        };
        let archive: Box<dyn ArchiveSink> = match &migration.archive_dir {
            Some(dir) => {
                let archive = DirectoryArchive::new(dir);
                info!(dir = %archive.root().display(), "Archiving raw responses");
                Box::new(archive)
            }
            None => Box::new(NoArchive),
        };

        Ok(Self {
            config,
            credentials,
            tracker,
            archive,
        })
    }

    /// Executes the full orchestration flow.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let migration = self.config.migration();
        let ctx = MigrationContext {
            tracker: self.tracker.as_ref(),
            archive: self.archive.as_ref(),
            credentials: &self.credentials,
            source: &migration.source,
            destination: &migration.destination,
            pull_request_marker: &migration.pull_request_marker,
        };

        let result = MigrationOrchestrator::new(ctx)
            .run(self.config.mode(), self.config.dry_run())
            .await;

        if let Err(e) = &result {
            if let Some(resume) = e.resume_point() {
                error!(
                    start_page = resume.start_page,
                    retry_threshold = resume.retry_threshold,
                    "Run stopped; resume with --start-page {} --retry-threshold {}",
                    resume.start_page,
                    resume.retry_threshold
                );
            }
        }
        result
    }
}
