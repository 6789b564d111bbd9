#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod archive;
pub mod config;
pub mod context;
pub mod credentials;
pub mod issues;
pub mod labels;
pub mod milestones;
pub mod pagination;
pub mod rate_limit;
pub mod runner;
pub mod summary;
pub mod tracker;

pub use archive::{ArchiveError, ArchiveSink, DirectoryArchive, NoArchive};
pub use config::{ConfigError, MigrationConfig, ResumePoint, TokenSource};
pub use context::{MigrationContext, DEFAULT_PULL_REQUEST_MARKER};
pub use credentials::{Credential, CredentialError, CredentialPool};
pub use issues::{
    build_new_issue, decorate_title, filter_assignees, process_page, replicate_issue, IssueError,
    IssueOutcome, IssueStage,
};
pub use labels::migrate_labels;
pub use milestones::{migrate_milestones, rebuild_milestone_map, MilestoneMap};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use runner::{MigrationOrchestrator, RunMode, Runner, RunnerConfig, RunnerError};
pub use summary::{BatchResult, RunSummary};
pub use tracker::{
    Comment, CommentFeed, DryRunTracker, GitHubTracker, GitHubTrackerOptions, Issue, IssuePage,
    IssueTracker, ItemState, Label, Milestone, NewIssue, NewLabel, NewMilestone, RepositoryRef,
    TrackerError, ISSUES_PER_PAGE,
};
