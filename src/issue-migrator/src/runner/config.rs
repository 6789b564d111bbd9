//! Runner configuration.

use crate::config::{MigrationConfig, ResumePoint};

/// Which part of the migration a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Milestones, labels, then every issue from page 1.
    Fresh,

    /// Issues only, continuing from an interrupted run.
    Resume(ResumePoint),
}

/// Configuration for one migration run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Parsed migration configuration.
    migration: MigrationConfig,
    /// Fresh or resume run.
    mode: RunMode,
    /// Whether to preview the migration without writing to the destination.
    dry_run: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(migration: MigrationConfig, mode: RunMode, dry_run: bool) -> Self {
        Self {
            migration,
            mode,
            dry_run,
        }
    }

    /// Returns the migration configuration.
    pub fn migration(&self) -> &MigrationConfig {
        &self.migration
    }

    /// Returns the run mode.
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
