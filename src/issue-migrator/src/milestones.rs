//! Milestone migration and destination number lookup.
//!
//! Issues reference milestones by number, and the destination assigns its
//! own numbers. Milestones are therefore replayed first, then the destination
//! milestone list is read back into a [`MilestoneMap`] keyed by title.

use crate::context::MigrationContext;
use crate::summary::BatchResult;
use crate::tracker::{Milestone, NewMilestone, TrackerError};
use std::collections::HashMap;
use tracing::{debug, info, info_span, warn, Instrument};

/// Destination milestone numbers keyed by title.
///
/// Built once before any issue is created and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneMap {
    numbers: HashMap<String, u64>,
}

impl MilestoneMap {
    /// Builds the map from milestones as listed by the destination.
    pub fn from_milestones<'a>(milestones: impl IntoIterator<Item = &'a Milestone>) -> Self {
        let numbers = milestones
            .into_iter()
            .map(|milestone| (milestone.title.clone(), milestone.number))
            .collect();
        Self { numbers }
    }

    /// Returns the destination number for `title`.
    pub fn get(&self, title: &str) -> Option<u64> {
        self.numbers.get(title).copied()
    }

    /// Resolves an issue's milestone title to a destination number.
    ///
    /// A title missing from the map is treated as "no milestone".
    pub fn resolve(&self, title: Option<&str>) -> Option<u64> {
        let title = title?;
        let number = self.get(title);
        if number.is_none() {
            warn!(milestone = title, "Milestone not found at destination, creating issue without it");
        }
        number
    }

    /// Number of milestones in the map.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// Returns true if the map holds no milestones.
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Copies every source milestone to the destination.
///
/// Milestones are replayed one at a time in the order the source listed
/// them, each as its creator. A failed replay is logged and counted; the
/// remaining milestones are still replayed.
///
/// # Errors
///
/// Returns [`TrackerError`] if the source milestones cannot be listed.
pub async fn migrate_milestones(
    ctx: &MigrationContext<'_>,
) -> Result<BatchResult<Milestone>, TrackerError> {
    let span = info_span!("milestones", source = %ctx.source, destination = %ctx.destination);

    async {
        let milestones = ctx
            .tracker
            .list_milestones(ctx.source, ctx.source_reader())
            .await?;
        info!(count = milestones.len(), "Migrating milestones");

        let mut result = BatchResult::new(milestones);
        for milestone in &result.items {
            let credential = ctx
                .credentials
                .resolve(milestone.creator.as_deref().unwrap_or_default());
            match ctx
                .tracker
                .create_milestone(ctx.destination, credential, &NewMilestone::from(milestone))
                .await
            {
                Ok(number) => {
                    debug!(title = %milestone.title, number, "Milestone created");
                    result.created += 1;
                }
                Err(e) => {
                    warn!(title = %milestone.title, error = %e, "Failed to create milestone");
                    result.failed += 1;
                }
            }
        }

        info!(created = result.created, failed = result.failed, "Milestones migrated");
        Ok(result)
    }
    .instrument(span)
    .await
}

/// Reads the destination milestones back into a [`MilestoneMap`].
///
/// The map is built from the destination's own listing rather than from
/// create responses, so it holds exactly the numbers the destination uses.
///
/// # Errors
///
/// Returns [`TrackerError`] if the destination milestones cannot be listed.
pub async fn rebuild_milestone_map(ctx: &MigrationContext<'_>) -> Result<MilestoneMap, TrackerError> {
    let milestones = ctx
        .tracker
        .list_milestones(ctx.destination, ctx.destination_reader())
        .await?;
    let map = MilestoneMap::from_milestones(&milestones);
    if map.is_empty() {
        info!(destination = %ctx.destination, "Destination has no milestones; issues are created without one");
    } else {
        info!(destination = %ctx.destination, count = map.len(), "Built milestone map");
    }
    Ok(map)
}
