//! Label migration.
//!
//! Issues reference labels by name, so labels need no number remapping and
//! their order does not matter.

use crate::context::MigrationContext;
use crate::summary::BatchResult;
use crate::tracker::{Label, NewLabel, TrackerError};
use tracing::{debug, info, info_span, warn, Instrument};

/// Copies every source label to the destination as the default actor.
///
/// A failed replay (for example a label that already exists) is logged and
/// counted; the remaining labels are still replayed.
///
/// # Errors
///
/// Returns [`TrackerError`] if the source labels cannot be listed.
pub async fn migrate_labels(ctx: &MigrationContext<'_>) -> Result<BatchResult<Label>, TrackerError> {
    let span = info_span!("labels", source = %ctx.source, destination = %ctx.destination);

    async {
        let labels = ctx
            .tracker
            .list_labels(ctx.source, ctx.source_reader())
            .await?;
        info!(count = labels.len(), "Migrating labels");

        let credential = ctx.credentials.default_credential();
        let mut result = BatchResult::new(labels);
        for label in &result.items {
            match ctx
                .tracker
                .create_label(ctx.destination, credential, &NewLabel::from(label))
                .await
            {
                Ok(()) => {
                    debug!(name = %label.name, "Label created");
                    result.created += 1;
                }
                Err(e) => {
                    warn!(name = %label.name, error = %e, "Failed to create label");
                    result.failed += 1;
                }
            }
        }

        info!(created = result.created, failed = result.failed, "Labels migrated");
        Ok(result)
    }
    .instrument(span)
    .await
}
