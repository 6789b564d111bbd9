//! Best-effort batch results.

/// Outcome of replaying a list of items where single failures do not abort
/// the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult<T> {
    /// The source items, in the order they were replayed.
    pub items: Vec<T>,

    /// Number of items created at the destination.
    pub created: usize,

    /// Number of items whose creation failed.
    pub failed: usize,
}

impl<T> BatchResult<T> {
    /// Creates a result for `items` with nothing replayed yet.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            created: 0,
            failed: 0,
        }
    }
}
