//! Run summary types and helpers.

mod batch;
mod run_summary;

pub use batch::BatchResult;
pub use run_summary::RunSummary;
