//! Aggregation, publishing and the run loop.

pub mod milestone_aggregator;
pub mod paginator;
pub mod publisher;
pub mod sync_job;

#[cfg(test)]
pub mod test_support;

pub use milestone_aggregator::{MilestoneAggregator, MilestoneSummary};
pub use paginator::{fetch_all, fetch_all_as, PAGE_SIZE};
pub use publisher::{PublishSummary, Publisher, TargetFields};
pub use sync_job::{InvocationResponse, RunReport, SyncJob};
