//! Copy-trading logic: feed reading, holdings matching, decision, execution.

mod config;
mod copy_engine;
mod executor;
mod feed_reader;
mod history;
mod matcher;

pub use config::{ConfigArgs, CopyConfig};
pub use copy_engine::{CopyDecisionEngine, Decision};
pub use executor::{ExecutionOutcome, OrderExecutor};
pub use feed_reader::{ActivityFeedReader, TitleFilter};
pub use history::{format_history_line, PositionHistoryCollector};
pub use matcher::holds;

#[cfg(test)]
pub(crate) use executor::tests::RecordingGateway;
#[cfg(test)]
pub(crate) use feed_reader::tests::{entry as test_entry, StaticFeed};
