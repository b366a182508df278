//! Reconstructs the target's trades for one position, for the run report.

use rust_decimal::Decimal;
use tracing::debug;

use crate::api::{ActivityResponse, ActivitySource};
use crate::error::Result;
use crate::models::PositionKey;

/// Collects every trade an account made on a single position.
///
/// Output is for display only and never influences the copy decision.
pub struct PositionHistoryCollector<'a, A: ActivitySource + ?Sized> {
    source: &'a A,
}

impl<'a, A: ActivitySource + ?Sized> PositionHistoryCollector<'a, A> {
    pub fn new(source: &'a A) -> Self {
        Self { source }
    }

    /// All trade entries on `key` within the latest `limit` activity entries,
    /// newest first. Entries are kept whatever their side, including sides the
    /// feed leaves blank. An empty result is not an error.
    pub async fn trades_for_position(
        &self,
        account: &str,
        key: &PositionKey,
        limit: u32,
    ) -> Result<Vec<ActivityResponse>> {
        let entries = self.source.get_activity(account, limit).await?;
        let scanned = entries.len();

        let trades: Vec<ActivityResponse> = entries
            .into_iter()
            .filter(|e| e.is_trade_on(key))
            .collect();

        debug!(
            account = %account,
            position = %key,
            scanned,
            matched = trades.len(),
            "Collected position history"
        );
        Ok(trades)
    }
}

/// One report line for a history entry, e.g. ` 1. BUY  25.00 Up @ 52.0c`.
///
/// A blank side or outcome renders as `?`.
pub fn format_history_line(index: usize, entry: &ActivityResponse) -> String {
    format!(
        "{:>2}. {:<4} {:.2} {} @ {:.1}c",
        index,
        or_unknown(&entry.side),
        entry.size,
        or_unknown(&entry.outcome),
        entry.price * Decimal::ONE_HUNDRED
    )
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "?"
    } else {
        value
    }
}
