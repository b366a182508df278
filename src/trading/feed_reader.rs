//! Finds the target's latest qualifying bet in its activity feed.

use tracing::{debug, info};

use crate::api::ActivitySource;
use crate::error::Result;
use crate::models::Trade;

/// Which trades are eligible for copying, by market title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleFilter {
    /// Every trade qualifies
    Any,
    /// Title must start with the prefix (case-sensitive)
    Prefix(String),
}

impl TitleFilter {
    pub fn matches(&self, trade: &Trade) -> bool {
        match self {
            TitleFilter::Any => true,
            TitleFilter::Prefix(prefix) => trade.title.starts_with(prefix.as_str()),
        }
    }
}

/// Return the first BUY trade in feed order that satisfies `predicate`.
///
/// `entries` must be newest-first. The order is not re-derived from
/// timestamps, and a later entry never wins over an earlier one.
pub fn first_qualifying_buy<I, F>(entries: I, predicate: F) -> Option<Trade>
where
    I: IntoIterator<Item = Trade>,
    F: Fn(&Trade) -> bool,
{
    entries
        .into_iter()
        .find(|trade| trade.is_buy() && predicate(trade))
}

/// Reads an account's activity feed and picks the bet to copy.
pub struct ActivityFeedReader<'a, A: ActivitySource + ?Sized> {
    source: &'a A,
    limit: u32,
}

impl<'a, A: ActivitySource + ?Sized> ActivityFeedReader<'a, A> {
    pub fn new(source: &'a A, limit: u32) -> Self {
        Self { source, limit }
    }

    /// Fetch the latest `limit` entries for `account` and return the most
    /// recent BUY trade accepted by `predicate`.
    ///
    /// `Ok(None)` means nothing in the window qualified. A failed read is an
    /// error; it is never retried here.
    pub async fn latest_qualifying_trade<F>(&self, account: &str, predicate: F) -> Result<Option<Trade>>
    where
        F: Fn(&Trade) -> bool,
    {
        let entries = self.source.get_activity(account, self.limit).await?;
        let scanned = entries.len();

        let latest = first_qualifying_buy(entries.iter().filter_map(|e| e.to_trade()), predicate);

        match &latest {
            Some(trade) => info!(
                account = %account,
                market = %trade.market_id,
                outcome = %trade.outcome,
                notional = %trade.notional(),
                "Found latest qualifying bet"
            ),
            None => debug!(account = %account, scanned, "No qualifying bet in window"),
        }

        Ok(latest)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::ActivityResponse;
    use crate::error::CopyError;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// In-memory feed that records every request it receives.
    pub(crate) struct StaticFeed {
        pub entries: Vec<ActivityResponse>,
        pub fail_with: Option<u16>,
        pub requests: Mutex<Vec<(String, u32)>>,
    }

    impl StaticFeed {
        pub(crate) fn new(entries: Vec<ActivityResponse>) -> Self {
            Self {
                entries,
                fail_with: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Self::new(Vec::new())
            }
        }
    }

    #[async_trait]
    impl ActivitySource for StaticFeed {
        async fn get_activity(&self, user: &str, limit: u32) -> Result<Vec<ActivityResponse>> {
            self.requests.lock().unwrap().push((user.to_string(), limit));
            if let Some(status) = self.fail_with {
                return Err(CopyError::Fetch {
                    endpoint: "Activity",
                    status,
                    body: "boom".to_string(),
                });
            }
            Ok(self.entries.iter().take(limit as usize).cloned().collect())
        }
    }

    pub(crate) fn entry(kind: &str, side: &str, market: &str, outcome_index: i32, title: &str) -> ActivityResponse {
        ActivityResponse {
            activity_type: kind.to_string(),
            proxy_wallet: "0xtarget".to_string(),
            condition_id: market.to_string(),
            outcome_index: Some(outcome_index),
            outcome: if outcome_index == 0 { "Up" } else { "Down" }.to_string(),
            side: side.to_string(),
            size: dec!(10),
            usdc_size: dec!(5),
            price: dec!(0.5),
            asset: format!("{}-asset-{}", market, outcome_index),
            title: title.to_string(),
            slug: String::new(),
            timestamp: 1_730_649_600,
            transaction_hash: String::new(),
        }
    }

    const BTC: &str = "Bitcoin Up or Down - Nov 3, 4PM ET";

    fn btc_filter() -> TitleFilter {
        TitleFilter::Prefix("Bitcoin Up or Down".to_string())
    }

    #[tokio::test]
    async fn test_no_buy_trades_yields_none() {
        let feed = StaticFeed::new(vec![
            entry("TRADE", "SELL", "M1", 0, BTC),
            entry("REDEEM", "", "M2", 0, BTC),
            entry("SPLIT", "", "M3", 1, BTC),
            entry("TRADE", "SELL", "M4", 1, BTC),
        ]);
        let reader = ActivityFeedReader::new(&feed, 20);

        let latest = reader
            .latest_qualifying_trade("0xtarget", |_| true)
            .await
            .unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn test_first_buy_in_feed_order_wins() {
        let mut bigger = entry("TRADE", "BUY", "M3", 1, BTC);
        bigger.size = dec!(10000);
        bigger.timestamp = 1_900_000_000;

        let feed = StaticFeed::new(vec![
            entry("MERGE", "", "M0", 0, BTC),
            entry("TRADE", "SELL", "M1", 0, BTC),
            entry("TRADE", "BUY", "M2", 0, BTC),
            bigger,
        ]);
        let reader = ActivityFeedReader::new(&feed, 20);

        let latest = reader
            .latest_qualifying_trade("0xtarget", |_| true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.market_id, "M2");
    }

    #[tokio::test]
    async fn test_title_filter_skips_other_markets() {
        let feed = StaticFeed::new(vec![
            entry("TRADE", "BUY", "ELECTION", 0, "Election Winner 2024"),
            entry("TRADE", "BUY", "BTC", 1, "Bitcoin Up or Down - Nov 3"),
        ]);
        let reader = ActivityFeedReader::new(&feed, 20);
        let filter = btc_filter();

        let latest = reader
            .latest_qualifying_trade("0xtarget", |t| filter.matches(t))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.market_id, "BTC");
        assert_eq!(latest.outcome_index, 1);
    }

    #[tokio::test]
    async fn test_side_must_be_exact_buy() {
        let feed = StaticFeed::new(vec![
            entry("TRADE", "buy", "LOWER", 0, BTC),
            entry("TRADE", " BUY", "PADDED", 0, BTC),
            entry("TRADE", "BUY", "UPPER", 0, BTC),
        ]);
        let reader = ActivityFeedReader::new(&feed, 20);

        let latest = reader
            .latest_qualifying_trade("0xtarget", |_| true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.market_id, "UPPER");
    }

    #[tokio::test]
    async fn test_requests_configured_window() {
        let feed = StaticFeed::new(Vec::new());
        let reader = ActivityFeedReader::new(&feed, 20);

        reader
            .latest_qualifying_trade("0xtarget", |_| true)
            .await
            .unwrap();

        let requests = feed.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), &[("0xtarget".to_string(), 20)]);
    }

    #[tokio::test]
    async fn test_only_window_is_scanned() {
        let feed = StaticFeed::new(vec![
            entry("TRADE", "SELL", "M1", 0, BTC),
            entry("TRADE", "SELL", "M2", 0, BTC),
            entry("TRADE", "BUY", "M3", 0, BTC),
        ]);
        let reader = ActivityFeedReader::new(&feed, 2);

        let latest = reader
            .latest_qualifying_trade("0xtarget", |_| true)
            .await
            .unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn test_feed_failure_propagates() {
        let feed = StaticFeed::failing(502);
        let reader = ActivityFeedReader::new(&feed, 20);

        let err = reader
            .latest_qualifying_trade("0xtarget", |_| true)
            .await
            .unwrap_err();
        assert!(matches!(err, CopyError::Fetch { status: 502, .. }));
    }

    #[test]
    fn test_title_filter_is_case_sensitive_prefix() {
        let filter = btc_filter();
        let mut trade = entry("TRADE", "BUY", "M", 0, BTC).to_trade().unwrap();
        assert!(filter.matches(&trade));

        trade.title = "bitcoin up or down - Nov 3".to_string();
        assert!(!filter.matches(&trade));

        trade.title = "Will Bitcoin Up or Down?".to_string();
        assert!(!filter.matches(&trade));
        assert!(TitleFilter::Any.matches(&trade));
    }
}
