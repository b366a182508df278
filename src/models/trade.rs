//! Trade model representing a single fill from an account's activity feed.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }

    /// Parse the feed's side string. Only the exact upper-case tags match.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "BUY" => Some(TradeSide::Buy),
            "SELL" => Some(TradeSide::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a position: one outcome of one market.
///
/// Two trades refer to the same position iff their keys are equal. Both parts
/// compare exactly; there is no normalisation of the market id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub market_id: String,
    pub outcome_index: i32,
}

impl PositionKey {
    pub fn new(market_id: impl Into<String>, outcome_index: i32) -> Self {
        Self {
            market_id: market_id.into(),
            outcome_index,
        }
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.market_id, self.outcome_index)
    }
}

/// Trade record taken from an account's activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Market condition ID (0x-prefixed)
    pub market_id: String,

    /// Which side of the binary market (0 or 1)
    pub outcome_index: i32,

    /// Outcome label (e.g., "Up", "Down", "Yes", "No")
    pub outcome: String,

    /// Trade direction
    pub side: TradeSide,

    /// Number of outcome tokens traded
    pub size: Decimal,

    /// Price per token in USDC (0.0 to 1.0)
    pub price: Decimal,

    /// Market title for display
    #[serde(default)]
    pub title: String,

    /// Tradable token id of the outcome
    pub asset_id: String,

    /// When the trade occurred. Informational only; feed position decides recency.
    pub timestamp: DateTime<Utc>,

    /// On-chain transaction hash
    #[serde(default)]
    pub transaction_hash: String,
}

impl Trade {
    pub fn key(&self) -> PositionKey {
        PositionKey::new(self.market_id.clone(), self.outcome_index)
    }

    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }

    /// Price expressed in cents, as shown to the operator.
    pub fn price_cents(&self) -> Decimal {
        self.price * Decimal::ONE_HUNDRED
    }

    /// USDC spent or received by this fill.
    pub fn notional(&self) -> Decimal {
        self.size * self.price
    }
}
