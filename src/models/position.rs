//! Position model representing an account's current holding in one outcome.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trade::PositionKey;

/// Current position in a prediction market, as reported by the holdings feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Market condition ID
    pub market_id: String,

    /// Which side of the binary market is held
    pub outcome_index: i32,

    /// Market title for display
    #[serde(default)]
    pub title: String,

    /// Outcome token held (e.g., "Yes", "No")
    pub outcome: String,

    /// Number of outcome tokens held
    pub size: Decimal,
}

impl Position {
    #[cfg(test)]
    pub fn new(market_id: impl Into<String>, outcome_index: i32, size: Decimal) -> Self {
        Self {
            market_id: market_id.into(),
            outcome_index,
            title: String::new(),
            outcome: String::new(),
            size,
        }
    }

    pub fn key(&self) -> PositionKey {
        PositionKey::new(self.market_id.clone(), self.outcome_index)
    }

    /// Check if this position is closed (size is zero or negligible).
    ///
    /// The holdings feed is queried with a zero size threshold, so dust and
    /// fully redeemed positions still show up here.
    pub fn is_closed(&self) -> bool {
        self.size < Decimal::new(1, 6) // Less than 0.000001
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_key() {
        let pos = Position::new("0xmarket", 1, dec!(10));
        assert_eq!(pos.key(), PositionKey::new("0xmarket", 1));
    }

    #[test]
    fn test_closed_threshold() {
        assert!(Position::new("0xmarket", 0, dec!(0)).is_closed());
        assert!(Position::new("0xmarket", 0, dec!(0.0000001)).is_closed());
        assert!(!Position::new("0xmarket", 0, dec!(0.5)).is_closed());
    }
}
