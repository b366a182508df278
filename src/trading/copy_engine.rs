//! Copy decision: turns the latest target bet and current holdings into one action.

use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{Position, PositionKey, Trade, TradeSide};

use super::holds;

/// What a run should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The target has no qualifying bet in the scanned window.
    NoQualifyingActivity,
    /// The operator already holds this position; copies are one-shot.
    AlreadyHeld(PositionKey),
    /// Spend `amount` USDC on `asset_id`.
    PlaceOrder {
        asset_id: String,
        side: TradeSide,
        amount: Decimal,
    },
}

impl Decision {
    pub fn is_place_order(&self) -> bool {
        matches!(self, Decision::PlaceOrder { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::NoQualifyingActivity => f.write_str("no qualifying activity"),
            Decision::AlreadyHeld(key) => write!(f, "already holding {}", key),
            Decision::PlaceOrder {
                asset_id,
                side,
                amount,
            } => write!(f, "{} ${} of {}", side, amount, asset_id),
        }
    }
}

/// Stateless copy decision engine.
///
/// Mirrors direction and market selection only: the order amount is always the
/// configured notional, never derived from the target's size.
#[derive(Debug, Clone)]
pub struct CopyDecisionEngine {
    amount: Decimal,
}

impl CopyDecisionEngine {
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Decide from a snapshot. Identical inputs always give identical output.
    pub fn decide(&self, latest: Option<&Trade>, holdings: &[Position]) -> Decision {
        let Some(trade) = latest else {
            return Decision::NoQualifyingActivity;
        };

        let key = trade.key();
        if holds(holdings, &key) {
            debug!(position = %key, "Position already held");
            return Decision::AlreadyHeld(key);
        }

        Decision::PlaceOrder {
            asset_id: trade.asset_id.clone(),
            side: TradeSide::Buy,
            amount: self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_trade;
    use rust_decimal_macros::dec;

    fn engine() -> CopyDecisionEngine {
        CopyDecisionEngine::new(dec!(1.0))
    }

    fn latest_m1() -> Trade {
        let mut trade = test_trade("M1", 0, TradeSide::Buy);
        trade.asset_id = "A1".to_string();
        trade
    }

    #[test]
    fn test_no_latest_trade() {
        let holdings = vec![Position::new("M1", 0, dec!(1))];
        assert_eq!(
            engine().decide(None, &holdings),
            Decision::NoQualifyingActivity
        );
        assert_eq!(engine().decide(None, &[]), Decision::NoQualifyingActivity);
    }

    #[test]
    fn test_place_order_when_not_held() {
        let latest = latest_m1();
        let decision = engine().decide(Some(&latest), &[]);

        assert_eq!(
            decision,
            Decision::PlaceOrder {
                asset_id: "A1".to_string(),
                side: TradeSide::Buy,
                amount: dec!(1.0),
            }
        );
    }

    #[test]
    fn test_already_held() {
        let latest = latest_m1();
        let holdings = vec![Position::new("M1", 0, dec!(3))];

        assert_eq!(
            engine().decide(Some(&latest), &holdings),
            Decision::AlreadyHeld(PositionKey::new("M1", 0))
        );
    }

    #[test]
    fn test_opposite_outcome_does_not_block() {
        let latest = latest_m1();
        let holdings = vec![Position::new("M1", 1, dec!(3))];
        assert!(engine().decide(Some(&latest), &holdings).is_place_order());
    }

    #[test]
    fn test_amount_ignores_target_size() {
        let mut latest = latest_m1();
        latest.size = dec!(50000);
        latest.price = dec!(0.9);

        match CopyDecisionEngine::new(dec!(2.5)).decide(Some(&latest), &[]) {
            Decision::PlaceOrder { amount, .. } => assert_eq!(amount, dec!(2.5)),
            other => panic!("expected order, got {:?}", other),
        }
    }

    #[test]
    fn test_decide_is_pure() {
        let latest = latest_m1();
        let holdings = vec![Position::new("M2", 0, dec!(1))];
        let engine = engine();

        let first = engine.decide(Some(&latest), &holdings);
        for _ in 0..5 {
            assert_eq!(engine.decide(Some(&latest), &holdings), first);
        }
    }

    #[test]
    fn test_rerun_after_fill_is_already_held() {
        let latest = latest_m1();
        let engine = engine();
        let mut holdings = vec![Position::new("M2", 1, dec!(1))];

        assert!(engine.decide(Some(&latest), &holdings).is_place_order());

        // Order filled: the next snapshot includes the copied position
        holdings.push(Position::new("M1", 0, dec!(1.92)));
        assert_eq!(
            engine.decide(Some(&latest), &holdings),
            Decision::AlreadyHeld(latest.key())
        );
    }

    #[test]
    fn test_target_sell_still_copied_as_buy() {
        let mut latest = latest_m1();
        latest.side = TradeSide::Sell;

        match engine().decide(Some(&latest), &[]) {
            Decision::PlaceOrder { side, .. } => assert_eq!(side, TradeSide::Buy),
            other => panic!("expected order, got {:?}", other),
        }
    }
}
