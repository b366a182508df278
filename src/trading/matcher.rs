//! Membership test of a position key against the operator's holdings.

use std::collections::HashSet;

use crate::models::{Position, PositionKey};

/// Set of position keys held in one holdings snapshot.
#[derive(Debug, Clone, Default)]
pub struct PositionMatcher {
    held: HashSet<PositionKey>,
}

impl PositionMatcher {
    pub fn new<'a, I>(positions: I) -> Self
    where
        I: IntoIterator<Item = &'a Position>,
    {
        Self {
            held: positions.into_iter().map(Position::key).collect(),
        }
    }

    /// Exact match on market id and outcome index.
    pub fn holds(&self, key: &PositionKey) -> bool {
        self.held.contains(key)
    }
}

/// One-off form of [`PositionMatcher::holds`].
pub fn holds(positions: &[Position], key: &PositionKey) -> bool {
    PositionMatcher::new(positions).holds(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holdings() -> Vec<Position> {
        vec![
            Position::new("0xaaa", 0, dec!(5)),
            Position::new("0xbbb", 1, dec!(2)),
            Position::new("0xccc", 0, dec!(0)),
        ]
    }

    #[test]
    fn test_holds_exact_key() {
        let positions = holdings();
        assert!(holds(&positions, &PositionKey::new("0xaaa", 0)));
        assert!(holds(&positions, &PositionKey::new("0xbbb", 1)));
    }

    #[test]
    fn test_other_outcome_is_not_held() {
        let positions = holdings();
        assert!(!holds(&positions, &PositionKey::new("0xaaa", 1)));
        assert!(!holds(&positions, &PositionKey::new("0xbbb", 0)));
    }

    #[test]
    fn test_no_fuzzy_market_match() {
        let positions = holdings();
        assert!(!holds(&positions, &PositionKey::new("0xAAA", 0)));
        assert!(!holds(&positions, &PositionKey::new("0xaa", 0)));
        assert!(!holds(&positions, &PositionKey::new(" 0xaaa", 0)));
    }

    #[test]
    fn test_empty_holdings() {
        assert!(!holds(&[], &PositionKey::new("0xaaa", 0)));
        assert!(!PositionMatcher::new(&[]).holds(&PositionKey::new("", 0)));
    }

    #[test]
    fn test_result_independent_of_holdings_order() {
        let positions = holdings();
        let keys = [
            PositionKey::new("0xaaa", 0),
            PositionKey::new("0xaaa", 1),
            PositionKey::new("0xbbb", 1),
            PositionKey::new("0xccc", 0),
            PositionKey::new("0xddd", 0),
        ];

        let mut reversed = positions.clone();
        reversed.reverse();
        let mut rotated = positions.clone();
        rotated.rotate_left(1);

        for key in &keys {
            let expected = holds(&positions, key);
            assert_eq!(holds(&reversed, key), expected, "reversed: {}", key);
            assert_eq!(holds(&rotated, key), expected, "rotated: {}", key);
        }
    }

    #[test]
    fn test_duplicate_positions_collapse() {
        let positions = vec![
            Position::new("0xaaa", 0, dec!(1)),
            Position::new("0xaaa", 0, dec!(3)),
        ];
        let matcher = PositionMatcher::new(&positions);
        assert!(matcher.holds(&PositionKey::new("0xaaa", 0)));
        assert_eq!(matcher.held.len(), 1);
    }
}
