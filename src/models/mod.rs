//! Data models for trades and positions.

mod position;
mod trade;

pub use position::Position;
pub use trade::{PositionKey, Trade, TradeSide};

#[cfg(test)]
pub(crate) use trade::tests::trade as test_trade;
