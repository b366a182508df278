//! API response types for the Polymarket Data and Gamma APIs.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::models::{Position, PositionKey, Trade, TradeSide};

/// Activity type tag carried by trade entries.
pub const ACTIVITY_TRADE: &str = "TRADE";

/// Activity entry from /activity endpoint.
///
/// The feed mixes trades with splits, merges, redemptions and rewards. Only
/// `type` is guaranteed; non-trade entries omit side, price and asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub proxy_wallet: String,
    #[serde(default)]
    pub condition_id: String,
    #[serde(default)]
    pub outcome_index: Option<i32>,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub size: Decimal,
    #[serde(default)]
    pub usdc_size: Decimal,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub transaction_hash: String,
}

impl ActivityResponse {
    pub fn is_trade(&self) -> bool {
        self.activity_type == ACTIVITY_TRADE
    }

    /// Whether this is a trade on `key`, whatever its side.
    ///
    /// Entries without an outcome index never match.
    pub fn is_trade_on(&self, key: &PositionKey) -> bool {
        self.is_trade()
            && self.condition_id == key.market_id
            && self.outcome_index == Some(key.outcome_index)
    }

    /// Convert a trade entry into a [`Trade`]. Non-trade entries, trades with
    /// an unrecognised side and trades without an outcome index yield `None`.
    pub fn to_trade(&self) -> Option<Trade> {
        if !self.is_trade() {
            return None;
        }
        let outcome_index = self.outcome_index?;

        let Some(side) = TradeSide::parse(&self.side) else {
            warn!(side = %self.side, tx = %self.transaction_hash, "Unknown trade side");
            return None;
        };

        Some(Trade {
            market_id: self.condition_id.clone(),
            outcome_index,
            outcome: self.outcome.clone(),
            side,
            size: self.size,
            price: self.price,
            title: self.title.clone(),
            asset_id: self.asset.clone(),
            timestamp: timestamp_to_utc(self.timestamp),
            transaction_hash: self.transaction_hash.clone(),
        })
    }
}

fn timestamp_to_utc(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

/// Position response from /positions endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    #[serde(default)]
    pub proxy_wallet: String,
    pub condition_id: String,
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub outcome: String,
    pub outcome_index: i32,
    #[serde(default)]
    pub size: Decimal,
    #[serde(default)]
    pub avg_price: Decimal,
    #[serde(default)]
    pub cur_price: Decimal,
    #[serde(default)]
    pub current_value: Decimal,
}

impl From<PositionResponse> for Position {
    fn from(p: PositionResponse) -> Self {
        Position {
            market_id: p.condition_id,
            outcome_index: p.outcome_index,
            title: p.title,
            outcome: p.outcome,
            size: p.size,
        }
    }
}

/// Public profile from the Gamma /public-profile endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pseudonym: Option<String>,
}

impl ProfileResponse {
    /// Display name: profile name, then pseudonym, then a shortened address.
    pub fn display_name(&self, address: &str) -> String {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.pseudonym.as_deref().filter(|p| !p.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| short_address(address))
    }
}

/// First ten characters of an address followed by an ellipsis.
pub fn short_address(address: &str) -> String {
    let head: String = address.chars().take(10).collect();
    format!("{}...", head)
}
