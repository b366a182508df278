//! Polymarket API clients for data fetching and order submission.
//!
//! The traits here are the boundaries the copy logic talks to; [`DataClient`]
//! and [`ClobClient`] are the network-backed implementations.

mod clob_client;
mod data_client;
mod types;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::Position;

pub use clob_client::{ClobClient, OrderResponse, SignatureType, CLOB_URL};
pub use data_client::{DataClient, DATA_API_BASE, PROFILE_API_BASE};
pub use types::*;

/// Source of an account's activity feed.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Return up to `limit` activity entries for `user`.
    ///
    /// Entries come back in upstream order: index 0 is the most recent.
    /// Callers treat this order as authoritative and never re-sort.
    async fn get_activity(&self, user: &str, limit: u32) -> Result<Vec<ActivityResponse>>;
}

/// Source of an account's current holdings.
#[async_trait]
pub trait HoldingsSource: Send + Sync {
    /// Current positions for `user`, in no particular order.
    async fn get_positions(&self, user: &str) -> Result<Vec<Position>>;
}

/// Display-name lookup for an account.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn get_profile_name(&self, address: &str) -> Result<String>;
}

/// Venue-side order submission.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit a single fill-or-kill market BUY spending `amount` USDC on `token_id`.
    async fn market_buy(&self, token_id: &str, amount: Decimal) -> Result<OrderResponse>;
}
