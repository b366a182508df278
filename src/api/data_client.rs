//! Polymarket Data API client for activity, holdings and profile lookups.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{CopyError, Result};
use crate::models::Position;
use crate::trading::CopyConfig;

use super::types::*;
use super::{ActivitySource, HoldingsSource, ProfileSource};

pub const DATA_API_BASE: &str = "https://data-api.polymarket.com";
pub const PROFILE_API_BASE: &str = "https://gamma-api.polymarket.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the read-only Polymarket APIs.
pub struct DataClient {
    client: Client,
    base_url: String,
    profile_url: String,
}

impl DataClient {
    /// Create a data client pointed at the endpoints in `config`.
    pub fn new(config: &CopyConfig) -> Result<Self> {
        Self::with_base_urls(config.data_api_url.clone(), config.gamma_api_url.clone())
    }

    /// Create with custom base URLs (for testing).
    pub fn with_base_urls(base_url: String, profile_url: String) -> Result<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            profile_url: profile_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `url` and decode the JSON body, mapping non-2xx to [`CopyError::Fetch`].
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: &str) -> Result<T> {
        debug!(url = %url, endpoint, "Fetching");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CopyError::Fetch {
                endpoint,
                status,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| CopyError::Decode { endpoint, source })
    }
}

#[async_trait]
impl ActivitySource for DataClient {
    async fn get_activity(&self, user: &str, limit: u32) -> Result<Vec<ActivityResponse>> {
        let url = format!(
            "{}/activity?user={}&limit={}",
            self.base_url,
            user,
            limit.min(500)
        );

        let entries: Vec<ActivityResponse> = self.get_json("Activity", &url).await?;
        debug!(user = %user, count = entries.len(), "Fetched activity");
        Ok(entries)
    }
}

#[async_trait]
impl HoldingsSource for DataClient {
    async fn get_positions(&self, user: &str) -> Result<Vec<Position>> {
        // sizeThreshold=0 keeps dust positions: any holding counts as "already in"
        let url = format!("{}/positions?user={}&sizeThreshold=0", self.base_url, user);

        let items: Vec<PositionResponse> = self.get_json("Positions", &url).await?;
        Ok(items.into_iter().map(Position::from).collect())
    }
}

#[async_trait]
impl ProfileSource for DataClient {
    async fn get_profile_name(&self, address: &str) -> Result<String> {
        let url = format!("{}/public-profile?address={}", self.profile_url, address);

        let profile: ProfileResponse = self.get_json("Profile", &url).await?;
        Ok(profile.display_name(address))
    }
}
