//! Copy-trading configuration.
//!
//! Built once at startup from CLI flags and environment variables, then passed
//! by reference to every component. Nothing else reads the environment.

use std::fmt;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::api::{SignatureType, CLOB_URL, DATA_API_BASE, PROFILE_API_BASE};
use crate::error::{CopyError, Result};

use super::TitleFilter;

pub const DEFAULT_TARGET_ADDRESS: &str = "0x63ce342161250d705dc0b16df89036c8e5f9ba9a";
pub const DEFAULT_FUNDER_ADDRESS: &str = "0x11c6a04b48cca2d6435ca33421d0d73a74a83d41";
pub const DEFAULT_TITLE_PREFIX: &str = "Bitcoin Up or Down";
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Configuration for a single copy run.
#[derive(Clone)]
pub struct CopyConfig {
    /// Account whose trades are mirrored
    pub target_address: String,

    /// Operator account that holds funds and positions
    pub funder_address: String,

    /// Signing key; only needed when executing
    pub private_key: Option<String>,

    /// How orders are signed for the funder account
    pub signature_type: SignatureType,

    /// Fixed USDC notional spent on each copied trade
    pub bet_amount: Decimal,

    /// Simulate instead of submitting orders
    pub dry_run: bool,

    /// Which target trades are eligible for copying
    pub title_filter: TitleFilter,

    /// Print the target's trades for the copied position
    pub show_history: bool,

    /// Activity window scanned for the target's history
    pub history_limit: u32,

    /// Activity window scanned for the latest qualifying trade
    pub activity_limit: u32,

    pub chain_id: u64,
    pub data_api_url: String,
    pub gamma_api_url: String,
    pub clob_api_url: String,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            target_address: DEFAULT_TARGET_ADDRESS.to_string(),
            funder_address: DEFAULT_FUNDER_ADDRESS.to_string(),
            private_key: None,
            signature_type: SignatureType::Poly,
            bet_amount: dec!(1.0),
            dry_run: true,
            title_filter: TitleFilter::Prefix(DEFAULT_TITLE_PREFIX.to_string()),
            show_history: true,
            history_limit: 100,
            activity_limit: 20,
            chain_id: POLYGON_CHAIN_ID,
            data_api_url: DATA_API_BASE.to_string(),
            gamma_api_url: PROFILE_API_BASE.to_string(),
            clob_api_url: CLOB_URL.to_string(),
        }
    }
}

impl CopyConfig {
    /// Check values that would otherwise fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        if self.target_address.trim().is_empty() {
            return Err(CopyError::InvalidConfig("target address is empty".to_string()));
        }
        if self.funder_address.trim().is_empty() {
            return Err(CopyError::InvalidConfig("funder address is empty".to_string()));
        }
        if self.bet_amount <= Decimal::ZERO {
            return Err(CopyError::InvalidConfig(format!(
                "bet amount must be positive, got {}",
                self.bet_amount
            )));
        }
        if self.activity_limit == 0 || self.history_limit == 0 {
            return Err(CopyError::InvalidConfig(
                "activity and history limits must be at least 1".to_string(),
            ));
        }
        if !self.dry_run {
            self.require_private_key()?;
        }
        Ok(())
    }

    /// The signing key, or [`CopyError::MissingCredential`] when unset or blank.
    pub fn require_private_key(&self) -> Result<&str> {
        self.private_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CopyError::MissingCredential("POLYMARKET_PRIVATE_KEY"))
    }

    pub fn mode_label(&self) -> &'static str {
        if self.dry_run {
            "DRY RUN"
        } else {
            "LIVE"
        }
    }
}

impl fmt::Debug for CopyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyConfig")
            .field("target_address", &self.target_address)
            .field("funder_address", &self.funder_address)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("signature_type", &self.signature_type)
            .field("bet_amount", &self.bet_amount)
            .field("dry_run", &self.dry_run)
            .field("title_filter", &self.title_filter)
            .field("show_history", &self.show_history)
            .field("history_limit", &self.history_limit)
            .field("activity_limit", &self.activity_limit)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Command-line / environment surface for [`CopyConfig`].
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Wallet address of the trader to copy
    #[arg(long, global = true, env = "POLYMARKET_TARGET_ADDRESS", default_value = DEFAULT_TARGET_ADDRESS)]
    pub target: String,

    /// Your Polymarket funder (proxy wallet) address
    #[arg(long, global = true, env = "POLYMARKET_FUNDER_ADDRESS", default_value = DEFAULT_FUNDER_ADDRESS)]
    pub funder: String,

    /// Private key used to sign orders (required for live trading)
    #[arg(long, global = true, env = "POLYMARKET_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Signature type: 0=EOA, 1=Email/Magic, 2=Browser proxy
    #[arg(
        long,
        global = true,
        env = "POLYMARKET_SIGNATURE_TYPE",
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    pub signature_type: u8,

    /// Amount in USDC to spend on each copied bet
    #[arg(long, global = true, env = "POLYMARKET_BET_AMOUNT", default_value = "1.0")]
    pub bet_amount: Decimal,

    /// Preview only (true) or execute bets (false)
    #[arg(
        long,
        global = true,
        env = "POLYMARKET_DRY_RUN",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub dry_run: bool,

    /// Only copy trades whose market title starts with --title-prefix
    #[arg(
        long,
        global = true,
        env = "POLYMARKET_FILTER_TITLE",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub filter_title: bool,

    /// Market title prefix used when --filter-title is on
    #[arg(long, global = true, env = "POLYMARKET_TITLE_PREFIX", default_value = DEFAULT_TITLE_PREFIX)]
    pub title_prefix: String,

    /// Show the target's trades for the copied position
    #[arg(
        long,
        global = true,
        env = "POLYMARKET_SHOW_HISTORY",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub show_history: bool,

    /// Number of activity entries scanned for the position history
    #[arg(long, global = true, env = "POLYMARKET_HISTORY_LIMIT", default_value_t = 100)]
    pub history_limit: u32,

    /// Number of activity entries scanned for the latest bet
    #[arg(long, global = true, env = "POLYMARKET_ACTIVITY_LIMIT", default_value_t = 20)]
    pub activity_limit: u32,

    #[arg(long, global = true, env = "POLYMARKET_DATA_API_URL", default_value = DATA_API_BASE)]
    pub data_api_url: String,

    #[arg(long, global = true, env = "POLYMARKET_GAMMA_API_URL", default_value = PROFILE_API_BASE)]
    pub gamma_api_url: String,

    #[arg(long, global = true, env = "POLYMARKET_CLOB_API_URL", default_value = CLOB_URL)]
    pub clob_api_url: String,
}

impl ConfigArgs {
    /// Build and validate the run configuration.
    pub fn into_config(self) -> Result<CopyConfig> {
        let title_filter = if self.filter_title {
            TitleFilter::Prefix(self.title_prefix)
        } else {
            TitleFilter::Any
        };

        let config = CopyConfig {
            target_address: self.target,
            funder_address: self.funder,
            private_key: self.private_key,
            signature_type: SignatureType::try_from(self.signature_type)?,
            bet_amount: self.bet_amount,
            dry_run: self.dry_run,
            title_filter,
            show_history: self.show_history,
            history_limit: self.history_limit,
            activity_limit: self.activity_limit,
            chain_id: POLYGON_CHAIN_ID,
            data_api_url: self.data_api_url,
            gamma_api_url: self.gamma_api_url,
            clob_api_url: self.clob_api_url,
        };

        config.validate()?;
        Ok(config)
    }
}
