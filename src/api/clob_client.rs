//! Polymarket CLOB (Central Limit Order Book) client for order execution.
//!
//! The CLOB is Polymarket's off-chain order matching engine that settles on Polygon.
//! This client handles:
//! - L1 authentication (EIP-712 `ClobAuth` signature) to derive API credentials
//! - L2 authentication (HMAC-SHA256) for order submission
//! - Order signing using EIP-712 typed data
//! - Fill-or-kill market buys priced off the live order book

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, info, warn};

use crate::error::{CopyError, Result};
use crate::trading::CopyConfig;

use super::data_client::DEFAULT_TIMEOUT;
use super::OrderGateway;

/// CLOB API base URL
pub const CLOB_URL: &str = "https://clob.polymarket.com";

/// Polymarket CTF Exchange contract on Polygon
pub const CTF_EXCHANGE: &str = "0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E";
/// Neg Risk CTF Exchange for multi-outcome markets
pub const NEG_RISK_CTF_EXCHANGE: &str = "0xC5d563A36AE78145C45a50134d48A1215220f80a";

const CLOB_AUTH_MESSAGE: &str = "This message attests that I control the given wallet";
const DEFAULT_TICK_SIZE: Decimal = dec!(0.01);
/// Maker amounts for market buys are quoted in whole cents.
const MAKER_AMOUNT_DECIMALS: u32 = 2;
const USDC_DECIMALS: u32 = 6;

/// Order side in the CLOB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_u8(&self) -> u8 {
        match self {
            OrderSide::Buy => 0,
            OrderSide::Sell => 1,
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Good-til-cancelled limit order
    Gtc,
    /// Fill-or-kill market order
    Fok,
}

/// Signature type for CLOB orders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureType {
    /// EOA signature (plain wallet)
    Eoa = 0,
    /// Polymarket proxy signature (email / Magic login)
    Poly = 1,
    /// Polymarket proxy signature (browser wallet, gnosis safe)
    PolyGnosisSafe = 2,
}

impl SignatureType {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for SignatureType {
    type Error = CopyError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(SignatureType::Eoa),
            1 => Ok(SignatureType::Poly),
            2 => Ok(SignatureType::PolyGnosisSafe),
            other => Err(CopyError::InvalidConfig(format!(
                "signature type must be 0 (EOA), 1 (email/Magic) or 2 (browser proxy), got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignatureType::Eoa => "EOA",
            SignatureType::Poly => "email/Magic proxy",
            SignatureType::PolyGnosisSafe => "browser proxy",
        };
        write!(f, "{} ({})", self.as_u8(), label)
    }
}

/// API credentials for L2-authenticated requests.
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub api_passphrase: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("api_passphrase", &"[REDACTED]")
            .finish()
    }
}

/// Response from /auth/derive-api-key
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeriveApiKeyResponse {
    api_key: String,
    secret: String,
    passphrase: String,
}

/// Unsigned order fields, in EIP-712 struct order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderData {
    pub salt: u64,
    pub maker: Address,
    pub signer: Address,
    pub taker: Address,
    pub token_id: U256,
    pub maker_amount: U256,
    pub taker_amount: U256,
    pub expiration: U256,
    pub nonce: U256,
    pub fee_rate_bps: U256,
    pub side: OrderSide,
    pub signature_type: SignatureType,
}

/// Signed order ready for submission
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrder {
    pub salt: u64,
    pub maker: String,
    pub signer: String,
    pub taker: String,
    pub token_id: String,
    pub maker_amount: String,
    pub taker_amount: String,
    pub expiration: String,
    pub nonce: String,
    pub fee_rate_bps: String,
    pub side: OrderSide,
    pub signature_type: u8,
    pub signature: String,
}

/// Order submission request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order: SignedOrder,
    pub owner: String,
    pub order_type: OrderType,
}

/// Response from order placement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "orderID", default)]
    pub order_id: Option<String>,
    #[serde(rename = "errorMsg", default)]
    pub error_msg: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "transactionsHashes", default)]
    pub transaction_hashes: Vec<String>,
}

/// Order book entry
#[derive(Debug, Clone, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub size: Decimal,
}

/// Order book response
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub asset_id: String,
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
    #[serde(default)]
    pub tick_size: Option<Decimal>,
    #[serde(default)]
    pub neg_risk: Option<bool>,
}

/// CLOB API client for executing trades on Polymarket.
pub struct ClobClient {
    http: Client,
    base_url: String,
    signer: PrivateKeySigner,
    funder: Address,
    signature_type: SignatureType,
    chain_id: u64,
    credentials: ApiCredentials,
}

impl ClobClient {
    /// Build a client from `config` and derive API credentials from the signing key.
    ///
    /// Fails with [`CopyError::MissingCredential`] before any request is made
    /// when no private key is configured.
    pub async fn connect(config: &CopyConfig) -> Result<Self> {
        let signer = parse_signer(config.require_private_key()?)?;
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        let base_url = config.clob_api_url.trim_end_matches('/').to_string();

        let credentials = Self::derive_api_key(&http, &base_url, &signer, config.chain_id).await?;

        let client = Self::assemble(config, http, base_url, signer, credentials)?;
        info!(
            address = %client.address(),
            funder = %client.funder,
            signature_type = %client.signature_type,
            "CLOB client initialized"
        );
        Ok(client)
    }

    /// Build a client with pre-existing API credentials (no network access).
    #[cfg(test)]
    fn with_credentials(config: &CopyConfig, credentials: ApiCredentials) -> Result<Self> {
        let signer = parse_signer(config.require_private_key()?)?;
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        let base_url = config.clob_api_url.trim_end_matches('/').to_string();

        Self::assemble(config, http, base_url, signer, credentials)
    }

    fn assemble(
        config: &CopyConfig,
        http: Client,
        base_url: String,
        signer: PrivateKeySigner,
        credentials: ApiCredentials,
    ) -> Result<Self> {
        let funder = Address::from_str(&config.funder_address).map_err(|e| {
            CopyError::InvalidConfig(format!(
                "funder address {}: {}",
                config.funder_address, e
            ))
        })?;

        Ok(Self {
            http,
            base_url,
            signer,
            funder,
            signature_type: config.signature_type,
            chain_id: config.chain_id,
            credentials,
        })
    }

    /// Get the signing wallet address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Address that owns the funds. Proxy wallets hold funds apart from the key.
    pub fn maker(&self) -> Address {
        match self.signature_type {
            SignatureType::Eoa => self.address(),
            SignatureType::Poly | SignatureType::PolyGnosisSafe => self.funder,
        }
    }

    /// Derive API credentials with an L1 (EIP-712 `ClobAuth`) signature.
    async fn derive_api_key(
        http: &Client,
        base_url: &str,
        signer: &PrivateKeySigner,
        chain_id: u64,
    ) -> Result<ApiCredentials> {
        let timestamp = Utc::now().timestamp();
        let nonce = 0u64;

        let digest = typed_data_hash(
            clob_auth_domain_separator(chain_id),
            clob_auth_struct_hash(signer.address(), timestamp, nonce),
        );
        let signature = signer
            .sign_hash(&digest)
            .await
            .map_err(|e| CopyError::Signing(format!("Failed to sign CLOB auth message: {}", e)))?;

        let url = format!("{}/auth/derive-api-key", base_url);
        let resp = http
            .get(&url)
            .header("POLY_ADDRESS", signer.address().to_string())
            .header("POLY_SIGNATURE", format!("0x{}", hex::encode(signature.as_bytes())))
            .header("POLY_TIMESTAMP", timestamp.to_string())
            .header("POLY_NONCE", nonce.to_string())
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CopyError::Fetch {
                endpoint: "Derive API key",
                status,
                body,
            });
        }

        let derived: DeriveApiKeyResponse = resp.json().await.map_err(|source| CopyError::Decode {
            endpoint: "Derive API key",
            source,
        })?;

        debug!("Derived CLOB API credentials");
        Ok(ApiCredentials {
            api_key: derived.api_key,
            api_secret: derived.secret,
            api_passphrase: derived.passphrase,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: &str) -> Result<T> {
        let resp = self.http.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CopyError::Fetch {
                endpoint,
                status,
                body,
            });
        }

        resp.json()
            .await
            .map_err(|source| CopyError::Decode { endpoint, source })
    }

    /// Get order book for a token.
    pub async fn get_order_book(&self, token_id: &str) -> Result<OrderBook> {
        let url = format!("{}/book?token_id={}", self.base_url, token_id);
        self.get_json("Order book", &url).await
    }

    /// Whether the token trades on the neg-risk exchange. Books usually carry
    /// the flag; the dedicated endpoint is only asked when they do not.
    async fn is_neg_risk(&self, token_id: &str, book: &OrderBook) -> Result<bool> {
        if let Some(flag) = book.neg_risk {
            return Ok(flag);
        }

        #[derive(Deserialize)]
        struct NegRiskResponse {
            neg_risk: bool,
        }

        let url = format!("{}/neg-risk?token_id={}", self.base_url, token_id);
        let resp: NegRiskResponse = self.get_json("Neg risk", &url).await?;
        Ok(resp.neg_risk)
    }

    /// Taker fee rate the market requires on signed orders.
    async fn get_fee_rate_bps(&self, token_id: &str) -> Result<u64> {
        #[derive(Deserialize)]
        struct FeeRateResponse {
            #[serde(alias = "base_fee", alias = "baseFee", alias = "fee_rate_bps")]
            fee: Option<u64>,
        }

        let url = format!("{}/fee-rate?token_id={}", self.base_url, token_id);
        let resp: FeeRateResponse = self.get_json("Fee rate", &url).await?;
        Ok(resp.fee.unwrap_or(0))
    }

    /// Place a fill-or-kill market buy spending `amount` USDC.
    pub async fn market_buy(&self, token_id: &str, amount: Decimal) -> Result<OrderResponse> {
        let book = self.get_order_book(token_id).await?;

        let price = market_buy_price(&book.asks, amount).ok_or_else(|| {
            CopyError::Order(format!(
                "Not enough liquidity on the book to fill ${} of {}",
                amount, token_id
            ))
        })?;
        let tick_size = book.tick_size.unwrap_or(DEFAULT_TICK_SIZE);
        let neg_risk = self.is_neg_risk(token_id, &book).await?;
        let fee_rate_bps = self.get_fee_rate_bps(token_id).await?;

        let order = self.build_market_buy(token_id, amount, price, tick_size, fee_rate_bps)?;
        debug!(
            token_id = %token_id,
            price = %price,
            maker_amount = %order.maker_amount,
            taker_amount = %order.taker_amount,
            neg_risk,
            "Built market buy"
        );

        let signed = self.sign_order(&order, neg_risk).await?;
        self.post_order(signed, OrderType::Fok).await
    }

    /// Build the unsigned order for a market buy at `price`.
    pub fn build_market_buy(
        &self,
        token_id: &str,
        amount: Decimal,
        price: Decimal,
        tick_size: Decimal,
        fee_rate_bps: u64,
    ) -> Result<OrderData> {
        let (maker_amount, taker_amount) = market_buy_amounts(amount, price, tick_size)?;

        let token_id = U256::from_str(token_id)
            .map_err(|e| CopyError::Order(format!("Invalid token id {}: {}", token_id, e)))?;

        Ok(OrderData {
            salt: generate_salt(),
            maker: self.maker(),
            signer: self.address(),
            taker: Address::ZERO,
            token_id,
            maker_amount: to_base_units(maker_amount)?,
            taker_amount: to_base_units(taker_amount)?,
            // FOK orders never rest on the book
            expiration: U256::ZERO,
            nonce: U256::ZERO,
            fee_rate_bps: U256::from(fee_rate_bps),
            side: OrderSide::Buy,
            signature_type: self.signature_type,
        })
    }

    /// Sign an order using EIP-712 typed data.
    async fn sign_order(&self, order: &OrderData, neg_risk: bool) -> Result<SignedOrder> {
        let exchange = if neg_risk {
            NEG_RISK_CTF_EXCHANGE
        } else {
            CTF_EXCHANGE
        };
        let verifying_contract = Address::from_str(exchange)
            .map_err(|e| CopyError::Signing(format!("Invalid exchange address: {}", e)))?;

        let digest = typed_data_hash(
            exchange_domain_separator(self.chain_id, verifying_contract),
            order_struct_hash(order),
        );

        let signature = self
            .signer
            .sign_hash(&digest)
            .await
            .map_err(|e| CopyError::Signing(format!("Failed to sign order: {}", e)))?;

        Ok(SignedOrder {
            salt: order.salt,
            maker: order.maker.to_string(),
            signer: order.signer.to_string(),
            taker: order.taker.to_string(),
            token_id: order.token_id.to_string(),
            maker_amount: order.maker_amount.to_string(),
            taker_amount: order.taker_amount.to_string(),
            expiration: order.expiration.to_string(),
            nonce: order.nonce.to_string(),
            fee_rate_bps: order.fee_rate_bps.to_string(),
            side: order.side,
            signature_type: order.signature_type.as_u8(),
            signature: format!("0x{}", hex::encode(signature.as_bytes())),
        })
    }

    /// Submit a signed order with L2 authentication. Single attempt.
    async fn post_order(&self, order: SignedOrder, order_type: OrderType) -> Result<OrderResponse> {
        let payload = OrderPayload {
            order,
            owner: self.credentials.api_key.clone(),
            order_type,
        };
        let body = serde_json::to_string(&payload)
            .map_err(|e| CopyError::Order(format!("Failed to encode order: {}", e)))?;

        let path = "/order";
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_l2_request(
            &self.credentials.api_secret,
            "POST",
            path,
            &timestamp,
            Some(&body),
        )?;

        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .header("POLY_ADDRESS", self.address().to_string())
            .header("POLY_SIGNATURE", signature)
            .header("POLY_TIMESTAMP", &timestamp)
            .header("POLY_API_KEY", &self.credentials.api_key)
            .header("POLY_PASSPHRASE", &self.credentials.api_passphrase)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CopyError::Fetch {
                endpoint: "Order placement",
                status,
                body,
            });
        }

        let result: OrderResponse = resp.json().await.map_err(|source| CopyError::Decode {
            endpoint: "Order placement",
            source,
        })?;

        if result.success {
            info!(order_id = ?result.order_id, status = ?result.status, "Order posted");
        } else {
            warn!(error = %result.error_msg, "Order rejected by CLOB");
        }
        Ok(result)
    }
}

#[async_trait]
impl OrderGateway for ClobClient {
    async fn market_buy(&self, token_id: &str, amount: Decimal) -> Result<OrderResponse> {
        ClobClient::market_buy(self, token_id, amount).await
    }
}

impl fmt::Debug for ClobClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClobClient")
            .field("address", &self.address())
            .field("funder", &self.funder)
            .field("signature_type", &self.signature_type)
            .finish()
    }
}

fn parse_signer(private_key: &str) -> Result<PrivateKeySigner> {
    let pk = private_key.strip_prefix("0x").unwrap_or(private_key);
    PrivateKeySigner::from_str(pk)
        .map_err(|e| CopyError::InvalidConfig(format!("Invalid private key: {}", e)))
}

/// Worst ask price needed to fill `amount` USDC, walking asks from the best.
///
/// Returns `None` when the whole ask side cannot cover `amount`; a fill-or-kill
/// order at any price would be killed.
pub fn market_buy_price(asks: &[BookLevel], amount: Decimal) -> Option<Decimal> {
    let mut levels: Vec<&BookLevel> = asks.iter().collect();
    levels.sort_by(|a, b| a.price.cmp(&b.price));

    let mut notional = Decimal::ZERO;
    for level in levels {
        notional += level.price * level.size;
        if notional >= amount {
            return Some(level.price);
        }
    }
    None
}

/// USDC paid (maker) and shares received (taker) for a market buy.
///
/// The price is rounded to the market tick; share amounts carry two more
/// decimals than the tick.
fn market_buy_amounts(amount: Decimal, price: Decimal, tick_size: Decimal) -> Result<(Decimal, Decimal)> {
    let price_decimals = tick_size.normalize().scale();
    let price = price.round_dp(price_decimals);
    if price <= Decimal::ZERO || price >= Decimal::ONE {
        return Err(CopyError::Order(format!("Price {} outside (0, 1)", price)));
    }

    let maker = amount.round_dp_with_strategy(MAKER_AMOUNT_DECIMALS, RoundingStrategy::ToZero);
    if maker <= Decimal::ZERO {
        return Err(CopyError::Order(format!("Amount {} rounds to zero", amount)));
    }
    let taker = (maker / price).round_dp_with_strategy(price_decimals + 2, RoundingStrategy::ToZero);

    Ok((maker, taker))
}

/// Convert decimal USDC/share amounts to 6-decimal base units.
fn to_base_units(amount: Decimal) -> Result<U256> {
    let scaled = (amount * Decimal::from(10u64.pow(USDC_DECIMALS))).trunc();
    scaled
        .to_u128()
        .map(U256::from)
        .ok_or_else(|| CopyError::Order(format!("Amount {} cannot be encoded", amount)))
}

/// Random salt that stays within JSON's safe integer range.
fn generate_salt() -> u64 {
    uuid::Uuid::new_v4().as_u64_pair().0 & 0x001F_FFFF_FFFF_FFFF
}

fn encode_address(addr: Address) -> [u8; 32] {
    let mut buf = [0u8; 32];
    buf[12..].copy_from_slice(addr.as_slice());
    buf
}

fn encode_uint256(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

fn encode_uint8(value: u8) -> [u8; 32] {
    let mut buf = [0u8; 32];
    buf[31] = value;
    buf
}

/// keccak256("\x19\x01" ‖ domainSeparator ‖ structHash)
fn typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut message = vec![0x19, 0x01];
    message.extend_from_slice(domain_separator.as_slice());
    message.extend_from_slice(struct_hash.as_slice());
    keccak256(&message)
}

fn clob_auth_domain_separator(chain_id: u64) -> B256 {
    let type_hash = keccak256(b"EIP712Domain(string name,string version,uint256 chainId)");

    let mut encoded = Vec::with_capacity(32 * 4);
    encoded.extend_from_slice(type_hash.as_slice());
    encoded.extend_from_slice(keccak256(b"ClobAuthDomain").as_slice());
    encoded.extend_from_slice(keccak256(b"1").as_slice());
    encoded.extend_from_slice(&encode_uint256(U256::from(chain_id)));
    keccak256(&encoded)
}

fn clob_auth_struct_hash(address: Address, timestamp: i64, nonce: u64) -> B256 {
    let type_hash =
        keccak256(b"ClobAuth(address address,string timestamp,uint256 nonce,string message)");

    let mut encoded = Vec::with_capacity(32 * 5);
    encoded.extend_from_slice(type_hash.as_slice());
    encoded.extend_from_slice(&encode_address(address));
    encoded.extend_from_slice(keccak256(timestamp.to_string().as_bytes()).as_slice());
    encoded.extend_from_slice(&encode_uint256(U256::from(nonce)));
    encoded.extend_from_slice(keccak256(CLOB_AUTH_MESSAGE.as_bytes()).as_slice());
    keccak256(&encoded)
}

fn exchange_domain_separator(chain_id: u64, verifying_contract: Address) -> B256 {
    let type_hash = keccak256(
        b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
    );

    let mut encoded = Vec::with_capacity(32 * 5);
    encoded.extend_from_slice(type_hash.as_slice());
    encoded.extend_from_slice(keccak256(b"Polymarket CTF Exchange").as_slice());
    encoded.extend_from_slice(keccak256(b"1").as_slice());
    encoded.extend_from_slice(&encode_uint256(U256::from(chain_id)));
    encoded.extend_from_slice(&encode_address(verifying_contract));
    keccak256(&encoded)
}

fn order_struct_hash(order: &OrderData) -> B256 {
    let type_hash = keccak256(
        b"Order(uint256 salt,address maker,address signer,address taker,uint256 tokenId,uint256 makerAmount,uint256 takerAmount,uint256 expiration,uint256 nonce,uint256 feeRateBps,uint8 side,uint8 signatureType)",
    );

    let mut encoded = Vec::with_capacity(32 * 13);
    encoded.extend_from_slice(type_hash.as_slice());
    encoded.extend_from_slice(&encode_uint256(U256::from(order.salt)));
    encoded.extend_from_slice(&encode_address(order.maker));
    encoded.extend_from_slice(&encode_address(order.signer));
    encoded.extend_from_slice(&encode_address(order.taker));
    encoded.extend_from_slice(&encode_uint256(order.token_id));
    encoded.extend_from_slice(&encode_uint256(order.maker_amount));
    encoded.extend_from_slice(&encode_uint256(order.taker_amount));
    encoded.extend_from_slice(&encode_uint256(order.expiration));
    encoded.extend_from_slice(&encode_uint256(order.nonce));
    encoded.extend_from_slice(&encode_uint256(order.fee_rate_bps));
    encoded.extend_from_slice(&encode_uint8(order.side.as_u8()));
    encoded.extend_from_slice(&encode_uint8(order.signature_type.as_u8()));
    keccak256(&encoded)
}

/// HMAC-SHA256 over `timestamp + method + path + body`, URL-safe base64 encoded.
fn sign_l2_request(
    secret: &str,
    method: &str,
    path: &str,
    timestamp: &str,
    body: Option<&str>,
) -> Result<String> {
    use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};

    let message = format!("{}{}{}{}", timestamp, method, path, body.unwrap_or(""));

    let secret_bytes = URL_SAFE
        .decode(secret)
        .or_else(|_| URL_SAFE_NO_PAD.decode(secret))
        .or_else(|_| STANDARD.decode(secret))
        .map_err(|e| CopyError::Signing(format!("Invalid API secret encoding: {}", e)))?;

    let mut mac = Hmac::<Sha256>::new_from_slice(&secret_bytes)
        .map_err(|e| CopyError::Signing(format!("Failed to create HMAC: {}", e)))?;
    mac.update(message.as_bytes());

    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}
