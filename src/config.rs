use std::collections::HashSet;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const EXPLORER_API_URL: &str = "https://api.etherscan.io/api";

/// Compound v2 Comptroller (mainnet).
pub const DEFAULT_CONTROLLER_ADDRESS: &str = "0x3d9819210a31b402932df2a9bcf0798ee3ad0f9e";

/// Compound v2 cToken markets (mainnet), in the order they are queried.
pub const DEFAULT_ASSET_CONTRACTS: &[(&str, &str)] = &[
    ("cUSDC", "0x39aa39c021dfbae8fae8a5ddf309899ef88b8e07"),
    ("cDAI", "0x5d3a53686de40e2d11ae0b98fbc1855a0210f344"),
    ("cETH", "0x4ddc2d193948926d02f9b1fe9e1da681be2d7b80"),
    ("cWBTC", "0xc11b1268c1a3848e23fbc0cf5f1a53d6c7c6792f"),
    ("cUSDT", "0xf650c3d88d12db855b8bf7d11be6c55a4e07dcc9"),
];

/// Highest block the explorer accepts as an open-ended `endblock`.
pub const DEFAULT_END_BLOCK: u64 = 99_999_999;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Score weights and bounds.
pub mod scoring {
    /// Starting point for every active wallet, and the flat score for inactive ones.
    pub const BASE_SCORE: f64 = 500.0;
    pub const DEFAULT_SCORE: u32 = 500;

    pub const PROTOCOL_TX_WEIGHT: f64 = 150.0;
    pub const WALLET_AGE_WEIGHT: f64 = 100.0;
    pub const NATIVE_VALUE_WEIGHT: f64 = 100.0;
    pub const UNIQUE_ASSET_WEIGHT: f64 = 50.0;

    /// Absolute, unnormalized penalty per liquidation event.
    pub const LIQUIDATION_PENALTY: f64 = 400.0;
    pub const LIQUIDATION_PENALTY_CAP: f64 = 800.0;

    pub const MIN_SCORE: u32 = 0;
    pub const MAX_SCORE: u32 = 1000;

    /// Distribution report: ten buckets of this width, the last one closed at MAX_SCORE.
    pub const BUCKET_WIDTH: u32 = 100;
    pub const BUCKET_COUNT: usize = 10;
}

/// One asset-specific token contract queried for token transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetContract {
    pub symbol: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub explorer_api_url: String,
    /// Explorer credential (EXPLORER_API_KEY). Empty means every query will be rejected upstream.
    pub explorer_api_key: String,
    pub controller_address: String,
    /// Symbol → contract table (ASSET_CONTRACTS, `SYMBOL=0xaddr` comma-separated).
    pub asset_contracts: Vec<AssetContract>,
    pub wallets_path: String,
    pub output_path: String,
    pub start_block: u64,
    pub end_block: u64,
    /// Pause after every explorer call (REQUEST_DELAY_MS).
    pub request_delay: Duration,
    /// Extra pause after each wallet's queries (WALLET_DELAY_MS).
    pub wallet_delay: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let asset_contracts = match std::env::var("ASSET_CONTRACTS") {
            Ok(raw) => parse_asset_contracts(&raw)?,
            Err(_) => default_asset_contracts(),
        };

        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            explorer_api_url: std::env::var("EXPLORER_API_URL")
                .unwrap_or_else(|_| EXPLORER_API_URL.to_string()),
            explorer_api_key: std::env::var("EXPLORER_API_KEY").unwrap_or_default(),
            controller_address: std::env::var("CONTROLLER_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_CONTROLLER_ADDRESS.to_string()),
            asset_contracts,
            wallets_path: std::env::var("WALLETS_PATH")
                .unwrap_or_else(|_| "wallet_ids.csv".to_string()),
            output_path: std::env::var("OUTPUT_PATH")
                .unwrap_or_else(|_| "wallet_risk_scores.csv".to_string()),
            start_block: env_u64("START_BLOCK", 0)?,
            end_block: env_u64("END_BLOCK", DEFAULT_END_BLOCK)?,
            request_delay: Duration::from_millis(env_u64("REQUEST_DELAY_MS", 200)?),
            wallet_delay: Duration::from_millis(env_u64("WALLET_DELAY_MS", 500)?),
            http_timeout: Duration::from_secs(env_u64("HTTP_TIMEOUT_SECS", 30)?),
        })
    }

    /// Lowercased controller + asset addresses, for case-insensitive counterparty checks.
    pub fn protocol_contracts(&self) -> HashSet<String> {
        std::iter::once(self.controller_address.as_str())
            .chain(self.asset_contracts.iter().map(|a| a.address.as_str()))
            .map(|addr| addr.to_lowercase())
            .collect()
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => parse_u64(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}

pub fn default_asset_contracts() -> Vec<AssetContract> {
    DEFAULT_ASSET_CONTRACTS
        .iter()
        .map(|(symbol, address)| AssetContract {
            symbol: symbol.to_string(),
            address: address.to_string(),
        })
        .collect()
}

/// Parse `cUSDC=0x39aa…,cDAI=0x5d3a…` into an ordered asset table.
pub fn parse_asset_contracts(raw: &str) -> Result<Vec<AssetContract>> {
    let mut assets = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((symbol, address)) = entry.split_once('=') else {
            return Err(AppError::Config(format!(
                "ASSET_CONTRACTS entry {entry:?} must look like SYMBOL=0xaddress"
            )));
        };
        let (symbol, address) = (symbol.trim(), address.trim());
        if symbol.is_empty() || address.is_empty() {
            return Err(AppError::Config(format!(
                "ASSET_CONTRACTS entry {entry:?} has an empty symbol or address"
            )));
        }
        assets.push(AssetContract {
            symbol: symbol.to_string(),
            address: address.to_string(),
        });
    }
    if assets.is_empty() {
        return Err(AppError::Config("ASSET_CONTRACTS is set but lists no contracts".to_string()));
    }
    Ok(assets)
}

#[cfg(test)]
impl Config {
    /// Default table with no delays, for exercising the pipeline offline.
    pub fn for_tests() -> Self {
        Self {
            log_level: "debug".to_string(),
            explorer_api_url: EXPLORER_API_URL.to_string(),
            explorer_api_key: "test-key".to_string(),
            controller_address: DEFAULT_CONTROLLER_ADDRESS.to_string(),
            asset_contracts: default_asset_contracts(),
            wallets_path: "wallet_ids.csv".to_string(),
            output_path: "wallet_risk_scores.csv".to_string(),
            start_block: 0,
            end_block: DEFAULT_END_BLOCK,
            request_delay: Duration::ZERO,
            wallet_delay: Duration::ZERO,
            http_timeout: Duration::from_secs(1),
        }
    }
}
