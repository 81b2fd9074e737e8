use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{AssetContract, Config};
use crate::error::{AppError, Result};
use crate::types::{RawTransaction, TxDetail};

/// Explorer message for a successful query with zero rows. Not an error.
const NO_TRANSACTIONS_FOUND: &str = "No transactions found";

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Envelope shared by every explorer endpoint. `result` is an array of rows on
/// success and a bare string (e.g. "Invalid API Key") on failure.
#[derive(Debug, Deserialize)]
pub struct ExplorerEnvelope {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// One row from `txlist` or `tokentx`. Fields are optional because the two
/// endpoints return different subsets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTx {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub time_stamp: Option<String>,
    pub function_name: Option<String>,
    pub token_symbol: Option<String>,
    pub token_decimal: Option<String>,
}

/// Unpack an envelope into rows. "No transactions found" is an empty success;
/// any other non-"1" status becomes `AppError::ExplorerApi`.
pub fn parse_envelope(envelope: ExplorerEnvelope) -> Result<Vec<ExplorerTx>> {
    match envelope.status.as_str() {
        "1" => Ok(serde_json::from_value(envelope.result)?),
        "0" if envelope.message == NO_TRANSACTIONS_FOUND => Ok(Vec::new()),
        _ => {
            let detail = match &envelope.result {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            Err(AppError::ExplorerApi(format!(
                "status={} message={:?} result={:?}",
                envelope.status, envelope.message, detail
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Explorer client
// ---------------------------------------------------------------------------

/// The two query shapes the fetcher needs from a block explorer.
pub trait ExplorerApi {
    /// Native transactions where `wallet` is sender or recipient.
    async fn native_transactions(&self, wallet: &str) -> Result<Vec<ExplorerTx>>;

    /// Token transfers of the token at `contract` where `wallet` is sender or recipient.
    async fn token_transfers(&self, wallet: &str, contract: &str) -> Result<Vec<ExplorerTx>>;
}

/// Etherscan-style HTTP client (`module=account`, `action=txlist|tokentx`).
pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    start_block: u64,
    end_block: u64,
}

impl ExplorerClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.http_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.explorer_api_url.clone(),
            api_key: cfg.explorer_api_key.clone(),
            start_block: cfg.start_block,
            end_block: cfg.end_block,
        })
    }

    async fn query(&self, action: &str, wallet: &str, contract: Option<&str>) -> Result<Vec<ExplorerTx>> {
        let mut params: Vec<(&str, String)> = vec![
            ("module", "account".to_string()),
            ("action", action.to_string()),
            ("address", wallet.to_string()),
        ];
        if let Some(contract) = contract {
            params.push(("contractaddress", contract.to_string()));
        }
        params.extend([
            ("startblock", self.start_block.to_string()),
            ("endblock", self.end_block.to_string()),
            ("sort", "asc".to_string()),
            ("apikey", self.api_key.clone()),
        ]);

        let envelope: ExplorerEnvelope = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_envelope(envelope)
    }
}

impl ExplorerApi for ExplorerClient {
    async fn native_transactions(&self, wallet: &str) -> Result<Vec<ExplorerTx>> {
        self.query("txlist", wallet, None).await
    }

    async fn token_transfers(&self, wallet: &str, contract: &str) -> Result<Vec<ExplorerTx>> {
        self.query("tokentx", wallet, Some(contract)).await
    }
}

// ---------------------------------------------------------------------------
// Transaction fetcher
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FetchStats {
    pub wallets: usize,
    /// Native rows whose counterparty is a protocol contract.
    pub native_kept: usize,
    /// Native rows dropped because neither side is a protocol contract.
    pub native_unrelated: usize,
    pub token_transfers: usize,
    /// Sub-queries (native or per-asset) that errored and contributed nothing.
    pub failed_queries: usize,
}

/// Collects protocol-related records for each wallet, one explorer call at a time.
pub struct TransactionFetcher<A> {
    api: A,
    assets: Vec<AssetContract>,
    /// Lowercased controller + asset addresses.
    protocol_contracts: HashSet<String>,
    request_delay: Duration,
    wallet_delay: Duration,
}

impl<A: ExplorerApi> TransactionFetcher<A> {
    pub fn new(api: A, cfg: &Config) -> Self {
        Self {
            api,
            assets: cfg.asset_contracts.clone(),
            protocol_contracts: cfg.protocol_contracts(),
            request_delay: cfg.request_delay,
            wallet_delay: cfg.wallet_delay,
        }
    }

    /// Fetch every distinct wallet in order. Duplicate ids are queried once.
    pub async fn fetch_all(&self, wallets: &[String]) -> (Vec<RawTransaction>, FetchStats) {
        let mut stats = FetchStats::default();
        let mut seen = HashSet::new();
        let mut all = Vec::new();

        let distinct: Vec<&String> = wallets.iter().filter(|w| seen.insert(w.as_str())).collect();
        let total = distinct.len();

        for (i, wallet) in distinct.into_iter().enumerate() {
            let before = all.len();
            self.fetch_wallet(wallet, &mut stats, &mut all).await;
            stats.wallets += 1;
            debug!(
                wallet = %wallet,
                records = all.len() - before,
                "[FETCH] wallet {}/{} done",
                i + 1,
                total
            );
            if (i + 1) % 10 == 0 || i + 1 == total {
                info!("[FETCH] progress {}/{} wallets, {} records so far", i + 1, total, all.len());
            }
            tokio::time::sleep(self.wallet_delay).await;
        }

        (all, stats)
    }

    /// Native protocol transactions followed by one token-transfer query per asset.
    /// A failed sub-query is logged and contributes zero records.
    pub async fn fetch_wallet(&self, wallet: &str, stats: &mut FetchStats, out: &mut Vec<RawTransaction>) {
        match self.api.native_transactions(wallet).await {
            Ok(rows) => {
                for row in rows {
                    if self.touches_protocol(&row) {
                        stats.native_kept += 1;
                        out.push(native_record(wallet, row));
                    } else {
                        stats.native_unrelated += 1;
                    }
                }
            }
            Err(e) => {
                stats.failed_queries += 1;
                warn!(wallet = %wallet, "[FETCH] native transaction query failed: {e}");
            }
        }
        tokio::time::sleep(self.request_delay).await;

        for asset in &self.assets {
            match self.api.token_transfers(wallet, &asset.address).await {
                Ok(rows) => {
                    stats.token_transfers += rows.len();
                    out.extend(rows.into_iter().map(|row| transfer_record(wallet, &asset.symbol, row)));
                }
                Err(e) => {
                    stats.failed_queries += 1;
                    warn!(
                        wallet = %wallet,
                        asset = %asset.symbol,
                        "[FETCH] token transfer query failed: {e}"
                    );
                }
            }
            tokio::time::sleep(self.request_delay).await;
        }
    }

    /// True when either side of the row is the controller or an asset contract.
    fn touches_protocol(&self, row: &ExplorerTx) -> bool {
        [row.to.as_deref(), row.from.as_deref()]
            .into_iter()
            .flatten()
            .any(|addr| self.protocol_contracts.contains(&addr.to_lowercase()))
    }
}

fn native_record(wallet: &str, row: ExplorerTx) -> RawTransaction {
    RawTransaction {
        wallet_address: wallet.to_string(),
        hash: row.hash.unwrap_or_default(),
        from: row.from,
        to: row.to,
        value: row.value,
        timestamp: row.time_stamp,
        detail: TxDetail::Native {
            function_name: row.function_name,
        },
    }
}

fn transfer_record(wallet: &str, symbol: &str, row: ExplorerTx) -> RawTransaction {
    RawTransaction {
        wallet_address: wallet.to_string(),
        hash: row.hash.unwrap_or_default(),
        from: row.from,
        to: row.to,
        value: row.value,
        timestamp: row.time_stamp,
        detail: TxDetail::TokenTransfer {
            query_symbol: symbol.to_string(),
            token_symbol: row.token_symbol,
            token_decimal: row.token_decimal,
        },
    }
}
