use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fetched transactions
// ---------------------------------------------------------------------------

/// Which query (or synthetic marker) produced a transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Native-currency transaction whose counterparty is a protocol contract.
    NativeContractTx,
    /// Token transfer returned by the per-asset query for this symbol.
    TokenTransfer(String),
    /// Liquidation marker. Only ever produced by the synthetic dataset.
    Liquidate,
}

impl Category {
    /// Native protocol calls and every token transfer count as protocol activity.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Category::NativeContractTx | Category::TokenTransfer(_))
    }

    pub fn is_token_transfer(&self) -> bool {
        matches!(self, Category::TokenTransfer(_))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::NativeContractTx => write!(f, "native_contract_tx"),
            Category::TokenTransfer(symbol) => write!(f, "token_transfer:{symbol}"),
            Category::Liquidate => write!(f, "liquidate"),
        }
    }
}

/// Shape-specific part of a fetched record.
#[derive(Debug, Clone, PartialEq)]
pub enum TxDetail {
    /// Row from the native transaction list (`txlist`).
    Native { function_name: Option<String> },
    /// Row from the per-contract token transfer list (`tokentx`).
    /// `query_symbol` is the configured symbol the query ran for; `token_symbol`
    /// is whatever the explorer reported.
    TokenTransfer {
        query_symbol: String,
        token_symbol: Option<String>,
        token_decimal: Option<String>,
    },
    /// Synthetic liquidation event with the liquidated collateral and liquidator profit.
    Liquidation {
        collateral_amount: Option<String>,
        profit: Option<String>,
    },
}

/// Compact rendering of the shape-specific fields for sample logs.
impl std::fmt::Display for TxDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        match self {
            TxDetail::Native { function_name } => write!(f, "fn={}", or_dash(function_name)),
            TxDetail::TokenTransfer {
                query_symbol,
                token_symbol,
                token_decimal,
            } => write!(
                f,
                "asset={query_symbol} token={} decimals={}",
                or_dash(token_symbol),
                or_dash(token_decimal)
            ),
            TxDetail::Liquidation {
                collateral_amount,
                profit,
            } => write!(f, "collateral={} profit={}", or_dash(collateral_amount), or_dash(profit)),
        }
    }
}

/// One record fetched for one wallet. Numeric fields stay as the explorer's raw
/// strings; coercion happens in the feature stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    /// The wallet this record was fetched for, not necessarily `from` or `to`.
    pub wallet_address: String,
    pub hash: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    /// Seconds since epoch.
    pub timestamp: Option<String>,
    pub detail: TxDetail,
}

impl RawTransaction {
    pub fn category(&self) -> Category {
        match &self.detail {
            TxDetail::Native { .. } => Category::NativeContractTx,
            TxDetail::TokenTransfer { query_symbol, .. } => {
                Category::TokenTransfer(query_symbol.clone())
            }
            TxDetail::Liquidation { .. } => Category::Liquidate,
        }
    }

    pub fn token_symbol(&self) -> Option<&str> {
        match &self.detail {
            TxDetail::TokenTransfer { token_symbol, .. } => token_symbol.as_deref(),
            _ => None,
        }
    }

    pub fn token_decimal(&self) -> Option<&str> {
        match &self.detail {
            TxDetail::TokenTransfer { token_decimal, .. } => token_decimal.as_deref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Features and scores
// ---------------------------------------------------------------------------

/// Behavioural features for one wallet that has at least one fetched record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletFeatures {
    pub wallet_address: String,
    pub total_tx_count: u64,
    pub protocol_tx_count: u64,
    pub token_transfer_count: u64,
    /// Sum of raw `value` over native protocol transactions (smallest native unit).
    pub native_value_sum: f64,
    /// Sum of raw `value` over token transfers (smallest token unit, mixed assets).
    pub token_value_sum: f64,
    pub unique_asset_count: u64,
    pub liquidation_count: u64,
    /// Whole days between the first and last timestamp.
    pub wallet_age_days: u64,
}

/// Final per-wallet output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletScore {
    pub wallet_id: String,
    pub score: u32,
}
