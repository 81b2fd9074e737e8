//! Built-in dataset substituted when a whole run fetches nothing, so the
//! feature and scoring stages stay exercisable without explorer access.
//!
//! Three illustrative wallets:
//! - `0xDummyGoodWallet1`: routine engagement (cUSDC transfers plus a `repayBorrow` call)
//! - `0xDummyBadWallet2`: a `borrow` followed by two liquidations
//! - `0xDummySafeWallet3`: deposit/withdraw only (cDAI out, cUSDT in)

use rand::Rng;

use crate::config::{default_asset_contracts, Config};
use crate::types::{RawTransaction, TxDetail};

pub const GOOD_WALLET: &str = "0xDummyGoodWallet1";
pub const BAD_WALLET: &str = "0xDummyBadWallet2";
pub const SAFE_WALLET: &str = "0xDummySafeWallet3";

const LIQUIDATOR: &str = "0xLiquidator";

const USDC_UNIT: u128 = 1_000_000;
const ETHER_UNIT: u128 = 1_000_000_000_000_000_000;

/// Generate the fallback dataset. Values, hashes and timestamp offsets are drawn
/// from `rng`; `now_secs` anchors every timestamp in the past.
pub fn generate<R: Rng>(rng: &mut R, cfg: &Config, now_secs: u64) -> Vec<RawTransaction> {
    let controller = cfg.controller_address.as_str();
    let cusdc = asset_address(cfg, "cUSDC");
    let cdai = asset_address(cfg, "cDAI");
    let cusdt = asset_address(cfg, "cUSDT");

    let mut txs = Vec::new();

    for _ in 0..5 {
        let age = rng.gen_range(100_000..=1_000_000);
        txs.push(transfer(
            GOOD_WALLET,
            hash(rng, "0xDummyTxGood"),
            (GOOD_WALLET, cusdc.as_str()),
            rng.gen_range(100..=500u128) * USDC_UNIT,
            now_secs.saturating_sub(age),
            "cUSDC",
        ));
    }
    txs.push(native(
        GOOD_WALLET,
        hash(rng, "0xDummyTxGood"),
        (GOOD_WALLET, controller),
        0,
        now_secs.saturating_sub(50_000),
        "repayBorrow",
    ));

    txs.push(native(
        BAD_WALLET,
        hash(rng, "0xDummyTxBad"),
        (BAD_WALLET, controller),
        rng.gen_range(1..=5u128) * ETHER_UNIT,
        now_secs.saturating_sub(200_000),
        "borrow",
    ));
    for (offset, collateral, profit) in [(190_000, 10 * ETHER_UNIT, 50u32), (150_000, 5 * ETHER_UNIT, 20)] {
        txs.push(RawTransaction {
            wallet_address: BAD_WALLET.to_string(),
            hash: hash(rng, "0xDummyTxBad"),
            from: Some(LIQUIDATOR.to_string()),
            to: Some(controller.to_string()),
            value: Some("0".to_string()),
            timestamp: Some(now_secs.saturating_sub(offset).to_string()),
            detail: TxDetail::Liquidation {
                collateral_amount: Some(collateral.to_string()),
                profit: Some(profit.to_string()),
            },
        });
    }

    for _ in 0..3 {
        let age = rng.gen_range(50_000..=2_000_000);
        txs.push(transfer(
            SAFE_WALLET,
            hash(rng, "0xDummyTxSafe"),
            (SAFE_WALLET, cdai.as_str()),
            rng.gen_range(500..=1000u128) * ETHER_UNIT,
            now_secs.saturating_sub(age),
            "cDAI",
        ));
    }
    // USDT has 6 decimals.
    txs.push(transfer(
        SAFE_WALLET,
        hash(rng, "0xDummyTxSafe"),
        (cusdt.as_str(), SAFE_WALLET),
        rng.gen_range(10..=50u128) * USDC_UNIT,
        now_secs.saturating_sub(10_000),
        "cUSDT",
    ));

    txs
}

/// Configured address for `symbol`, else the built-in Compound address.
fn asset_address(cfg: &Config, symbol: &str) -> String {
    let defaults = default_asset_contracts();
    cfg.asset_contracts
        .iter()
        .chain(defaults.iter())
        .find(|a| a.symbol == symbol)
        .map(|a| a.address.clone())
        .unwrap_or_else(|| symbol.to_string())
}

fn hash<R: Rng>(rng: &mut R, prefix: &str) -> String {
    format!("{prefix}{}", rng.gen_range(1..=1000))
}

fn native(
    wallet: &str,
    hash: String,
    (from, to): (&str, &str),
    value: u128,
    timestamp: u64,
    function_name: &str,
) -> RawTransaction {
    RawTransaction {
        wallet_address: wallet.to_string(),
        hash,
        from: Some(from.to_string()),
        to: Some(to.to_string()),
        value: Some(value.to_string()),
        timestamp: Some(timestamp.to_string()),
        detail: TxDetail::Native {
            function_name: Some(function_name.to_string()),
        },
    }
}

fn transfer(
    wallet: &str,
    hash: String,
    (from, to): (&str, &str),
    value: u128,
    timestamp: u64,
    symbol: &str,
) -> RawTransaction {
    RawTransaction {
        wallet_address: wallet.to_string(),
        hash,
        from: Some(from.to_string()),
        to: Some(to.to_string()),
        value: Some(value.to_string()),
        timestamp: Some(timestamp.to_string()),
        detail: TxDetail::TokenTransfer {
            query_symbol: symbol.to_string(),
            token_symbol: Some(symbol.to_string()),
            token_decimal: None,
        },
    }
}
