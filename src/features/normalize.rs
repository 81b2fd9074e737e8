use crate::types::{Category, RawTransaction};

/// A fetched record with its numeric fields coerced and addresses lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTx {
    pub wallet_address: String,
    pub hash: String,
    pub category: Category,
    /// Raw amount in the smallest unit of its currency/token. 0 when unparseable.
    pub value: f64,
    /// Seconds since epoch. `None` when missing or unparseable, so it never
    /// stretches the wallet's tenure span.
    pub timestamp: Option<f64>,
    /// 0 when missing (always the case for non-transfer records).
    pub token_decimal: f64,
    pub token_symbol: Option<String>,
    pub from_lower: Option<String>,
    pub to_lower: Option<String>,
}

impl NormalizedTx {
    /// Timestamp with the unparseable case coerced to 0.
    pub fn timestamp_or_zero(&self) -> f64 {
        self.timestamp.unwrap_or(0.0)
    }
}

/// Coerce a raw numeric string. Missing, unparseable, non-finite or negative
/// values all become `None`.
pub fn parse_amount(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

pub fn normalize(tx: &RawTransaction) -> NormalizedTx {
    NormalizedTx {
        wallet_address: tx.wallet_address.clone(),
        hash: tx.hash.clone(),
        category: tx.category(),
        value: parse_amount(tx.value.as_deref()).unwrap_or(0.0),
        timestamp: parse_amount(tx.timestamp.as_deref()),
        token_decimal: parse_amount(tx.token_decimal()).unwrap_or(0.0),
        token_symbol: tx
            .token_symbol()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        from_lower: tx.from.as_deref().map(str::to_lowercase),
        to_lower: tx.to.as_deref().map(str::to_lowercase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TxDetail;

    fn raw(value: Option<&str>, timestamp: Option<&str>, detail: TxDetail) -> RawTransaction {
        RawTransaction {
            wallet_address: "0xW".to_string(),
            hash: "0xH".to_string(),
            from: Some("0xAbC".to_string()),
            to: Some("0xDeF".to_string()),
            value: value.map(str::to_string),
            timestamp: timestamp.map(str::to_string),
            detail,
        }
    }

    #[test]
    fn parses_large_wei_amounts() {
        let v = parse_amount(Some("1000000000000000000000")).unwrap();
        assert!((v - 1e21).abs() < 1e6);
    }

    #[test]
    fn garbage_and_non_finite_amounts_are_rejected() {
        assert_eq!(parse_amount(None), None);
        assert_eq!(parse_amount(Some("")), None);
        assert_eq!(parse_amount(Some("0xabc")), None);
        assert_eq!(parse_amount(Some("NaN")), None);
        assert_eq!(parse_amount(Some("inf")), None);
        assert_eq!(parse_amount(Some("-5")), None);
        assert_eq!(parse_amount(Some(" 42 ")), Some(42.0));
    }

    #[test]
    fn native_record_gets_zero_decimals_and_lowercase_addresses() {
        let n = normalize(&raw(Some("12"), Some("1600000000"), TxDetail::Native { function_name: None }));
        assert_eq!(n.category, Category::NativeContractTx);
        assert_eq!(n.value, 12.0);
        assert_eq!(n.timestamp, Some(1_600_000_000.0));
        assert_eq!(n.token_decimal, 0.0);
        assert_eq!(n.token_symbol, None);
        assert_eq!(n.from_lower.as_deref(), Some("0xabc"));
        assert_eq!(n.to_lower.as_deref(), Some("0xdef"));
    }

    #[test]
    fn unparseable_fields_coerce_to_zero() {
        let n = normalize(&raw(
            Some("lots"),
            Some("yesterday"),
            TxDetail::TokenTransfer {
                query_symbol: "cDAI".to_string(),
                token_symbol: Some("  ".to_string()),
                token_decimal: Some("eight".to_string()),
            },
        ));
        assert_eq!(n.value, 0.0);
        assert_eq!(n.timestamp, None);
        assert_eq!(n.timestamp_or_zero(), 0.0);
        assert_eq!(n.token_decimal, 0.0);
        assert_eq!(n.token_symbol, None);
        assert_eq!(n.category, Category::TokenTransfer("cDAI".to_string()));
    }
}
