use std::path::Path;

use tracing::debug;

use crate::error::{AppError, Result};

pub const WALLET_ID_COLUMN: &str = "wallet_id";

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "ods"];

/// Read wallet ids from the `wallet_id` column of a CSV file with a header row.
/// Blank cells are skipped; order and duplicates are preserved.
/// Spreadsheet files are rejected up front with a hint to export them as CSV.
pub fn load_wallet_ids(path: &Path) -> Result<Vec<String>> {
    if is_spreadsheet(path) {
        return Err(AppError::WalletList(format!(
            "'{}' is a spreadsheet; only CSV is read. Export the sheet to CSV with a '{WALLET_ID_COLUMN}' header and set WALLETS_PATH to it",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(AppError::WalletList(format!(
            "wallet list file '{}' was not found",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let Some(column) = headers.iter().position(|h| h == WALLET_ID_COLUMN) else {
        let found: Vec<&str> = headers.iter().collect();
        return Err(AppError::WalletList(format!(
            "'{}' has no '{WALLET_ID_COLUMN}' column (found: {found:?})",
            path.display()
        )));
    };

    let mut ids = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(column) {
            Some(id) if !id.is_empty() => ids.push(id.to_string()),
            _ => debug!("skipping row {:?} with empty wallet id", record.position().map(|p| p.line())),
        }
    }
    Ok(ids)
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_wallet_column_in_order() {
        let file = write_temp("label,wallet_id\na, 0xAAA \nb,0xBBB\nc,\nd,0xAAA\n");
        let ids = load_wallet_ids(file.path()).unwrap();
        assert_eq!(ids, vec!["0xAAA", "0xBBB", "0xAAA"]);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_wallet_ids(&dir.path().join("nope.csv")).unwrap_err();
        match err {
            AppError::WalletList(msg) => assert!(msg.contains("nope.csv")),
            other => panic!("expected WalletList, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_fatal() {
        let file = write_temp("address\n0xAAA\n");
        match load_wallet_ids(file.path()) {
            Err(AppError::WalletList(msg)) => {
                assert!(msg.contains("wallet_id"));
                assert!(msg.contains("address"));
            }
            other => panic!("expected WalletList, got {other:?}"),
        }
    }

    #[test]
    fn spreadsheet_input_is_rejected_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Wallet id.xlsx");
        std::fs::write(&path, b"PK\x03\x04").unwrap();
        match load_wallet_ids(&path) {
            Err(AppError::WalletList(msg)) => {
                assert!(msg.contains("Wallet id.xlsx"));
                assert!(msg.contains("CSV"));
            }
            other => panic!("expected WalletList, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_missing_column() {
        let file = write_temp("");
        assert!(matches!(load_wallet_ids(file.path()), Err(AppError::WalletList(_))));
    }
}
