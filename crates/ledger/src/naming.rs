use std::collections::BTreeMap;

/// Name given to a ledger whose file name carries no recognisable pair.
pub const UNKNOWN_INSTRUMENT: &str = "UNKNOWN";

/// Finds the six-character pair code in a file stem such as
/// `GBPJPY_backtest_2024`.
pub fn extract_asset_name(stem: &str) -> Option<&str> {
    stem.split('_').find(|part| {
        part.chars().count() == 6
            && !part.chars().any(char::is_lowercase)
            && part.chars().any(char::is_uppercase)
    })
}

/// Resolves the display name for a ledger file: an explicit alias wins,
/// then the pair code from the stem.
pub fn instrument_name(stem: &str, aliases: &BTreeMap<String, String>) -> String {
    if let Some(alias) = aliases.get(stem) {
        return alias.clone();
    }
    extract_asset_name(stem)
        .unwrap_or(UNKNOWN_INSTRUMENT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_pair_code_in_any_position() {
        assert_eq!(extract_asset_name("GBPJPY_2024_backtest"), Some("GBPJPY"));
        assert_eq!(extract_asset_name("backtest_EURUSD_v2"), Some("EURUSD"));
        assert_eq!(extract_asset_name("US30_strategy"), None);
        assert_eq!(extract_asset_name("gbpjpy_2024"), None);
        // Digits alone are not a pair.
        assert_eq!(extract_asset_name("202401_trades"), None);
    }

    #[test]
    fn alias_takes_precedence() {
        let aliases = BTreeMap::from([("nikkei_run_3".to_string(), "JP225".to_string())]);

        assert_eq!(instrument_name("nikkei_run_3", &aliases), "JP225");
        assert_eq!(instrument_name("XAUUSD_run_3", &aliases), "XAUUSD");
        assert_eq!(instrument_name("trades", &aliases), UNKNOWN_INSTRUMENT);
    }
}
