//! Market vocabulary shared by every layer
//!
//! Symbols only exist once they have been checked against the configured
//! asset allow-list, so downstream code never re-validates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Delimiter used by callback tokens; no symbol may contain it.
pub const TOKEN_DELIMITER: char = '_';

/// Longest symbol whose callback tokens, `SYMBOL_history` included,
/// still fit the chat client's payload limit
pub const MAX_SYMBOL_LEN: usize = crate::token::MAX_TOKEN_LEN - "_history".len();

/// Largest history window the upstream price API serves in one call
pub const MAX_HISTORY_LIMIT: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("invalid asset symbol {0:?}")]
    InvalidSymbol(String),
    #[error("asset symbol {0:?} is longer than {MAX_SYMBOL_LEN} characters")]
    SymbolTooLong(String),
    #[error("unknown asset {0:?}")]
    UnknownSymbol(String),
    #[error("invalid currency {0:?}")]
    InvalidCurrency(String),
    #[error("invalid granularity {0:?} (expected day or hour)")]
    InvalidGranularity(String),
    #[error("invalid history limit {0} (expected 1..={MAX_HISTORY_LIMIT})")]
    InvalidLimit(u32),
    #[error("asset list is empty")]
    EmptyAssetList,
}

/// A tradable asset from the allow-list, e.g. `BTC`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The assets users may pick from, in menu order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetList {
    symbols: Vec<Symbol>,
}

impl AssetList {
    /// Build the allow-list. Symbols are upper-cased and deduplicated;
    /// anything that is not plain ASCII alphanumeric is rejected so it can
    /// never collide with the token delimiter.
    pub fn new<I, S>(symbols: I) -> Result<Self, MarketError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<Symbol> = Vec::new();
        for raw in symbols {
            let raw = raw.as_ref().trim();
            if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(MarketError::InvalidSymbol(raw.to_string()));
            }
            if raw.len() > MAX_SYMBOL_LEN {
                return Err(MarketError::SymbolTooLong(raw.to_string()));
            }
            let symbol = Symbol(raw.to_ascii_uppercase());
            if !list.contains(&symbol) {
                list.push(symbol);
            }
        }
        if list.is_empty() {
            return Err(MarketError::EmptyAssetList);
        }
        Ok(Self { symbols: list })
    }

    /// Look up a symbol, ignoring case. Returns the canonical spelling.
    pub fn resolve(&self, raw: &str) -> Option<Symbol> {
        self.symbols
            .iter()
            .find(|s| s.0.eq_ignore_ascii_case(raw))
            .cloned()
    }

    pub fn require(&self, raw: &str) -> Result<Symbol, MarketError> {
        self.resolve(raw)
            .ok_or_else(|| MarketError::UnknownSymbol(raw.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

/// Time bucket for historical data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Hour,
}

impl Granularity {
    pub const ALL: [Granularity; 2] = [Granularity::Day, Granularity::Hour];

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Hour => "hour",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "hour" => Ok(Granularity::Hour),
            _ => Err(MarketError::InvalidGranularity(s.to_string())),
        }
    }
}

/// Quote currency code, e.g. `USD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if (2..=10).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            Ok(Currency(trimmed.to_ascii_uppercase()))
        } else {
            Err(MarketError::InvalidCurrency(s.to_string()))
        }
    }
}

/// Parameters for one history window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub symbol: Symbol,
    pub granularity: Granularity,
    pub currency: Currency,
    pub limit: u32,
}

impl HistoryQuery {
    pub fn new(
        symbol: Symbol,
        granularity: Granularity,
        currency: Currency,
        limit: u32,
    ) -> Result<Self, MarketError> {
        validate_limit(limit)?;
        Ok(Self {
            symbol,
            granularity,
            currency,
            limit,
        })
    }
}

pub fn validate_limit(limit: u32) -> Result<u32, MarketError> {
    if (1..=MAX_HISTORY_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(MarketError::InvalidLimit(limit))
    }
}

#[cfg(test)]
pub(crate) fn test_assets() -> AssetList {
    AssetList::new(["BTC", "ETH", "TON"]).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_list_normalises_and_dedupes() {
        let assets = AssetList::new(["btc", "ETH", "BTC"]).unwrap();
        let names: Vec<_> = assets.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["BTC", "ETH"]);
    }

    #[test]
    fn asset_list_rejects_delimiter() {
        assert_eq!(
            AssetList::new(["BTC_X"]),
            Err(MarketError::InvalidSymbol("BTC_X".to_string()))
        );
        assert_eq!(
            AssetList::new(Vec::<String>::new()),
            Err(MarketError::EmptyAssetList)
        );
    }

    #[test]
    fn asset_list_rejects_symbols_too_long_for_a_token() {
        let longest = "A".repeat(MAX_SYMBOL_LEN);
        assert!(AssetList::new([longest.as_str()]).is_ok());

        let too_long = "A".repeat(MAX_SYMBOL_LEN + 1);
        assert_eq!(
            AssetList::new([too_long.as_str()]),
            Err(MarketError::SymbolTooLong(too_long.clone()))
        );
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let assets = test_assets();
        assert_eq!(assets.resolve("eth").unwrap().as_str(), "ETH");
        assert!(assets.resolve("XRP").is_none());
        assert!(matches!(
            assets.require("XRP"),
            Err(MarketError::UnknownSymbol(_))
        ));
    }

    #[test]
    fn granularity_parses() {
        assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!("HOUR".parse::<Granularity>().unwrap(), Granularity::Hour);
        assert!("minute".parse::<Granularity>().is_err());
    }

    #[test]
    fn currency_validation() {
        assert_eq!("usd".parse::<Currency>().unwrap().as_str(), "USD");
        assert!("".parse::<Currency>().is_err());
        assert!("US D".parse::<Currency>().is_err());
    }

    #[test]
    fn limit_bounds() {
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(10).is_ok());
        assert!(validate_limit(MAX_HISTORY_LIMIT + 1).is_err());
    }
}
