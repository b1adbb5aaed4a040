//! Token wire format
//!
//! ```text
//! TOKEN := RESERVED | SYMBOL | SYMBOL '_' QUALIFIER
//! RESERVED := "menu" | "start" | "back"
//! ```
//!
//! Every button carries the encoding of the state it leads to, so
//! `decode` yields the requested state directly. `start` and `back` are
//! accepted from older keyboards and resolve to the main menu; `encode`
//! only ever emits `menu`.

use super::{Qualifier, Selection};
use crate::market::{AssetList, TOKEN_DELIMITER};
use thiserror::Error;

/// Chat clients cap button payloads at 64 bytes.
pub const MAX_TOKEN_LEN: usize = 64;

const MENU: &str = "menu";
const RESERVED_MAIN_MENU: [&str; 3] = [MENU, "start", "back"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed callback token {0:?}")]
    Malformed(String),
    #[error("unknown asset {0:?} in callback token")]
    UnknownSymbol(String),
    #[error("unknown qualifier {0:?} in callback token")]
    UnknownQualifier(String),
}

/// Encodes and validates callback tokens against the configured assets
#[derive(Debug, Clone)]
pub struct TokenCodec {
    assets: AssetList,
}

impl TokenCodec {
    pub fn new(assets: AssetList) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &AssetList {
        &self.assets
    }

    pub fn decode(&self, token: &str) -> Result<Selection, TokenError> {
        if token.is_empty() || token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::Malformed(token.to_string()));
        }
        if RESERVED_MAIN_MENU.contains(&token) {
            return Ok(Selection::MainMenu);
        }

        let parts: Vec<&str> = token.split(TOKEN_DELIMITER).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(TokenError::Malformed(token.to_string()));
        }

        match parts.as_slice() {
            [symbol] => {
                let symbol = self
                    .assets
                    .resolve(symbol)
                    .ok_or_else(|| TokenError::UnknownSymbol((*symbol).to_string()))?;
                Ok(Selection::AssetChosen { symbol })
            }
            [symbol, qualifier] => {
                let symbol = self
                    .assets
                    .resolve(symbol)
                    .ok_or_else(|| TokenError::UnknownSymbol((*symbol).to_string()))?;
                let qualifier = Qualifier::parse(qualifier)
                    .ok_or_else(|| TokenError::UnknownQualifier((*qualifier).to_string()))?;
                Ok(Selection::qualified(symbol, qualifier))
            }
            _ => Err(TokenError::Malformed(token.to_string())),
        }
    }

    pub fn encode(selection: &Selection) -> String {
        match (selection.symbol(), selection.qualifier()) {
            (None, _) => MENU.to_string(),
            (Some(symbol), None) => symbol.to_string(),
            (Some(symbol), Some(qualifier)) => format!("{symbol}{TOKEN_DELIMITER}{qualifier}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{test_assets, Granularity};
    use crate::token::ResultView;

    fn codec() -> TokenCodec {
        TokenCodec::new(test_assets())
    }

    #[test]
    fn decodes_reserved_literals() {
        for token in ["menu", "start", "back"] {
            assert_eq!(codec().decode(token), Ok(Selection::MainMenu));
        }
        assert_eq!(TokenCodec::encode(&Selection::MainMenu), "menu");
    }

    #[test]
    fn decodes_symbol_only() {
        let selection = codec().decode("TON").unwrap();
        assert_eq!(selection.symbol().unwrap().as_str(), "TON");
        assert_eq!(selection.qualifier(), None);
    }

    #[test]
    fn decodes_qualified_tokens() {
        let selection = codec().decode("BTC_day").unwrap();
        assert!(matches!(
            selection,
            Selection::ResultShown {
                view: ResultView::Period(Granularity::Day),
                ..
            }
        ));
        assert!(matches!(
            codec().decode("ETH_history").unwrap(),
            Selection::PeriodPrompt { .. }
        ));
        assert!(matches!(
            codec().decode("ETH_latest").unwrap(),
            Selection::ResultShown {
                view: ResultView::Latest,
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_arity_and_empty_parts() {
        for token in ["", "_", "BTC_", "_day", "BTC_day_extra", "BTC__day"] {
            assert_eq!(
                codec().decode(token),
                Err(TokenError::Malformed(token.to_string())),
                "{token:?}"
            );
        }
        let long = "B".repeat(MAX_TOKEN_LEN + 1);
        assert!(matches!(codec().decode(&long), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn rejects_unknown_members() {
        assert_eq!(
            codec().decode("XRP"),
            Err(TokenError::UnknownSymbol("XRP".to_string()))
        );
        assert_eq!(
            codec().decode("XRP_day"),
            Err(TokenError::UnknownSymbol("XRP".to_string()))
        );
        assert_eq!(
            codec().decode("BTC_week"),
            Err(TokenError::UnknownQualifier("week".to_string()))
        );
        // Legacy "BTC_callback" buttons are not part of the grammar
        assert!(codec().decode("BTC_callback").is_err());
    }
}
