//! Decoded conversation state

use crate::market::{Granularity, Symbol};
use std::fmt;

/// Second half of a `SYMBOL_QUALIFIER` token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Latest,
    History,
    Day,
    Hour,
}

impl Qualifier {
    pub const ALL: [Qualifier; 4] = [
        Qualifier::Latest,
        Qualifier::History,
        Qualifier::Day,
        Qualifier::Hour,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Qualifier::Latest => "latest",
            Qualifier::History => "history",
            Qualifier::Day => "day",
            Qualifier::Hour => "hour",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Qualifier::ALL.into_iter().find(|q| q.as_str() == s)
    }

    pub fn granularity(self) -> Option<Granularity> {
        match self {
            Qualifier::Day => Some(Granularity::Day),
            Qualifier::Hour => Some(Granularity::Hour),
            Qualifier::Latest | Qualifier::History => None,
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Granularity> for Qualifier {
    fn from(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Qualifier::Day,
            Granularity::Hour => Qualifier::Hour,
        }
    }
}

/// What a result screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultView {
    Latest,
    Period(Granularity),
}

impl ResultView {
    pub fn qualifier(self) -> Qualifier {
        match self {
            ResultView::Latest => Qualifier::Latest,
            ResultView::Period(granularity) => granularity.into(),
        }
    }
}

/// Conversation state.
///
/// Each stage carries exactly the fields it needs: a symbol everywhere past
/// the main menu, a qualifier only once a period or result is involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    MainMenu,
    AssetChosen { symbol: Symbol },
    PeriodPrompt { symbol: Symbol },
    ResultShown { symbol: Symbol, view: ResultView },
}

impl Selection {
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Selection::MainMenu => None,
            Selection::AssetChosen { symbol }
            | Selection::PeriodPrompt { symbol }
            | Selection::ResultShown { symbol, .. } => Some(symbol),
        }
    }

    /// `History` while the period menu is open, the shown view afterwards
    pub fn qualifier(&self) -> Option<Qualifier> {
        match self {
            Selection::MainMenu | Selection::AssetChosen { .. } => None,
            Selection::PeriodPrompt { .. } => Some(Qualifier::History),
            Selection::ResultShown { view, .. } => Some(view.qualifier()),
        }
    }

    /// Build the state for a `SYMBOL_QUALIFIER` pair
    pub fn qualified(symbol: Symbol, qualifier: Qualifier) -> Self {
        match qualifier {
            Qualifier::History => Selection::PeriodPrompt { symbol },
            Qualifier::Latest => Selection::ResultShown {
                symbol,
                view: ResultView::Latest,
            },
            Qualifier::Day => Selection::ResultShown {
                symbol,
                view: ResultView::Period(Granularity::Day),
            },
            Qualifier::Hour => Selection::ResultShown {
                symbol,
                view: ResultView::Period(Granularity::Hour),
            },
        }
    }
}
