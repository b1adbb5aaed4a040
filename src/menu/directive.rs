//! What the presentation layer should do after a transition

use crate::market::{Granularity, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDirective {
    ShowMainMenu,
    ShowActionMenu { symbol: Symbol },
    ShowPeriodMenu { symbol: Symbol },
    /// Ask the gateway for the current price
    FetchLatest { symbol: Symbol },
    /// Ask the gateway for statistics and a chart over one history window
    FetchReport {
        symbol: Symbol,
        granularity: Granularity,
    },
    /// The action does not apply here; show a notice and the main menu
    UnknownCommand,
}

impl RenderDirective {
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            RenderDirective::FetchLatest { .. } | RenderDirective::FetchReport { .. }
        )
    }
}
