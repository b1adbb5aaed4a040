//! Pure state transition function
//!
//! | Current       | Action              | Next                      |
//! |---------------|---------------------|---------------------------|
//! | MainMenu      | ChooseAsset(s)      | AssetChosen(s)            |
//! | AssetChosen   | Choose(History)     | PeriodPrompt(s)           |
//! | AssetChosen   | Choose(Latest)      | ResultShown(s, Latest)    |
//! | AssetChosen   | Back                | MainMenu                  |
//! | PeriodPrompt  | Choose(Day\|Hour)   | ResultShown(s, q)         |
//! | PeriodPrompt  | Back                | AssetChosen(s)            |
//! | ResultShown   | Back                | AssetChosen(s)            |
//! | any           | ReturnToMenu        | MainMenu                  |
//!
//! Anything else keeps the current state and yields `UnknownCommand`.

use super::{Action, RenderDirective};
use crate::token::{Qualifier, ResultView, Selection};

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: Selection,
    pub directive: RenderDirective,
}

impl TransitionResult {
    pub fn new(state: Selection, directive: RenderDirective) -> Self {
        Self {
            new_state: state,
            directive,
        }
    }

    fn unknown(state: &Selection) -> Self {
        Self::new(state.clone(), RenderDirective::UnknownCommand)
    }
}

/// Pure transition function.
///
/// Total over every `(state, action)` pair: there is no error path, only
/// the `UnknownCommand` directive.
pub fn transition(state: &Selection, action: &Action) -> TransitionResult {
    match (state, action) {
        (_, Action::ReturnToMenu) => {
            TransitionResult::new(Selection::MainMenu, RenderDirective::ShowMainMenu)
        }

        (Selection::MainMenu, Action::ChooseAsset(symbol)) => TransitionResult::new(
            Selection::AssetChosen {
                symbol: symbol.clone(),
            },
            RenderDirective::ShowActionMenu {
                symbol: symbol.clone(),
            },
        ),

        (Selection::AssetChosen { symbol }, Action::Choose(Qualifier::History)) => {
            TransitionResult::new(
                Selection::PeriodPrompt {
                    symbol: symbol.clone(),
                },
                RenderDirective::ShowPeriodMenu {
                    symbol: symbol.clone(),
                },
            )
        }

        (Selection::AssetChosen { symbol }, Action::Choose(Qualifier::Latest)) => {
            TransitionResult::new(
                Selection::ResultShown {
                    symbol: symbol.clone(),
                    view: ResultView::Latest,
                },
                RenderDirective::FetchLatest {
                    symbol: symbol.clone(),
                },
            )
        }

        (Selection::AssetChosen { .. }, Action::Back) => {
            TransitionResult::new(Selection::MainMenu, RenderDirective::ShowMainMenu)
        }

        (Selection::PeriodPrompt { symbol }, Action::Choose(qualifier)) => {
            match qualifier.granularity() {
                Some(granularity) => TransitionResult::new(
                    Selection::ResultShown {
                        symbol: symbol.clone(),
                        view: ResultView::Period(granularity),
                    },
                    RenderDirective::FetchReport {
                        symbol: symbol.clone(),
                        granularity,
                    },
                ),
                None => TransitionResult::unknown(state),
            }
        }

        (
            Selection::PeriodPrompt { symbol } | Selection::ResultShown { symbol, .. },
            Action::Back,
        ) => TransitionResult::new(
            Selection::AssetChosen {
                symbol: symbol.clone(),
            },
            RenderDirective::ShowActionMenu {
                symbol: symbol.clone(),
            },
        ),

        _ => TransitionResult::unknown(state),
    }
}

/// The canonical `(previous state, action)` pair that leads into `target`.
///
/// Buttons carry the encoding of their target state, so a decoded token is
/// replayed through [`transition`] from here to recover the directive.
pub fn entry(target: &Selection) -> (Selection, Action) {
    match target {
        Selection::MainMenu => (Selection::MainMenu, Action::ReturnToMenu),
        Selection::AssetChosen { symbol } => {
            (Selection::MainMenu, Action::ChooseAsset(symbol.clone()))
        }
        Selection::PeriodPrompt { symbol } => (
            Selection::AssetChosen {
                symbol: symbol.clone(),
            },
            Action::Choose(Qualifier::History),
        ),
        Selection::ResultShown {
            symbol,
            view: ResultView::Latest,
        } => (
            Selection::AssetChosen {
                symbol: symbol.clone(),
            },
            Action::Choose(Qualifier::Latest),
        ),
        Selection::ResultShown {
            symbol,
            view: ResultView::Period(granularity),
        } => (
            Selection::PeriodPrompt {
                symbol: symbol.clone(),
            },
            Action::Choose((*granularity).into()),
        ),
    }
}
