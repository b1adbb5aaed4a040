//! Inline keyboards
//!
//! Each button's token is the encoding of the state pressing it leads to,
//! computed by running the transition function.

use super::{transition, Action};
use crate::market::AssetList;
use crate::token::{Qualifier, Selection, TokenCodec};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub token: String,
}

/// Rows of buttons, top to bottom
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Keyboard shown alongside `state`. `limit` is the history window size
    /// used in the period labels.
    pub fn for_state(state: &Selection, assets: &AssetList, limit: u32) -> Self {
        let row = |label: String, action: Action| vec![button(state, label, &action)];
        let back = || row("Back".to_string(), Action::Back);
        let main_menu = || row("Main menu".to_string(), Action::ReturnToMenu);

        let rows = match state {
            Selection::MainMenu => return Self::main_menu(assets),
            Selection::AssetChosen { .. } => vec![
                row(
                    "Current price".to_string(),
                    Action::Choose(Qualifier::Latest),
                ),
                row("Statistics".to_string(), Action::Choose(Qualifier::History)),
                back(),
                main_menu(),
            ],
            Selection::PeriodPrompt { .. } => vec![
                row(format!("{limit} days"), Action::Choose(Qualifier::Day)),
                row(format!("{limit} hours"), Action::Choose(Qualifier::Hour)),
                back(),
                main_menu(),
            ],
            Selection::ResultShown { .. } => vec![back(), main_menu()],
        };
        Self { rows }
    }

    /// One row with every configured asset
    pub fn main_menu(assets: &AssetList) -> Self {
        let row = assets
            .iter()
            .map(|symbol| {
                button(
                    &Selection::MainMenu,
                    symbol.to_string(),
                    &Action::ChooseAsset(symbol.clone()),
                )
            })
            .collect();
        Self { rows: vec![row] }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

fn button(state: &Selection, label: String, action: &Action) -> Button {
    let target = transition(state, action).new_state;
    Button {
        label,
        token: TokenCodec::encode(&target),
    }
}
