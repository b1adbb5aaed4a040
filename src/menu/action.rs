//! User actions that drive the menu

use crate::market::Symbol;
use crate::token::Qualifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Pick an asset from the main menu
    ChooseAsset(Symbol),
    /// Pick an option from the action or period menu
    Choose(Qualifier),
    Back,
    ReturnToMenu,
}
