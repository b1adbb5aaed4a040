//! Property-based tests for the token codec and the menu state machine

use super::*;
use crate::market::{test_assets, AssetList, Granularity, Symbol, MAX_SYMBOL_LEN};
use crate::token::{Qualifier, ResultView, Selection, TokenCodec, TokenError};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn assets() -> AssetList {
    test_assets()
}

fn arb_symbol() -> impl Strategy<Value = Symbol> {
    prop_oneof![Just("BTC"), Just("ETH"), Just("TON")]
        .prop_map(|s| assets().resolve(s).unwrap())
}

/// Any symbol the allow-list accepts, up to the longest allowed
fn arb_raw_symbol() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![proptest::char::range('A', 'Z'), proptest::char::range('0', '9')],
        1..=MAX_SYMBOL_LEN,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn arb_qualifier() -> impl Strategy<Value = Qualifier> {
    prop_oneof![
        Just(Qualifier::Latest),
        Just(Qualifier::History),
        Just(Qualifier::Day),
        Just(Qualifier::Hour),
    ]
}

fn arb_view() -> impl Strategy<Value = ResultView> {
    prop_oneof![
        Just(ResultView::Latest),
        Just(ResultView::Period(Granularity::Day)),
        Just(ResultView::Period(Granularity::Hour)),
    ]
}

fn arb_selection() -> impl Strategy<Value = Selection> {
    prop_oneof![
        Just(Selection::MainMenu),
        arb_symbol().prop_map(|symbol| Selection::AssetChosen { symbol }),
        arb_symbol().prop_map(|symbol| Selection::PeriodPrompt { symbol }),
        (arb_symbol(), arb_view())
            .prop_map(|(symbol, view)| Selection::ResultShown { symbol, view }),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        arb_symbol().prop_map(Action::ChooseAsset),
        arb_qualifier().prop_map(Action::Choose),
        Just(Action::Back),
        Just(Action::ReturnToMenu),
    ]
}

/// Whether `(state, action)` appears in the transition table
fn in_table(state: &Selection, action: &Action) -> bool {
    match (state, action) {
        (_, Action::ReturnToMenu)
        | (Selection::MainMenu, Action::ChooseAsset(_))
        | (
            Selection::AssetChosen { .. },
            Action::Choose(Qualifier::History | Qualifier::Latest) | Action::Back,
        )
        | (
            Selection::PeriodPrompt { .. },
            Action::Choose(Qualifier::Day | Qualifier::Hour) | Action::Back,
        )
        | (Selection::ResultShown { .. }, Action::Back) => true,
        _ => false,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn token_round_trip(selection in arb_selection()) {
        let codec = TokenCodec::new(assets());
        let token = TokenCodec::encode(&selection);
        prop_assert_eq!(codec.decode(&token), Ok(selection));
    }

    #[test]
    fn token_round_trip_for_any_allowed_symbol(
        raw in arb_raw_symbol(),
        qualifier in proptest::option::of(arb_qualifier()),
        limit in 1u32..2000,
    ) {
        let assets = AssetList::new([raw.as_str()]).unwrap();
        let symbol = assets.resolve(&raw).unwrap();
        let codec = TokenCodec::new(assets.clone());
        let selection = match qualifier {
            Some(qualifier) => Selection::qualified(symbol, qualifier),
            None => Selection::AssetChosen { symbol },
        };

        let token = TokenCodec::encode(&selection);
        prop_assert_eq!(codec.decode(&token), Ok(selection.clone()));
        for button in Keyboard::for_state(&selection, &assets, limit).buttons() {
            prop_assert!(codec.decode(&button.token).is_ok(), "{:?}", button);
        }
    }

    #[test]
    fn decode_never_panics(token in ".{0,80}") {
        let codec = TokenCodec::new(assets());
        let _ = codec.decode(&token);
    }

    #[test]
    fn extra_delimiters_are_malformed(parts in proptest::collection::vec("[A-Za-z]{1,5}", 3..6)) {
        let codec = TokenCodec::new(assets());
        let token = parts.join("_");
        prop_assert_eq!(codec.decode(&token), Err(TokenError::Malformed(token.clone())));
    }

    #[test]
    fn transition_is_total(state in arb_selection(), action in arb_action()) {
        let result = transition(&state, &action);
        if in_table(&state, &action) {
            prop_assert_ne!(result.directive, RenderDirective::UnknownCommand);
        } else {
            prop_assert_eq!(result.new_state, state);
            prop_assert_eq!(result.directive, RenderDirective::UnknownCommand);
        }
    }

    #[test]
    fn entry_leads_back_to_target(target in arb_selection()) {
        let (previous, action) = entry(&target);
        let result = transition(&previous, &action);
        prop_assert_eq!(result.new_state, target);
        prop_assert_ne!(result.directive, RenderDirective::UnknownCommand);
    }

    #[test]
    fn keyboard_tokens_decode(state in arb_selection(), limit in 1u32..100) {
        let codec = TokenCodec::new(assets());
        let keyboard = Keyboard::for_state(&state, &assets(), limit);
        prop_assert!(keyboard.buttons().any(|b| b.token == "menu") || state == Selection::MainMenu);
        for button in keyboard.buttons() {
            prop_assert!(codec.decode(&button.token).is_ok(), "{:?}", button);
        }
    }

    #[test]
    fn fetch_only_from_result_states(state in arb_selection(), action in arb_action()) {
        let result = transition(&state, &action);
        if result.directive.is_fetch() {
            let is_result = matches!(result.new_state, Selection::ResultShown { .. });
            prop_assert!(is_result);
        }
    }
}
