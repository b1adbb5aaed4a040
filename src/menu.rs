//! Menu state machine
//!
//! Pure transitions from `(Selection, Action)` to the next selection plus a
//! directive describing what to show. All I/O happens in the caller.

mod action;
mod directive;
mod keyboard;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use action::Action;
pub use directive::RenderDirective;
pub use keyboard::{Button, Keyboard};
pub use transition::{entry, transition, TransitionResult};
