//! Callback tokens
//!
//! The whole navigation state of a conversation travels inside the token
//! attached to each menu button. Nothing is kept server-side.

mod codec;
mod selection;

pub use codec::{TokenCodec, TokenError, MAX_TOKEN_LEN};
pub use selection::{Qualifier, ResultView, Selection};
