//! coinstat - cryptocurrency statistics behind a chat menu
//!
//! Callback tokens carry the whole menu state, a pure state machine decides
//! what to show next, and the gateway orchestrates the data, analytics and
//! plot services when a result is requested.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod artifact;
pub mod backend;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod logging;
pub mod market;
pub mod menu;
pub mod services;
pub mod token;
