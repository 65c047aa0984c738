//! An order-taking chat assistant backed by Gemini.
//!
//! The crate includes a CLI tool for using in the terminal. The session,
//! command parser and configuration loader are also exposed as a library
//! for hosts that want to drive the bot themselves.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod command;
pub mod config;
pub mod render;
mod session;

pub use session::{Outcome, Session, SessionBuilder};

/// Re-exports of [`order_bot_core`] crate.
pub mod core {
    pub use order_bot_core::*;
}
