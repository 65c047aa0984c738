//! An abstraction layer for the language models behind the order bot.
//!
//! This crate establishes a unified protocol for the assistant to talk
//! with a generative language service, so that the provider can be
//! swapped (a real HTTP backend, a scripted fake in tests) without
//! touching the conversation logic.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
