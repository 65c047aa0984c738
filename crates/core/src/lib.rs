//! Core logic of the order bot: the product catalog, the session
//! transcript, and the assistant that routes each user message either to
//! the language model or to the customer care reply.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod assistant;
pub mod catalog;
mod context;
mod error;
mod model_client;
pub mod transcript;

pub use assistant::{
    Assistant, AssistantBuilder, DEFAULT_CUSTOMER_CARE_NUMBER, Mode,
    SessionState, customer_care_reply,
};
pub use error::{Error, ErrorKind};
