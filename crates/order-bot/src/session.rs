use std::sync::Arc;

use order_bot_core::catalog::{Catalog, Product};
use order_bot_core::{Assistant, AssistantBuilder, Error};
use order_bot_model::ModelProvider;

use crate::command::Command;
use crate::render;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    assistant_builder: AssistantBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let assistant_builder = AssistantBuilder::with_model_provider(provider);
        Self { assistant_builder }
    }

    /// Sets the product catalog.
    #[inline]
    pub fn with_catalog(mut self, catalog: impl Into<Arc<Catalog>>) -> Self {
        self.assistant_builder = self.assistant_builder.with_catalog(catalog);
        self
    }

    /// Sets the contact number quoted in customer care mode.
    #[inline]
    pub fn with_customer_care_number<S: Into<String>>(mut self, number: S) -> Self {
        self.assistant_builder =
            self.assistant_builder.with_customer_care_number(number);
        self
    }

    /// Attaches a callback to be invoked with each streamed reply fragment.
    #[inline]
    pub fn on_reply_delta(
        mut self,
        on_reply_delta: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.assistant_builder = self.assistant_builder.on_reply_delta(on_reply_delta);
        self
    }

    /// Builds a new session.
    #[inline]
    pub fn build(self) -> Session {
        Session {
            assistant: self.assistant_builder.build(),
        }
    }
}

/// What happened after a command was handled, for the host to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The assistant answered a submitted message.
    Replied(String),
    /// The catalog, one line per product.
    Products(Vec<String>),
    /// The selection changed, `None` when it was cleared.
    Selected(Option<Product>),
    /// Customer care mode is now on or off.
    CareMode(bool),
    /// The session started over, carrying the new greeting.
    Cleared(String),
    /// The conversation log, one line per turn.
    Log(Vec<String>),
    /// The help text.
    Help(&'static str),
    /// The user wants to leave.
    Quit,
    /// The command was not understood.
    Unknown(String),
}

/// A chat session, like a window that displays messages and has an input
/// box.
///
/// The session is basically a wrapper around [`Assistant`] that understands
/// the slash commands of [`Command`].
pub struct Session {
    assistant: Assistant,
}

impl Session {
    /// Returns the underlying assistant.
    #[inline]
    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// Returns the greeting the current conversation was seeded with.
    #[inline]
    pub fn greeting(&self) -> &str {
        render::greeting(self.assistant.transcript()).unwrap_or_default()
    }

    /// Handles one parsed line of input.
    ///
    /// Errors leave the session usable; the host reports them and reads
    /// the next line.
    pub async fn handle(&mut self, command: Command) -> Result<Outcome, Error> {
        debug!("handling {command:?}");
        let outcome = match command {
            Command::Submit(text) => {
                Outcome::Replied(self.assistant.submit(&text).await?)
            }
            Command::Products => {
                Outcome::Products(render::product_list(self.assistant.catalog()))
            }
            Command::Select(None) => {
                self.assistant.select_product(None)?;
                Outcome::Selected(None)
            }
            Command::Select(Some(name)) => {
                let product = self
                    .assistant
                    .catalog()
                    .find_ignore_case(&name)
                    .cloned()
                    .ok_or_else(|| {
                        Error::invalid_selection()
                            .with_reason(format!("no such product: {name}"))
                    })?;
                self.assistant.select_product(Some(&product.name))?;
                Outcome::Selected(Some(product))
            }
            Command::Care(flag) => {
                let flag =
                    flag.unwrap_or(!self.assistant.customer_care_mode());
                self.assistant.set_customer_care_mode(flag);
                Outcome::CareMode(flag)
            }
            Command::Clear => {
                self.assistant.reset();
                Outcome::Cleared(self.greeting().to_owned())
            }
            Command::Log => {
                Outcome::Log(render::transcript_log(self.assistant.transcript()))
            }
            Command::Help => Outcome::Help(crate::command::HELP),
            Command::Quit => Outcome::Quit,
            Command::Unknown(line) => Outcome::Unknown(line),
        };
        Ok(outcome)
    }
}
