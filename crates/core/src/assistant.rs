mod builder;
mod state;

use std::sync::Arc;

use order_bot_model::{
    ErrorKind as ModelErrorKind, ModelProviderError, ModelRequest,
};

use crate::catalog::{Catalog, Product};
use crate::context::with_product_context;
use crate::model_client::ModelClient;
use crate::transcript::{Role, Transcript, Turn};
use crate::Error;
pub use builder::{
    AssistantBuilder, DEFAULT_CUSTOMER_CARE_NUMBER, customer_care_reply,
};
pub use state::{Mode, SessionState};

/// An order assistant, which owns one session and talks to a model
/// provider on its behalf.
///
/// Every operation takes `&mut self`, so a session has at most one
/// submission in flight. A submission runs to completion, including the
/// model call, before the next one can start.
pub struct Assistant {
    model_client: ModelClient,
    catalog: Arc<Catalog>,
    customer_care_reply: String,
    on_reply_delta: Option<Arc<dyn Fn(&str) + Send + Sync>>,
    state: SessionState,
}

impl Assistant {
    /// Returns the session state.
    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    /// Returns the product catalog.
    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the selected product, if any.
    #[inline]
    pub fn selected_product(&self) -> Option<&Product> {
        self.state
            .selected_product
            .as_deref()
            .and_then(|name| self.catalog.get(name))
    }

    /// Returns `true` in customer care mode.
    #[inline]
    pub fn customer_care_mode(&self) -> bool {
        self.state.customer_care_mode()
    }

    /// Returns the fixed reply used in customer care mode.
    #[inline]
    pub fn customer_care_reply(&self) -> &str {
        &self.customer_care_reply
    }

    /// Selects a product by its exact catalog name, or clears the selection
    /// with `None`.
    ///
    /// Names outside the catalog are rejected and leave the current
    /// selection as it was.
    pub fn select_product(&mut self, name: Option<&str>) -> Result<(), Error> {
        let Some(name) = name else {
            if self.state.selected_product.take().is_some() {
                info!("product selection cleared");
            }
            return Ok(());
        };
        let Some(product) = self.catalog.get(name) else {
            warn!("rejected unknown product {name:?}");
            return Err(Error::invalid_selection()
                .with_reason(format!("no such product: {name}")));
        };
        if self.state.selected_product.as_deref() != Some(product.name.as_str()) {
            info!("product selected: {}", product.name);
            self.state.selected_product = Some(product.name.clone());
        }
        Ok(())
    }

    /// Turns customer care mode on or off. Stored turns are unaffected.
    pub fn set_customer_care_mode(&mut self, flag: bool) {
        let mode = if flag {
            Mode::CustomerCare
        } else {
            Mode::Normal
        };
        if self.state.mode != mode {
            info!("switching to {mode:?} mode");
            self.state.mode = mode;
        }
    }

    /// Starts the session over: a fresh seed pair, no product, normal mode.
    pub fn reset(&mut self) {
        info!(
            "resetting session with {} turns",
            self.state.transcript.len()
        );
        self.state = SessionState::after_reset();
    }

    /// Submits a user message and returns the assistant's reply.
    ///
    /// In customer care mode the text is stored verbatim and answered with
    /// the fixed contact message. Otherwise the text gets product context
    /// if needed, is stored, and the whole transcript goes to the model.
    ///
    /// # Errors
    ///
    /// Whitespace-only text is rejected without touching the session. If
    /// the model call fails, the user turn stays in the transcript, no
    /// assistant turn is added, and the error is returned as is. There is
    /// no retry.
    pub async fn submit(&mut self, user_text: &str) -> Result<String, Error> {
        if user_text.trim().is_empty() {
            return Err(Error::empty_submission());
        }

        if self.state.mode == Mode::CustomerCare {
            debug!("customer care mode, answering without the model");
            let reply = self.customer_care_reply.clone();
            self.push_exchange_half(Role::User, user_text.to_owned());
            self.push_exchange_half(Role::Assistant, reply.clone());
            return Ok(reply);
        }

        let text = with_product_context(user_text, self.selected_product());
        self.push_exchange_half(Role::User, text);

        let request = ModelRequest {
            messages: self.state.transcript.to_model_messages(),
        };
        let on_reply_delta = self.on_reply_delta.clone();
        let resp = self
            .model_client
            .send_request(request, move |delta| {
                if let Some(on_reply_delta) = &on_reply_delta {
                    on_reply_delta(&delta);
                }
            })
            .await
            .map_err(|err| {
                warn!("model call failed: {err}");
                Error::external_service(err.kind()).with_reason(err.to_string())
            })?;

        if resp.text.trim().is_empty() {
            warn!("model returned an empty reply");
            return Err(Error::external_service(ModelErrorKind::Other)
                .with_reason("the model returned an empty reply"));
        }

        self.push_exchange_half(Role::Assistant, resp.text.clone());
        Ok(resp.text)
    }

    #[inline]
    fn push_exchange_half(&mut self, role: Role, text: String) {
        trace!("appending {role} turn");
        self.state.transcript.push(Turn::new(role, text));
    }
}
