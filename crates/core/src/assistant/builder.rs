use std::sync::Arc;

use order_bot_model::ModelProvider;

use super::{Assistant, SessionState};
use crate::catalog::Catalog;
use crate::model_client::ModelClient;

/// The contact number quoted in customer care mode unless one is set.
pub const DEFAULT_CUSTOMER_CARE_NUMBER: &str = "+1-800-555-1234";

/// [`Assistant`] builder.
pub struct AssistantBuilder {
    model_client: ModelClient,
    catalog: Option<Arc<Catalog>>,
    customer_care_number: Option<String>,
    on_reply_delta: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl AssistantBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            catalog: None,
            customer_care_number: None,
            on_reply_delta: None,
        }
    }

    /// Sets the product catalog. The built-in catalog is used otherwise.
    ///
    /// Pass an `Arc` to share one catalog between sessions.
    #[inline]
    pub fn with_catalog(mut self, catalog: impl Into<Arc<Catalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Sets the contact number quoted in customer care mode.
    #[inline]
    pub fn with_customer_care_number<S: Into<String>>(mut self, number: S) -> Self {
        self.customer_care_number = Some(number.into());
        self
    }

    /// Attaches a callback to be invoked with each fragment of a model
    /// reply as it streams in.
    #[inline]
    pub fn on_reply_delta(
        mut self,
        on_reply_delta: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.on_reply_delta = Some(Arc::new(on_reply_delta));
        self
    }

    /// Builds the assistant with a freshly seeded session.
    #[inline]
    pub fn build(self) -> Assistant {
        let number = self
            .customer_care_number
            .unwrap_or_else(|| DEFAULT_CUSTOMER_CARE_NUMBER.to_owned());
        Assistant {
            model_client: self.model_client,
            catalog: self.catalog.unwrap_or_default(),
            customer_care_reply: customer_care_reply(&number),
            on_reply_delta: self.on_reply_delta,
            state: SessionState::new_session(),
        }
    }
}

/// The fixed reply given in customer care mode.
#[inline]
pub fn customer_care_reply(number: &str) -> String {
    format!("Please call our Customer Care at {number} for assistance.")
}
