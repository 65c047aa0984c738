//! A model provider for the Gemini `generateContent` REST API.

#[macro_use]
extern crate tracing;

mod config;
mod io;
mod proto;
mod response;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use order_bot_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
};
use reqwest::{Client, StatusCode, header};

pub use config::{GeminiConfig, GeminiConfigBuilder};
use io::{Chunks, Sse};
use proto::ErrorEnvelope;
pub use response::GeminiResponse;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Error type for [`GeminiProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Gemini model provider.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for GeminiProvider {
    type Error = Error;
    type Response = GeminiResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let gemini_req = proto::create_request(req);
        let mut req_builder = self
            .client
            .post(self.config.stream_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "text/event-stream")
            .json(&gemini_req);
        if let Some(timeout) = self.config.timeout {
            req_builder = req_builder.timeout(timeout);
        }
        let resp_fut = req_builder.send();
        let model = self.config.model.clone();

        async move {
            debug!("sending request to {model}");
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(format!("{err}"), ErrorKind::Other));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                warn!("gemini returned {status}");
                return Err(error_from_status(status, &body));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let is_valid_content_type = content_type
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype().as_str() == "event-stream")
                .unwrap_or(false);
            if !is_valid_content_type {
                return Err(Error::new(
                    format!("Unexpected content type: {content_type:?}"),
                    ErrorKind::Other,
                ));
            }

            // Here we got a successful response.
            let chunks = Chunks::from_response(resp);
            let sse = Sse::new(chunks);
            Ok(GeminiResponse::from_sse(sse))
        }
    }
}

fn error_from_status(status: StatusCode, body: &str) -> Error {
    let kind = if status == StatusCode::TOO_MANY_REQUESTS {
        ErrorKind::RateLimitExceeded
    } else {
        ErrorKind::Other
    };
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.describe())
        .unwrap_or_else(|| body.trim().to_owned());
    let message = if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail}")
    };
    Error::new(message, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_status() {
        let body = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        }"#;
        let err = error_from_status(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        assert_eq!(
            err.message(),
            "HTTP 429 Too Many Requests: RESOURCE_EXHAUSTED: \
             Resource has been exhausted (e.g. check quota)."
        );
    }

    #[test]
    fn test_other_status() {
        let err = error_from_status(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.message(), "HTTP 502 Bad Gateway: upstream down");

        let err = error_from_status(StatusCode::FORBIDDEN, "");
        assert_eq!(err.message(), "HTTP 403 Forbidden");
    }
}
