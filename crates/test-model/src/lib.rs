//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use order_bot_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

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

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    events: Vec<PresetEvent>,
    delay: Duration,
    event_idx: usize,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        // SAFETY: This type does not require to be pinned.
        let this = unsafe { self.get_unchecked_mut() };

        if let Some(sleep) = &mut this.sleep {
            ready!(sleep.as_mut().poll(cx));
            this.sleep = None;

            if this.event_idx < this.events.len() {
                let event = match &this.events[this.event_idx] {
                    PresetEvent::MessageDelta(msg) => {
                        ModelResponseEvent::MessageDelta(msg.clone())
                    }
                    PresetEvent::Fail(message) => {
                        // Park the cursor past the end so that polling
                        // again reports completion instead of failing twice.
                        this.event_idx = this.events.len() + 1;
                        return Poll::Ready(Err(Error::new(
                            message.clone(),
                            ErrorKind::Other,
                        )));
                    }
                };
                this.event_idx += 1;
                return Poll::Ready(Ok(Some(event)));
            } else if this.event_idx == this.events.len() {
                this.event_idx += 1;
                return Poll::Ready(Ok(Some(ModelResponseEvent::Completed(
                    ModelFinishReason::Stop,
                ))));
            } else {
                // In case this method is called after completion.
                return Poll::Ready(Ok(None));
            }
        }
        this.sleep = Some(Box::pin(sleep(this.delay)));
        Pin::new(this).poll_next_event(cx)
    }
}

struct ScriptedResponse {
    preset: PresetResponse,
    failures_left: Option<u64>,
}

#[derive(Default)]
struct Script {
    responses: VecDeque<ScriptedResponse>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should respond. Responses are consumed in the order they were
/// added, one per successful request. A response with failures configured
/// stays at the head of the script until it has failed enough times. If the
/// script runs out, an error will be returned.
///
/// Clones share the same script, so a test can keep one clone around to
/// inspect the requests after handing the other to the code under test.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        let failures_left = preset.failures;
        self.lock().responses.push_back(ScriptedResponse {
            preset,
            failures_left,
        });
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns all requests received so far, oldest first.
    #[inline]
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    /// Returns how many requests have been received.
    #[inline]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A panicking test thread must not hide the script from others.
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_events(&self, req: &ModelRequest) -> Result<Vec<PresetEvent>, Error> {
        let mut script = self.lock();
        script.requests.push(req.clone());

        let Some(head) = script.responses.front_mut() else {
            return Err(Error::new("script exhausted", ErrorKind::Other));
        };
        match head.failures_left {
            Some(0) if head.preset.failures == Some(0) => {
                return Err(Error::new("preset failure", ErrorKind::Other));
            }
            Some(ref mut left) if *left > 0 => {
                *left -= 1;
                return Err(Error::new(
                    "preset failure",
                    ErrorKind::RateLimitExceeded,
                ));
            }
            _ => {}
        }

        let scripted = script
            .responses
            .pop_front()
            .map(|scripted| scripted.preset.events);
        scripted.ok_or_else(|| Error::new("script exhausted", ErrorKind::Other))
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        let resp = self.next_events(req).map(|events| TestModelResponse {
            events,
            delay,
            event_idx: 0,
            sleep: None,
        });
        ready(resp)
    }
}
