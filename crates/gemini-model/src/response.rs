use std::pin::Pin;
use std::task::{Context, Poll, ready};

use order_bot_model::{
    ErrorKind, ModelFinishReason, ModelResponse, ModelResponseEvent,
};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::Sse;
use crate::proto::GenerateContentResponse;

struct PartialState {
    sse: Sse,
    response_id: Option<String>,
    // A chunk may carry both text and a finish reason. The text goes out
    // first and the finish reason waits here for the next poll.
    pending_finish_reason: Option<ModelFinishReason>,
}

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextEvent = Result<(Option<ModelResponseEvent>, PartialState), Error>;

pin_project! {
    /// A streaming response from the Gemini API.
    pub struct GeminiResponse {
        next_event_fut: Option<PinnedFuture<NextEvent>>,
    }
}

impl GeminiResponse {
    #[inline]
    pub(crate) fn from_sse(sse: Sse) -> Self {
        let partial_state = PartialState {
            sse,
            response_id: None,
            pending_finish_reason: None,
        };
        let next_event_fut = async move { next_event(partial_state).await };
        Self {
            next_event_fut: Some(Box::pin(next_event_fut)),
        }
    }
}

impl ModelResponse for GeminiResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.project();
        let Some(next_event_fut) = this.next_event_fut else {
            return Poll::Ready(Ok(None));
        };
        let (event, partial_state) =
            match ready!(next_event_fut.as_mut().poll(cx)) {
                Ok((Some(event), partial_state)) => (event, partial_state),
                Ok((None, partial_state)) => {
                    debug!(
                        "gemini response {:?} finished",
                        partial_state.response_id
                    );
                    *this.next_event_fut = None;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Err(err));
                }
            };

        // The stream may still have more data to pull, create a new future for
        // the next event.
        let next_event_fut = async move { next_event(partial_state).await };
        *this.next_event_fut = Some(Box::pin(next_event_fut));

        Poll::Ready(Ok(Some(event)))
    }
}

fn map_finish_reason(reason: &str) -> Result<ModelFinishReason, Error> {
    match reason {
        "MAX_TOKENS" => Ok(ModelFinishReason::Length),
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT"
        | "SPII" | "IMAGE_SAFETY" => Err(Error::new(
            format!("response blocked: {reason}"),
            ErrorKind::Moderated,
        )),
        _ => Ok(ModelFinishReason::Stop),
    }
}

async fn next_event(
    mut partial_state: PartialState,
) -> Result<(Option<ModelResponseEvent>, PartialState), Error> {
    if let Some(reason) = partial_state.pending_finish_reason.take() {
        return Ok((Some(ModelResponseEvent::Completed(reason)), partial_state));
    }

    loop {
        let sse_event = match partial_state.sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => return Ok((None, partial_state)),
            Err(err) => {
                return Err(Error::new(format!("{err:?}"), ErrorKind::Other));
            }
        };
        trace!("got sse event: {sse_event}");

        let chunk =
            serde_json::from_str::<GenerateContentResponse>(&sse_event)
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
        if let Some(id) = &chunk.response_id {
            if partial_state.response_id.get_or_insert_with(|| id.clone()) != id
            {
                return Err(Error::new("response id mismatch", ErrorKind::Other));
            }
        }

        if let Some(reason) = chunk.block_reason() {
            return Err(Error::new(
                format!("prompt blocked: {reason}"),
                ErrorKind::Moderated,
            ));
        }
        if let Some(reason) = chunk.finish_reason() {
            partial_state.pending_finish_reason = Some(map_finish_reason(reason)?);
        }

        let text = chunk.text();
        if !text.is_empty() {
            return Ok((
                Some(ModelResponseEvent::MessageDelta(text)),
                partial_state,
            ));
        }
        if let Some(reason) = partial_state.pending_finish_reason.take() {
            return Ok((
                Some(ModelResponseEvent::Completed(reason)),
                partial_state,
            ));
        }
        // Metadata-only chunk, keep reading.
    }
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use bytes::Bytes;
    use order_bot_model::ModelProviderError;

    use super::*;
    use crate::io::Chunks;

    async fn collect(
        chunks: &[&'static [u8]],
    ) -> Result<Vec<ModelResponseEvent>, Error> {
        let chunks = Chunks::from_vec_deque(
            chunks.iter().copied().map(Bytes::from_static).collect(),
        );
        let mut resp = pin!(GeminiResponse::from_sse(Sse::new(chunks)));
        let mut events = Vec::new();
        while let Some(event) =
            poll_fn(|cx| resp.as_mut().poll_next_event(cx)).await?
        {
            events.push(event);
        }
        Ok(events)
    }

    #[tokio::test]
    async fn test_fixture_events() {
        let events = collect(&[include_bytes!(
            "../fixtures/test_response.txt"
        )])
        .await
        .unwrap();

        let text: String = events
            .iter()
            .filter_map(|event| match event {
                ModelResponseEvent::MessageDelta(delta) => Some(delta.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            text,
            "Great choice! The Camera (DSLR, 24MP, 4K Video) is in stock. \
             Shall I place the order?"
        );
        assert_eq!(
            events.last(),
            Some(&ModelResponseEvent::Completed(ModelFinishReason::Stop))
        );
    }

    #[tokio::test]
    async fn test_text_before_finish_reason() {
        let events = collect(&[
            b"data: {\"candidates\": [{\"content\": {\"parts\": [{\"text\": \"Done\"}]}, \"finishReason\": \"MAX_TOKENS\"}]}\r\n\r\n",
        ])
        .await
        .unwrap();
        assert_eq!(
            events,
            vec![
                ModelResponseEvent::MessageDelta("Done".to_owned()),
                ModelResponseEvent::Completed(ModelFinishReason::Length),
            ]
        );
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let err = collect(&[
            b"data: {\"promptFeedback\": {\"blockReason\": \"SAFETY\"}}\n\n",
        ])
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Moderated);
    }

    #[tokio::test]
    async fn test_safety_finish_reason() {
        let err = collect(&[
            b"data: {\"candidates\": [{\"finishReason\": \"SAFETY\"}]}\n\n",
        ])
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Moderated);
    }

    #[tokio::test]
    async fn test_malformed_chunk() {
        let err = collect(&[b"data: {not json}\n\n"]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_response_id_mismatch() {
        let err = collect(&[
            b"data: {\"responseId\": \"a\", \"candidates\": [{\"content\": {\"parts\": [{\"text\": \"x\"}]}}]}\n\n",
            b"data: {\"responseId\": \"b\", \"candidates\": [{\"content\": {\"parts\": [{\"text\": \"y\"}]}}]}\n\n",
        ])
        .await
        .unwrap_err();
        assert_eq!(err.message(), "response id mismatch");
    }
}
