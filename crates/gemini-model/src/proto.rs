use order_bot_model::{ModelMessage, ModelRequest};
use serde::{Deserialize, Serialize};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub response_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
    // Thought summaries are not part of the reply.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the reply text of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[inline]
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }

    #[inline]
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }
}

impl ErrorEnvelope {
    /// Renders the error as `STATUS: message`, falling back to whichever
    /// half is present.
    pub fn describe(&self) -> Option<String> {
        match (&self.error.status, &self.error.message) {
            (Some(status), Some(message)) => Some(format!("{status}: {message}")),
            (None, Some(message)) => Some(message.clone()),
            (Some(status), None) => Some(status.clone()),
            (None, None) => None,
        }
    }
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Part {
    text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ModelRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: req.messages.iter().map(create_content).collect(),
    }
}

#[inline]
fn create_content(msg: &ModelMessage) -> Content {
    // Gemini calls the assistant side of the conversation `model`.
    let role = match msg {
        ModelMessage::User(_) => "user",
        ModelMessage::Assistant(_) => "model",
    };
    Content {
        role,
        parts: vec![Part {
            text: msg.text().to_owned(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            messages: vec![
                ModelMessage::User("Hello".to_owned()),
                ModelMessage::Assistant("Hi! What would you like?".to_owned()),
                ModelMessage::User("A camera".to_owned()),
            ],
        };
        let body = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "Hello" }] },
                    {
                        "role": "model",
                        "parts": [{ "text": "Hi! What would you like?" }]
                    },
                    { "role": "user", "parts": [{ "text": "A camera" }] }
                ]
            })
        );
    }

    #[test]
    fn test_parse_chunk() {
        let chunk: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "Great " },
                        { "text": "choice!" }
                    ]
                },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": { "totalTokenCount": 12 },
            "responseId": "abc"
        }))
        .unwrap();
        assert_eq!(chunk.text(), "Great choice!");
        assert_eq!(chunk.finish_reason(), Some("STOP"));
        assert_eq!(chunk.block_reason(), None);
        assert_eq!(chunk.response_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let chunk: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(chunk.candidates.is_empty());
        assert_eq!(chunk.text(), "");
        assert_eq!(chunk.block_reason(), Some("SAFETY"));
    }

    #[test]
    fn test_describe_error() {
        let envelope: ErrorEnvelope = serde_json::from_value(json!({
            "error": {
                "code": 429,
                "message": "Quota exceeded",
                "status": "RESOURCE_EXHAUSTED"
            }
        }))
        .unwrap();
        assert_eq!(
            envelope.describe().as_deref(),
            Some("RESOURCE_EXHAUSTED: Quota exceeded")
        );
    }
}
