//! Chat completion response envelope.

use serde::Deserialize;

use super::ScorerError;

/// Raw chat completion response; only the fields we read.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Model that actually answered, as reported by the API.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, the model's JSON answer.
    pub fn into_content(self) -> Result<String, ScorerError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ScorerError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "llama3-8b-8192",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "{\"trust_level\":\"reliable\",\"authors\":[],\"detections\":[]}"
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 900, "completion_tokens": 20, "total_tokens": 920}
    }"#;

    #[test]
    fn test_deserialize_completion() {
        let response: ChatResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(response.model.as_deref(), Some("llama3-8b-8192"));
        let content = response.into_content().unwrap();
        assert!(content.contains("\"trust_level\":\"reliable\""));
    }

    #[test]
    fn test_no_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(response.into_content(), Err(ScorerError::EmptyCompletion)));
    }

    #[test]
    fn test_null_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#).unwrap();
        assert!(matches!(response.into_content(), Err(ScorerError::EmptyCompletion)));
    }
}
