//! Chat completion request body.

use serde::Serialize;

use super::prompt::build_prompt;

/// OpenAI-compatible chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f32,
    pub max_completion_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
    /// Always serialized, as `null` when unset.
    pub stop: Option<Vec<String>>,
    pub response_format: ResponseFormat,
}

/// One chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Asks the model for a JSON object answer.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ChatRequest {
    /// Request scoring one article with the given model.
    pub fn for_article(model: &str, content: &str) -> Self {
        Self {
            messages: vec![ChatMessage { role: "user", content: build_prompt(content) }],
            model: model.to_string(),
            temperature: 1.0,
            max_completion_tokens: 1024,
            top_p: 1.0,
            stream: false,
            stop: None,
            response_format: ResponseFormat { kind: "json_object" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_fields() {
        let req = ChatRequest::for_article("llama3-8b-8192", "Some article text");
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["max_completion_tokens"], 1024);
        assert_eq!(body["top_p"], 1.0);
        assert_eq!(body["stream"], false);
        assert!(body["stop"].is_null());
        assert!(body.as_object().unwrap().contains_key("stop"));
        assert_eq!(body["response_format"]["type"], "json_object");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert!(messages[0]["content"].as_str().unwrap().ends_with("\n\nSome article text"));
    }
}
