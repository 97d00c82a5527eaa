//! Chat-completions planner.
//!
//! Keeps the conversation history across turns and sends the preamble as the
//! system message. Camera follow-ups go out as multi-part user messages with
//! the image inlined as a base64 `data:` URL; only the text part is kept in
//! history afterwards.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use guide_core::{CapturedImage, Planner};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};

/// Message content: plain text or a list of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// A message in the chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text("assistant", content)
    }

    /// A user message carrying an instruction and an image.
    pub fn user_with_image(instruction: impl Into<String>, image: &CapturedImage) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: instruction.into(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: data_url(image),
                    },
                },
            ]),
        }
    }

    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// The same message with image parts removed.
    fn text_only(&self) -> Self {
        match &self.content {
            MessageContent::Text(_) => self.clone(),
            MessageContent::Parts(parts) => {
                let text = parts
                    .iter()
                    .filter_map(|part| match part {
                        ContentPart::Text { text } => Some(text.as_str()),
                        ContentPart::ImageUrl { .. } => None,
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                Self::text(&self.role, text)
            }
        }
    }
}

/// Encodes an image as a `data:` URL.
pub fn data_url(image: &CapturedImage) -> String {
    format!(
        "data:{};base64,{}",
        image.media_type,
        base64::engine::general_purpose::STANDARD.encode(&image.bytes)
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<&'a ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Planner backed by an OpenRouter-compatible chat completions API.
pub struct ChatPlanner {
    config: PlannerConfig,
    system: Option<ChatMessage>,
    history: Vec<ChatMessage>,
    client: reqwest::Client,
}

impl ChatPlanner {
    /// Creates a planner. No request is made until the first turn.
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            system: None,
            history: Vec::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Returns true if an API key is configured.
    pub fn is_available(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Conversation so far, excluding the system message.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Sends `message` with the history and returns the assistant's reply.
    ///
    /// The history is left untouched when the request fails.
    pub async fn send(&mut self, message: ChatMessage) -> Result<String> {
        self.history.push(message);

        match self.complete().await {
            Ok(content) => {
                if let Some(last) = self.history.last_mut() {
                    *last = last.text_only();
                }
                self.history.push(ChatMessage::assistant(&content));
                self.trim_history();
                Ok(content)
            }
            Err(err) => {
                self.history.pop();
                Err(err)
            }
        }
    }

    fn request(&self) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.config.model,
            messages: self.system.iter().chain(self.history.iter()).collect(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn complete(&self) -> Result<String> {
        let api_key = self.config.api_key.as_ref().ok_or(PlannerError::NoApiKey)?;
        let request = self.request();
        debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            "sending planner request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PlannerError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read response".to_string());
            warn!(status, "planner request rejected");
            return Err(PlannerError::Api { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PlannerError::RequestFailed(e.to_string()))?;
        parse_completion(&body)
    }

    fn trim_history(&mut self) {
        let Some(limit) = self.config.history_limit else {
            return;
        };
        if self.history.len() <= limit {
            return;
        }
        // Whole exchanges only: the kept history must open with a user turn.
        let mut excess = self.history.len() - limit;
        while excess < self.history.len() && self.history[excess].role != "user" {
            excess += 1;
        }
        self.history.drain(..excess);
        debug!(dropped = excess, "trimmed planner history");
    }
}

/// Extracts the first choice's text from a completion body.
fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| PlannerError::Parse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(PlannerError::EmptyResponse)
}

#[async_trait]
impl Planner for ChatPlanner {
    fn set_preamble(&mut self, preamble: &str) {
        self.system = Some(ChatMessage::system(preamble));
    }

    async fn ask(&mut self, utterance: &str) -> guide_core::Result<String> {
        Ok(self.send(ChatMessage::user(utterance)).await?)
    }

    async fn ask_with_image(
        &mut self,
        instruction: &str,
        image: &CapturedImage,
    ) -> guide_core::Result<String> {
        Ok(self
            .send(ChatMessage::user_with_image(instruction, image))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image() -> CapturedImage {
        CapturedImage::new(b"hello".to_vec(), "image/png")
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url(&image()), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_image_message_wire_format() {
        let message = ChatMessage::user_with_image("What is this?", &image());
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "What is this?"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,aGVsbG8="}}
                ]
            })
        );
    }

    #[test]
    fn test_text_only_strips_images() {
        let message = ChatMessage::user_with_image("Describe it.", &image());
        assert_eq!(message.text_only(), ChatMessage::user("Describe it."));
    }

    #[test]
    fn test_request_puts_system_first() {
        let mut planner = ChatPlanner::new(PlannerConfig::default().with_model("test/model"));
        planner.set_preamble("You are a museum guide.");
        planner.history.push(ChatMessage::user("hi"));

        let value = serde_json::to_value(planner.request()).unwrap();
        assert_eq!(value["model"], "test/model");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "You are a museum guide.");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_parse_completion() {
        let body = r##"{"choices":[{"message":{"role":"assistant","content":"#forward 100"}}]}"##;
        assert_eq!(parse_completion(body).unwrap(), "#forward 100");

        let empty = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(matches!(
            parse_completion(empty),
            Err(PlannerError::EmptyResponse)
        ));

        assert!(matches!(
            parse_completion("not json"),
            Err(PlannerError::Parse(_))
        ));
    }

    #[test]
    fn test_history_limit() {
        let mut planner = ChatPlanner::new(PlannerConfig::default().with_history_limit(2));
        for i in 0..3 {
            planner.history.push(ChatMessage::user(format!("q{i}")));
            planner.history.push(ChatMessage::assistant(format!("a{i}")));
        }
        planner.trim_history();
        assert_eq!(
            planner.history(),
            &[ChatMessage::user("q2"), ChatMessage::assistant("a2")]
        );
    }

    #[test]
    fn test_odd_history_limit_keeps_whole_exchanges() {
        let mut planner = ChatPlanner::new(PlannerConfig::default().with_history_limit(3));
        for i in 0..3 {
            planner.history.push(ChatMessage::user(format!("q{i}")));
            planner.history.push(ChatMessage::assistant(format!("a{i}")));
        }
        planner.trim_history();
        assert_eq!(
            planner.history(),
            &[ChatMessage::user("q2"), ChatMessage::assistant("a2")]
        );
    }

    #[tokio::test]
    async fn test_missing_key_leaves_history_untouched() {
        let mut planner = ChatPlanner::new(PlannerConfig::default());
        assert!(!planner.is_available());

        let err = planner.ask("hello").await.unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
        assert!(planner.history().is_empty());
    }
}
