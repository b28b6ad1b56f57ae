//! OpenAI text-completions client (https://api.openai.com/v1 by default).

use crate::llm::{CompletionBackend, CompletionError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Prompt sent to the model for a LinkedIn comment.
pub fn build_prompt(comment_text: &str) -> String {
    format!("Analyze and respond to this LinkedIn comment: \"{}\"", comment_text)
}

/// Client for the OpenAI `/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(base_url: Option<String>, api_key: String, model: String, max_tokens: u32) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            api_key,
            model,
            max_tokens,
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// POST /completions — single non-streaming completion; returns the first choice, trimmed.
    pub async fn complete_prompt(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(CompletionError::Api(format!("{} {}", status, body)));
        }
        let data: CompletionResponse = res.json().await?;
        data.first_text().ok_or(CompletionError::EmptyCompletion)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, comment_text: &str) -> Result<String, CompletionError> {
        self.complete_prompt(&build_prompt(comment_text)).await
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

impl CompletionResponse {
    /// First choice's text, trimmed. None when there are no choices or the text is blank.
    fn first_text(&self) -> Option<String> {
        self.choices
            .first()
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_quotes_comment() {
        assert_eq!(
            build_prompt("Great post!"),
            "Analyze and respond to this LinkedIn comment: \"Great post!\""
        );
    }

    #[test]
    fn first_text_trims() {
        let r: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"text":"\n\n Thanks! \n"},{"text":"other"}]}"#).unwrap();
        assert_eq!(r.first_text().as_deref(), Some("Thanks!"));
    }

    #[test]
    fn first_text_none_for_empty_choices() {
        let r: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(r.first_text().is_none());
        let r: CompletionResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(r.first_text().is_none());
    }

    #[test]
    fn first_text_none_for_blank_text() {
        let r: CompletionResponse = serde_json::from_str(r#"{"choices":[{"text":"  \n"}]}"#).unwrap();
        assert!(r.first_text().is_none());
    }

    #[test]
    fn new_trims_trailing_slash() {
        let c = OpenAiClient::new(
            Some("http://localhost:9999/v1/".to_string()),
            "k".to_string(),
            "m".to_string(),
            10,
        );
        assert_eq!(c.base_url, "http://localhost:9999/v1");
        assert_eq!(c.model(), "m");
    }
}
