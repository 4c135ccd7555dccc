use super::prompt_builder::{PromptRequest, Turn};
use super::{GeneratedMessage, InferenceClient, ModelConfig};
use crate::error::InferenceError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://router.huggingface.co/v1";

/// Minimal request/response structs for the OpenAI-compatible Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Hugging Face inference router (or any OpenAI-compatible endpoint).
pub struct HuggingFaceClient {
    client: Client,
    api_base_url: String,
}

impl HuggingFaceClient {
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(HuggingFaceClient {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }
}

impl InferenceClient for HuggingFaceClient {
    fn generate(
        &self,
        request: &PromptRequest,
        config: &ModelConfig,
    ) -> Result<GeneratedMessage, InferenceError> {
        let url = self.chat_url();
        let body = ChatRequest {
            model: &config.model,
            messages: request.turns(),
            stream: false,
        };

        log::info!("Calling model {:?} at {}", config.model, url);
        if request.truncated() {
            log::debug!("Sending a truncated diff");
        }
        if let Some(user) = request.turns().last() {
            log::trace!("User prompt:\n{}", truncate(&user.content, 3000));
        }

        let mut req = self.client.post(url).json(&body);
        match &config.token {
            Some(token) => req = req.bearer_auth(token),
            None => log::debug!("HF_TOKEN not set; sending unauthenticated request"),
        }

        let resp = req.send().map_err(classify_send_error)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().unwrap_or_default();
            return Err(InferenceError::from_status(status, text, &config.model));
        }

        let text = resp.text().map_err(classify_send_error)?;
        let chat_resp: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        if let Some(usage) = &chat_resp.usage {
            log::debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let content = chat_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::MalformedResponse("no choices returned".into()))?
            .message
            .content
            .unwrap_or_default();

        GeneratedMessage::from_raw(&content)
    }
}

fn classify_send_error(err: reqwest::Error) -> InferenceError {
    if err.is_timeout() {
        InferenceError::Timeout
    } else {
        InferenceError::Network(err.to_string())
    }
}

/// Truncate long strings for debug logging.
fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...\n[truncated {} bytes]", &s[..idx], s.len() - idx),
    }
}
