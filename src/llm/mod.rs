pub mod huggingface;
pub mod noop;
pub mod prompt_builder;
mod prompts;

use crate::error::InferenceError;
use prompt_builder::PromptRequest;

/// Which model to ask, and how to authenticate. Fixed for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub model: String,
    pub token: Option<String>,
}

/// A candidate commit message returned by one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMessage(String);

impl GeneratedMessage {
    /// Clean up raw model output; blank output is an `EmptyResponse`.
    pub fn from_raw(raw: &str) -> Result<Self, InferenceError> {
        let text = strip_code_fence(raw.trim()).trim();
        if text.is_empty() {
            return Err(InferenceError::EmptyResponse);
        }
        Ok(GeneratedMessage(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Trait for talking to a chat-completion model.
#[cfg_attr(test, mockall::automock)]
pub trait InferenceClient: Send + Sync {
    /// One blocking completion call; no retries.
    fn generate(
        &self,
        request: &PromptRequest,
        config: &ModelConfig,
    ) -> Result<GeneratedMessage, InferenceError>;
}

/// Models like to wrap the answer in ``` fences even when told not to.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop an info string such as ```text on the opening line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim().contains(' ') => body,
        _ => inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let msg = GeneratedMessage::from_raw("\n  feat: add new line \n").unwrap();
        assert_eq!(msg.as_str(), "feat: add new line");
    }

    #[test]
    fn blank_output_is_empty_response() {
        assert!(matches!(
            GeneratedMessage::from_raw("  \n\t"),
            Err(InferenceError::EmptyResponse)
        ));
        assert!(matches!(
            GeneratedMessage::from_raw("```\n\n```"),
            Err(InferenceError::EmptyResponse)
        ));
    }

    #[test]
    fn unwraps_fenced_output() {
        let msg = GeneratedMessage::from_raw("```text\nfix: handle eof\n```").unwrap();
        assert_eq!(msg.as_str(), "fix: handle eof");

        let msg = GeneratedMessage::from_raw("```\nchore: bump deps\n\nbody line\n```").unwrap();
        assert_eq!(msg.as_str(), "chore: bump deps\n\nbody line");
    }

    #[test]
    fn keeps_multiline_body() {
        let raw = "feat(cli): add --model flag\n\nLets users pick another model.";
        assert_eq!(GeneratedMessage::from_raw(raw).unwrap().as_str(), raw);
    }
}
