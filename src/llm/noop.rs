use super::prompt_builder::PromptRequest;
use super::{GeneratedMessage, InferenceClient, ModelConfig};
use crate::error::InferenceError;

/// No-op / dummy model client for development with --no-model.
pub struct NoopClient;

impl InferenceClient for NoopClient {
    fn generate(
        &self,
        request: &PromptRequest,
        _config: &ModelConfig,
    ) -> Result<GeneratedMessage, InferenceError> {
        let prompt_chars: usize = request.turns().iter().map(|t| t.content.chars().count()).sum();
        GeneratedMessage::from_raw(&format!(
            "chore: dummy commit message\n\n(LLM disabled; prompt was {prompt_chars} chars)"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::StagedDiff;
    use crate::llm::prompt_builder::build_prompt;

    #[test]
    fn produces_a_conventional_placeholder() {
        let req = build_prompt(&StagedDiff::new("+ x").unwrap(), 100);
        let cfg = ModelConfig {
            model: "none".into(),
            token: None,
        };
        let msg = NoopClient.generate(&req, &cfg).unwrap();
        assert!(msg.as_str().starts_with("chore: dummy commit message"));
    }
}
