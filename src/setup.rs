use log::debug;
use crate::config::Config;
use crate::error::InferenceError;
use crate::llm::InferenceClient;
use crate::llm::huggingface::HuggingFaceClient;
use crate::llm::noop::NoopClient;

/// Build the inference client based on CLI + config.
pub fn build_inference_client(cfg: &Config) -> Result<Box<dyn InferenceClient>, InferenceError> {
    if cfg.no_model {
        debug!("Using NoopClient (no model calls)");
        return Ok(Box::new(NoopClient));
    }

    debug!("Using HuggingFaceClient with model {} at {}", cfg.model, cfg.api_base);
    Ok(Box::new(HuggingFaceClient::new(&cfg.api_base, cfg.timeout)?))
}
