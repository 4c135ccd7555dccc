use crate::Cli;
use crate::llm::ModelConfig;
use crate::llm::huggingface::DEFAULT_API_BASE;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.2-3B-Instruct";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_DIFF_CHARS: usize = 5000;

/// Final resolved configuration for ai-commit. Read-only after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: String,
    pub token: Option<String>,
    pub no_model: bool,
    pub api_base: String,
    pub timeout: Duration,
    pub max_diff_chars: usize,
    pub max_regenerations: Option<u32>,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--timeout`, ...)
    ///   2. Env vars `AI_COMMIT_MODEL`, `AI_COMMIT_API_BASE`
    ///   3. TOML `~/.config/ai-commit.toml`
    ///   4. Hardcoded defaults
    ///
    /// The bearer token only ever comes from `HF_TOKEN`.
    pub fn from_sources(cli: &Cli) -> Self {
        let file_cfg = load_file_config().unwrap_or_default();
        resolve(cli, |key| env::var(key).ok(), file_cfg)
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model: self.model.clone(),
            token: self.token.clone(),
        }
    }
}

fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>, file_cfg: FileConfig) -> Config {
    let model = cli
        .model
        .clone()
        .or_else(|| env("AI_COMMIT_MODEL"))
        .or(file_cfg.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let api_base = cli
        .api_base
        .clone()
        .or_else(|| env("AI_COMMIT_API_BASE"))
        .or(file_cfg.api_base)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let timeout_secs = cli
        .timeout
        .or(file_cfg.timeout_secs)
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let max_diff_chars = cli
        .max_diff_chars
        .map(|n| n as usize)
        .or(file_cfg.max_diff_chars)
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_DIFF_CHARS);

    let token = env("HF_TOKEN").filter(|t| !t.trim().is_empty());

    Config {
        no_model: cli.no_model || model.eq_ignore_ascii_case("none"),
        model,
        token,
        api_base,
        timeout: Duration::from_secs(timeout_secs),
        max_diff_chars,
        max_regenerations: cli.max_regenerations.or(file_cfg.max_regenerations),
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_diff_chars: Option<usize>,
    pub max_regenerations: Option<u32>,
}

/// Return `~/.config/ai-commit.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("ai-commit.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }
    read_file_config(&path)
}

fn read_file_config(path: &Path) -> Option<FileConfig> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Ignoring unreadable config file {}: {e}", path.display());
            return None;
        }
    };
    match toml::from_str::<FileConfig>(&data) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Ignoring invalid config file {}: {e}", path.display());
            None
        }
    }
}
