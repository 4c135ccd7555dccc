use clap::{ArgGroup, Parser};

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "ai-commit",
    version,
    about = "Suggest a Conventional Commits message for your staged changes using an LLM"
)]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
pub struct Cli {
    /// Model to use (e.g. meta-llama/Llama-3.2-3B-Instruct)
    #[arg(long)]
    pub model: Option<String>,

    /// Disable model calls; suggest a dummy message instead
    #[arg(long)]
    pub no_model: bool,

    /// Base URL of the OpenAI-compatible chat-completion endpoint
    #[arg(long, env = "AI_COMMIT_API_BASE")]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Maximum number of diff characters sent to the model
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_diff_chars: Option<u64>,

    /// Maximum number of regenerations per run (default: unlimited)
    #[arg(long)]
    pub max_regenerations: Option<u32>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
