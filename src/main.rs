mod cli_args;
mod config;
mod error;
mod git;
mod interrupt;
mod llm;
mod logging;
mod session;
mod setup;
mod ui;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli_args::Cli;
use config::Config;
use git::GitCli;
use interrupt::{CommitGate, GatedCommitter};
use session::{Outcome, Prompter, Session, SessionOptions};
use ui::ConsolePrompter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let mut prompter = ConsolePrompter::stdio();
    let gate = CommitGate::default();
    if let Err(e) = interrupt::install(gate.clone(), prompter.spinner_slot()) {
        log::warn!("Could not install the Ctrl-C handler: {e}");
    }

    match run(&cli, gate, &mut prompter) {
        Ok(outcome) => {
            report(&outcome, &mut prompter);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// One diff-to-commit session against the repository in the current directory.
fn run(cli: &Cli, gate: CommitGate, prompter: &mut dyn Prompter) -> Result<Outcome> {
    let cfg = Config::from_sources(cli);
    log::info!(
        "Model: {} (token {})",
        cfg.model,
        if cfg.token.is_some() { "set" } else { "not set" }
    );

    let client = setup::build_inference_client(&cfg)
        .context("failed to set up the inference client")?;
    let model_config = cfg.model_config();
    let options = SessionOptions {
        max_diff_chars: cfg.max_diff_chars,
        max_regenerations: cfg.max_regenerations,
    };

    let git = GitCli;
    let committer = GatedCommitter::new(git, gate);
    let session = Session::new(&git, client.as_ref(), &committer, &model_config, options);
    let outcome = session.run(prompter)?;
    Ok(outcome)
}

fn report(outcome: &Outcome, prompter: &mut dyn Prompter) {
    match outcome {
        Outcome::Committed { message, summary } => {
            if !summary.is_empty() {
                prompter.info(summary);
            }
            let first_line = message.lines().next().unwrap_or_default();
            prompter.info(&format!("Successfully committed with message: {first_line}"));
        }
        Outcome::Cancelled => prompter.warn("Commit cancelled by user."),
        Outcome::NothingToCommit => {
            prompter.info("No staged changes. Stage your files first (`git add`).")
        }
    }
}
