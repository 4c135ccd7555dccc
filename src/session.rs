use std::io;

use crate::error::{InferenceError, SessionError};
use crate::git::{Committer, DiffSource};
use crate::llm::prompt_builder::{self, PromptRequest};
use crate::llm::{GeneratedMessage, InferenceClient, ModelConfig};

/// What the user wants to do with the message on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDecision {
    Accept,
    Reject,
    Edit,
    Regenerate,
}

impl UserDecision {
    /// Parse a typed answer; an empty answer accepts.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => Some(UserDecision::Accept),
            "n" | "no" => Some(UserDecision::Reject),
            "e" | "edit" => Some(UserDecision::Edit),
            "r" | "regen" | "regenerate" => Some(UserDecision::Regenerate),
            _ => None,
        }
    }
}

/// Everything the session needs from whoever is sitting at the terminal.
///
/// `Ok(None)` from a request means input ended; the session treats that as a cancel.
pub trait Prompter {
    fn show_diff(&mut self, diff: &str);
    fn show_message(&mut self, message: &str);
    fn info(&mut self, text: &str);
    fn warn(&mut self, text: &str);
    fn request_decision(&mut self) -> io::Result<Option<UserDecision>>;
    fn request_edit(&mut self, current: &str) -> io::Result<Option<String>>;
    fn start_wait(&mut self, label: &str);
    fn stop_wait(&mut self);
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub max_diff_chars: usize,
    /// `None` allows unlimited regenerations.
    pub max_regenerations: Option<u32>,
}

/// How a session ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Committed { message: String, summary: String },
    Cancelled,
    NothingToCommit,
}

/// One diff-to-commit run: read the diff once, then loop on the user's decisions.
pub struct Session<'a> {
    diffs: &'a dyn DiffSource,
    client: &'a dyn InferenceClient,
    committer: &'a dyn Committer,
    config: &'a ModelConfig,
    options: SessionOptions,
}

impl<'a> Session<'a> {
    pub fn new(
        diffs: &'a dyn DiffSource,
        client: &'a dyn InferenceClient,
        committer: &'a dyn Committer,
        config: &'a ModelConfig,
        options: SessionOptions,
    ) -> Self {
        Session {
            diffs,
            client,
            committer,
            config,
            options,
        }
    }

    pub fn run(&self, prompter: &mut dyn Prompter) -> Result<Outcome, SessionError> {
        let Some(diff) = self.diffs.staged_diff()? else {
            log::info!("Nothing staged; skipping generation");
            return Ok(Outcome::NothingToCommit);
        };

        prompter.show_diff(&prompt_builder::diff_excerpt(&diff, self.options.max_diff_chars));

        let request = prompt_builder::build_prompt(&diff, self.options.max_diff_chars);
        let mut current = self
            .generate(&request, prompter, "Generating commit message...")
            .map_err(SessionError::Inference)?
            .into_string();
        let mut regenerations: u32 = 0;

        loop {
            prompter.show_message(&current);

            let Some(decision) = prompter.request_decision()? else {
                return Ok(Outcome::Cancelled);
            };
            log::debug!("User decision: {decision:?}");

            match decision {
                UserDecision::Accept => {
                    let summary = self.committer.commit(&current)?;
                    return Ok(Outcome::Committed {
                        message: current,
                        summary,
                    });
                }
                UserDecision::Reject => return Ok(Outcome::Cancelled),
                UserDecision::Edit => match prompter.request_edit(&current)? {
                    None => return Ok(Outcome::Cancelled),
                    Some(text) if text.trim().is_empty() => {
                        prompter.warn("Commit message cannot be empty; keeping the current one.");
                    }
                    Some(text) => current = text.trim().to_string(),
                },
                UserDecision::Regenerate => {
                    if let Some(max) = self
                        .options
                        .max_regenerations
                        .filter(|max| regenerations >= *max)
                    {
                        prompter.warn(&format!(
                            "Regeneration limit of {max} reached; accept, edit or reject the current message."
                        ));
                        continue;
                    }
                    regenerations += 1;

                    match self.generate(&request, prompter, "Regenerating commit message...") {
                        Ok(msg) => current = msg.into_string(),
                        Err(e) if e.is_recoverable() => prompter.warn(&format!(
                            "Regeneration failed: {e}. Keeping the previous message."
                        )),
                        Err(e) => prompter.warn(&format!(
                            "Regeneration failed: {e}. Retrying is unlikely to help; keeping the previous message."
                        )),
                    }
                }
            }
        }
    }

    fn generate(
        &self,
        request: &PromptRequest,
        prompter: &mut dyn Prompter,
        label: &str,
    ) -> Result<GeneratedMessage, InferenceError> {
        prompter.start_wait(label);
        let result = self.client.generate(request, self.config);
        prompter.stop_wait();

        // Failures reach the user through the caller; keep the log quiet.
        match &result {
            Ok(msg) => log::debug!("Model suggested {} chars", msg.as_str().len()),
            Err(e) => log::debug!("Inference failed (transient: {}): {e}", e.is_transient()),
        }
        result
    }
}
