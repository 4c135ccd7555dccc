use serde::Serialize;
use std::borrow::Cow;

use crate::git::StagedDiff;
use crate::llm::prompts;

/// Who a conversational turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// The conversation sent for one generation attempt: system style guide, then the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    turns: Vec<Turn>,
    truncated: bool,
}

impl PromptRequest {
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Whether the diff had to be cut to fit.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

/// Build the request for `diff`, capping the diff at `max_diff_chars`.
pub fn build_prompt(diff: &StagedDiff, max_diff_chars: usize) -> PromptRequest {
    let excerpt = diff_excerpt(diff, max_diff_chars);
    let truncated = matches!(excerpt, Cow::Owned(_));

    let mut system = prompts::COMMIT_STYLE_GUIDE.to_owned();
    if truncated {
        system.push('\n');
        system.push_str(prompts::TRUNCATION_NOTE);
    }

    let user = format!("Git diff:\n```diff\n{diff}\n```\n\nCommit message:", diff = excerpt);

    PromptRequest {
        turns: vec![
            Turn {
                role: Role::System,
                content: system,
            },
            Turn {
                role: Role::User,
                content: user,
            },
        ],
        truncated,
    }
}

/// The part of the diff the model (and the user) gets to see.
///
/// Diffs over `max_chars` characters are cut at the last line break inside the
/// limit, or at the limit itself when the first line is already too long, and
/// end with a marker line saying how much was kept.
pub fn diff_excerpt(diff: &StagedDiff, max_chars: usize) -> Cow<'_, str> {
    let text = diff.as_str();
    let total = text.chars().count();
    if total <= max_chars {
        return Cow::Borrowed(text);
    }

    let byte_cap = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..byte_cap];
    let cut = match head.rfind('\n') {
        Some(nl) if nl > 0 => &head[..nl],
        _ => head,
    };
    let shown = cut.chars().count();

    log::warn!("Diff too long ({total} chars), truncating to {shown} chars");

    Cow::Owned(format!(
        "{cut}\n... [diff truncated: {shown} of {total} chars shown]"
    ))
}
