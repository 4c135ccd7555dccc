use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::session::{Prompter, UserDecision};

const FALLBACK_WIDTH: usize = 80;

/// The running spinner, if any. Shared so the Ctrl-C handler can clear it.
pub type SpinnerSlot = Arc<Mutex<Option<ProgressBar>>>;

/// Terminal front-end: prints to `output`, reads answers line by line from `input`.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
    spinner: SpinnerSlot,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        ConsolePrompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompter {
            input,
            output,
            spinner: SpinnerSlot::default(),
        }
    }

    pub fn spinner_slot(&self) -> SpinnerSlot {
        Arc::clone(&self.spinner)
    }

    /// Ask the user a question and return a trimmed input line; `None` at end of input.
    fn prompt_input(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    // Output is best-effort; a closed stdout should not abort a commit decision.
    fn print(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}") {
            log::debug!("Failed to write to terminal: {e}");
        }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn show_diff(&mut self, diff: &str) {
        let width = terminal_width();
        let mut out = String::new();
        out.push_str(&format!("{}\n", rule(" Staged Diff ", width).yellow()));
        for line in diff.lines() {
            let styled = if line.starts_with("+++") || line.starts_with("---") {
                line.bold().to_string()
            } else if line.starts_with('+') {
                line.green().to_string()
            } else if line.starts_with('-') {
                line.red().to_string()
            } else if line.starts_with("@@") {
                line.cyan().to_string()
            } else {
                line.to_string()
            };
            out.push_str(&styled);
            out.push('\n');
        }
        out.push_str(&rule("", width).yellow().to_string());
        self.print(&out);
    }

    fn show_message(&mut self, message: &str) {
        let boxed = render_panel(" Suggested Commit Message ", message, terminal_width());
        self.print(&boxed.blue().to_string());
    }

    fn info(&mut self, text: &str) {
        self.print(&text.green().to_string());
    }

    fn warn(&mut self, text: &str) {
        self.print(&text.red().to_string());
    }

    fn request_decision(&mut self) -> io::Result<Option<UserDecision>> {
        let prompt = format!(
            "{} {} / {} / {} / {}: ",
            "Use this message?".bold().cyan(),
            "[Y]es".green(),
            "[N]o".red(),
            "[E]dit".yellow(),
            "[R]egenerate".magenta()
        );

        loop {
            let Some(answer) = self.prompt_input(&prompt)? else {
                return Ok(None);
            };
            match UserDecision::from_choice(&answer) {
                Some(decision) => return Ok(Some(decision)),
                None => self.warn("Invalid choice. Enter 'y', 'n', 'e', or 'r'."),
            }
        }
    }

    fn request_edit(&mut self, current: &str) -> io::Result<Option<String>> {
        self.print(&format!("{}\n{current}", "Current message:".bright_black()));
        self.prompt_input(&"Enter your commit message: ".yellow().to_string())
    }

    fn start_wait(&mut self, label: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(label.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        let mut slot = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(spinner) {
            previous.finish_and_clear();
        }
    }

    fn stop_wait(&mut self) {
        clear_spinner(&self.spinner);
    }
}

/// Stop and erase the spinner in `slot`, if one is running.
pub fn clear_spinner(slot: &SpinnerSlot) {
    let spinner = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(FALLBACK_WIDTH)
}

/// A horizontal rule with an optional title, `width` characters wide.
fn rule(title: &str, width: usize) -> String {
    let fill = width.saturating_sub(title.chars().count());
    format!("{title}{}", "─".repeat(fill))
}

/// Draw `body` in a box that fits its widest line, capped to `max_width`.
fn render_panel(title: &str, body: &str, max_width: usize) -> String {
    let widest = body.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let inner = widest
        .max(title.chars().count() + 2)
        .min(max_width.saturating_sub(4).max(1));

    let mut out = String::new();
    let top_fill = (inner + 2).saturating_sub(title.chars().count() + 1);
    out.push_str(&format!("╭─{title}{}╮\n", "─".repeat(top_fill)));
    for line in body.lines() {
        for chunk in wrap(line, inner) {
            let pad = inner - chunk.chars().count();
            out.push_str(&format!("│ {chunk}{} │\n", " ".repeat(pad)));
        }
    }
    out.push_str(&format!("╰{}╯", "─".repeat(inner + 2)));
    out
}

/// Hard-wrap a line into pieces of at most `width` characters.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}
