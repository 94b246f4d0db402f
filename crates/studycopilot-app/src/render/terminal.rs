use colored::Colorize;

use crate::types::{ChatHistory, Role, SessionState};

const DEFAULT_WIDTH: usize = 100;
const MIN_BUBBLE_WIDTH: usize = 20;
const ASSISTANT_INDENT: &str = "  ";

/// Chat bubbles for a terminal: user turns on the right, assistant turns on
/// the left, both limited to 70% of the width.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    width: usize,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl TerminalRenderer {
    pub fn new(width: usize) -> Self {
        Self { width: width.max(MIN_BUBBLE_WIDTH) }
    }

    /// Width from the COLUMNS environment variable, if it is set
    pub fn from_env() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_WIDTH);
        Self::new(width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn bubble_width(&self) -> usize {
        (self.width * 7 / 10).max(MIN_BUBBLE_WIDTH).min(self.width)
    }

    pub fn user_bubble(&self, text: &str) -> String {
        let lines = wrap_text(text, self.bubble_width() - 2);
        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let margin = " ".repeat(self.width.saturating_sub(inner + 2));

        let mut out = format!("{}{}", " ".repeat(self.width.saturating_sub(3)), "You".bright_black());
        for line in lines {
            let padded = format!(" {:<inner$} ", line, inner = inner);
            out.push('\n');
            out.push_str(&margin);
            out.push_str(&padded.white().on_blue().to_string());
        }
        out
    }

    pub fn assistant_header(&self) -> String {
        format!("{}", "🤖 Copilot".bright_cyan().bold())
    }

    /// Assistant text laid out for the left column. The typing animation
    /// replays exactly this string.
    pub fn assistant_body(&self, text: &str) -> String {
        wrap_text(text, self.bubble_width() - ASSISTANT_INDENT.len())
            .into_iter()
            .map(|line| format!("{}{}", ASSISTANT_INDENT, line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn assistant_bubble(&self, text: &str) -> String {
        format!("{}\n{}", self.assistant_header(), self.assistant_body(text))
    }

    pub fn history(&self, history: &ChatHistory) -> String {
        history
            .iter()
            .map(|turn| match turn.role {
                Role::User => self.user_bubble(&turn.content),
                Role::Assistant => self.assistant_bubble(&turn.content),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Options and document status, the terminal counterpart of a sidebar
    pub fn sidebar(&self, state: &SessionState) -> String {
        let document = if state.pdf_uploaded {
            "PDF uploaded".green().to_string()
        } else {
            "none".bright_black().to_string()
        };
        format!(
            "{} model: {} • temperature: {:.1}\n{} document: {}",
            "⚙️".bright_cyan(),
            state.options.model.display_name().bright_magenta(),
            state.options.temperature,
            "📄".bright_cyan(),
            document
        )
    }
}

/// Greedy word wrap counted in characters. Explicit newlines are kept and
/// words longer than the width are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                lines.push(word.drain(..width).collect());
            }

            if word.is_empty() {
                continue;
            }
            if current_len > 0 && current_len + 1 + word.len() > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        lines.push(current);
    }

    lines
}
