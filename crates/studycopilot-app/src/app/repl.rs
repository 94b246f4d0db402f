use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::app::setup::create_copilot;
use crate::config::ClientConfig;
use crate::types::{MSG_PDF_CLEARED, MSG_PDF_UPLOADED, PAGE_TITLE, TAGLINE};
use crate::{Copilot, UploadOutcome};

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Exit,
    Help,
    Upload(PathBuf),
    ClearPdf,
    /// Show the model, or switch to the named one
    Model(Option<String>),
    /// Show the temperature, or set it
    Temperature(Option<String>),
    Options,
    History,
    Clear,
    Save(String),
    Load(String),
    Export { path: String, markdown: bool },
    /// Slash command that was not recognized or is missing its argument
    Unknown(String),
    /// A question or a link for the backend
    Input(String),
}

impl ReplCommand {
    /// Parse a prompt line. Returns None for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if line == "exit" || line == "quit" {
            return Some(ReplCommand::Exit);
        }
        if !line.starts_with('/') {
            return Some(ReplCommand::Input(line.to_string()));
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        let arg_opt = (!arg.is_empty()).then(|| arg.to_string());

        let command = match (name, arg_opt) {
            ("/help", _) => ReplCommand::Help,
            ("/upload", Some(path)) => ReplCommand::Upload(PathBuf::from(path)),
            ("/clear-pdf", _) => ReplCommand::ClearPdf,
            ("/model", name) => ReplCommand::Model(name),
            ("/temperature", value) => ReplCommand::Temperature(value),
            ("/options", _) => ReplCommand::Options,
            ("/history", _) => ReplCommand::History,
            ("/clear", _) => ReplCommand::Clear,
            ("/save", Some(path)) => ReplCommand::Save(path),
            ("/load", Some(path)) => ReplCommand::Load(path),
            ("/export", Some(rest)) => {
                let mut path = None;
                let mut markdown = false;
                for part in rest.split_whitespace() {
                    if part == "--markdown" {
                        markdown = true;
                    } else if path.is_none() {
                        path = Some(part.to_string());
                    }
                }
                match path {
                    Some(path) => ReplCommand::Export { path, markdown },
                    None => ReplCommand::Unknown(line.to_string()),
                }
            }
            _ => ReplCommand::Unknown(line.to_string()),
        };
        Some(command)
    }
}

fn print_help() {
    println!("{} Commands:", "💡".bright_cyan());
    println!("  <question>                     - Ask about your documents");
    println!("  <http(s)://link>               - Ingest a web page");
    println!("  /upload <file.pdf>             - Upload a PDF document");
    println!("  /clear-pdf                     - Forget the uploaded PDF");
    println!("  /model [Groq|OpenAI|Gemini]    - Show or switch the model");
    println!("  /temperature [0.0-2.0]         - Show or set the temperature");
    println!("  /options                       - Show model, temperature and document");
    println!("  /history                       - Reprint the conversation");
    println!("  /clear                         - Clear the conversation");
    println!("  /save <file>                   - Save the session to a JSON file");
    println!("  /load <file>                   - Load a session from a JSON file");
    println!("  /export <file.html> [--markdown] - Export the conversation as HTML");
    println!("  exit | quit                    - Leave");
}

/// Run a command that does not talk to the chat endpoints.
/// Returns false when the REPL should stop.
async fn handle_command(copilot: &mut Copilot, command: ReplCommand) -> bool {
    match command {
        ReplCommand::Exit => {
            println!("{}", "Goodbye!".bright_cyan());
            return false;
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Upload(path) => {
            println!("{} Uploading {}...", "⏳".bright_black(), path.display());
            match copilot.upload_pdf(&path).await {
                Ok(UploadOutcome::Uploaded(name)) => {
                    println!("{} {} ({})", "✅".bright_green(), MSG_PDF_UPLOADED, name)
                }
                Ok(UploadOutcome::Failed(msg)) => eprintln!("{} {}", "❌".bright_red(), msg),
                Err(e) => eprintln!("{} {}", "❌".bright_red(), e),
            }
        }
        ReplCommand::ClearPdf => {
            if copilot.clear_pdf().await {
                println!("{} {}", "🗑️".bright_green(), MSG_PDF_CLEARED);
            } else {
                println!("{} No PDF uploaded", "ℹ️".bright_blue());
            }
        }
        ReplCommand::Model(None) => {
            println!(
                "{} Model: {} (available: {})",
                "⚙️".bright_cyan(),
                copilot.state.options.model.display_name().bright_magenta(),
                crate::ModelChoice::available()
            );
        }
        ReplCommand::Model(Some(name)) => match copilot.set_model(&name).await {
            Ok(msg) => println!("{} {}", "⚙️".bright_green(), msg),
            Err(e) => eprintln!("{} {}", "❌".bright_red(), e),
        },
        ReplCommand::Temperature(None) => {
            println!("{} Temperature: {:.1}", "⚙️".bright_cyan(), copilot.state.options.temperature);
        }
        ReplCommand::Temperature(Some(value)) => match copilot.set_temperature(&value).await {
            Ok(msg) => println!("{} {}", "⚙️".bright_green(), msg),
            Err(e) => eprintln!("{} {}", "❌".bright_red(), e),
        },
        ReplCommand::Options => println!("{}", copilot.renderer.sidebar(&copilot.state)),
        ReplCommand::History => {
            if copilot.state.chat_history.is_empty() {
                println!("{} No messages yet", "ℹ️".bright_blue());
            } else {
                println!("{}", copilot.renderer.history(&copilot.state.chat_history));
            }
        }
        ReplCommand::Clear => {
            copilot.clear_history();
            println!("{} Conversation cleared", "🗑️".bright_green());
        }
        ReplCommand::Save(path) => match copilot.save_state(&path) {
            Ok(msg) => println!("{} {}", "💾".bright_green(), msg),
            Err(e) => eprintln!("{} Failed to save: {}", "❌".bright_red(), e),
        },
        ReplCommand::Load(path) => match copilot.load_state(&path) {
            Ok(msg) => println!("{} {}", "📂".bright_green(), msg),
            Err(e) => eprintln!("{} Failed to load: {}", "❌".bright_red(), e),
        },
        ReplCommand::Export { path, markdown } => match copilot.export_html(&path, markdown) {
            Ok(msg) => println!("{} {}", "📄".bright_green(), msg),
            Err(e) => eprintln!("{} Failed to export: {}", "❌".bright_red(), e),
        },
        ReplCommand::Unknown(line) => {
            eprintln!(
                "{} Unknown command or missing argument: '{}'. Type /help for the list.",
                "❌".bright_red(),
                line
            );
        }
        ReplCommand::Input(_) => {}
    }
    true
}

/// Run interactive REPL mode
pub async fn run_repl_mode(config: &ClientConfig) -> Result<()> {
    println!("{}", PAGE_TITLE.bright_cyan().bold());
    println!("{}", TAGLINE.bright_black());

    let mut copilot = create_copilot(config, false).await;

    println!("{}", format!("Backend: {}", copilot.backend.describe()).bright_black());
    if let Some(logger) = &copilot.logger {
        println!("{}", format!("Logging to {}", logger.file_path().display()).bright_black());
    }
    println!("{}", copilot.renderer.sidebar(&copilot.state));
    println!("{}", "Type a question or a link, '/help' for commands, 'exit' to quit\n".bright_black());

    let mut rl = DefaultEditor::new()?;

    // Token of the answer currently being revealed, if any
    let current_token: Arc<Mutex<Option<CancellationToken>>> = Arc::new(Mutex::new(None));
    let current_token_for_handler = current_token.clone();

    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_ok() {
                if let Ok(guard) = current_token_for_handler.lock() {
                    if let Some(ref token) = *guard {
                        println!("\n{}", "^C - Skipping animation...".bright_yellow());
                        token.cancel();
                    }
                }
            }
        }
    });

    loop {
        let model_indicator = format!("[{}]", copilot.state.options.model.display_name()).bright_magenta();
        let readline = rl.readline(&format!("{} {} ", model_indicator, "You:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let Some(command) = ReplCommand::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());

                let input = match command {
                    ReplCommand::Input(input) => input,
                    other => {
                        if !handle_command(&mut copilot, other).await {
                            break;
                        }
                        continue;
                    }
                };

                let cancel_token = CancellationToken::new();
                if let Ok(mut guard) = current_token.lock() {
                    *guard = Some(cancel_token.clone());
                }

                let result = copilot.submit(&input, &mut io::stdout(), Some(&cancel_token)).await;

                if let Ok(mut guard) = current_token.lock() {
                    *guard = None;
                }

                match result {
                    Ok(Some(_)) => println!(),
                    Ok(None) => {
                        println!("{}", "Same input as last time, nothing sent".bright_black());
                    }
                    Err(e) => eprintln!("{} {}\n", "Error:".bright_red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C (type 'exit' to quit)".bright_black());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        }
    }

    copilot.shutdown().await;
    Ok(())
}
