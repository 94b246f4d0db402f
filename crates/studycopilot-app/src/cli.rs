use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for studycopilot
#[derive(Parser, Debug)]
#[command(name = "studycopilot")]
#[command(about = "AI Study & Research Copilot - chat with everything you learn")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the backend deployment
    #[arg(long, value_name = "URL", env = "COPILOT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Endpoint contract of the backend (ingest, chat)
    #[arg(long, value_name = "PROFILE", env = "COPILOT_ENDPOINT_PROFILE")]
    pub profile: Option<String>,

    /// Model shown in the options panel (Groq, OpenAI, Gemini)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Temperature shown in the options panel
    #[arg(long, value_name = "VALUE")]
    pub temperature: Option<f32>,

    /// Delay between revealed characters of an answer, in milliseconds
    #[arg(long, value_name = "MS")]
    pub typing_delay_ms: Option<u64>,

    /// Print answers at once instead of revealing them character by character
    #[arg(long)]
    pub no_animation: bool,

    /// Path to a TOML config file (default: copilot.toml in the working directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for conversation logs (default: ~/.studycopilot/logs)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable conversation logging
    #[arg(long)]
    pub no_log: bool,

    /// Enable verbose debug output (shows HTTP requests and responses)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one chat input and print the answer
    Ask {
        /// Question, or a link to ingest
        text: String,
        /// Print the answer as pretty JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Upload a PDF document for ingestion
    Upload {
        /// Path to the PDF file
        path: PathBuf,
    },
    /// Ingest a web page
    Ingest {
        /// http:// or https:// link
        url: String,
    },
}
