use anyhow::Result;
use colored::Colorize;
use std::env;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{ClientConfig, FileConfig, DEFAULT_CONFIG_FILE};
use crate::logging::{get_logs_dir, ConversationLogger};
use crate::Copilot;

/// Application configuration after processing CLI arguments
pub struct AppConfig {
    pub client_config: ClientConfig,
    /// Config file that was read, if any
    pub config_file: Option<PathBuf>,
}

/// Set up application configuration from CLI arguments, environment and
/// the optional config file
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let config_file = match &cli.config {
        Some(path) => Some(path.clone()),
        None => {
            let default_path = env::current_dir()?.join(DEFAULT_CONFIG_FILE);
            default_path.exists().then_some(default_path)
        }
    };

    let file = match &config_file {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let default_log_dir = if cli.no_log || cli.log_dir.is_some() || file.log_dir.is_some() {
        None
    } else {
        match get_logs_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                eprintln!("{} Logging disabled: {}", "⚠️".yellow(), e);
                None
            }
        }
    };

    let client_config = ClientConfig::resolve(cli, file, default_log_dir)?;

    if cli.verbose {
        if let Some(path) = &config_file {
            println!("{}", format!("🔧 Config file: {}", path.display()).bright_black());
        }
        println!("{}", format!("🔧 Backend: {} ({} endpoints)", client_config.backend_url, client_config.profile).bright_black());
        println!("{}", format!("🔧 Log dir: {:?}", client_config.log_dir).bright_black());
    }

    Ok(AppConfig {
        client_config,
        config_file,
    })
}

/// Build a session, with a conversation logger when logging is enabled
pub async fn create_copilot(config: &ClientConfig, task_mode: bool) -> Copilot {
    let mut copilot = Copilot::from_config(config);

    if let Some(dir) = &config.log_dir {
        let logger = if task_mode {
            ConversationLogger::new_task_mode(dir).await
        } else {
            ConversationLogger::new(dir).await
        };
        copilot.logger = match logger {
            Ok(l) => Some(l),
            Err(e) => {
                eprintln!("{} Logging disabled: {}", "⚠️".yellow(), e);
                None
            }
        };
    }

    copilot
}
