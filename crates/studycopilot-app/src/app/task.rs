use anyhow::{bail, Result};
use colored::Colorize;
use std::io;
use std::path::Path;

use crate::app::setup::create_copilot;
use crate::config::ClientConfig;
use crate::types::{InputKind, MSG_PDF_UPLOADED};
use crate::UploadOutcome;

/// Send one chat input and print the answer
pub async fn run_ask(config: &ClientConfig, text: &str, pretty: bool) -> Result<()> {
    let mut copilot = create_copilot(config, true).await;
    if pretty {
        // Nothing is shown until the JSON, so there is nothing to animate
        copilot.animate = false;
    }

    let answer = if pretty {
        copilot.submit(text, &mut io::sink(), None).await?
    } else {
        copilot.submit(text, &mut io::stdout(), None).await?
    };
    copilot.shutdown().await;

    let Some(answer) = answer else {
        bail!("Nothing to send: input is empty");
    };

    if pretty {
        let kind = match InputKind::classify(text.trim()) {
            InputKind::Link => "link",
            InputKind::Question => "question",
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "input": text.trim(),
                "kind": kind,
                "answer": answer,
                "model": copilot.state.options.model.display_name(),
                "temperature": copilot.state.options.temperature,
            }))?
        );
    }

    Ok(())
}

/// Upload one PDF and report the outcome
pub async fn run_upload(config: &ClientConfig, path: &Path) -> Result<()> {
    let mut copilot = create_copilot(config, true).await;
    println!("{} Uploading {}...", "⏳".bright_black(), path.display());

    let outcome = copilot.upload_pdf(path).await;
    copilot.shutdown().await;

    match outcome? {
        UploadOutcome::Uploaded(name) => {
            println!("{} {} ({})", "✅".bright_green(), MSG_PDF_UPLOADED, name);
            Ok(())
        }
        UploadOutcome::Failed(msg) => bail!(msg),
    }
}

/// Ingest one web page
pub async fn run_ingest(config: &ClientConfig, url: &str) -> Result<()> {
    if InputKind::classify(url.trim()) != InputKind::Link {
        bail!("Not a link: '{}'. Links start with http:// or https://", url.trim());
    }
    run_ask(config, url, false).await
}
