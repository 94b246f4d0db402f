use colored::Colorize;

use crate::safe_truncate;

const MAX_LOGGED_BODY_CHARS: usize = 5000;

/// Body of an outgoing backend request, as shown in verbose output
pub enum RequestBody<'a> {
    Json(&'a serde_json::Value),
    Multipart {
        field: &'a str,
        file_name: &'a str,
        bytes: usize,
    },
    Empty,
}

/// Log HTTP request details for debugging (console output)
pub fn log_request(method: &str, url: &str, body: &RequestBody<'_>, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    println!("{}: {}", "Method".bright_yellow(), method);
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        println!("{}: {}", "URL".bright_yellow(), url);
        println!("{}: {}", "Host".bright_yellow(), parsed_url.host_str().unwrap_or("unknown"));
        println!(
            "{}: {}",
            "Port".bright_yellow(),
            parsed_url.port().map(|p| p.to_string()).unwrap_or_else(|| {
                if parsed_url.scheme() == "https" {
                    "443 (default)".to_string()
                } else {
                    "80 (default)".to_string()
                }
            })
        );
        if let Some(query) = parsed_url.query() {
            println!("{}: {}", "Query".bright_yellow(), query);
        }
    } else {
        println!("{}: {}", "URL".bright_yellow(), url);
    }

    println!("\n{}", "Request Body:".bright_yellow());
    match body {
        RequestBody::Json(value) => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", safe_truncate(&json, MAX_LOGGED_BODY_CHARS)),
            Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
        },
        RequestBody::Multipart { field, file_name, bytes } => {
            println!("  multipart/form-data: {}={} ({} bytes)", field, file_name, bytes);
        }
        RequestBody::Empty => println!("  (empty)"),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(
    status: &reqwest::StatusCode,
    headers: &reqwest::header::HeaderMap,
    body: &str,
    verbose: bool,
) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    let status_line = format!("{}", status);
    if status.is_success() {
        println!("{}: {}", "Status".bright_yellow(), status_line.green());
    } else {
        println!("{}: {}", "Status".bright_yellow(), status_line.red());
    }

    println!("\n{}", "Headers:".bright_yellow());
    for (name, value) in headers.iter() {
        println!("  {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    println!("\n{}", "Response Body:".bright_yellow());
    if body.chars().count() > MAX_LOGGED_BODY_CHARS {
        println!("{}", safe_truncate(body, MAX_LOGGED_BODY_CHARS));
        println!(
            "\n{}",
            format!("... (truncated, total {} bytes)", body.len()).bright_black()
        );
    } else {
        println!("{}", body);
    }

    println!("{}", "═".repeat(80).bright_green());
    println!();
}
