//! Command implementations for the doi CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod resolve;
pub mod verify;

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Common error type for HTTP requests.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}, {code}): {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },
}

/// Build the HTTP client used to talk to the server.
pub fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("doi-cli/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(60))
        .build()?)
}

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Send a request and decode the body, turning error responses into `CliError::Server`.
pub async fn make_request<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, CliError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = parse_error_body(&body);
    Err(CliError::Server {
        status: status.as_u16(),
        code,
        message,
    })
}

/// Extract `{"error": {"code", "message"}}`, falling back to the raw body.
fn parse_error_body(body: &str) -> (String, String) {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let error = parsed.as_ref().and_then(|json| json.get("error"));

    let code = error
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or(body)
        .to_string();

    (code, message)
}

/// Truncate a string for display, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_error_body() {
        let (code, message) = parse_error_body(
            r#"{"error":{"code":"ALREADY_IN_PROGRESS","message":"try again later"}}"#,
        );
        assert_eq!(code, "ALREADY_IN_PROGRESS");
        assert_eq!(message, "try again later");
    }

    #[test]
    fn falls_back_to_raw_body() {
        let (code, message) = parse_error_body("Bad Gateway");
        assert_eq!(code, "UNKNOWN");
        assert_eq!(message, "Bad Gateway");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Zeitschrift für Ökologie", 10), "Zeitsch...");
    }
}
