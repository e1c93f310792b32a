use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::{ClissoError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("clisso/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ClissoError::Exchange(format!("creating HTTP client: {}", e)))
}

pub(crate) fn send_error(step: &str, e: reqwest::Error) -> ClissoError {
    ClissoError::Exchange(format!("{}: {}", step, e))
}

/// Read the body of `resp`, failing with the server's own message on a non-2xx status.
pub(crate) fn read_text(resp: Response, step: &str) -> Result<String> {
    let status = resp.status();
    let body = resp.text().map_err(|e| send_error(step, e))?;
    if !status.is_success() {
        let detail = error_message(&body).unwrap_or_else(|| status.to_string());
        return Err(ClissoError::Exchange(format!("{}: {}", step, detail)));
    }
    Ok(body)
}

pub(crate) fn read_json<T: DeserializeOwned>(resp: Response, step: &str) -> Result<T> {
    let body = read_text(resp, step)?;
    serde_json::from_str(&body)
        .map_err(|e| ClissoError::Exchange(format!("{}: unexpected response: {}", step, e)))
}

/// Pull a human-readable message out of a JSON error body (OneLogin and Okta shapes).
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.get("errorSummary"),
        value.get("message"),
        value.get("status").and_then(|s| s.get("message")),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    message
}
