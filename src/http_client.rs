use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::config::PicksConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const API_KEY_HEADER: &str = "x-apisports-key";
const CLIENT_UA: &str = "fixture-picks/0.1";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// GET `{base_url}/{endpoint}` with the API-Sports key header; returns the raw body.
pub fn get_api_json(cfg: &PicksConfig, endpoint: &str, query: &[(&str, &str)]) -> Result<String> {
    let api_key = cfg.require_api_key()?;
    let url = format!("{}/{}", cfg.base_url, endpoint.trim_start_matches('/'));
    let resp = http_client()?
        .get(&url)
        .query(query)
        .header(API_KEY_HEADER, api_key)
        .header(USER_AGENT, CLIENT_UA)
        .send()
        .with_context(|| format!("{endpoint} request failed"))?;
    let status = resp.status();
    let body = resp
        .text()
        .with_context(|| format!("failed reading {endpoint} body"))?;
    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "{endpoint} http {}: {}",
            status,
            body_snippet(&body)
        ));
    }
    Ok(body)
}

pub(crate) fn body_snippet(body: &str) -> String {
    body.trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(220)
        .collect()
}

/// API-Sports reports failures in-band: `errors` is `[]` when fine, otherwise an
/// array or an object such as `{"token": "Error/Missing application key"}`.
pub(crate) fn api_error_message(errors: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match errors {
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(value_text)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::Object(map) if !map.is_empty() => Some(
            map.iter()
                .map(|(k, v)| format!("{k}: {}", value_text(v)))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn value_text(v: &serde_json::Value) -> String {
    v.as_str()
        .map(str::to_string)
        .unwrap_or_else(|| v.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_errors_are_not_failures() {
        assert_eq!(api_error_message(&json!([])), None);
        assert_eq!(api_error_message(&json!({})), None);
        assert_eq!(api_error_message(&json!(null)), None);
    }

    #[test]
    fn object_errors_are_flattened() {
        let msg = api_error_message(&json!({"token": "Error/Missing application key"}));
        assert_eq!(msg.as_deref(), Some("token: Error/Missing application key"));
    }

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let long = format!("line1\nline2\r\n{}", "x".repeat(500));
        let snippet = body_snippet(&long);
        assert!(!snippet.contains('\n'));
        assert_eq!(snippet.chars().count(), 220);
    }
}
