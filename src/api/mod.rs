//! Request/response contract with the agent service.
//!
//! `GET {base}/report?country=..` and `POST {base}/report` both answer with
//! `{"markdown": ..}` on success, or an error body that is JSON `{"error": ..}`
//! or plain text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub mod client;
pub mod outcome;

pub use client::ReportClient;
pub use outcome::{Outcome, ABORTED_MESSAGE, TRANSPORT_FAILURE};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Report {
  #[serde(default)]
  pub markdown: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentHealth {
  #[serde(default)]
  pub status: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMode {
  #[default]
  Get,
  Post,
}

#[derive(Debug, Clone, Default)]
pub struct GetReportOptions {
  pub mode: RequestMode,
  pub cancel: Option<CancellationToken>,
  pub base_url_override: Option<String>,
}

impl GetReportOptions {
  pub fn with_mode(mode: RequestMode) -> Self {
    Self {
      mode,
      ..Self::default()
    }
  }
}

#[async_trait]
pub trait ReportFetcher: Send + Sync {
  async fn get_report(&self, country: &str, opts: GetReportOptions) -> Outcome<Report>;
}

pub fn report_url(base: &str, country: &str, mode: RequestMode) -> String {
  match mode {
    RequestMode::Get => format!("{}/report?country={}", base, urlencoding::encode(country)),
    RequestMode::Post => format!("{}/report", base),
  }
}

pub fn report_body(country: &str) -> Value {
  serde_json::json!({ "country": country })
}

/// Message for a non-2xx response: the JSON `error` field when it holds a
/// truthy value, otherwise the body as-is.
pub fn remote_error_message(text: &str) -> String {
  serde_json::from_str::<Value>(text)
    .ok()
    .and_then(|value| value.get("error").and_then(error_field_text))
    .unwrap_or_else(|| text.to_string())
}

// Empty strings, zero, false and null count as "no message".
fn error_field_text(field: &Value) -> Option<String> {
  match field {
    Value::String(message) if !message.is_empty() => Some(message.clone()),
    Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
    Value::Bool(true) => Some("true".to_string()),
    Value::Array(_) | Value::Object(_) => Some(field.to_string()),
    _ => None,
  }
}
