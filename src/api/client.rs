use std::future::Future;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::{
  remote_error_message, report_body, report_url, AgentHealth, GetReportOptions, Outcome, Report,
  ReportFetcher, RequestMode,
};
use crate::config::AgentConfig;

/// HTTP client for the agent service. Every call resolves to an [`Outcome`].
pub struct ReportClient {
  http: Client,
  config: AgentConfig,
}

impl ReportClient {
  pub fn new(config: AgentConfig) -> Result<Self, String> {
    // No request timeout: a slow report keeps loading until it lands or is cancelled.
    let http = Client::builder().build().map_err(|e| e.to_string())?;
    Ok(Self { http, config })
  }

  pub fn config(&self) -> &AgentConfig {
    &self.config
  }

  pub async fn get_report(&self, country: &str, opts: GetReportOptions) -> Outcome<Report> {
    let base = self.resolve_base(opts.base_url_override.as_deref());
    let request = self.send_report(&base, country, opts.mode);
    let outcome = match opts.cancel {
      Some(token) => with_cancel(&token, request).await,
      None => request.await,
    };
    if let Outcome::Failure { status, error } = &outcome {
      log::warn!("report for {:?} failed ({}): {}", country, status, error);
    }
    outcome
  }

  pub async fn check_health(&self) -> Outcome<AgentHealth> {
    let base = self.resolve_base(None);
    let request = self.http.get(format!("{}/health", base));
    match read_text(request).await {
      Ok((status, text)) => normalize(status, &text),
      Err(message) => Outcome::transport(message),
    }
  }

  // Relative bases (proxy mode) are resolved against the proxy origin.
  fn resolve_base(&self, override_base: Option<&str>) -> String {
    let base = override_base
      .unwrap_or(&self.config.base_url)
      .trim_end_matches('/');
    if base.contains("://") {
      base.to_string()
    } else {
      format!("{}{}", self.config.proxy_origin, base)
    }
  }

  async fn send_report(&self, base: &str, country: &str, mode: RequestMode) -> Outcome<Report> {
    let url = report_url(base, country, mode);
    log::debug!("{:?} {}", mode, url);
    let request = match mode {
      RequestMode::Get => self.http.get(&url),
      RequestMode::Post => self.http.post(&url).json(&report_body(country)),
    };
    match read_text(request).await {
      Ok((status, text)) => normalize(status, &text),
      Err(message) => Outcome::transport(message),
    }
  }
}

#[async_trait]
impl ReportFetcher for ReportClient {
  async fn get_report(&self, country: &str, opts: GetReportOptions) -> Outcome<Report> {
    ReportClient::get_report(self, country, opts).await
  }
}

async fn with_cancel<T, F>(token: &CancellationToken, request: F) -> Outcome<T>
where
  F: Future<Output = Outcome<T>>,
{
  // Dropping the request future aborts the underlying HTTP call.
  tokio::select! {
    biased;
    _ = token.cancelled() => Outcome::aborted(),
    outcome = request => outcome,
  }
}

// The body is read as text first so that non-JSON error pages stay readable.
async fn read_text(request: RequestBuilder) -> Result<(StatusCode, String), String> {
  let response = request.send().await.map_err(|e| e.to_string())?;
  let status = response.status();
  let text = response.text().await.map_err(|e| e.to_string())?;
  Ok((status, text))
}

fn normalize<T: DeserializeOwned>(status: StatusCode, text: &str) -> Outcome<T> {
  if !status.is_success() {
    return Outcome::failure(status.as_u16(), remote_error_message(text));
  }
  match serde_json::from_str::<T>(text) {
    Ok(data) => Outcome::Success(data),
    Err(error) => Outcome::transport(format!("invalid response body: {}", error)),
  }
}
