use serde::{Deserialize, Serialize};

use crate::api::RequestMode;
use crate::view::ViewModel;

/// Channel name the webview listens on.
pub const SERVER_EVENT: &str = "server-event";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", content = "payload")]
pub enum ServerEvent {
  #[serde(rename = "report.state")]
  ReportState { view: ViewModel },
  #[serde(rename = "runner.error")]
  RunnerError { message: String },
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", content = "payload")]
pub enum ClientEvent {
  #[serde(rename = "report.state")]
  ReportState,
  #[serde(rename = "country.set")]
  CountrySet { country: String },
  #[serde(rename = "report.fetch")]
  ReportFetch {
    #[serde(default)]
    mode: RequestMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
  },
  #[serde(rename = "report.cancel")]
  ReportCancel,
}
