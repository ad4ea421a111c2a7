use serde::{Deserialize, Serialize};

use crate::controller::ViewState;
use crate::render::markdown_to_html;

pub const LOADING_LABEL: &str = "Generating…";
pub const GET_LABEL: &str = "Generate (GET)";
pub const POST_LABEL: &str = "Generate (POST)";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ReportPhase {
  Idle,
  Loading,
  Success,
  Failure,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReportPanes {
  pub raw: String,
  pub preview_html: String,
}

/// Everything the webview paints, derived from a [`ViewState`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
  pub country: String,
  pub phase: ReportPhase,
  pub controls_disabled: bool,
  pub get_label: String,
  pub post_label: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_panel: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub report: Option<ReportPanes>,
}

impl ViewModel {
  pub fn from_state(state: &ViewState) -> Self {
    let (get_label, post_label) = if state.loading {
      (LOADING_LABEL, LOADING_LABEL)
    } else {
      (GET_LABEL, POST_LABEL)
    };

    let error_panel = (!state.error.is_empty()).then(|| state.error.clone());
    let report = (!state.markdown.is_empty()).then(|| ReportPanes {
      raw: state.markdown.clone(),
      preview_html: markdown_to_html(&state.markdown),
    });

    Self {
      country: state.country.clone(),
      phase: phase_of(state),
      controls_disabled: state.loading,
      get_label: get_label.to_string(),
      post_label: post_label.to_string(),
      error_panel,
      report,
    }
  }
}

impl From<ViewState> for ViewModel {
  fn from(state: ViewState) -> Self {
    Self::from_state(&state)
  }
}

fn phase_of(state: &ViewState) -> ReportPhase {
  if state.loading {
    ReportPhase::Loading
  } else if !state.error.is_empty() {
    ReportPhase::Failure
  } else if !state.markdown.is_empty() {
    ReportPhase::Success
  } else {
    ReportPhase::Idle
  }
}
