use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::api::{GetReportOptions, Outcome, Report, ReportFetcher, RequestMode};

pub const DEFAULT_COUNTRY: &str = "france";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
  pub country: String,
  pub markdown: String,
  pub loading: bool,
  pub error: String,
}

impl Default for ViewState {
  fn default() -> Self {
    Self {
      country: DEFAULT_COUNTRY.to_string(),
      markdown: String::new(),
      loading: false,
      error: String::new(),
    }
  }
}

struct InFlight {
  id: u64,
  token: CancellationToken,
}

#[derive(Default)]
struct Inner {
  view: ViewState,
  in_flight: Option<InFlight>,
}

/// A request that has been registered as current but not yet sent.
#[derive(Debug)]
pub struct PendingFetch {
  id: u64,
  country: String,
  mode: RequestMode,
  token: CancellationToken,
}

impl PendingFetch {
  pub fn id(&self) -> u64 {
    self.id
  }
}

/// Owns the view state and the single in-flight request slot.
///
/// Starting a fetch cancels whatever is in the slot. A result is only applied
/// while its request still owns the slot, so a cancelled request that resolves
/// late can never overwrite newer state.
pub struct ReportController {
  fetcher: Arc<dyn ReportFetcher>,
  inner: Mutex<Inner>,
  next_id: AtomicU64,
}

impl ReportController {
  pub fn new(fetcher: Arc<dyn ReportFetcher>) -> Self {
    Self {
      fetcher,
      inner: Mutex::new(Inner::default()),
      next_id: AtomicU64::new(1),
    }
  }

  pub fn snapshot(&self) -> ViewState {
    self.inner.lock().expect("view state lock").view.clone()
  }

  pub fn set_country(&self, country: String) -> ViewState {
    let mut inner = self.inner.lock().expect("view state lock");
    inner.view.country = country;
    inner.view.clone()
  }

  pub async fn fetch_report(&self, mode: RequestMode) -> ViewState {
    let pending = self.begin_fetch(mode);
    self.run_fetch(pending).await
  }

  /// Marks the view as loading and makes a new request current, cancelling the
  /// previous one.
  pub fn begin_fetch(&self, mode: RequestMode) -> PendingFetch {
    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    let token = CancellationToken::new();
    let mut inner = self.inner.lock().expect("view state lock");
    if let Some(previous) = inner.in_flight.replace(InFlight {
      id,
      token: token.clone(),
    }) {
      log::debug!("cancelling report request #{}", previous.id);
      previous.token.cancel();
    }
    inner.view.loading = true;
    inner.view.error.clear();
    PendingFetch {
      id,
      country: inner.view.country.clone(),
      mode,
      token,
    }
  }

  /// Like [`begin_fetch`](Self::begin_fetch), then hands the loading state to
  /// `publish`. A publish failure is logged; the returned request still has to
  /// be run so that its result settles the loading state.
  pub fn begin_fetch_published<F>(&self, mode: RequestMode, publish: F) -> PendingFetch
  where
    F: FnOnce(&ViewState) -> Result<(), String>,
  {
    let pending = self.begin_fetch(mode);
    if let Err(message) = publish(&self.snapshot()) {
      log::warn!(
        "failed to publish loading state for report #{}: {}",
        pending.id,
        message
      );
    }
    pending
  }

  pub async fn run_fetch(&self, pending: PendingFetch) -> ViewState {
    log::info!(
      "requesting report #{} for {:?} ({:?})",
      pending.id,
      pending.country,
      pending.mode
    );
    let opts = GetReportOptions {
      mode: pending.mode,
      cancel: Some(pending.token),
      base_url_override: None,
    };
    let outcome = self.fetcher.get_report(&pending.country, opts).await;
    self.settle(pending.id, outcome)
  }

  /// Cancels the in-flight request, if any, and leaves the loading state.
  pub fn cancel_pending(&self) -> ViewState {
    let mut inner = self.inner.lock().expect("view state lock");
    if let Some(in_flight) = inner.in_flight.take() {
      log::info!("cancelling report request #{}", in_flight.id);
      in_flight.token.cancel();
      inner.view.loading = false;
    }
    inner.view.clone()
  }

  fn settle(&self, id: u64, outcome: Outcome<Report>) -> ViewState {
    let mut inner = self.inner.lock().expect("view state lock");
    let current = inner.in_flight.as_ref().map(|in_flight| in_flight.id);
    if current != Some(id) {
      log::debug!("dropping stale result of report request #{}", id);
      return inner.view.clone();
    }
    inner.in_flight = None;
    apply_outcome(&mut inner.view, outcome);
    inner.view.clone()
  }
}

fn apply_outcome(view: &mut ViewState, outcome: Outcome<Report>) {
  match outcome {
    Outcome::Success(report) => {
      view.markdown = report.markdown;
      view.error.clear();
    }
    Outcome::Failure { status, error } => {
      view.markdown.clear();
      view.error = format_failure(status, &error);
    }
  }
  view.loading = false;
}

pub fn format_failure(status: u16, error: &str) -> String {
  format!("Failed ({}): {}", status, error)
}
