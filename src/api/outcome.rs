use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Status used for failures that never produced an HTTP response.
pub const TRANSPORT_FAILURE: u16 = 0;

pub const ABORTED_MESSAGE: &str = "request aborted";

/// Normalized result of a call to the agent service.
///
/// Remote and transport failures are data, not errors: the caller always gets
/// one of the two variants back and decides how to show it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
  Success(T),
  Failure { status: u16, error: String },
}

impl<T> Outcome<T> {
  pub fn failure(status: u16, error: impl Into<String>) -> Self {
    Outcome::Failure {
      status,
      error: error.into(),
    }
  }

  pub fn transport(error: impl fmt::Display) -> Self {
    Self::failure(TRANSPORT_FAILURE, error.to_string())
  }

  pub fn aborted() -> Self {
    Self::failure(TRANSPORT_FAILURE, ABORTED_MESSAGE)
  }

  pub fn is_ok(&self) -> bool {
    matches!(self, Outcome::Success(_))
  }
}

// Same shape the webview already understands: { ok, data } or { ok, status, error }.
impl<T: Serialize> Serialize for Outcome<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Outcome::Success(data) => {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("ok", &true)?;
        map.serialize_entry("data", data)?;
        map.end()
      }
      Outcome::Failure { status, error } => {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("ok", &false)?;
        map.serialize_entry("status", status)?;
        map.serialize_entry("error", error)?;
        map.end()
      }
    }
  }
}
