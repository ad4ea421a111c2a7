const BASE_URL_ENV: &str = "AGENT_BASE_URL";
const USE_PROXY_ENV: &str = "AGENT_USE_PROXY";
const PROXY_ORIGIN_ENV: &str = "AGENT_PROXY_ORIGIN";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5050";
pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:5173";

/// Where report requests go. Captured once at startup and never reloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
  /// Empty when the proxy is enabled, so requests use relative paths.
  pub base_url: String,
  /// Origin that relative paths are resolved against.
  pub proxy_origin: String,
}

impl AgentConfig {
  pub fn from_env() -> Self {
    let use_proxy = read_setting(USE_PROXY_ENV, option_env!("AGENT_USE_PROXY"));
    let base_url = read_setting(BASE_URL_ENV, option_env!("AGENT_BASE_URL"));
    let proxy_origin = read_setting(PROXY_ORIGIN_ENV, option_env!("AGENT_PROXY_ORIGIN"));
    Self::from_values(use_proxy.as_deref(), base_url.as_deref(), proxy_origin.as_deref())
  }

  pub fn from_values(
    use_proxy: Option<&str>,
    base_url: Option<&str>,
    proxy_origin: Option<&str>,
  ) -> Self {
    Self {
      base_url: resolve_base_url(use_proxy, base_url),
      proxy_origin: non_blank(proxy_origin)
        .map(trim_trailing_slash)
        .unwrap_or_else(|| DEFAULT_PROXY_ORIGIN.to_string()),
    }
  }

  pub fn uses_proxy(&self) -> bool {
    self.base_url.is_empty()
  }
}

impl Default for AgentConfig {
  fn default() -> Self {
    Self::from_values(None, None, None)
  }
}

// Runtime environment first, then whatever was baked in at build time.
fn read_setting(name: &str, baked: Option<&'static str>) -> Option<String> {
  std::env::var(name)
    .ok()
    .filter(|value| !value.trim().is_empty())
    .or_else(|| baked.map(str::to_string))
}

pub fn resolve_base_url(use_proxy: Option<&str>, base_url: Option<&str>) -> String {
  if is_proxy_enabled(use_proxy) {
    return String::new();
  }
  non_blank(base_url)
    .map(trim_trailing_slash)
    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn is_proxy_enabled(value: Option<&str>) -> bool {
  value.map(str::trim) == Some("1")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|value| !value.is_empty())
}

fn trim_trailing_slash(value: &str) -> String {
  value.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolve_base_url_defaults_to_local_agent() {
    assert_eq!(resolve_base_url(None, None), DEFAULT_BASE_URL);
    assert_eq!(resolve_base_url(Some("0"), Some("  ")), DEFAULT_BASE_URL);
  }

  #[test]
  fn resolve_base_url_uses_configured_value() {
    assert_eq!(
      resolve_base_url(None, Some(" http://agent.internal:9000/ ")),
      "http://agent.internal:9000"
    );
  }

  #[test]
  fn resolve_base_url_is_relative_when_proxy_enabled() {
    assert_eq!(resolve_base_url(Some("1"), Some("http://agent.internal:9000")), "");
    assert_eq!(resolve_base_url(Some("true"), None), DEFAULT_BASE_URL);
  }

  #[test]
  fn from_values_fills_proxy_origin() {
    let config = AgentConfig::from_values(Some("1"), None, None);
    assert!(config.uses_proxy());
    assert_eq!(config.proxy_origin, DEFAULT_PROXY_ORIGIN);

    let config = AgentConfig::from_values(None, None, Some("http://127.0.0.1:8080/"));
    assert!(!config.uses_proxy());
    assert_eq!(config.proxy_origin, "http://127.0.0.1:8080");
  }
}
