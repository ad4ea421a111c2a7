pub mod api;
pub mod config;
pub mod controller;
pub mod events;
pub mod render;
pub mod view;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(test)]
mod test_support;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  use std::sync::Arc;

  use tauri::Manager;

  use crate::api::{Outcome, ReportClient};
  use crate::config::AgentConfig;
  use crate::controller::ReportController;

  let config = AgentConfig::from_env();
  let client = Arc::new(ReportClient::new(config).expect("error while building http client"));
  let controller = ReportController::new(client.clone());

  tauri::Builder::default()
    .manage(controller)
    .setup(move |app| {
      if cfg!(debug_assertions) {
        app.handle().plugin(
          tauri_plugin_log::Builder::default()
            .level(log::LevelFilter::Info)
            .build(),
        )?;
      }

      if client.config().uses_proxy() {
        log::info!("agent requests go through proxy at {}", client.config().proxy_origin);
      } else {
        log::info!("agent service at {}", client.config().base_url);
      }
      tauri::async_runtime::spawn(async move {
        match client.check_health().await {
          Outcome::Success(health) => log::info!(
            "agent service is {} (model {})",
            health.status,
            health.model.as_deref().unwrap_or("unknown")
          ),
          Outcome::Failure { status, error } => {
            log::warn!("agent health check failed ({}): {}", status, error)
          }
        }
      });
      Ok(())
    })
    .on_window_event(|window, event| {
      if let tauri::WindowEvent::Destroyed = event {
        window.state::<ReportController>().cancel_pending();
      }
    })
    .invoke_handler(tauri::generate_handler![
      commands::report::client_event,
      commands::report::report_state
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
