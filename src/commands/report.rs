use tauri::{AppHandle, Emitter, Manager, State};

use crate::controller::ReportController;
use crate::events::{ClientEvent, ServerEvent, SERVER_EVENT};
use crate::view::ViewModel;

#[tauri::command]
pub async fn client_event(
  app: AppHandle,
  controller: State<'_, ReportController>,
  event: ClientEvent,
) -> Result<(), String> {
  match event {
    ClientEvent::ReportState => emit_view(&app, controller.snapshot().into()),
    ClientEvent::CountrySet { country } => {
      let view = controller.set_country(country);
      emit_view(&app, view.into())
    }
    ClientEvent::ReportFetch { mode, country } => {
      // The input as seen at click time; keystroke events may still be in flight.
      if let Some(country) = country {
        controller.set_country(country);
      }
      let pending =
        controller.begin_fetch_published(mode, |view| emit_view(&app, view.clone().into()));

      let app_handle = app.clone();
      tauri::async_runtime::spawn(async move {
        let controller = app_handle.state::<ReportController>();
        let view = controller.run_fetch(pending).await;
        if let Err(message) = emit_view(&app_handle, view.into()) {
          log::warn!("failed to publish report state: {}", message);
          let _ = emit(&app_handle, ServerEvent::RunnerError { message });
        }
      });

      Ok(())
    }
    ClientEvent::ReportCancel => {
      let view = controller.cancel_pending();
      emit_view(&app, view.into())
    }
  }
}

#[tauri::command]
pub fn report_state(controller: State<ReportController>) -> ViewModel {
  controller.snapshot().into()
}

fn emit_view(app: &AppHandle, view: ViewModel) -> Result<(), String> {
  emit(app, ServerEvent::ReportState { view })
}

fn emit(app: &AppHandle, event: ServerEvent) -> Result<(), String> {
  app.emit(SERVER_EVENT, event).map_err(|e| e.to_string())
}
