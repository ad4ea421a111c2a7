//! Local stand-in for the agent service, bound to an ephemeral port.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub async fn spawn_agent() -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
    .await
    .expect("bind stub agent");
  let addr = listener.local_addr().expect("stub agent address");
  tokio::spawn(async move {
    axum::serve(listener, agent_router())
      .await
      .expect("stub agent server");
  });
  format!("http://{}", addr)
}

fn agent_router() -> Router {
  Router::new()
    .route("/report", get(report_get).post(report_post))
    .route("/health", get(health))
}

async fn report_get(Query(params): Query<HashMap<String, String>>) -> Response {
  let country = params.get("country").cloned().unwrap_or_default();
  respond(&country, format!("# Report: {}", country)).await
}

async fn report_post(Json(body): Json<Value>) -> Response {
  let country = body
    .get("country")
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string();
  respond(&country, format!("# Report (POST): {}", country)).await
}

async fn respond(country: &str, markdown: String) -> Response {
  match country {
    "boom" => (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({ "error": "boom" })),
    )
      .into_response(),
    "missing" => (StatusCode::NOT_FOUND, "not found").into_response(),
    "garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
    "slow" => {
      tokio::time::sleep(Duration::from_secs(30)).await;
      Json(json!({ "markdown": markdown })).into_response()
    }
    _ => Json(json!({ "markdown": markdown })).into_response(),
  }
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok", "model": "stub-model" }))
}
