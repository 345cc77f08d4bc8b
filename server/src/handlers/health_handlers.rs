use axum::Json;
use serde_json::{Value as JsonValue, json};

pub(crate) async fn health_handler() -> Json<JsonValue> {
    Json(json!({ "status": "ok" }))
}
