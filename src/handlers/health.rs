use axum::Json;
use serde_json::{json, Value};

use crate::VERSION;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}
