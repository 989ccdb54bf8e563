use crate::types::Context;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

async fn check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "message": "Server is alive." })),
    )
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/health", get(check))
}
