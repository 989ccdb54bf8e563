use super::{health, payment};
use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(health::get_router())
        .merge(payment::get_router())
}
