mod cancel_device_order;
mod cancel_pix_order;
mod create_device_order;
mod create_pix_order;
mod create_preference;
mod get_device_payment_status;
mod get_pix_status;
mod webhook;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(create_device_order::get_router())
        .merge(get_device_payment_status::get_router())
        .merge(cancel_device_order::get_router())
        .merge(create_pix_order::get_router())
        .merge(get_pix_status::get_router())
        .merge(cancel_pix_order::get_router())
        .merge(create_preference::get_router())
        .merge(webhook::get_router())
}
