use super::{service::service, types::request, types::response};
use crate::types::Context;
use axum::{body::Body, extract::State, response::IntoResponse};
use axum_extra::TypedHeader;
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    signature: Option<TypedHeader<request::XSignature>>,
    request_id: Option<TypedHeader<request::XRequestId>>,
    body: Body,
) -> impl IntoResponse {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|_| response::Error::ServerError)?;

    // Signature verification happens against the notification metadata, not
    // the body bytes, so an unparseable body still goes through the same
    // verify-then-acknowledge path (and is skipped downstream).
    let raw = serde_json::from_slice::<serde_json::Value>(&bytes)
        .unwrap_or(serde_json::Value::Null);
    let notification =
        serde_json::from_value::<request::Notification>(raw.clone()).unwrap_or_default();

    service(
        ctx,
        request::Payload {
            signature: signature.map(|TypedHeader(header)| header),
            request_id: request_id.map(|TypedHeader(header)| header),
            notification,
            raw,
        },
    )
    .await
}
