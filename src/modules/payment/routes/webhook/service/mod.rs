pub mod reconcile;

use super::types::{request, response};
use crate::types::Context;
use crate::utils::signature;
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let header = payload
        .signature
        .ok_or(response::Error::MissingSignature)?;

    let parsed = signature::parse_header(&header.0).map_err(|err| {
        tracing::warn!("Rejecting webhook with malformed signature header: {:?}", err);
        response::Error::MalformedSignature
    })?;

    let request_id = payload
        .request_id
        .map(|header| header.0)
        .unwrap_or_default();
    let resource_id = payload.notification.resource_id().unwrap_or_default();

    let account = signature::verify(&ctx.mercado_pago, &parsed, &request_id, resource_id)
        .map_err(|err| {
            tracing::error!("Webhook signature verification failed: {:?}", err);
            response::Error::SignatureMismatch
        })?;

    tracing::info!(
        "Webhook signature verified against account '{}'",
        account.as_str()
    );

    // The acknowledgment must not wait on the processor or the store:
    // reconciliation is a detached unit of work whose outcome is only ever
    // logged.
    tokio::spawn(reconcile::run(
        ctx.clone(),
        account,
        payload.notification,
        payload.raw,
    ));

    Ok(response::Success::Acknowledged)
}
