use super::types::{request, response};
use crate::types::Context;
use crate::utils::{accounts, mercadopago};
use std::sync::Arc;

/// Final intent states the terminal will never leave; cancelling them is
/// either pointless (already over) or impossible (on the terminal screen).
const UNCANCELLABLE_STATES: [&str; 4] = ["CANCELED", "FINISHED", "EXPIRED", "ON_TERMINAL"];

pub async fn service(ctx: Arc<Context>, body: request::Body) -> response::Response {
    let (Some(device_id), Some(payment_intent_id)) = (body.device_id, body.payment_intent_id)
    else {
        return Err(response::Error::MissingFields);
    };

    let account = accounts::Account::for_device(&device_id);
    let credentials = accounts::resolve(&ctx.mercado_pago, account)
        .map_err(|_| response::Error::ServerMisconfigured)?;

    let client =
        mercadopago::Client::new(&ctx.mercado_pago.api_endpoint, &credentials.access_token)
            .map_err(response::Error::Gateway)?;

    let intent = client
        .search_payment_intent(&payment_intent_id)
        .await
        .map_err(|err| {
            tracing::error!("Failed to search payment intent {}: {:?}", payment_intent_id, err);
            response::Error::Gateway(err)
        })?;

    if UNCANCELLABLE_STATES.contains(&intent.state.as_str()) {
        if intent.state == "ON_TERMINAL" {
            return Err(response::Error::Processing {
                state: intent.state,
            });
        }

        // CANCELED, FINISHED and EXPIRED already are the desired outcome:
        // the order is no longer active.
        return Ok(response::Success::AlreadyFinalized {
            intent_id: payment_intent_id,
        });
    }

    tracing::info!(
        "Cancelling payment intent {} in state '{}'",
        payment_intent_id,
        intent.state
    );

    client
        .cancel_payment_intent(&device_id, &payment_intent_id)
        .await
        .map(response::Success::Cancelled)
        .map_err(|err| {
            tracing::error!("Failed to cancel device order {}: {:?}", payment_intent_id, err);
            response::Error::Gateway(err)
        })
}
