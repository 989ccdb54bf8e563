use super::types::{request, response};
use crate::types::Context;
use crate::utils::{accounts, mercadopago};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, query: request::Query) -> response::Response {
    let (Some(payment_intent_id), Some(device_id)) = (query.payment_intent_id, query.device_id)
    else {
        return Err(response::Error::MissingParameters);
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

    let external_reference = intent
        .additional_info
        .and_then(|info| info.external_reference);

    let payment = match (intent.state.as_str(), external_reference) {
        ("FINISHED", Some(reference)) => client
            .search_latest_payment(&reference)
            .await
            .map_err(|err| {
                tracing::error!("Failed to resolve payment for {}: {:?}", reference, err);
                response::Error::Gateway(err)
            })?,
        _ => None,
    };

    Ok(response::Success::IntentStatus {
        status: intent.state,
        payment,
    })
}
