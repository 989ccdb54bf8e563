use super::types::{request, response};
use crate::types::Context;
use crate::utils::{accounts, mercadopago};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, body: request::Body) -> response::Response {
    let Some(payment_id) = body.payment_id else {
        return Err(response::Error::MissingPaymentId);
    };

    let credentials = accounts::resolve(&ctx.mercado_pago, accounts::Account::Sjp)
        .map_err(|_| response::Error::ServerMisconfigured)?;

    let client =
        mercadopago::Client::new(&ctx.mercado_pago.api_endpoint, &credentials.access_token)
            .map_err(response::Error::Gateway)?;

    let payment = client.get_payment(&payment_id).await.map_err(|err| {
        tracing::error!("Failed to fetch payment {}: {:?}", payment_id, err);
        response::Error::Gateway(err)
    })?;

    if payment.status == "cancelled" {
        return Ok(response::Success::AlreadyCancelled {
            payment_id: payment.id,
        });
    }

    if payment.status != "pending" {
        return Err(response::Error::NotPending {
            current_status: payment.status,
        });
    }

    tracing::info!(
        "Cancelling PIX payment {} with status '{}'",
        payment_id,
        payment.status
    );

    client
        .cancel_payment(&payment_id)
        .await
        .map(response::Success::Cancelled)
        .map_err(|err| {
            tracing::error!("Failed to cancel PIX payment {}: {:?}", payment_id, err);
            response::Error::Gateway(err)
        })
}
