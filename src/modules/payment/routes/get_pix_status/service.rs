use super::types::{request, response};
use crate::types::Context;
use crate::utils::{accounts, mercadopago};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, query: request::Query) -> response::Response {
    let Some(payment_id) = query.payment_id else {
        return Err(response::Error::MissingPaymentId);
    };

    let credentials = accounts::resolve(&ctx.mercado_pago, accounts::Account::Sjp)
        .map_err(|_| response::Error::ServerMisconfigured)?;

    let client =
        mercadopago::Client::new(&ctx.mercado_pago.api_endpoint, &credentials.access_token)
            .map_err(response::Error::Gateway)?;

    client
        .get_payment(&payment_id)
        .await
        .map(|payment| response::Success::PaymentStatus {
            id: payment.id,
            status: payment.status,
        })
        .map_err(|err| {
            tracing::error!("Failed to fetch PIX status for {}: {:?}", payment_id, err);
            response::Error::Gateway(err)
        })
}
