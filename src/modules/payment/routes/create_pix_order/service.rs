use super::types::{request, response};
use crate::types::Context;
use crate::utils::{accounts, mercadopago};
use bigdecimal::ToPrimitive;
use serde_json::json;
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, body: request::Body) -> response::Response {
    let (Some(transaction_amount), Some(description), Some(payer_email), Some(external_reference)) = (
        body.transaction_amount,
        body.description,
        body.payer_email,
        body.external_reference,
    ) else {
        return Err(response::Error::MissingFields);
    };

    // PIX always runs on the main account.
    let credentials = accounts::resolve(&ctx.mercado_pago, accounts::Account::Sjp)
        .map_err(|_| response::Error::ServerMisconfigured)?;

    let payment_request = json!({
        "transaction_amount": transaction_amount.to_f64(),
        "description": description,
        "payment_method_id": "pix",
        "external_reference": external_reference,
        "payer": {
            "email": payer_email,
            "first_name": body.payer_first_name,
            "last_name": body.payer_last_name,
        },
    });

    let client =
        mercadopago::Client::new(&ctx.mercado_pago.api_endpoint, &credentials.access_token)
            .map_err(response::Error::Gateway)?;

    let payment = client.create_payment(payment_request).await.map_err(|err| {
        tracing::error!("Failed to create PIX order: {:?}", err);
        response::Error::Gateway(err)
    })?;

    let transaction_data = payment
        .point_of_interaction
        .and_then(|poi| poi.transaction_data)
        .ok_or(response::Error::UnexpectedGatewayResponse)?;

    match (transaction_data.qr_code, transaction_data.qr_code_base64) {
        (Some(qr_code), Some(qr_code_base64)) => Ok(response::Success::OrderCreated {
            payment_id: payment.id,
            status: payment.status,
            qr_code,
            qr_code_base64,
        }),
        _ => Err(response::Error::UnexpectedGatewayResponse),
    }
}
