use super::types::{request, response};
use crate::types::Context;
use crate::utils::{accounts, mercadopago};
use bigdecimal::ToPrimitive;
use serde_json::json;
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, body: request::Body) -> response::Response {
    let (Some(amount), Some(device_id), Some(external_reference), Some(payment_type)) = (
        body.amount,
        body.device_id,
        body.external_reference,
        body.tipo_pagamento_na_maquininha,
    ) else {
        return Err(response::Error::MissingFields);
    };

    let account = accounts::Account::from_identifier(body.account_identifier.as_deref());
    let credentials = accounts::resolve(&ctx.mercado_pago, account)
        .map_err(|_| response::Error::ServerMisconfigured)?;

    // The Point API takes the amount in cents.
    let amount_in_cents = amount
        .to_f64()
        .map(|value| (value * 100.0).round() as i64)
        .ok_or(response::Error::InvalidAmount)?;

    let credit = payment_type == "Crédito";
    let mut payment = json!({ "type": if credit { "credit_card" } else { "debit_card" } });
    if credit {
        payment["installments"] = json!(body.installments.filter(|i| *i > 0).unwrap_or(1));
    }

    let intent = json!({
        "amount": amount_in_cents,
        "description": body.description,
        "additional_info": {
            "external_reference": external_reference,
            "print_on_terminal": true,
        },
        "payment": payment,
    });

    let client =
        mercadopago::Client::new(&ctx.mercado_pago.api_endpoint, &credentials.access_token)
            .map_err(response::Error::Gateway)?;

    client
        .create_payment_intent(&device_id, intent)
        .await
        .map(response::Success::OrderCreated)
        .map_err(|err| {
            tracing::error!("Failed to create device order: {:?}", err);
            response::Error::Gateway(err)
        })
}
