use super::super::types::request::{Notification, Topic};
use crate::modules::sales::{repository, status};
use crate::types::Context;
use crate::utils::{
    accounts::{self, Account},
    mercadopago,
};
use serde_json::Value;
use std::sync::Arc;

/// A notification that was acknowledged but could not be reconciled. None of
/// these are retried here; the processor redelivers on its own schedule.
#[derive(Debug)]
pub enum Skip {
    IncompleteNotification,
    UnhandledTopic(String),
    MissingReference,
    RecordNotFound {
        collection: String,
        reference: String,
    },
}

#[derive(Debug)]
pub enum Error {
    Credentials(accounts::Error),
    Fetch(mercadopago::Error),
    Store(repository::Error),
}

#[derive(Debug)]
pub enum Outcome {
    Applied { reference: String, terminal: bool },
    Skipped(Skip),
}

/// The common view over both resource shapes a notification can point at.
struct ReconciliationInput {
    reference: Option<String>,
    status: String,
    collection: Option<String>,
}

/// A paid order settled; otherwise the most recently added sub-payment
/// speaks for the order, and an order with no payments yet is unknown.
fn merchant_order_status(order: &mercadopago::MerchantOrder) -> String {
    if order.order_status.as_deref() == Some("paid") {
        return "approved".to_string();
    }

    order
        .payments
        .last()
        .map(|payment| payment.status.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn reconcile(
    ctx: Arc<Context>,
    account: Account,
    notification: Notification,
    raw: Value,
) -> Result<Outcome, Error> {
    let (Some(topic), Some(resource_id)) = (notification.classify(), notification.resource_id())
    else {
        return Ok(Outcome::Skipped(Skip::IncompleteNotification));
    };

    let credentials =
        accounts::resolve(&ctx.mercado_pago, account).map_err(Error::Credentials)?;
    let client =
        mercadopago::Client::new(&ctx.mercado_pago.api_endpoint, &credentials.access_token)
            .map_err(Error::Fetch)?;

    let input = match topic {
        Topic::Payment => {
            tracing::info!("Processing payment notification for id {}", resource_id);
            let payment = client.get_payment(resource_id).await.map_err(Error::Fetch)?;

            ReconciliationInput {
                reference: payment.external_reference,
                status: payment.status,
                collection: payment
                    .metadata
                    .and_then(|metadata| metadata.target_collection),
            }
        }
        Topic::MerchantOrder => {
            tracing::info!("Processing merchant order notification for id {}", resource_id);
            let order = client
                .get_merchant_order(resource_id)
                .await
                .map_err(Error::Fetch)?;

            ReconciliationInput {
                status: merchant_order_status(&order),
                reference: order.external_reference,
                collection: order
                    .metadata
                    .and_then(|metadata| metadata.target_collection),
            }
        }
        Topic::Other(topic) => {
            return Ok(Outcome::Skipped(Skip::UnhandledTopic(topic)));
        }
    };

    let (Some(reference), Some(collection)) = (input.reference, input.collection) else {
        return Ok(Outcome::Skipped(Skip::MissingReference));
    };

    let normalized = status::normalize(&input.status);

    let applied = repository::apply_webhook_update(
        ctx,
        repository::WebhookUpdate {
            collection: collection.clone(),
            reference: reference.clone(),
            payload: raw,
            status: normalized,
        },
    )
    .await
    .map_err(Error::Store)?;

    match applied {
        repository::ApplyOutcome::Applied { terminal } => {
            Ok(Outcome::Applied { reference, terminal })
        }
        repository::ApplyOutcome::NotFound => Ok(Outcome::Skipped(Skip::RecordNotFound {
            collection,
            reference,
        })),
    }
}

/// Entry point of the detached reconciliation task. Never panics and never
/// reports back to the webhook caller; every path ends in a log line.
pub async fn run(ctx: Arc<Context>, account: Account, notification: Notification, raw: Value) {
    match reconcile(ctx, account, notification, raw).await {
        Ok(Outcome::Applied {
            reference,
            terminal,
        }) => {
            tracing::info!(
                "Sale {} reconciled (terminal status: {})",
                reference,
                terminal
            );
        }
        Ok(Outcome::Skipped(Skip::IncompleteNotification)) => {
            tracing::warn!("Webhook without 'data.id' or topic; nothing to reconcile");
        }
        Ok(Outcome::Skipped(Skip::UnhandledTopic(topic))) => {
            tracing::info!("Unhandled webhook topic '{}'", topic);
        }
        Ok(Outcome::Skipped(Skip::MissingReference)) => {
            tracing::error!("Fetched resource carries no external reference or target collection");
        }
        Ok(Outcome::Skipped(Skip::RecordNotFound {
            collection,
            reference,
        })) => {
            tracing::error!(
                "Sale record {} not found in collection {}",
                reference,
                collection
            );
        }
        Err(err) => {
            tracing::error!("Webhook reconciliation failed: {:?}", err);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::mercadopago::{MerchantOrder, MerchantOrderPayment};

    fn order(
        order_status: Option<&str>,
        payment_statuses: &[&str],
    ) -> MerchantOrder {
        MerchantOrder {
            external_reference: Some("venda-42".to_string()),
            order_status: order_status.map(String::from),
            payments: payment_statuses
                .iter()
                .map(|status| MerchantOrderPayment {
                    status: status.to_string(),
                })
                .collect(),
            metadata: None,
        }
    }

    #[test]
    fn paid_orders_settle_as_approved() {
        assert_eq!(
            merchant_order_status(&order(Some("paid"), &["rejected"])),
            "approved"
        );
    }

    #[test]
    fn unpaid_orders_take_the_latest_sub_payment_status() {
        assert_eq!(
            merchant_order_status(&order(Some("payment_required"), &["rejected", "pending"])),
            "pending"
        );
    }

    #[test]
    fn orders_with_no_payments_are_unknown() {
        assert_eq!(merchant_order_status(&order(Some("opened"), &[])), "unknown");
        assert_eq!(merchant_order_status(&order(None, &[])), "unknown");
    }
}
