use crate::modules::sales::status::Normalized;
use crate::types::Context;
use crate::utils::firestore::{self, DocumentUpdate};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug)]
pub enum Error {
    Store(firestore::Error),
}

#[derive(Debug)]
pub enum ApplyOutcome {
    Applied { terminal: bool },
    NotFound,
}

pub struct WebhookUpdate {
    pub collection: String,
    pub reference: String,
    pub payload: Value,
    pub status: Normalized,
}

/// Every notification is recorded on the audit trail and stamps the update
/// time; the overall order status is only ever written for terminal
/// outcomes, which makes redelivered terminal notifications a no-op beyond
/// the extra audit entry.
fn build_update(update: &WebhookUpdate) -> DocumentUpdate {
    let mut fields = Vec::new();
    if let Some(order_status) = update.status.order_status() {
        fields.push(("statusPedidoGeral", Value::String(order_status.to_string())));
    }

    DocumentUpdate {
        fields,
        appends: vec![("dadosWebhookCompletos", update.payload.clone())],
        server_timestamps: vec!["ultimaAtualizacaoWebhook"],
    }
}

pub async fn apply_webhook_update(
    ctx: Arc<Context>,
    update: WebhookUpdate,
) -> Result<ApplyOutcome, Error> {
    let record = firestore::get_document(&ctx.firestore, &update.collection, &update.reference)
        .await
        .map_err(Error::Store)?;

    let Some(record) = record else {
        return Ok(ApplyOutcome::NotFound);
    };

    tracing::debug!(
        "Updating sale {} (last webhook update: {:?})",
        record.name,
        record.update_time
    );

    firestore::update_document(
        &ctx.firestore,
        &update.collection,
        &update.reference,
        &build_update(&update),
    )
    .await
    .map_err(Error::Store)?;

    Ok(ApplyOutcome::Applied {
        terminal: update.status.is_terminal(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modules::sales::status::normalize;
    use serde_json::json;

    #[test]
    fn terminal_updates_set_the_order_status() {
        let update = WebhookUpdate {
            collection: "vendas".to_string(),
            reference: "venda-42".to_string(),
            payload: json!({ "topic": "payment", "data": { "id": "123" } }),
            status: normalize("approved"),
        };

        let document_update = build_update(&update);
        assert_eq!(
            document_update.fields,
            vec![("statusPedidoGeral", json!("concluida"))]
        );
        assert_eq!(document_update.server_timestamps, vec!["ultimaAtualizacaoWebhook"]);
        assert_eq!(document_update.appends[0].0, "dadosWebhookCompletos");
    }

    #[test]
    fn non_terminal_updates_leave_the_order_status_untouched() {
        let update = WebhookUpdate {
            collection: "vendas".to_string(),
            reference: "venda-42".to_string(),
            payload: json!({ "topic": "merchant_order", "data": { "id": "456" } }),
            status: normalize("unknown"),
        };

        let document_update = build_update(&update);
        assert!(document_update.fields.is_empty());
        assert_eq!(document_update.appends.len(), 1);
        assert_eq!(document_update.server_timestamps, vec!["ultimaAtualizacaoWebhook"]);
    }

    #[test]
    fn reapplying_the_same_terminal_update_builds_an_identical_write() {
        let update = WebhookUpdate {
            collection: "vendas".to_string(),
            reference: "venda-42".to_string(),
            payload: json!({ "topic": "payment", "data": { "id": "123" } }),
            status: normalize("accredited"),
        };

        let first = build_update(&update);
        let second = build_update(&update);
        assert_eq!(first.fields, second.fields);
        assert_eq!(first.appends, second.appends);
    }
}
