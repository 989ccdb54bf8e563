use super::types::{request, response};
use crate::types::Context;
use crate::utils::{accounts, mercadopago};
use bigdecimal::{BigDecimal, ToPrimitive};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use validator::Validate;

pub struct NormalizedItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub quantity: u32,
    pub unit_price: BigDecimal,
}

fn normalize_items(items: &[request::Item]) -> Vec<NormalizedItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let title = item
                .title
                .clone()
                .or_else(|| item.name.clone())
                .unwrap_or_else(|| format!("Item {}", index + 1));

            NormalizedItem {
                id: item
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("item_{}", index + 1)),
                description: item.description.clone().unwrap_or_else(|| title.clone()),
                title,
                category_id: item.category_id.clone().or_else(|| item.category.clone()),
                quantity: item.quantity.unwrap_or(1),
                unit_price: item
                    .unit_price
                    .clone()
                    .or_else(|| item.price.clone())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

fn item_json(item: &NormalizedItem) -> Value {
    let mut fields = Map::new();
    fields.insert("id".to_string(), json!(item.id));
    fields.insert("title".to_string(), json!(item.title));
    fields.insert("description".to_string(), json!(item.description));
    if let Some(category_id) = &item.category_id {
        fields.insert("category_id".to_string(), json!(category_id));
    }
    fields.insert("quantity".to_string(), json!(item.quantity));
    fields.insert("unit_price".to_string(), json!(item.unit_price.to_f64()));
    Value::Object(fields)
}

fn default_back_urls() -> Value {
    json!({
        "success": "https://loja-vendas-fazplay.web.app/success",
        "failure": "https://loja-vendas-fazplay.web.app/failure",
        "pending": "https://loja-vendas-fazplay.web.app/pending",
    })
}

pub async fn service(ctx: Arc<Context>, body: request::Body) -> response::Response {
    body.validate().map_err(response::Error::FailedToValidate)?;

    let items = match body.items {
        Some(items) if !items.is_empty() => items,
        _ => return Err(response::Error::MissingRequiredFields),
    };
    let Some(external_reference) = body.external_reference else {
        return Err(response::Error::MissingRequiredFields);
    };
    let Some(payer) = body.payer else {
        return Err(response::Error::MissingPayerEmail);
    };
    let Some(payer_email) = payer.email.clone() else {
        return Err(response::Error::MissingPayerEmail);
    };

    let credentials = accounts::resolve(&ctx.mercado_pago, accounts::Account::Sjp)
        .map_err(|_| response::Error::ServerMisconfigured)?;

    let normalized_items = normalize_items(&items);
    let invalid_items = normalized_items
        .iter()
        .filter(|item| item.unit_price <= BigDecimal::from(0))
        .map(item_json)
        .collect::<Vec<_>>();
    if !invalid_items.is_empty() {
        tracing::error!(
            "Rejecting preference with invalid item prices: {:?}",
            invalid_items
        );
        return Err(response::Error::InvalidItemPrices(invalid_items));
    }

    // notification_url is what routes the settlement webhook back here; a
    // preference without one can never be reconciled.
    let Some(notification_url) = body
        .notification_url
        .or_else(|| ctx.sales.default_notification_url.clone())
    else {
        return Err(response::Error::MissingNotificationUrl);
    };

    if notification_url.contains("localhost") || notification_url.contains("127.0.0.1") {
        tracing::warn!(
            "notification_url points at a local address; the processor cannot deliver webhooks there: {}",
            notification_url
        );
    }
    if payer.first_name.is_none() || payer.last_name.is_none() {
        tracing::warn!("payer.first_name or payer.last_name missing; recommended fields for approval rates");
    }

    let mut payer_payload = Map::new();
    payer_payload.insert("email".to_string(), json!(payer_email));
    if let Some(first_name) = payer.first_name {
        payer_payload.insert("first_name".to_string(), json!(first_name));
    }
    if let Some(last_name) = payer.last_name {
        payer_payload.insert("last_name".to_string(), json!(last_name));
    }
    if let Some(phone) = payer.phone {
        payer_payload.insert("phone".to_string(), phone);
    }
    if let Some(identification) = payer.identification {
        payer_payload.insert("identification".to_string(), identification);
    }
    if let Some(address) = payer.address {
        payer_payload.insert("address".to_string(), address);
    }

    // The webhook pipeline reads metadata.target_collection off the fetched
    // resource to find the sales record; accept the aliases clients send and
    // fall back to the configured default.
    let mut metadata = match body.metadata {
        Some(Value::Object(entries)) => entries,
        _ => Map::new(),
    };
    let target_collection = metadata
        .get("target_collection")
        .or_else(|| metadata.get("targetCollection"))
        .or_else(|| metadata.get("target"))
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| ctx.sales.default_collection.clone());
    metadata.insert("target_collection".to_string(), json!(target_collection));
    metadata
        .entry("created_by")
        .or_insert_with(|| json!("fazplay-backend"));

    let mut preference_request = json!({
        "items": normalized_items.iter().map(item_json).collect::<Vec<_>>(),
        "external_reference": external_reference,
        "payer": payer_payload,
        "notification_url": notification_url,
        "back_urls": body.back_urls.unwrap_or_else(default_back_urls),
        "auto_return": body.auto_return.unwrap_or_else(|| "approved".to_string()),
        "metadata": metadata,
    });
    if let Some(issuer_id) = body.issuer_id {
        preference_request["issuer_id"] = issuer_id;
    }

    let client =
        mercadopago::Client::new(&ctx.mercado_pago.api_endpoint, &credentials.access_token)
            .map_err(response::Error::Gateway)?;

    let preference = client
        .create_preference(preference_request)
        .await
        .map_err(|err| {
            tracing::error!("Failed to create preference: {:?}", err);
            response::Error::Gateway(err)
        })?;

    let init_point = preference
        .get("init_point")
        .and_then(Value::as_str)
        .or_else(|| preference.get("sandbox_init_point").and_then(Value::as_str))
        .map(String::from);

    Ok(response::Success::PreferenceCreated(json!({
        "id": preference.get("id").cloned().unwrap_or(Value::Null),
        "init_point": init_point,
        "status": preference
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("created"),
        "preference": preference,
    })))
}

#[cfg(test)]
mod test {
    use super::*;
    use bigdecimal::FromPrimitive;

    fn item(title: Option<&str>, name: Option<&str>, price: Option<f64>) -> request::Item {
        request::Item {
            id: None,
            title: title.map(String::from),
            name: name.map(String::from),
            description: None,
            category_id: None,
            category: None,
            quantity: None,
            unit_price: price.and_then(BigDecimal::from_f64),
            price: None,
        }
    }

    #[test]
    fn normalization_fills_positional_fallbacks() {
        let items = [item(None, None, None), item(None, Some("Combo"), Some(25.0))];
        let normalized = normalize_items(&items);

        assert_eq!(normalized[0].id, "item_1");
        assert_eq!(normalized[0].title, "Item 1");
        assert_eq!(normalized[0].description, "Item 1");
        assert_eq!(normalized[0].quantity, 1);
        assert_eq!(normalized[0].unit_price, BigDecimal::from(0));

        assert_eq!(normalized[1].id, "item_2");
        assert_eq!(normalized[1].title, "Combo");
        assert_eq!(normalized[1].unit_price, BigDecimal::from(25));
    }

    #[test]
    fn item_json_omits_absent_category() {
        let normalized = normalize_items(&[item(Some("Água"), None, Some(4.5))]);
        let value = item_json(&normalized[0]);

        assert_eq!(value["title"], "Água");
        assert_eq!(value["unit_price"], 4.5);
        assert!(value.get("category_id").is_none());
    }
}
