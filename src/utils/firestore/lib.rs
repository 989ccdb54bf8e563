use crate::types::FirestoreContext;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum Error {
    Client(reqwest::Error),
    Upstream { status: u16, body: Value },
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Value,
    pub update_time: Option<DateTime<Utc>>,
}

/// One atomic document write: plain field sets (covered by the update mask)
/// plus array-append and server-timestamp transforms. The write is guarded
/// by an existence precondition and never creates the document.
#[derive(Clone, Debug, Default)]
pub struct DocumentUpdate<'a> {
    pub fields: Vec<(&'a str, Value)>,
    pub appends: Vec<(&'a str, Value)>,
    pub server_timestamps: Vec<&'a str>,
}

fn http_client() -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(Error::Client)
}

fn document_name(ctx: &FirestoreContext, collection: &str, id: &str) -> String {
    format!(
        "projects/{}/databases/(default)/documents/{}/{}",
        ctx.project_id, collection, id
    )
}

/// JSON value to Firestore `Value` representation. Integers that do not fit
/// `i64` degrade to doubles.
pub fn to_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(flag) => json!({ "booleanValue": flag }),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => json!({ "integerValue": integer.to_string() }),
            None => json!({ "doubleValue": number.as_f64() }),
        },
        Value::String(text) => json!({ "stringValue": text }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_value).collect::<Vec<_>>() }
        }),
        Value::Object(entries) => json!({
            "mapValue": {
                "fields": entries
                    .iter()
                    .map(|(key, value)| (key.clone(), to_value(value)))
                    .collect::<Map<_, _>>()
            }
        }),
    }
}

pub fn commit_body(name: &str, update: &DocumentUpdate) -> Value {
    let fields = update
        .fields
        .iter()
        .map(|(path, value)| (path.to_string(), to_value(value)))
        .collect::<Map<_, _>>();
    let mask = update
        .fields
        .iter()
        .map(|(path, _)| *path)
        .collect::<Vec<_>>();

    let mut transforms = update
        .server_timestamps
        .iter()
        .map(|path| json!({ "fieldPath": path, "setToServerValue": "REQUEST_TIME" }))
        .collect::<Vec<_>>();
    transforms.extend(update.appends.iter().map(|(path, value)| {
        json!({
            "fieldPath": path,
            "appendMissingElements": { "values": [to_value(value)] }
        })
    }));

    json!({
        "writes": [{
            "update": { "name": name, "fields": fields },
            "updateMask": { "fieldPaths": mask },
            "currentDocument": { "exists": true },
            "updateTransforms": transforms,
        }]
    })
}

pub async fn get_document(
    ctx: &FirestoreContext,
    collection: &str,
    id: &str,
) -> Result<Option<Document>, Error> {
    let url = format!("{}/{}", ctx.api_endpoint, document_name(ctx, collection, id));

    let response = http_client()?
        .get(url)
        .bearer_auth(&ctx.access_token)
        .send()
        .await
        .map_err(Error::Client)?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.map_err(Error::Client)?;
        let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
        return Err(Error::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Document>()
        .await
        .map(Some)
        .map_err(Error::Client)
}

pub async fn update_document(
    ctx: &FirestoreContext,
    collection: &str,
    id: &str,
    update: &DocumentUpdate<'_>,
) -> Result<(), Error> {
    let url = format!(
        "{}/projects/{}/databases/(default)/documents:commit",
        ctx.api_endpoint, ctx.project_id
    );
    let body = commit_body(&document_name(ctx, collection, id), update);

    let response = http_client()?
        .post(url)
        .bearer_auth(&ctx.access_token)
        .json(&body)
        .send()
        .await
        .map_err(Error::Client)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.map_err(Error::Client)?;
        let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
        return Err(Error::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn converts_nested_json_to_firestore_values() {
        let value = json!({
            "reference": "venda-42",
            "total": 125.5,
            "installments": 3,
            "paid": true,
            "items": ["a", "b"],
        });

        let converted = to_value(&value);
        let fields = &converted["mapValue"]["fields"];
        assert_eq!(fields["reference"]["stringValue"], "venda-42");
        assert_eq!(fields["total"]["doubleValue"], 125.5);
        assert_eq!(fields["installments"]["integerValue"], "3");
        assert_eq!(fields["paid"]["booleanValue"], true);
        assert_eq!(fields["items"]["arrayValue"]["values"][1]["stringValue"], "b");
    }

    #[test]
    fn commit_body_masks_exactly_the_set_fields() {
        let update = DocumentUpdate {
            fields: vec![("statusPedidoGeral", json!("concluida"))],
            appends: vec![("dadosWebhookCompletos", json!({ "topic": "payment" }))],
            server_timestamps: vec!["ultimaAtualizacaoWebhook"],
        };

        let body = commit_body("projects/p/databases/(default)/documents/vendas/v1", &update);
        let write = &body["writes"][0];

        assert_eq!(write["updateMask"]["fieldPaths"], json!(["statusPedidoGeral"]));
        assert_eq!(
            write["update"]["fields"]["statusPedidoGeral"]["stringValue"],
            "concluida"
        );
        assert_eq!(write["currentDocument"]["exists"], true);

        let transforms = write["updateTransforms"].as_array().unwrap();
        assert_eq!(transforms.len(), 2);
        assert_eq!(transforms[0]["fieldPath"], "ultimaAtualizacaoWebhook");
        assert_eq!(transforms[0]["setToServerValue"], "REQUEST_TIME");
        assert_eq!(transforms[1]["fieldPath"], "dadosWebhookCompletos");
    }

    #[test]
    fn commit_body_with_no_field_sets_writes_only_transforms() {
        let update = DocumentUpdate {
            fields: vec![],
            appends: vec![("dadosWebhookCompletos", json!({ "topic": "payment" }))],
            server_timestamps: vec!["ultimaAtualizacaoWebhook"],
        };

        let body = commit_body("projects/p/databases/(default)/documents/vendas/v1", &update);
        let write = &body["writes"][0];

        assert_eq!(write["updateMask"]["fieldPaths"], json!([]));
        assert_eq!(write["update"]["fields"], json!({}));
    }
}
