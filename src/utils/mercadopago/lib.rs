use serde::Deserialize;
use serde_aux::field_attributes::deserialize_default_from_null;
use serde_json::{json, Value};
use std::time::Duration;
use ulid::Ulid;

/// Every call against the processor carries the same short timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(7);

#[derive(Debug)]
pub enum Error {
    Client(reqwest::Error),
    Upstream { status: u16, body: Value },
    Decode(serde_json::Error),
}

impl Error {
    /// Upstream HTTP status when the processor answered with one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn details(&self) -> Value {
        match self {
            Self::Upstream { body, .. } => body.clone(),
            Self::Client(err) => Value::String(err.to_string()),
            Self::Decode(err) => Value::String(err.to_string()),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ResourceMetadata {
    pub target_collection: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TransactionData {
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PointOfInteraction {
    pub transaction_data: Option<TransactionData>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Payment {
    pub id: i64,
    pub status: String,
    pub external_reference: Option<String>,
    #[serde(default)]
    pub metadata: Option<ResourceMetadata>,
    pub point_of_interaction: Option<PointOfInteraction>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PaymentIntentAdditionalInfo {
    pub external_reference: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PaymentIntent {
    pub id: String,
    pub state: String,
    #[serde(default)]
    pub additional_info: Option<PaymentIntentAdditionalInfo>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MerchantOrderPayment {
    pub status: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MerchantOrder {
    pub external_reference: Option<String>,
    pub order_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub payments: Vec<MerchantOrderPayment>,
    #[serde(default)]
    pub metadata: Option<ResourceMetadata>,
}

#[derive(Deserialize, Clone, Debug, Default)]
struct PaymentSearch {
    #[serde(default)]
    results: Vec<Value>,
}

/// One handle per request, bound to a single account's access token.
pub struct Client {
    http: reqwest::Client,
    api_endpoint: String,
    access_token: String,
}

impl Client {
    pub fn new(api_endpoint: &str, access_token: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            http,
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_endpoint, path)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, Error> {
        let response = request
            .bearer_auth(&self.access_token)
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

        response.json::<Value>().await.map_err(Error::Client)
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, Error> {
        serde_json::from_value(value).map_err(Error::Decode)
    }

    pub async fn create_payment(&self, body: Value) -> Result<Payment, Error> {
        let response = self
            .execute(
                self.http
                    .post(self.url("/v1/payments"))
                    .header("X-Idempotency-Key", Ulid::new().to_string())
                    .json(&body),
            )
            .await?;

        Self::decode(response)
    }

    pub async fn get_payment(&self, id: &str) -> Result<Payment, Error> {
        let response = self
            .execute(self.http.get(self.url(&format!("/v1/payments/{id}"))))
            .await?;

        Self::decode(response)
    }

    /// Newest payment carrying the given external reference, if any.
    pub async fn search_latest_payment(
        &self,
        external_reference: &str,
    ) -> Result<Option<Value>, Error> {
        let response = self
            .execute(self.http.get(self.url("/v1/payments/search")).query(&[
                ("external_reference", external_reference),
                ("sort", "date_created"),
                ("criteria", "desc"),
                ("limit", "1"),
            ]))
            .await?;

        let search: PaymentSearch = Self::decode(response)?;
        Ok(search.results.into_iter().next())
    }

    pub async fn cancel_payment(&self, id: &str) -> Result<Value, Error> {
        self.execute(
            self.http
                .put(self.url(&format!("/v1/payments/{id}")))
                .json(&json!({ "status": "cancelled" })),
        )
        .await
    }

    pub async fn create_payment_intent(
        &self,
        device_id: &str,
        body: Value,
    ) -> Result<Value, Error> {
        self.execute(
            self.http
                .post(self.url(&format!(
                    "/point/integration-api/devices/{device_id}/payment-intents"
                )))
                .header("X-Idempotency-Key", Ulid::new().to_string())
                .json(&body),
        )
        .await
    }

    pub async fn search_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent, Error> {
        let response = self
            .execute(self.http.get(self.url(&format!(
                "/point/integration-api/payment-intents/{intent_id}"
            ))))
            .await?;

        Self::decode(response)
    }

    pub async fn cancel_payment_intent(
        &self,
        device_id: &str,
        intent_id: &str,
    ) -> Result<Value, Error> {
        self.execute(self.http.delete(self.url(&format!(
            "/point/integration-api/devices/{device_id}/payment-intents/{intent_id}"
        ))))
        .await
    }

    pub async fn create_preference(&self, body: Value) -> Result<Value, Error> {
        self.execute(
            self.http
                .post(self.url("/checkout/preferences"))
                .header("X-Idempotency-Key", Ulid::new().to_string())
                .json(&body),
        )
        .await
    }

    /// The merchant-order resource has no SDK accessor upstream; this is the
    /// documented REST endpoint called directly.
    pub async fn get_merchant_order(&self, id: &str) -> Result<MerchantOrder, Error> {
        let response = self
            .execute(self.http.get(self.url(&format!("/merchant_orders/{id}"))))
            .await?;

        Self::decode(response)
    }
}
