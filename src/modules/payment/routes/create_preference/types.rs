pub mod request {
    use bigdecimal::BigDecimal;
    use serde::Deserialize;
    use serde_aux::field_attributes::deserialize_option_number_from_string;
    use serde_json::Value;
    use validator::Validate;

    /// Storefront item as sent by the client; most fields are optional and
    /// normalized before reaching the processor.
    #[derive(Deserialize, Clone)]
    pub struct Item {
        pub id: Option<String>,
        pub title: Option<String>,
        pub name: Option<String>,
        pub description: Option<String>,
        pub category_id: Option<String>,
        pub category: Option<String>,
        #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
        pub quantity: Option<u32>,
        pub unit_price: Option<BigDecimal>,
        pub price: Option<BigDecimal>,
    }

    #[derive(Deserialize, Validate)]
    pub struct Payer {
        #[validate(email(message = "E-mail do comprador inválido"))]
        pub email: Option<String>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        #[serde(default)]
        pub phone: Option<Value>,
        #[serde(default)]
        pub identification: Option<Value>,
        #[serde(default)]
        pub address: Option<Value>,
    }

    #[derive(Deserialize, Validate)]
    pub struct Body {
        pub items: Option<Vec<Item>>,
        #[serde(rename = "externalReference")]
        pub external_reference: Option<String>,
        #[validate(nested)]
        pub payer: Option<Payer>,
        pub notification_url: Option<String>,
        #[serde(default)]
        pub issuer_id: Option<Value>,
        #[serde(default)]
        pub back_urls: Option<Value>,
        pub auto_return: Option<String>,
        #[serde(default)]
        pub metadata: Option<Value>,
    }
}

pub mod response {
    use crate::utils::{mercadopago, validation};
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        PreferenceCreated(serde_json::Value),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::PreferenceCreated(preference) => {
                    (StatusCode::CREATED, Json(preference)).into_response()
                }
            }
        }
    }

    pub enum Error {
        MissingRequiredFields,
        MissingPayerEmail,
        MissingNotificationUrl,
        InvalidItemPrices(Vec<serde_json::Value>),
        FailedToValidate(ValidationErrors),
        ServerMisconfigured,
        Gateway(mercadopago::Error),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingRequiredFields => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Campos 'items' e 'externalReference' são obrigatórios."
                    })),
                )
                    .into_response(),
                Self::MissingPayerEmail => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Campo obrigatório 'payer.email' ausente. Forneça o e-mail do comprador."
                    })),
                )
                    .into_response(),
                Self::MissingNotificationUrl => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Campo obrigatório 'notification_url' ausente. Defina no corpo ou na variável DEFAULT_NOTIFICATION_URL."
                    })),
                )
                    .into_response(),
                Self::InvalidItemPrices(invalid_items) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Alguns items possuem unit_price inválido (<=0). Envie preços válidos para todos os itens.",
                        "invalid_items": invalid_items,
                    })),
                )
                    .into_response(),
                Self::FailedToValidate(errors) => validation::into_response(errors),
                Self::ServerMisconfigured => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Falha na configuração do servidor." })),
                )
                    .into_response(),
                Self::Gateway(err) => {
                    let status = err
                        .upstream_status()
                        .and_then(|code| StatusCode::from_u16(code).ok())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    (
                        status,
                        Json(json!({
                            "error": "Falha ao criar preferência de pagamento",
                            "details": err.details(),
                        })),
                    )
                        .into_response()
                }
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
