pub mod request {
    use bigdecimal::BigDecimal;
    use serde::Deserialize;

    fn default_description() -> String {
        "Venda PDV".to_string()
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Body {
        pub amount: Option<BigDecimal>,
        pub device_id: Option<String>,
        pub external_reference: Option<String>,
        #[serde(default = "default_description")]
        pub description: String,
        pub tipo_pagamento_na_maquininha: Option<String>,
        pub installments: Option<u32>,
        pub account_identifier: Option<String>,
    }
}

pub mod response {
    use crate::utils::mercadopago;
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;

    pub enum Success {
        OrderCreated(serde_json::Value),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderCreated(intent) => (StatusCode::CREATED, Json(intent)).into_response(),
            }
        }
    }

    pub enum Error {
        MissingFields,
        InvalidAmount,
        ServerMisconfigured,
        Gateway(mercadopago::Error),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingFields => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Campos obrigatórios ausentes." })),
                )
                    .into_response(),
                Self::InvalidAmount => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Valor de 'amount' inválido." })),
                )
                    .into_response(),
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
                            "error": "Falha ao criar ordem no dispositivo",
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
