pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Query {
        pub payment_intent_id: Option<String>,
        pub device_id: Option<String>,
    }
}

pub mod response {
    use crate::utils::mercadopago;
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;

    pub enum Success {
        /// The intent state plus, once finished, the payment that settled it.
        IntentStatus {
            status: String,
            payment: Option<serde_json::Value>,
        },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::IntentStatus { status, payment } => (
                    StatusCode::OK,
                    Json(json!({ "status": status, "payment": payment })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        MissingParameters,
        ServerMisconfigured,
        Gateway(mercadopago::Error),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingParameters => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Parâmetros 'paymentIntentId' e 'deviceId' são obrigatórios."
                    })),
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
                            "error": "Falha ao buscar status",
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
