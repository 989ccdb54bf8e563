pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Body {
        pub device_id: Option<String>,
        pub payment_intent_id: Option<String>,
    }
}

pub mod response {
    use crate::utils::mercadopago;
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;

    pub enum Success {
        Cancelled(serde_json::Value),
        /// The intent already reached a final state; nothing left to cancel.
        AlreadyFinalized { intent_id: String },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Cancelled(intent) => (StatusCode::OK, Json(intent)).into_response(),
                Self::AlreadyFinalized { intent_id } => (
                    StatusCode::OK,
                    Json(json!({ "id": intent_id, "status": "already_finalized" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        MissingFields,
        ServerMisconfigured,
        /// The terminal is actively processing the order; a true conflict.
        Processing { state: String },
        Gateway(mercadopago::Error),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingFields => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Campos 'deviceId' e 'paymentIntentId' são obrigatórios."
                    })),
                )
                    .into_response(),
                Self::ServerMisconfigured => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Falha na configuração do servidor." })),
                )
                    .into_response(),
                Self::Processing { state } => (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "error": "Conflito: A ordem já está sendo processada na maquininha e não pode ser cancelada agora.",
                        "details": format!("Current state is {state}"),
                    })),
                )
                    .into_response(),
                Self::Gateway(err) => {
                    let status = err
                        .upstream_status()
                        .and_then(|code| StatusCode::from_u16(code).ok())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    let error = if status == StatusCode::CONFLICT {
                        "Conflito: A ordem não pode ser cancelada."
                    } else {
                        "Falha ao cancelar ordem"
                    };
                    (
                        status,
                        Json(json!({ "error": error, "details": err.details() })),
                    )
                        .into_response()
                }
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
