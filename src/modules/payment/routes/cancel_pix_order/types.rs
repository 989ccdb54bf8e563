pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Body {
        pub payment_id: Option<String>,
    }
}

pub mod response {
    use crate::utils::mercadopago;
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;

    pub enum Success {
        Cancelled(serde_json::Value),
        /// Cancelling an already-cancelled payment is the desired end state.
        AlreadyCancelled { payment_id: i64 },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Cancelled(payment) => (StatusCode::OK, Json(payment)).into_response(),
                Self::AlreadyCancelled { payment_id } => (
                    StatusCode::OK,
                    Json(json!({
                        "id": payment_id,
                        "status": "cancelled",
                        "message": "Pagamento já estava cancelado.",
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        MissingPaymentId,
        ServerMisconfigured,
        /// Only pending payments can be cancelled.
        NotPending { current_status: String },
        Gateway(mercadopago::Error),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingPaymentId => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Campo 'paymentId' é obrigatório." })),
                )
                    .into_response(),
                Self::ServerMisconfigured => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Falha na configuração do servidor." })),
                )
                    .into_response(),
                Self::NotPending { current_status } => (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "error": "Conflito: O pagamento não está pendente e não pode ser cancelado.",
                        "current_status": current_status,
                    })),
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
                            "error": "Falha ao cancelar ordem PIX",
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
