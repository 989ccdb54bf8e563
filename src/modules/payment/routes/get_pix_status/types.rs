pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Query {
        pub payment_id: Option<String>,
    }
}

pub mod response {
    use crate::utils::mercadopago;
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;

    pub enum Success {
        PaymentStatus { id: i64, status: String },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::PaymentStatus { id, status } => (
                    StatusCode::OK,
                    Json(json!({ "id": id, "status": status })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        MissingPaymentId,
        ServerMisconfigured,
        Gateway(mercadopago::Error),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingPaymentId => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Parâmetro 'paymentId' ausente." })),
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
                            "error": "Falha ao buscar status do PIX",
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
