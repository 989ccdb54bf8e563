pub mod request {
    use bigdecimal::BigDecimal;
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Body {
        pub transaction_amount: Option<BigDecimal>,
        pub description: Option<String>,
        pub payer_email: Option<String>,
        pub external_reference: Option<String>,
        pub payer_first_name: Option<String>,
        pub payer_last_name: Option<String>,
    }
}

pub mod response {
    use crate::utils::mercadopago;
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;

    pub enum Success {
        OrderCreated {
            payment_id: i64,
            status: String,
            qr_code: String,
            qr_code_base64: String,
        },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderCreated {
                    payment_id,
                    status,
                    qr_code,
                    qr_code_base64,
                } => (
                    StatusCode::CREATED,
                    Json(json!({
                        "paymentId": payment_id,
                        "status": status,
                        "qr_code": qr_code,
                        "qr_code_base64": qr_code_base64,
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        MissingFields,
        ServerMisconfigured,
        /// The processor accepted the payment but returned no QR data.
        UnexpectedGatewayResponse,
        Gateway(mercadopago::Error),
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingFields => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Campos obrigatórios ausentes para Pix." })),
                )
                    .into_response(),
                Self::ServerMisconfigured => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Falha na configuração do servidor." })),
                )
                    .into_response(),
                Self::UnexpectedGatewayResponse => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Resposta do processador para Pix com formato inesperado."
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
                            "error": "Falha ao criar ordem PIX",
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
