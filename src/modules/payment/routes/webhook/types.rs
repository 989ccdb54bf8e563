pub mod request {
    use axum::http::header::{HeaderName, HeaderValue};
    use headers::{Error, Header};
    use serde::Deserialize;
    use serde_aux::field_attributes::deserialize_string_from_number;
    use std::iter;

    pub static X_SIGNATURE: HeaderName = HeaderName::from_static("x-signature");
    pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

    #[derive(Clone, Debug)]
    pub struct XSignature(pub String);

    impl Header for XSignature {
        fn name() -> &'static HeaderName {
            &X_SIGNATURE
        }

        fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
        where
            Self: Sized,
            I: Iterator<Item = &'i HeaderValue>,
        {
            values
                .next()
                .and_then(|value| value.to_str().ok())
                .map(|value| Self(value.to_string()))
                .ok_or(Error::invalid())
        }

        fn encode<E>(&self, values: &mut E)
        where
            E: Extend<HeaderValue>,
        {
            let bytes = self.0.as_bytes();
            let value = HeaderValue::from_bytes(bytes).expect("XSignature is a valid HeaderValue");

            values.extend(iter::once(value))
        }
    }

    #[derive(Clone, Debug)]
    pub struct XRequestId(pub String);

    impl Header for XRequestId {
        fn name() -> &'static HeaderName {
            &X_REQUEST_ID
        }

        fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
        where
            Self: Sized,
            I: Iterator<Item = &'i HeaderValue>,
        {
            values
                .next()
                .and_then(|value| value.to_str().ok())
                .map(|value| Self(value.to_string()))
                .ok_or(Error::invalid())
        }

        fn encode<E>(&self, values: &mut E)
        where
            E: Extend<HeaderValue>,
        {
            let bytes = self.0.as_bytes();
            let value = HeaderValue::from_bytes(bytes).expect("XRequestId is a valid HeaderValue");

            values.extend(iter::once(value))
        }
    }

    /// What the notification refers to. The processor sends `payment` and
    /// `merchant_order`; everything else is acknowledged and dropped.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Topic {
        Payment,
        MerchantOrder,
        Other(String),
    }

    impl From<&str> for Topic {
        fn from(raw: &str) -> Self {
            match raw {
                "payment" => Self::Payment,
                "merchant_order" => Self::MerchantOrder,
                other => Self::Other(other.to_string()),
            }
        }
    }

    #[derive(Deserialize, Clone, Debug)]
    pub struct NotificationData {
        #[serde(deserialize_with = "deserialize_string_from_number")]
        pub id: String,
    }

    #[derive(Deserialize, Clone, Debug, Default)]
    pub struct Notification {
        #[serde(default)]
        pub data: Option<NotificationData>,
        #[serde(default)]
        pub topic: Option<String>,
        /// Legacy alias for `topic` still sent on some notification kinds.
        #[serde(default, rename = "type")]
        pub kind: Option<String>,
    }

    impl Notification {
        pub fn resource_id(&self) -> Option<&str> {
            self.data.as_ref().map(|data| data.id.as_str())
        }

        pub fn classify(&self) -> Option<Topic> {
            self.topic
                .as_deref()
                .or(self.kind.as_deref())
                .map(Topic::from)
        }
    }

    pub struct Payload {
        pub signature: Option<XSignature>,
        pub request_id: Option<XRequestId>,
        pub notification: Notification,
        pub raw: serde_json::Value,
    }
}

pub mod response {
    use axum::{http::StatusCode, response::IntoResponse, Json};
    use serde_json::json;

    pub enum Success {
        Acknowledged,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Acknowledged => StatusCode::OK.into_response(),
            }
        }
    }

    pub enum Error {
        MissingSignature,
        MalformedSignature,
        SignatureMismatch,
        ServerError,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MissingSignature => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Missing x-signature header." })),
                )
                    .into_response(),
                Self::MalformedSignature => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Malformed x-signature header." })),
                )
                    .into_response(),
                Self::SignatureMismatch => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "Webhook signature verification failed." })),
                )
                    .into_response(),
                Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
