mod handler;
mod service;
mod types;

use crate::types::Context;
use axum::routing::{post, Router};
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/webhook", post(handler::handler))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{
        AccountKeys, AppContext, AppEnvironment, FirestoreContext, MercadoPagoContext,
        SalesContext,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;
    use tower::ServiceExt;

    fn context() -> Arc<Context> {
        Arc::new(Context {
            app: AppContext {
                host: "127.0.0.1".to_string(),
                environment: AppEnvironment::Development,
                port: 0,
                url: "http://127.0.0.1:0".to_string(),
            },
            mercado_pago: MercadoPagoContext {
                // Unroutable endpoint: these tests must never reach the
                // processor.
                api_endpoint: "http://127.0.0.1:9".to_string(),
                sjp: AccountKeys {
                    access_token: Some("token-sjp".to_string()),
                    webhook_secret: Some("secret-sjp".to_string()),
                },
                amarela: AccountKeys {
                    access_token: Some("token-amarela".to_string()),
                    webhook_secret: Some("secret-amarela".to_string()),
                },
            },
            sales: SalesContext {
                default_collection: "vendas".to_string(),
                default_notification_url: None,
            },
            firestore: FirestoreContext {
                api_endpoint: "http://127.0.0.1:9".to_string(),
                project_id: "test-project".to_string(),
                access_token: "test-token".to_string(),
            },
        })
    }

    fn sign(secret: &str, manifest: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(manifest.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn send(request: Request<Body>) -> axum::response::Response {
        get_router()
            .with_state(context())
            .oneshot(request)
            .await
            .unwrap()
    }

    fn webhook_request(signature: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .header("x-request-id", "req-1");
        if let Some(signature) = signature {
            builder = builder.header("x-signature", signature);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn missing_signature_header_is_rejected() {
        let request = webhook_request(None, r#"{"topic":"payment","data":{"id":"123"}}"#);
        assert_eq!(send(request).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signature_header_without_v1_is_rejected() {
        let request = webhook_request(
            Some("ts=1704908010"),
            r#"{"topic":"payment","data":{"id":"123"}}"#,
        );
        assert_eq!(send(request).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signature_matching_no_account_is_forbidden() {
        let digest = sign("unknown-secret", "id:123;request-id:req-1;ts:1704908010;");
        let request = webhook_request(
            Some(&format!("ts=1704908010,v1={digest}")),
            r#"{"topic":"payment","data":{"id":"123"}}"#,
        );
        assert_eq!(send(request).await.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn verified_webhooks_are_acknowledged() {
        // No data.id: the background continuation skips before any fetch,
        // so the test exercises verify-then-acknowledge alone.
        let digest = sign("secret-sjp", "id:;request-id:req-1;ts:1704908010;");
        let request = webhook_request(
            Some(&format!("ts=1704908010,v1={digest}")),
            r#"{"topic":"payment"}"#,
        );
        assert_eq!(send(request).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn numeric_data_ids_verify_like_string_ids() {
        let digest = sign("secret-amarela", "id:123;request-id:req-1;ts:1704908010;");
        let request = webhook_request(
            Some(&format!("v1={digest},ts=1704908010")),
            r#"{"type":"unhandled_topic","data":{"id":123}}"#,
        );
        assert_eq!(send(request).await.status(), StatusCode::OK);
    }
}
