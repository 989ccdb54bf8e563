use crate::utils::accounts::Account;
use async_trait::async_trait;
use std::env;

#[derive(Clone)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: String) -> Self {
        match raw_environment.as_ref() {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u32,
    pub url: String,
}

/// Per-account Mercado Pago secrets. Either may be absent from the
/// environment; resolution fails per request, not at startup.
#[derive(Clone)]
pub struct AccountKeys {
    pub access_token: Option<String>,
    pub webhook_secret: Option<String>,
}

#[derive(Clone)]
pub struct MercadoPagoContext {
    pub api_endpoint: String,
    pub sjp: AccountKeys,
    pub amarela: AccountKeys,
}

impl MercadoPagoContext {
    pub fn keys(&self, account: Account) -> &AccountKeys {
        match account {
            Account::Sjp => &self.sjp,
            Account::Amarela => &self.amarela,
        }
    }
}

#[derive(Clone)]
pub struct SalesContext {
    pub default_collection: String,
    pub default_notification_url: Option<String>,
}

#[derive(Clone)]
pub struct FirestoreContext {
    pub api_endpoint: String,
    pub project_id: String,
    pub access_token: String,
}

#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub mercado_pago: MercadoPagoContext,
    pub sales: SalesContext,
    pub firestore: FirestoreContext,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u32,
    pub url: String,
}

#[derive(Clone)]
pub struct MercadoPagoConfig {
    pub api_endpoint: String,
    pub sjp: AccountKeys,
    pub amarela: AccountKeys,
}

#[derive(Clone)]
pub struct SalesConfig {
    pub default_collection: String,
    pub default_notification_url: Option<String>,
}

#[derive(Clone)]
pub struct FirestoreConfig {
    pub api_endpoint: String,
    pub project_id: String,
    pub access_token: String,
}

#[derive(Clone)]
pub struct Config {
    pub app: AppConfig,
    pub mercado_pago: MercadoPagoConfig,
    pub sales: SalesConfig,
    pub firestore: FirestoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u32>()
            .expect("Invalid PORT number");
        let url = env::var("URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let mercado_pago_api_endpoint = env::var("MP_API_ENDPOINT")
            .unwrap_or_else(|_| "https://api.mercadopago.com".to_string());
        let sjp_access_token = env::var("MP_TOKEN_SJP").ok();
        let sjp_webhook_secret = env::var("MP_SECRET_SJP").ok();
        let amarela_access_token = env::var("MP_TOKEN_AMARELA").ok();
        let amarela_webhook_secret = env::var("MP_SECRET_AMARELA").ok();
        let default_collection =
            env::var("DEFAULT_TARGET_COLLECTION").unwrap_or_else(|_| "vendas".to_string());
        let default_notification_url = env::var("DEFAULT_NOTIFICATION_URL").ok();
        let firestore_api_endpoint = env::var("FIRESTORE_API_ENDPOINT")
            .unwrap_or_else(|_| "https://firestore.googleapis.com/v1".to_string());
        let firestore_project_id =
            env::var("FIRESTORE_PROJECT_ID").expect("FIRESTORE_PROJECT_ID not set");
        let firestore_access_token =
            env::var("FIRESTORE_ACCESS_TOKEN").expect("FIRESTORE_ACCESS_TOKEN not set");

        Self {
            app: AppConfig {
                host,
                environment: AppEnvironment::from(environment),
                port,
                url,
            },
            mercado_pago: MercadoPagoConfig {
                api_endpoint: mercado_pago_api_endpoint,
                sjp: AccountKeys {
                    access_token: sjp_access_token,
                    webhook_secret: sjp_webhook_secret,
                },
                amarela: AccountKeys {
                    access_token: amarela_access_token,
                    webhook_secret: amarela_webhook_secret,
                },
            },
            sales: SalesConfig {
                default_collection,
                default_notification_url,
            },
            firestore: FirestoreConfig {
                api_endpoint: firestore_api_endpoint,
                project_id: firestore_project_id,
                access_token: firestore_access_token,
            },
        }
    }
}

#[async_trait]
pub trait ToContext {
    async fn to_context(self) -> Context;
}

#[async_trait]
impl ToContext for Config {
    async fn to_context(self) -> Context {
        Context {
            app: AppContext {
                host: self.app.host,
                environment: self.app.environment,
                port: self.app.port,
                url: self.app.url,
            },
            mercado_pago: MercadoPagoContext {
                api_endpoint: self.mercado_pago.api_endpoint,
                sjp: self.mercado_pago.sjp,
                amarela: self.mercado_pago.amarela,
            },
            sales: SalesContext {
                default_collection: self.sales.default_collection,
                default_notification_url: self.sales.default_notification_url,
            },
            firestore: FirestoreContext {
                api_endpoint: self.firestore.api_endpoint,
                project_id: self.firestore.project_id,
                access_token: self.firestore.access_token,
            },
        }
    }
}
