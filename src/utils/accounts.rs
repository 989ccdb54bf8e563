use crate::types::MercadoPagoContext;

/// The two Mercado Pago merchant accounts this backend can act as. `Sjp` is
/// the default: any unrecognized or absent identifier selects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Account {
    Sjp,
    Amarela,
}

impl Account {
    pub fn from_identifier(identifier: Option<&str>) -> Self {
        match identifier {
            Some("amarela") => Self::Amarela,
            _ => Self::Sjp,
        }
    }

    /// NEWLAND terminals are registered under the amarela account.
    pub fn for_device(device_id: &str) -> Self {
        match device_id.starts_with("NEWLAND") {
            true => Self::Amarela,
            false => Self::Sjp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sjp => "sjp",
            Self::Amarela => "amarela",
        }
    }
}

#[derive(Debug)]
pub enum Error {
    NotConfigured(Account),
}

#[derive(Clone)]
pub struct Credentials {
    pub account: Account,
    pub access_token: String,
    pub webhook_secret: String,
}

pub fn resolve(mp: &MercadoPagoContext, account: Account) -> Result<Credentials, Error> {
    let keys = mp.keys(account);

    match (keys.access_token.as_ref(), keys.webhook_secret.as_ref()) {
        (Some(access_token), Some(webhook_secret)) => Ok(Credentials {
            account,
            access_token: access_token.clone(),
            webhook_secret: webhook_secret.clone(),
        }),
        _ => {
            tracing::error!(
                "Missing access token or webhook secret for account '{}'",
                account.as_str()
            );
            Err(Error::NotConfigured(account))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::AccountKeys;

    fn context() -> MercadoPagoContext {
        MercadoPagoContext {
            api_endpoint: "https://api.mercadopago.com".to_string(),
            sjp: AccountKeys {
                access_token: Some("token-sjp".to_string()),
                webhook_secret: Some("secret-sjp".to_string()),
            },
            amarela: AccountKeys {
                access_token: Some("token-amarela".to_string()),
                webhook_secret: Some("secret-amarela".to_string()),
            },
        }
    }

    #[test]
    fn unrecognized_identifiers_select_the_default_account() {
        assert_eq!(Account::from_identifier(None), Account::Sjp);
        assert_eq!(Account::from_identifier(Some("")), Account::Sjp);
        assert_eq!(Account::from_identifier(Some("sjp")), Account::Sjp);
        assert_eq!(Account::from_identifier(Some("AMARELA")), Account::Sjp);
        assert_eq!(Account::from_identifier(Some("garbage")), Account::Sjp);
        assert_eq!(Account::from_identifier(Some("amarela")), Account::Amarela);
    }

    #[test]
    fn device_prefix_selects_the_account() {
        assert_eq!(Account::for_device("NEWLAND_N950__123"), Account::Amarela);
        assert_eq!(Account::for_device("PAX_A910__456"), Account::Sjp);
    }

    #[test]
    fn resolve_returns_the_matching_credentials() {
        let credentials = resolve(&context(), Account::Amarela).unwrap();
        assert_eq!(credentials.access_token, "token-amarela");
        assert_eq!(credentials.webhook_secret, "secret-amarela");
    }

    #[test]
    fn resolve_fails_when_either_secret_is_missing() {
        let mut ctx = context();
        ctx.sjp.webhook_secret = None;
        assert!(matches!(
            resolve(&ctx, Account::Sjp),
            Err(Error::NotConfigured(Account::Sjp))
        ));

        let mut ctx = context();
        ctx.amarela.access_token = None;
        assert!(matches!(
            resolve(&ctx, Account::Amarela),
            Err(Error::NotConfigured(Account::Amarela))
        ));
    }
}
