use crate::types::MercadoPagoContext;
use crate::utils::accounts::Account;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const DIGEST_LEN: usize = 32;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    MissingHeader,
    Malformed,
    Mismatch,
}

/// Parsed `x-signature` header: `ts=<int>,v1=<hex>`, order-independent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub ts: String,
    pub v1: String,
}

pub fn parse_header(header: &str) -> Result<Signature, Error> {
    let mut ts = None;
    let mut v1 = None;

    for part in header.split(',') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        match key.trim() {
            "ts" => ts = Some(value.trim().to_string()),
            "v1" => v1 = Some(value.trim().to_string()),
            _ => {}
        }
    }

    match (ts, v1) {
        (Some(ts), Some(v1)) => Ok(Signature { ts, v1 }),
        _ => Err(Error::Malformed),
    }
}

/// The exact byte sequence that is signed. An absent resource or request id
/// concatenates as the empty string, which still yields a well-defined
/// manifest (one no honest signer ever produced).
pub fn manifest(resource_id: &str, request_id: &str, ts: &str) -> String {
    format!("id:{resource_id};request-id:{request_id};ts:{ts};")
}

fn digest_matches(secret: &str, manifest: &str, received: &[u8]) -> bool {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(manifest.as_bytes());
    mac.verify_slice(received).is_ok()
}

/// Checks the received digest against both accounts' secrets; whichever
/// secret matches identifies the notifying account. `Sjp` is checked first
/// and takes precedence should both ever match (only possible if the two
/// accounts were provisioned with the same secret). An account with no
/// configured secret is skipped as a candidate.
pub fn verify(
    mp: &MercadoPagoContext,
    signature: &Signature,
    request_id: &str,
    resource_id: &str,
) -> Result<Account, Error> {
    let received = hex::decode(&signature.v1).map_err(|_| Error::Mismatch)?;

    // The comparison primitive is constant-time only across equal-length
    // inputs; the received length is public, so gating on it leaks nothing.
    if received.len() != DIGEST_LEN {
        return Err(Error::Mismatch);
    }

    let manifest = manifest(resource_id, request_id, &signature.ts);

    for account in [Account::Sjp, Account::Amarela] {
        if let Some(secret) = mp.keys(account).webhook_secret.as_ref() {
            if digest_matches(secret, &manifest, &received) {
                return Ok(account);
            }
        }
    }

    Err(Error::Mismatch)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::AccountKeys;

    fn sign(secret: &str, manifest: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(manifest.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

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
    fn parses_the_header_in_any_key_order() {
        let signature = parse_header("v1=abc123, ts=1704908010").unwrap();
        assert_eq!(signature.ts, "1704908010");
        assert_eq!(signature.v1, "abc123");
    }

    #[test]
    fn rejects_headers_missing_ts_or_v1() {
        assert_eq!(parse_header("ts=1704908010"), Err(Error::Malformed));
        assert_eq!(parse_header("v1=abc123"), Err(Error::Malformed));
        assert_eq!(parse_header("garbage"), Err(Error::Malformed));
    }

    #[test]
    fn round_trip_accepts_the_signing_account() {
        let ctx = context();
        let manifest = manifest("12345", "req-1", "1704908010");

        let signature = Signature {
            ts: "1704908010".to_string(),
            v1: sign("secret-amarela", &manifest),
        };
        assert_eq!(
            verify(&ctx, &signature, "req-1", "12345"),
            Ok(Account::Amarela)
        );

        let signature = Signature {
            ts: "1704908010".to_string(),
            v1: sign("secret-sjp", &manifest),
        };
        assert_eq!(verify(&ctx, &signature, "req-1", "12345"), Ok(Account::Sjp));
    }

    #[test]
    fn any_manifest_component_change_invalidates_the_signature() {
        let ctx = context();
        let signature = Signature {
            ts: "1704908010".to_string(),
            v1: sign("secret-sjp", &manifest("12345", "req-1", "1704908010")),
        };

        assert_eq!(
            verify(&ctx, &signature, "req-1", "99999"),
            Err(Error::Mismatch)
        );
        assert_eq!(
            verify(&ctx, &signature, "req-2", "12345"),
            Err(Error::Mismatch)
        );
    }

    #[test]
    fn rejects_when_no_account_matches() {
        let ctx = context();
        let signature = Signature {
            ts: "1704908010".to_string(),
            v1: sign("some-other-secret", &manifest("12345", "req-1", "1704908010")),
        };
        assert_eq!(
            verify(&ctx, &signature, "req-1", "12345"),
            Err(Error::Mismatch)
        );
    }

    #[test]
    fn rejects_non_hex_and_wrong_length_digests() {
        let ctx = context();
        let signature = Signature {
            ts: "1704908010".to_string(),
            v1: "not-hex".to_string(),
        };
        assert_eq!(
            verify(&ctx, &signature, "req-1", "12345"),
            Err(Error::Mismatch)
        );

        let signature = Signature {
            ts: "1704908010".to_string(),
            v1: "deadbeef".to_string(),
        };
        assert_eq!(
            verify(&ctx, &signature, "req-1", "12345"),
            Err(Error::Mismatch)
        );
    }

    #[test]
    fn sjp_takes_precedence_when_both_secrets_coincide() {
        let mut ctx = context();
        ctx.amarela.webhook_secret = Some("secret-sjp".to_string());

        let signature = Signature {
            ts: "1704908010".to_string(),
            v1: sign("secret-sjp", &manifest("12345", "req-1", "1704908010")),
        };
        assert_eq!(verify(&ctx, &signature, "req-1", "12345"), Ok(Account::Sjp));
    }

    #[test]
    fn skips_accounts_with_no_configured_secret() {
        let mut ctx = context();
        ctx.sjp.webhook_secret = None;

        let manifest = manifest("12345", "req-1", "1704908010");
        let signature = Signature {
            ts: "1704908010".to_string(),
            v1: sign("secret-amarela", &manifest),
        };
        assert_eq!(
            verify(&ctx, &signature, "req-1", "12345"),
            Ok(Account::Amarela)
        );
    }
}
