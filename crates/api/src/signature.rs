//! Activity event signature verification

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify the signature on an inbound activity event
///
/// `signature` is the value of the `X-Signature-256` header, formatted as
/// `sha256=<hex digest>` over the raw request body with the shared
/// `EVENT_SECRET`.
pub fn verify_signature(signature: &str, secret: &str, body: &[u8]) -> bool {
    let signature = match signature.strip_prefix("sha256=") {
        Some(s) => s,
        None => return false,
    };

    let signature_bytes = match hex::decode(signature) {
        Ok(b) => b,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };

    mac.update(body);
    mac.verify_slice(&signature_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_signature() {
        let secret = "ranking-secret";
        let body = br#"{"organization_id":"00000000-0000-0000-0000-000000000001","type":"login"}"#;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let signature = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

        assert!(verify_signature(&signature, secret, body));
    }

    #[test]
    fn test_rejects_tampered_body() {
        let secret = "ranking-secret";
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(b"original");
        let signature = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

        assert!(!verify_signature(&signature, secret, b"tampered"));
    }

    #[test]
    fn test_rejects_malformed_signature() {
        assert!(!verify_signature("sha256=zz", "secret", b"body"));
        assert!(!verify_signature("md5=abcd", "secret", b"body"));
    }
}
