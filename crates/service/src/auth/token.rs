//! HS256 JSON Web Tokens.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::ServiceError;

type HmacSha256 = Hmac<Sha256>;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct Header {
    alg: String,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"***")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self { secret: secret.as_bytes().to_vec(), ttl_secs }
    }

    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, ServiceError> {
        self.issue_at(user_id, username, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: i64, username: &str, now: i64) -> Result<String, ServiceError> {
        let claims = Claims {
            sub: user_id,
            username: username.to_owned(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| ServiceError::Internal(format!("encoding token claims: {e}")))?;
        let signing_input =
            format!("{}.{}", URL_SAFE_NO_PAD.encode(HEADER), URL_SAFE_NO_PAD.encode(payload));
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes())?);
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Check signature, algorithm, and expiry; return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, ServiceError> {
        let invalid = || ServiceError::Unauthorized("invalid token".to_owned());

        let mut parts = token.trim().split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| invalid())?;
        let mut mac = self.mac()?;
        mac.update(format!("{header}.{payload}").as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let header: Header = URL_SAFE_NO_PAD
            .decode(header)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or_else(invalid)?;
        if header.alg != "HS256" {
            return Err(invalid());
        }

        let claims: Claims = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or_else(invalid)?;
        if claims.exp <= now {
            return Err(ServiceError::Unauthorized("token expired".to_owned()));
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, ServiceError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| ServiceError::Internal(format!("hmac key: {e}")))
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, ServiceError> {
        let mut mac = self.mac()?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::new("secret", 3600);
        let token = signer.issue_at(7, "aria", NOW).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = signer.verify_at(&token, NOW + 10).unwrap();
        assert_eq!(claims, Claims { sub: 7, username: "aria".into(), iat: NOW, exp: NOW + 3600 });
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = TokenSigner::new("secret", 60);
        let token = signer.issue_at(7, "aria", NOW).unwrap();
        let err = signer.verify_at(&token, NOW + 60).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(msg) if msg == "token expired"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenSigner::new("secret", 60).issue_at(7, "aria", NOW).unwrap();
        let other = TokenSigner::new("another", 60);
        assert!(matches!(other.verify_at(&token, NOW), Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = TokenSigner::new("secret", 60);
        let token = signer.issue_at(7, "aria", NOW).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD
            .encode(format!(r#"{{"sub":1,"username":"admin","iat":{NOW},"exp":{}}}"#, NOW + 60));
        let tampered = format!("{}.{forged}.{}", parts[0], parts[2]);
        assert!(signer.verify_at(&tampered, NOW).is_err());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let signer = TokenSigner::new("secret", 60);
        for token in ["", "abc", "a.b", "a.b.c.d", "!!.??.**"] {
            assert!(signer.verify_at(token, NOW).is_err(), "{token:?} should be rejected");
        }
    }
}
