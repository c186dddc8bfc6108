use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity::IdentityUser;

const EMAIL_CONFIRMATION: &str = "EmailConfirmation";
const EMAIL_CONFIRMATION_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct PurposeClaims {
    sub: String,
    purpose: String,
    stamp: String,
    exp: usize,
}

/// Signs and validates the session cookie payload and one-off account tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue_session(&self, user: &IdentityUser, ttl_secs: i64) -> anyhow::Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now as usize,
            exp: (now + ttl_secs.max(0)) as usize,
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    pub fn validate_session(&self, token: &str) -> Option<SessionClaims> {
        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .ok()
            .map(|data| data.claims)
    }

    pub fn issue_email_confirmation(&self, user: &IdentityUser) -> anyhow::Result<String> {
        let exp = chrono::Utc::now().timestamp() + EMAIL_CONFIRMATION_TTL_SECS;
        let claims = PurposeClaims {
            sub: user.id.to_string(),
            purpose: EMAIL_CONFIRMATION.into(),
            stamp: user.security_stamp.clone(),
            exp: exp as usize,
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    /// A code is valid only for the user it was issued to and only while the
    /// user's security stamp is unchanged.
    pub fn verify_email_confirmation(&self, user: &IdentityUser, code: &str) -> bool {
        let Ok(data) =
            jsonwebtoken::decode::<PurposeClaims>(code, &self.decoding, &Validation::default())
        else {
            return false;
        };
        let claims = data.claims;
        claims.purpose == EMAIL_CONFIRMATION
            && Uuid::parse_str(&claims.sub).ok() == Some(user.id)
            && claims.stamp == user.security_stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_user;

    #[test]
    fn session_round_trip() {
        let issuer = TokenIssuer::new("unit-test-secret");
        let user = sample_user("alice@example.com");
        let token = issuer.issue_session(&user, 3600).unwrap();
        let claims = issuer.validate_session(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "alice@example.com");
    }

    #[test]
    fn session_rejects_foreign_secret_and_expired_tokens() {
        let issuer = TokenIssuer::new("unit-test-secret");
        let other = TokenIssuer::new("another-secret");
        let user = sample_user("alice@example.com");

        let token = other.issue_session(&user, 3600).unwrap();
        assert!(issuer.validate_session(&token).is_none());

        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: 0,
            exp: 1,
        };
        let stale = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert!(issuer.validate_session(&stale).is_none());
        assert!(issuer.validate_session("garbage").is_none());
    }

    #[test]
    fn confirmation_code_is_bound_to_user_and_stamp() {
        let issuer = TokenIssuer::new("unit-test-secret");
        let user = sample_user("alice@example.com");
        let code = issuer.issue_email_confirmation(&user).unwrap();
        assert!(issuer.verify_email_confirmation(&user, &code));

        let other = sample_user("bob@example.com");
        assert!(!issuer.verify_email_confirmation(&other, &code));

        let mut restamped = user.clone();
        restamped.security_stamp = "changed".into();
        assert!(!issuer.verify_email_confirmation(&restamped, &code));
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let issuer = TokenIssuer::new("unit-test-secret");
        let user = sample_user("alice@example.com");
        let session = issuer.issue_session(&user, 3600).unwrap();
        let code = issuer.issue_email_confirmation(&user).unwrap();
        assert!(!issuer.verify_email_confirmation(&user, &session));
        assert!(issuer.validate_session(&code).is_none());
    }
}
