//! Bearer tokens identifying the acting user.
//!
//! Sessions are issued elsewhere; this server only needs to know who is
//! writing so it can record `rev_user` and check ownership. Tokens are
//! HS256-signed and must name this site as their issuer.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reviews_core::types::UserId;
use serde::{Deserialize, Serialize};

/// Default issuer expected in every token.
const DEFAULT_ISSUER: &str = "reviews";
/// Default token lifetime in minutes.
const DEFAULT_TOKEN_TTL_MINS: i64 = 60;
/// Clock skew tolerated when checking `exp`, in seconds.
const LEEWAY_SECS: u64 = 30;

/// Payload of an actor token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorClaims {
    /// The acting user.
    pub sub: UserId,
    /// Role name; `"admin"` may change any document.
    pub role: String,
    pub iss: String,
    /// Expiry as a UTC Unix timestamp.
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared with the session service.
    pub secret: String,
    pub issuer: String,
    /// Lifetime of tokens issued by [`issue_token`].
    pub token_ttl_mins: i64,
}

impl JwtConfig {
    /// Load token settings from the environment.
    ///
    /// | Env Var              | Required | Default   |
    /// |----------------------|----------|-----------|
    /// | `JWT_SECRET`         | **yes**  | --        |
    /// | `JWT_ISSUER`         | no       | `reviews` |
    /// | `JWT_TOKEN_TTL_MINS` | no       | `60`      |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.into());

        let token_ttl_mins: i64 = std::env::var("JWT_TOKEN_TTL_MINS")
            .map(|v| v.parse().expect("JWT_TOKEN_TTL_MINS must be a valid i64"))
            .unwrap_or(DEFAULT_TOKEN_TTL_MINS);

        Self {
            secret,
            issuer,
            token_ttl_mins,
        }
    }
}

/// Sign a token for `actor`. Used by tooling and tests.
pub fn issue_token(
    actor: UserId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = ActorClaims {
        sub: actor,
        role: role.to_string(),
        iss: config.issuer.clone(),
        exp: iat + config.token_ttl_mins * 60,
        iat,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, issuer and expiry, returning the claims.
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<ActorClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.leeway = LEEWAY_SECS;

    decode::<ActorClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            token_ttl_mins: 5,
        }
    }

    fn sign(claims: &ActorClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_names_actor_and_role() {
        let actor = Uuid::new_v4();
        let token = issue_token(actor, "admin", &config()).unwrap();

        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, actor);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn expired_beyond_leeway_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = ActorClaims {
            sub: Uuid::new_v4(),
            role: "user".into(),
            iss: DEFAULT_ISSUER.into(),
            exp: now - 120,
            iat: now - 600,
        };
        assert!(verify_token(&sign(&claims, "unit-test-secret"), &config()).is_err());
    }

    #[test]
    fn foreign_issuer_or_secret_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = ActorClaims {
            sub: Uuid::new_v4(),
            role: "user".into(),
            iss: "someone-else".into(),
            exp: now + 60,
            iat: now,
        };
        assert!(verify_token(&sign(&claims, "unit-test-secret"), &config()).is_err());

        let token = issue_token(Uuid::new_v4(), "user", &config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".into(),
            ..config()
        };
        assert!(verify_token(&token, &other).is_err());
    }
}
