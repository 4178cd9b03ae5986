//! Session token issuance.
//!
//! Tokens are JWTs signed with HMAC-SHA256 (`"alg": "HS256"`) using the
//! requesting app's secret as the key. The payload carries exactly these claims:
//!
//! | claim    | type   | meaning                                   |
//! |----------|--------|-------------------------------------------|
//! | `uid`    | i64    | user id                                   |
//! | `email`  | string | user email                                |
//! | `app_id` | i32    | app the token was issued to               |
//! | `exp`    | i64    | expiry, unix seconds (issue time + TTL)   |
//!
//! A token only verifies with the secret of the app it was issued to.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{App, User};

/// Signing algorithm for every issued token.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Clock skew tolerated when checking `exp`.
const VERIFY_LEEWAY_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i64,
    pub email: String,
    pub app_id: i32,
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("app {0} has an empty signing secret")]
    EmptySecret(i32),
    #[error("token ttl out of range")]
    InvalidTtl,
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("token rejected: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Issues a token for `user` scoped to `app`, valid for `ttl` from now.
pub fn new_token(app: &App, user: &User, ttl: Duration) -> Result<String, TokenError> {
    new_token_at(app, user, ttl, Utc::now())
}

/// Same as [`new_token`] with an explicit issue time.
pub fn new_token_at(app: &App, user: &User, ttl: Duration, now: DateTime<Utc>) -> Result<String, TokenError> {
    if app.secret.is_empty() {
        return Err(TokenError::EmptySecret(app.id));
    }
    let ttl = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::InvalidTtl)?;
    let exp = now.timestamp().checked_add(ttl).ok_or(TokenError::InvalidTtl)?;

    let claims = Claims { uid: user.id, email: user.email.clone(), app_id: app.id, exp };
    encode(&Header::new(TOKEN_ALGORITHM), &claims, &EncodingKey::from_secret(&app.secret))
        .map_err(TokenError::Signing)
}

/// Checks signature and expiry against an app secret and returns the claims.
/// Provided for consumers of the tokens; the core itself never verifies.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.leeway = VERIFY_LEEWAY_SECS;
    validation.set_required_spec_claims(&["exp"]);

    decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(TokenError::Invalid)
}
