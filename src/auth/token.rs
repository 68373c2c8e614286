use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::auth::domain::{App, Claims, User};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("application signing secret is empty")]
    EmptySecret,

    #[error("token ttl must be positive, got {0}")]
    NonPositiveTtl(Duration),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Issues an HS256 token for `user`, scoped to `app`, valid for `ttl` from now.
pub fn new_token(user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
    new_token_at(user, app, ttl, OffsetDateTime::now_utc())
}

/// Same as [`new_token`] with an explicit issuance time.
pub fn new_token_at(
    user: &User,
    app: &App,
    ttl: Duration,
    issued_at: OffsetDateTime,
) -> Result<String, TokenError> {
    if app.secret.is_empty() {
        return Err(TokenError::EmptySecret);
    }
    if !ttl.is_positive() {
        return Err(TokenError::NonPositiveTtl(ttl));
    }

    let claims = Claims {
        uid: user.id,
        email: user.email.clone(),
        appid: app.id,
        exp: (issued_at + ttl).unix_timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(app.secret.as_bytes()),
    )?;
    Ok(token)
}

/// Checks signature and expiry (no leeway) and returns the embedded claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::EmptySecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
