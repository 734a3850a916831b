//! HS256 access/refresh token handling.
//!
//! Access tokens authenticate API requests; refresh tokens are only accepted
//! by the refresh endpoint. The `token_type` claim keeps the two distinct.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID string).
    pub sub: String,
    pub username: String,
    pub token_type: TokenType,
    /// Issued-at (unix seconds).
    pub iat: usize,
    /// Expiry (unix seconds).
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Ok(Uuid::parse_str(&self.sub)?)
    }
}

/// Access + refresh token pair returned by login, register, and refresh.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub fn generate(
    user_id: Uuid,
    username: &str,
    token_type: TokenType,
    secret: &str,
    lifetime_seconds: i64,
) -> Result<String> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        token_type,
        iat: now,
        exp: now + lifetime_seconds as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Issue a fresh access + refresh pair for a user.
pub fn issue_pair(
    user_id: Uuid,
    username: &str,
    secret: &str,
    access_minutes: i64,
    refresh_days: i64,
) -> Result<TokenPair> {
    Ok(TokenPair {
        access: generate(
            user_id,
            username,
            TokenType::Access,
            secret,
            access_minutes * 60,
        )?,
        refresh: generate(
            user_id,
            username,
            TokenType::Refresh,
            secret,
            refresh_days * 86_400,
        )?,
    })
}

pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Verify a token and require a specific `token_type` claim.
pub fn verify_typed(token: &str, secret: &str, expected: TokenType) -> Result<Claims> {
    let claims = verify(token, secret)?;
    if claims.token_type != expected {
        anyhow::bail!("Unexpected token type");
    }
    Ok(claims)
}
