/// Shared JWT validation module for Prism services
///
/// The identity provider issues HS256 bearer tokens signed with a shared
/// secret; this module is the single place that secret is held and the
/// single code path that validates tokens.
///
/// Services must call `initialize_jwt_secret()` during startup before any
/// JWT operation. The secret is stored once and is immutable afterwards.
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims carried by every Prism token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: only "access" tokens are accepted by services
    pub token_type: String,
    /// Email address of the authenticated user
    pub email: String,
}

/// Thread-safe global storage for the JWT keys
///
/// Initialized once at startup, never modified. OnceCell gives thread-safe
/// initialization without runtime locks.
static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Initialize the JWT secret
///
/// MUST be called during application startup before any JWT operation.
/// Can only be called once; subsequent calls return an error.
pub fn initialize_jwt_secret(secret: &str) -> Result<()> {
    if secret.trim().is_empty() {
        return Err(anyhow!("JWT secret must not be empty"));
    }

    JWT_ENCODING_KEY
        .set(EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    JWT_DECODING_KEY
        .set(DecodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT secret not initialized. Call initialize_jwt_secret() during startup.")
    })
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT secret not initialized. Call initialize_jwt_secret() during startup.")
    })
}

/// Generate a new access token
///
/// Access tokens have a short lifetime (1 hour). This is used by the
/// identity provider when issuing sessions and by test harnesses.
pub fn generate_access_token(user_id: Uuid, email: &str) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: "access".to_string(),
        email: email.to_string(),
    };

    let encoding_key = get_encoding_key()?;
    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

/// Validate and decode a JWT token
///
/// Verifies the HS256 signature, the expiration time, and that the token
/// is an access token. Refresh or otherwise-typed tokens are rejected.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))?;

    if token_data.claims.token_type != "access" {
        return Err(anyhow!(
            "Invalid token type: expected access, got {}",
            token_data.claims.token_type
        ));
    }

    Ok(token_data)
}

/// Extract the user ID from a validated token
///
/// Validates the token first. Never trust user IDs from unvalidated
/// sources.
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}
