/// Integration tests for auth-core JWT functionality
///
/// Covers token generation and validation, expiry handling, token-type
/// enforcement, and claims extraction.
use auth_core::jwt::{
    generate_access_token, get_user_id_from_token, initialize_jwt_secret, validate_token, Claims,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Once;
use uuid::Uuid;

// Test secret - FOR TESTING ONLY
const TEST_SECRET: &str = "unit-test-secret-do-not-use-in-production";

fn init_test_secret() {
    // The secret can only be set once per process; every test funnels
    // through this helper.
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        initialize_jwt_secret(TEST_SECRET).expect("failed to initialize test JWT secret");
    });
}

/// Encode arbitrary claims with the test secret, bypassing the library's
/// generation path. Used to craft expired and wrongly-typed tokens.
fn encode_raw(claims: &Claims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("failed to encode test token")
}

#[test]
fn test_access_token_round_trip() {
    init_test_secret();

    let user_id = Uuid::new_v4();
    let token = generate_access_token(user_id, "alice@example.com").unwrap();

    let token_data = validate_token(&token).unwrap();
    assert_eq!(token_data.claims.sub, user_id.to_string());
    assert_eq!(token_data.claims.email, "alice@example.com");
    assert_eq!(token_data.claims.token_type, "access");
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_user_id_extraction() {
    init_test_secret();

    let user_id = Uuid::new_v4();
    let token = generate_access_token(user_id, "bob@example.com").unwrap();

    assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
}

#[test]
fn test_expired_token_rejected() {
    init_test_secret();

    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        iat: (now - Duration::hours(2)).timestamp(),
        exp: (now - Duration::hours(1)).timestamp(),
        token_type: "access".to_string(),
        email: "stale@example.com".to_string(),
    };

    assert!(validate_token(&encode_raw(&claims)).is_err());
}

#[test]
fn test_non_access_token_rejected() {
    init_test_secret();

    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(30)).timestamp(),
        token_type: "refresh".to_string(),
        email: "refresh@example.com".to_string(),
    };

    assert!(validate_token(&encode_raw(&claims)).is_err());
}

#[test]
fn test_tampered_token_rejected() {
    init_test_secret();

    let token = generate_access_token(Uuid::new_v4(), "mallory@example.com").unwrap();

    // Flip a character inside the signature segment
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    assert!(validate_token(&tampered).is_err());
}

#[test]
fn test_garbage_token_rejected() {
    init_test_secret();

    assert!(validate_token("not-a-jwt").is_err());
    assert!(validate_token("").is_err());
}
