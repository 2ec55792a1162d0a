/// Authentication service tests
/// Tests JWT generation, password hashing, token validation
use harmony_core::types::UserId;
use harmony_server::services::auth::{AuthService, TokenType};

fn create_test_auth_service() -> AuthService {
    AuthService::new("test-secret-key".to_string(), 1, 7).with_bcrypt_cost(4)
}

/// Test password hashing produces valid bcrypt hashes
#[test]
fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let password = "MySecurePassword123!";
    let hash = auth_service.hash_password(password).unwrap();

    // Verify hash format (bcrypt starts with $2b$ or $2a$)
    assert!(hash.starts_with("$2b$") || hash.starts_with("$2a$"));

    // Verify the hash is different each time (salt is random)
    let hash2 = auth_service.hash_password(password).unwrap();
    assert_ne!(hash, hash2, "Hashes should differ due to random salt");

    assert!(auth_service.verify_password(password, &hash2).unwrap());
}

/// Test claims carry the user id and token type
#[test]
fn test_claims_contents() {
    let auth_service = create_test_auth_service();

    let token = auth_service.create_access_token(UserId::new(42)).unwrap();
    let claims = auth_service.verify_token(&token).unwrap();

    assert_eq!(claims.sub, "42");
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.exp - claims.iat, 3600);
}

/// Test refresh tokens outlive access tokens
#[test]
fn test_refresh_expiration() {
    let auth_service = create_test_auth_service();

    let token = auth_service.create_refresh_token(UserId::new(1)).unwrap();
    let claims = auth_service.verify_token(&token).unwrap();

    assert_eq!(claims.token_type, TokenType::Refresh);
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
}

/// Test tokens signed with another secret are rejected
#[test]
fn test_wrong_secret_rejected() {
    let issuer = AuthService::new("one-secret".to_string(), 1, 1);
    let verifier = AuthService::new("other-secret".to_string(), 1, 1);

    let token = issuer.create_access_token(UserId::new(7)).unwrap();
    assert!(verifier.verify_access_token(&token).is_err());
}

/// Test garbage tokens are rejected
#[test]
fn test_malformed_token_rejected() {
    let auth_service = create_test_auth_service();
    assert!(auth_service.verify_access_token("not.a.token").is_err());
    assert!(auth_service.verify_access_token("").is_err());
}
