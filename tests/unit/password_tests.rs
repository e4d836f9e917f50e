// ============================
// tests/unit/password_tests.rs
// ============================
//! Credential hashing through the public hasher API
use conch_backend::auth::{CredentialHasher, HashError, ScryptHasher};
use conch_backend::error::AppError;

#[test]
fn test_password_hashing_and_verification() {
    let hasher = ScryptHasher::with_cost(4).unwrap();
    let hash = hasher.hash("Passw0rd").unwrap();

    // The stored bytes never contain the plaintext
    assert!(!String::from_utf8_lossy(&hash).contains("Passw0rd"));
    assert!(hasher.verify("Passw0rd", &hash).unwrap());
    assert!(!hasher.verify("Passw0rd!", &hash).unwrap());
}

#[test]
fn test_hash_verifies_across_hasher_instances() {
    let hash = ScryptHasher::with_cost(4).unwrap().hash("Passw0rd").unwrap();
    // Cost parameters travel inside the stored hash
    let other = ScryptHasher::with_cost(5).unwrap();
    assert!(other.verify("Passw0rd", &hash).unwrap());
}

#[test]
fn test_input_limit_is_configurable() {
    let hasher = ScryptHasher::new(4, 10).unwrap();
    assert_eq!(hasher.hash("Passw0rd123"), Err(HashError::InputTooLong(10)));
    assert!(hasher.hash("Passw0rd12").is_ok());
}

#[test]
fn test_hash_errors_map_to_status() {
    let err: AppError = HashError::InputTooLong(72).into();
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

    let err: AppError = HashError::Malformed("bad".into()).into();
    assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}
