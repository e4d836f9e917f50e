// ==========================
// tests/unit/error_tests.rs
// ==========================
use axum::http::StatusCode;
use axum::response::IntoResponse;
use conch_backend::error::AppError;
use conch_backend::storage::StoreError;
use conch_backend::validation::ValidationReport;
use conch_common::ErrorBody;

async fn body_of(error: AppError) -> (StatusCode, ErrorBody) {
    let response = error.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_validation_error_lists_every_message() {
    let mut report = ValidationReport::new();
    report.add("Error: Fname can't be empty");
    report.add("Error: Password must contain one or more digits");

    let (status, body) = body_of(AppError::Validation(report)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.status, 400);
    assert_eq!(body.messages.len(), 2);
    assert_eq!(body.messages[1], "Error: Password must contain one or more digits");
}

#[tokio::test]
async fn test_conflict_from_store_is_bad_request() {
    let (status, body) = body_of(StoreError::Conflict("username").into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.messages, vec!["Error: duplicate username"]);
}

#[tokio::test]
async fn test_rate_limited_response() {
    let (status, body) = body_of(AppError::AuthRateLimited).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body.status, 429);
}

#[test]
fn test_error_codes_are_distinct_for_auth_failures() {
    assert_ne!(
        AppError::Unauthorized("unauthorized".into()).error_code(),
        AppError::InvalidCredentials.error_code()
    );
    assert_eq!(AppError::InvalidCredentials.to_string(), "Error: password is incorrect");
}
