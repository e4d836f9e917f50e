//! Register, login, logout and account deletion over HTTP
use axum::http::{Method, StatusCode};
use conch_backend::storage::Storage;
use serde_json::json;

use crate::test_utils::{ann, basic, bearer, login, register, send, setup_test_env};

#[tokio::test]
async fn test_register_login_logout() {
    let (app, _state, _dir) = setup_test_env();

    let (status, body) = register(&app, &ann()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "registered");
    assert_eq!(body["user_id"], 1);

    let token = login(&app, "annlee01", "Passw0rd").await;
    assert_eq!(token.len(), 40);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    let (status, body) = send(&app, Method::GET, "/user", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fname"], "Ann");
    assert_eq!(body["address"], "12 Oak Rd");

    let (status, body) = send(&app, Method::POST, "/logout", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User: annlee01 has logged out");

    // The revoked token no longer authorizes anything
    let (status, _) = send(&app, Method::GET, "/user", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_reports_every_violation() {
    let (app, _state, _dir) = setup_test_env();
    let mut account = ann();
    account.password = "pass".into();

    let (status, body) = register(&app, &account).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);

    // Nothing was stored, so the same username can still register
    let (status, _) = register(&app, &ann()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_username_and_token() {
    let (app, _state, _dir) = setup_test_env();
    register(&app, &ann()).await;

    let (status, _) = register(&app, &ann()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    login(&app, "annlee01", "Passw0rd").await;
    let (status, body) =
        send(&app, Method::POST, "/login", Some(&basic("annlee01", "Passw0rd")), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["messages"][0],
        "Error: Duplicate User: cannot generate a new token if one already exist"
    );
}

#[tokio::test]
async fn test_login_failures() {
    let (app, _state, _dir) = setup_test_env();
    register(&app, &ann()).await;

    let (status, body) =
        send(&app, Method::POST, "/login", Some(&basic("nobody123", "Passw0rd")), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["messages"][0], "Error: username is incorrect");

    let (status, body) =
        send(&app, Method::POST, "/login", Some(&basic("annlee01", "Wr0ngpass")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["messages"][0], "Error: password is incorrect");

    let (status, _) = send(&app, Method::POST, "/login", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_repeated_failures_lock_the_username() {
    let (app, _state, _dir) = setup_test_env();
    register(&app, &ann()).await;

    // test settings lock after three failures
    for _ in 0..3 {
        send(&app, Method::POST, "/login", Some(&basic("annlee01", "Wr0ngpass")), None).await;
    }
    let (status, _) =
        send(&app, Method::POST, "/login", Some(&basic("annlee01", "Passw0rd")), None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_missing_and_unknown_tokens() {
    let (app, _state, _dir) = setup_test_env();

    let (status, _) = send(&app, Method::GET, "/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/user", Some(&bearer("0badc0de")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_account_requires_password() {
    let (app, state, _dir) = setup_test_env();
    register(&app, &ann()).await;
    let token = login(&app, "annlee01", "Passw0rd").await;

    let wrong = json!({ "username": "annlee01", "password": "Wr0ngpass" });
    let (status, _) =
        send(&app, Method::DELETE, "/users", Some(&bearer(&token)), Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Account, credential and token are untouched
    let (status, _) = send(&app, Method::GET, "/user", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);

    let right = json!({ "username": "annlee01", "password": "Passw0rd" });
    let (status, body) =
        send(&app, Method::DELETE, "/users", Some(&bearer(&token)), Some(right)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User: annlee01 has been deleted");

    assert!(state.storage.find_user_by_name("annlee01").await.is_err());
    let (status, _) = send(&app, Method::GET, "/user", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let (app, _state, dir) = setup_test_env();
    register(&app, &ann()).await;
    let token = login(&app, "annlee01", "Passw0rd").await;
    drop(app);

    let state = conch_backend::AppState::from_settings(crate::test_utils::test_settings(&dir)).unwrap();
    let app = conch_backend::router::create_router(std::sync::Arc::new(state));
    let (status, body) = send(&app, Method::GET, "/user", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lname"], "Lee");
}
