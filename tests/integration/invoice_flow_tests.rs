//! Invoice CRUD and ownership checks over HTTP
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::test_utils::{ann, bearer, login, register, send, setup_test_env};

async fn two_users(app: &axum::Router) -> (String, String) {
    register(app, &ann()).await;
    let mut bob = ann();
    bob.username = "bobross99".into();
    register(app, &bob).await;
    (
        login(app, "annlee01", "Passw0rd").await,
        login(app, "bobross99", "Passw0rd").await,
    )
}

fn bell() -> Value {
    json!({ "product": "Bell", "category": "Parts", "price": 12.5, "quantity": 2 })
}

#[tokio::test]
async fn test_create_list_get_delete() {
    let (app, _state, _dir) = setup_test_env();
    let (ann, _) = two_users(&app).await;
    let auth = bearer(&ann);

    let (status, body) = send(&app, Method::GET, "/user/invoices", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, created) = send(&app, Method::POST, "/invoices", Some(&auth), Some(bell())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["product"], "Bell");
    assert_eq!(created["user_id"], 1);
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/user/invoices", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let uri = format!("/invoice/{id}");
    let (status, body) = send(&app, Method::GET, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_foreign_invoice_is_unauthorized() {
    let (app, _state, _dir) = setup_test_env();
    let (ann, bob) = two_users(&app).await;

    let (_, created) =
        send(&app, Method::POST, "/invoices", Some(&bearer(&ann)), Some(bell())).await;
    let uri = format!("/invoice/{}", created["id"]);

    for method in [Method::GET, Method::DELETE] {
        let (status, _) = send(&app, method, &uri, Some(&bearer(&bob)), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _) = send(&app, Method::PUT, &uri, Some(&bearer(&bob)), Some(bell())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Bob's own list stays empty
    let (_, body) = send(&app, Method::GET, "/user/invoices", Some(&bearer(&bob)), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_put_and_patch() {
    let (app, _state, _dir) = setup_test_env();
    let (ann, _) = two_users(&app).await;
    let auth = bearer(&ann);

    let (_, created) = send(&app, Method::POST, "/invoices", Some(&auth), Some(bell())).await;
    let uri = format!("/invoice/{}", created["id"]);

    let replacement = json!({ "product": "Chain", "category": "Drive", "price": 30.0, "quantity": 1 });
    let (status, body) = send(&app, Method::PUT, &uri, Some(&auth), Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"], "Chain");
    assert_eq!(body["quantity"], 1);

    let (status, body) =
        send(&app, Method::PATCH, &uri, Some(&auth), Some(json!({ "quantity": 4 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"], "Chain");
    assert_eq!(body["category"], "Drive");
    assert_eq!(body["price"], 30.0);
    assert_eq!(body["quantity"], 4);

    let (status, body) =
        send(&app, Method::PATCH, &uri, Some(&auth), Some(json!({ "category": "Drive9" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["messages"][0], "Error: Category can't have any digits");
}

#[tokio::test]
async fn test_bad_requests() {
    let (app, _state, _dir) = setup_test_env();
    let (ann, _) = two_users(&app).await;
    let auth = bearer(&ann);

    let (status, body) = send(&app, Method::GET, "/invoice/abc", Some(&auth), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["messages"][0],
        "Bad Request: invoice id can't be converted to an integer"
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/invoices",
        Some(&auth),
        Some(json!({ "product": "Bell", "quantity": "two" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["messages"][0].as_str().unwrap().starts_with("Binding Error:"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/invoices",
        Some(&auth),
        Some(json!({ "product": "Bell", "category": "Parts", "price": 1200.0, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["messages"][0],
        "numeric field overflow, provide a value between 1.00 - 999.99"
    );
}

#[tokio::test]
async fn test_invoices_removed_with_account() {
    let (app, state, _dir) = setup_test_env();
    let (ann, _) = two_users(&app).await;
    let auth = bearer(&ann);
    send(&app, Method::POST, "/invoices", Some(&auth), Some(bell())).await;

    let creds = json!({ "username": "annlee01", "password": "Passw0rd" });
    let (status, _) = send(&app, Method::DELETE, "/users", Some(&auth), Some(creds)).await;
    assert_eq!(status, StatusCode::OK);

    use conch_backend::storage::Storage;
    assert!(state.storage.list_invoices(1).await.unwrap().is_empty());
    assert!(state.storage.find_invoice(1).await.is_err());
}
