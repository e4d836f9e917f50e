// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP routing.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, invoices};
use crate::AppState;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", post(accounts::register).delete(accounts::delete_account))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/user", get(accounts::contact))
        .route("/user/invoices", get(invoices::list))
        .route("/invoices", post(invoices::create))
        .route(
            "/invoice/{id}",
            get(invoices::get)
                .put(invoices::replace)
                .patch(invoices::patch)
                .delete(invoices::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
