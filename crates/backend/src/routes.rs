use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::domain::a001_invoice::repository::InvoiceStore;
use crate::shared::cache::RevisionRegistry;
use crate::system::auth::AuthSettings;
use crate::{handlers, system};

/// Shared state of all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvoiceStore>,
    pub cache: Arc<RevisionRegistry>,
    pub auth: Arc<AuthSettings>,
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM ROUTES
        // ========================================
        .route(
            "/api/system/auth/dev-token",
            post(system::handlers::auth::dev_token),
        )
        .route(
            "/api/system/revisions/:page_key",
            get(system::handlers::revisions::get_revision).layer(middleware::from_fn_with_state(
                state.clone(),
                system::auth::middleware::require_auth,
            )),
        )
        // ========================================
        // A001 INVOICES (auth required)
        // ========================================
        .route(
            "/api/a001/invoices",
            get(handlers::a001_invoice::list)
                .post(handlers::a001_invoice::create)
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    system::auth::middleware::require_auth,
                )),
        )
        .route(
            "/api/a001/invoices/:id",
            get(handlers::a001_invoice::get_by_id)
                .put(handlers::a001_invoice::update)
                .delete(handlers::a001_invoice::delete)
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    system::auth::middleware::require_auth,
                )),
        )
        .route(
            "/api/a001/invoices/:id/duplicate",
            post(handlers::a001_invoice::duplicate).layer(middleware::from_fn_with_state(
                state.clone(),
                system::auth::middleware::require_auth,
            )),
        )
        .with_state(state)
}
