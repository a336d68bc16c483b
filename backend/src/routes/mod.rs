//! Route definitions for the Stockroom inventory API

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - ledgers and reports
        .merge(protected_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/session", get(handlers::current_session))
        .route("/sign-out", post(handlers::sign_out))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/sign-in", post(handlers::sign_in))
        .merge(protected)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/categories", category_routes())
        .nest("/inventory", inventory_routes())
        .nest("/sold", sold_routes())
        .nest("/checkout", checkout_routes())
        .route("/reports/summary", get(handlers::get_summary))
        .route("/admin/reset", post(handlers::reset_ledgers))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Category registry routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_categories).post(handlers::create_category),
    )
}

/// Stock ledger routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock).post(handlers::register_unit))
        .route("/next-id", get(handlers::preview_next_id))
        .route(
            "/:id",
            get(handlers::get_unit)
                .put(handlers::update_unit)
                .delete(handlers::delete_unit),
        )
        .route("/:id/label", get(handlers::get_label))
}

/// Sold ledger routes (protected)
fn sold_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sold))
        .route("/:id", delete(handlers::delete_sold))
}

/// Checkout routes (protected)
fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::checkout_unit))
        .route("/scan", post(handlers::scan_checkout))
}
