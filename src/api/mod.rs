//! HTTP API - the data gateway clients use for every resource.
//!
//! Resources follow one shape: `GET` lists (with `page`/`limit`/`search` and
//! resource-specific filters), `POST` creates, `PUT /{id}` updates, `DELETE /{id}` removes.
//! Successful bodies are wrapped as `{ "data": ... }`; errors are `{ "error", "code" }`.

pub mod actor;
pub mod error;
pub mod handlers;

use crate::config::app::ServerConfig;
use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared state available to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    /// Creates the handler state around a database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    /// Response payload
    pub data: T,
}

/// Wraps `data` in the response envelope.
pub fn data<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse { data })
}

/// Wraps `data` in the response envelope with `201 Created`.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<DataResponse<T>>) {
    (StatusCode::CREATED, Json(DataResponse { data }))
}

fn api_routes() -> Router<AppState> {
    use handlers::{categories, commitments, customers, feed, payment_methods, payments, sales};

    Router::new()
        .route(
            "/conta-corrente/compromissos",
            get(commitments::list).post(commitments::create),
        )
        .route(
            "/conta-corrente/compromissos/{id}",
            get(commitments::get_one)
                .put(commitments::update)
                .delete(commitments::delete),
        )
        .route(
            "/conta-corrente/compromissos/{id}/pagamentos",
            get(payments::list_for_commitment),
        )
        .route(
            "/conta-corrente/pagamentos",
            get(payments::list).post(payments::register),
        )
        .route(
            "/conta-corrente/pagamentos/{id}",
            get(payments::get_one).delete(payments::delete),
        )
        .route("/conta-corrente/feed", get(feed::feed))
        .route("/conta-corrente/resumo", get(sales::report))
        .route(
            "/categorias-conta-corrente",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categorias-conta-corrente/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/formas-pagamento",
            get(payment_methods::list).post(payment_methods::create),
        )
        .route(
            "/formas-pagamento/{id}",
            put(payment_methods::update).delete(payment_methods::delete),
        )
        .route("/clientes", get(customers::list).post(customers::create))
        .route("/clientes/import", post(customers::import))
        .route("/clientes/export", get(customers::export))
        .route(
            "/clientes/{id}",
            get(customers::get_one)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/vendas", get(sales::list).post(sales::create))
}

/// Builds the application router with its middleware stack.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
