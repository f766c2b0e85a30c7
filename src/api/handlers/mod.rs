//! Request handlers, one module per resource.

pub mod categories;
pub mod commitments;
pub mod customers;
pub mod feed;
pub mod payment_methods;
pub mod payments;
pub mod sales;

use axum::Json;
use serde_json::{Value, json};

/// Liveness check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
