//! `/clientes` - CRM records plus CSV import and export.

use crate::{
    api::{AppState, created, data},
    core::customer::{self, CustomerInput, CustomerQuery},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Result<impl IntoResponse> {
    Ok(data(customer::list_customers(&state.db, &query).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> Result<impl IntoResponse> {
    Ok(created(customer::create_customer(&state.db, input).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let item = customer::get_customer_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| Error::not_found("Cliente", id))?;
    Ok(data(item))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CustomerInput>,
) -> Result<impl IntoResponse> {
    Ok(data(customer::update_customer(&state.db, &id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    customer::delete_customer(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Accepts the CSV file as the raw request body.
pub async fn import(State(state): State<AppState>, body: String) -> Result<impl IntoResponse> {
    Ok(data(customer::import_customers(&state.db, &body).await?))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let csv = customer::export_customers(&state.db).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"clientes.csv\"",
            ),
        ],
        csv,
    ))
}
