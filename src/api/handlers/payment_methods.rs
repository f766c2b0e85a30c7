//! `/formas-pagamento`

use super::categories::IncludeInactiveParams;
use crate::{
    api::{AppState, created, data},
    core::payment_method::{self, PaymentMethodInput},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> Result<impl IntoResponse> {
    Ok(data(
        payment_method::list_payment_methods(&state.db, params.incluir_inativos).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<impl IntoResponse> {
    Ok(created(
        payment_method::create_payment_method(&state.db, input).await?,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<impl IntoResponse> {
    Ok(data(
        payment_method::update_payment_method(&state.db, &id, input).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    payment_method::delete_payment_method(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
