//! `/conta-corrente/pagamentos`

use crate::{
    api::{AppState, actor::Actor, created, data},
    core::{
        ledger::NewPayment,
        payment::{self, PaymentQuery},
    },
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> Result<impl IntoResponse> {
    Ok(data(payment::list_payments(&state.db, &query).await?))
}

pub async fn list_for_commitment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(data(payment::list_payments_for_commitment(&state.db, &id).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let item = payment::get_payment_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| Error::not_found("Pagamento", id))?;
    Ok(data(item))
}

/// Registers a payment; the response carries both the payment and the updated commitment.
pub async fn register(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<NewPayment>,
) -> Result<impl IntoResponse> {
    let registration = payment::register_payment(&state.db, input, &actor.stamp()).await?;
    Ok(created(registration))
}

/// Deletes a payment; the response carries the recomputed commitment.
pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(data(payment::delete_payment(&state.db, &id, &actor.stamp()).await?))
}
