//! `/conta-corrente/compromissos`

use crate::{
    api::{AppState, actor::Actor, created, data},
    core::commitment::{self, CommitmentQuery, CommitmentUpdate, NewCommitment},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CommitmentQuery>,
) -> Result<impl IntoResponse> {
    let items = commitment::list_commitments(&state.db, &query).await?;
    Ok(data(items))
}

pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<NewCommitment>,
) -> Result<impl IntoResponse> {
    let item = commitment::create_commitment(&state.db, input, &actor.stamp()).await?;
    Ok(created(item))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let item = commitment::get_commitment_by_id(&*state.db, &id)
        .await?
        .ok_or_else(|| Error::not_found("Compromisso", id))?;
    Ok(data(item))
}

pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(changes): Json<CommitmentUpdate>,
) -> Result<impl IntoResponse> {
    let item = commitment::update_commitment(&state.db, &id, changes, &actor.stamp()).await?;
    Ok(data(item))
}

/// Deletes the commitment and its payments.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    commitment::delete_commitment(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
