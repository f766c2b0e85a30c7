//! `/categorias-conta-corrente`

use crate::{
    api::{AppState, created, data},
    core::category::{self, CategoryInput},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

/// `?incluirInativos=true` also lists inactive entries
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeInactiveParams {
    /// Include inactive entries
    #[serde(default)]
    pub incluir_inativos: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> Result<impl IntoResponse> {
    Ok(data(
        category::list_categories(&state.db, params.incluir_inativos).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse> {
    Ok(created(category::create_category(&state.db, input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse> {
    Ok(data(category::update_category(&state.db, &id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    category::delete_category(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
