//! `/vendas` and `/conta-corrente/resumo`

use crate::{
    api::{AppState, created, data},
    core::sales::{self, NewSale, ReportPeriod},
    errors::Result,
};
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

pub async fn list(
    State(state): State<AppState>,
    Query(period): Query<ReportPeriod>,
) -> Result<impl IntoResponse> {
    Ok(data(sales::list_sales(&state.db, &period).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewSale>,
) -> Result<impl IntoResponse> {
    Ok(created(sales::create_sale(&state.db, input).await?))
}

/// Commitment summary, sales total and ROI for the period.
pub async fn report(
    State(state): State<AppState>,
    Query(period): Query<ReportPeriod>,
) -> Result<impl IntoResponse> {
    Ok(data(sales::generate_report(&state.db, &period).await?))
}
