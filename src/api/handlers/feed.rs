//! `/conta-corrente/feed` - commitments and payments in one filtered list.

use crate::{
    api::{AppState, data},
    core::{commitment, customer, feed, filter, payment},
    errors::Result,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

pub async fn feed(
    State(state): State<AppState>,
    Query(filters): Query<filter::FeedFilters>,
) -> Result<impl IntoResponse> {
    let commitments = commitment::all_commitments(&state.db).await?;
    let payments = payment::all_payments(&state.db).await?;
    let customers = customer::all_customers(&state.db).await?;

    let entries = feed::build_feed(&commitments, &payments, &customers);
    let filtered = filter::apply_filters(&entries, &filters);
    tracing::debug!(
        total = entries.len(),
        shown = filtered.len(),
        "Feed built"
    );
    Ok(data(filtered))
}
