//! Dashboard endpoint

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::core::error::KycResult;
use crate::domain::{DashboardSummary, summarize};
use crate::server::state::AppState;

/// `GET /dashboard`
pub async fn dashboard(State(state): State<AppState>) -> KycResult<Json<DashboardSummary>> {
    let customers = state.customers.list().await?;
    let transactions = state.transactions.list().await?;

    Ok(Json(summarize(
        &customers,
        transactions,
        Utc::now(),
        state.recent_limit,
        &state.format,
    )))
}
