//! Transaction endpoints

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::{
    parse_id, publish_created, publish_deleted, publish_updated, query_params, update_existing,
};
use crate::core::error::{EntityError, KycResult};
use crate::core::query::{PaginatedResponse, TransactionQuery};
use crate::core::validation::ValidatedJson;
use crate::domain::{
    Transaction, TransactionInput, TransactionView, UNKNOWN_CUSTOMER, join_customers, newest_first,
};
use crate::server::state::AppState;

async fn load_transaction(state: &AppState, id: uuid::Uuid) -> KycResult<Transaction> {
    state
        .transactions
        .get(&id)
        .await?
        .ok_or_else(|| EntityError::not_found::<Transaction>(id).into())
}

/// Join one transaction with its customer's name
async fn view(state: &AppState, transaction: Transaction) -> KycResult<TransactionView> {
    let customer_name = state
        .customers
        .get(&transaction.customer_id)
        .await?
        .map(|c| c.full_name)
        .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
    Ok(TransactionView::new(transaction, customer_name, &state.format))
}

/// `GET /transactions?type=&customer_id=`: newest first, joined with
/// customer names
pub async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> KycResult<Json<PaginatedResponse<TransactionView>>> {
    let params = query_params(query)?;

    let mut transactions = match params.customer_id {
        Some(customer_id) => {
            state
                .transactions
                .search("customer_id", &customer_id.to_string())
                .await?
        }
        None => state.transactions.list().await?,
    };
    if let Some(kind) = params.kind {
        transactions.retain(|tx| tx.kind == kind);
    }
    newest_first(&mut transactions);

    let customers = state.customers.list().await?;
    let rows = join_customers(transactions, &customers, &state.format);

    Ok(Json(params.page().paginate(rows)))
}

/// `POST /transactions`
pub async fn create_transaction(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<TransactionInput>,
) -> KycResult<(StatusCode, Json<Transaction>)> {
    let transaction = Transaction::from_input(form)?;
    let transaction = state.transactions.create(transaction).await?;

    tracing::info!(
        transaction_id = %transaction.id,
        customer_id = %transaction.customer_id,
        kind = transaction.kind.as_str(),
        "transaction recorded"
    );
    publish_created(&state.events, &transaction);

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// `GET /transactions/{id}`
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> KycResult<Json<TransactionView>> {
    let id = parse_id(&id)?;
    let transaction = load_transaction(&state, id).await?;
    Ok(Json(view(&state, transaction).await?))
}

/// `PUT /transactions/{id}`
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(form): ValidatedJson<TransactionInput>,
) -> KycResult<Json<Transaction>> {
    let id = parse_id(&id)?;
    let mut transaction = load_transaction(&state, id).await?;
    transaction.apply(form)?;

    let transaction = update_existing(state.transactions.as_ref(), id, transaction).await?;

    tracing::info!(transaction_id = %id, "transaction updated");
    publish_updated(&state.events, &transaction);

    Ok(Json(transaction))
}

/// `DELETE /transactions/{id}`
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> KycResult<StatusCode> {
    let id = parse_id(&id)?;
    if !state.transactions.delete(&id).await? {
        return Err(EntityError::not_found::<Transaction>(id).into());
    }

    tracing::info!(transaction_id = %id, "transaction deleted");
    publish_deleted::<Transaction>(&state.events, id);

    Ok(StatusCode::NO_CONTENT)
}
