//! Customer endpoints

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::{
    parse_id, publish_created, publish_deleted, publish_updated, query_params, update_existing,
};
use crate::core::error::{EntityError, KycResult};
use crate::core::query::{CustomerQuery, PaginatedResponse};
use crate::core::validation::ValidatedJson;
use crate::domain::{
    Customer, CustomerDetail, CustomerInput, filter_customers, join_customers, newest_first,
};
use crate::server::state::AppState;

async fn load_customer(state: &AppState, id: uuid::Uuid) -> KycResult<Customer> {
    state
        .customers
        .get(&id)
        .await?
        .ok_or_else(|| EntityError::not_found::<Customer>(id).into())
}

/// `GET /customers?q=`
pub async fn list_customers(
    State(state): State<AppState>,
    query: Result<Query<CustomerQuery>, QueryRejection>,
) -> KycResult<Json<PaginatedResponse<Customer>>> {
    let params = query_params(query)?;
    let customers = state.customers.list().await?;
    let matched = filter_customers(customers, params.term());
    Ok(Json(params.page().paginate(matched)))
}

/// `POST /customers`
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<CustomerInput>,
) -> KycResult<(StatusCode, Json<Customer>)> {
    let customer = state.customers.create(Customer::from_input(form)).await?;

    tracing::info!(customer_id = %customer.id, "customer created");
    publish_created(&state.events, &customer);

    Ok((StatusCode::CREATED, Json(customer)))
}

/// `GET /customers/{id}`: the customer with its transactions, newest first
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> KycResult<Json<CustomerDetail>> {
    let id = parse_id(&id)?;
    let customer = load_customer(&state, id).await?;

    let mut transactions = state
        .transactions
        .search("customer_id", &id.to_string())
        .await?;
    newest_first(&mut transactions);
    let rows = join_customers(transactions, std::slice::from_ref(&customer), &state.format);

    Ok(Json(CustomerDetail::new(customer, rows, &state.format)))
}

/// `PUT /customers/{id}`
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(form): ValidatedJson<CustomerInput>,
) -> KycResult<Json<Customer>> {
    let id = parse_id(&id)?;
    let mut customer = load_customer(&state, id).await?;
    customer.apply(form);

    let customer = update_existing(state.customers.as_ref(), id, customer).await?;

    tracing::info!(customer_id = %id, "customer updated");
    publish_updated(&state.events, &customer);

    Ok(Json(customer))
}

/// `DELETE /customers/{id}`; transactions of the customer are kept
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> KycResult<StatusCode> {
    let id = parse_id(&id)?;
    if !state.customers.delete(&id).await? {
        return Err(EntityError::not_found::<Customer>(id).into());
    }

    tracing::info!(customer_id = %id, "customer deleted");
    publish_deleted::<Customer>(&state.events, id);

    Ok(StatusCode::NO_CONTENT)
}
