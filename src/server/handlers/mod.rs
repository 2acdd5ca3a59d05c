//! HTTP handlers
//!
//! Each handler awaits one or two store calls, optionally filters or formats
//! the result in memory, and returns it. Mutations publish a [`RecordEvent`].

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod transactions;

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use uuid::Uuid;

use crate::core::error::{EntityError, KycResult, RequestError};
use crate::core::{DataService, Entity, EventBus, RecordEvent};

/// Parse a path segment as a record id
pub(crate) fn parse_id(raw: &str) -> KycResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        RequestError::InvalidEntityId {
            id: raw.to_string(),
        }
        .into()
    })
}

/// Unwrap query parameters, reporting malformed ones as a JSON error
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> KycResult<T> {
    query.map(|Query(params)| params).map_err(|e| {
        RequestError::InvalidQuery {
            message: e.body_text(),
        }
        .into()
    })
}

/// Store an edited record
///
/// A record deleted after it was loaded is reported as not found.
pub(crate) async fn update_existing<T: Entity>(
    service: &dyn DataService<T>,
    id: Uuid,
    record: T,
) -> KycResult<T> {
    match service.update(&id, record).await {
        Ok(updated) => Ok(updated),
        Err(e) => match service.get(&id).await {
            Ok(None) => Err(EntityError::not_found::<T>(id).into()),
            _ => Err(e.into()),
        },
    }
}

pub(crate) fn publish_created<T: Entity>(events: &EventBus, record: &T) {
    events.publish(RecordEvent::Created {
        entity_type: T::resource_name_singular().to_string(),
        entity_id: record.id(),
        data: serde_json::to_value(record).unwrap_or_default(),
    });
}

pub(crate) fn publish_updated<T: Entity>(events: &EventBus, record: &T) {
    events.publish(RecordEvent::Updated {
        entity_type: T::resource_name_singular().to_string(),
        entity_id: record.id(),
        data: serde_json::to_value(record).unwrap_or_default(),
    });
}

pub(crate) fn publish_deleted<T: Entity>(events: &EventBus, id: Uuid) {
    events.publish(RecordEvent::Deleted {
        entity_type: T::resource_name_singular().to_string(),
        entity_id: id,
    });
}
