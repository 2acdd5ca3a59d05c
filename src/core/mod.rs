//! Core module containing the traits and types shared by every layer

pub mod auth;
pub mod entity;
pub mod error;
pub mod events;
pub mod query;
pub mod service;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, IdentityProvider, Session, UserProfile};
pub use entity::Entity;
pub use error::{KycError, KycResult};
pub use events::{EventBus, EventEnvelope, RecordEvent};
pub use query::{CustomerQuery, Page, PaginatedResponse, PaginationMeta, TransactionQuery};
pub use service::DataService;
pub use validation::{FormInput, ValidatedJson};
