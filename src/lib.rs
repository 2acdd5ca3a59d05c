//! # KYC Records
//!
//! A know-your-customer record keeping service: staff register customers,
//! record financial transactions against them, browse, search, edit and
//! delete both, and look at a small aggregate dashboard.
//!
//! ## Features
//!
//! - **Customers and transactions** stored in a document store (in-memory or MongoDB)
//! - **Declarative form validation**: NIK length, positive amounts, required references
//! - **id-ID formatting**: `Rp 1.500.000`, `15 Januari 2024`
//! - **Delegated authentication** through an [`IdentityProvider`](core::IdentityProvider)
//! - **Real-time feed** of record changes over a websocket
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kyc::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_customer_service(InMemoryDataService::<Customer>::new())
//!         .with_transaction_service(InMemoryDataService::<Transaction>::new())
//!         .with_identity_provider(InMemoryIdentityProvider::default())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, IdentityProvider, Session, UserProfile},
        entity::Entity,
        error::{KycError, KycResult},
        events::{EventBus, EventEnvelope, RecordEvent},
        service::DataService,
        validation::{FormInput, ValidatedJson},
    };

    // === Domain ===
    pub use crate::domain::{
        Currency, Customer, CustomerInput, DashboardSummary, DisplayFormat, Transaction,
        TransactionInput, TransactionType, TransactionView,
    };

    // === Storage ===
    pub use crate::storage::InMemoryDataService;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDataService;

    // === Identity providers ===
    pub use crate::auth::InMemoryIdentityProvider;
    #[cfg(feature = "remote-auth")]
    pub use crate::auth::RemoteIdentityProvider;

    // === Config ===
    pub use crate::config::KycConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
