//! Shared application state

use std::sync::Arc;

use crate::core::{DataService, EventBus, IdentityProvider};
use crate::domain::{Customer, DisplayFormat, Transaction};

/// State handed to every handler
///
/// All fields are cheap to clone; stores and the identity provider are
/// shared trait objects.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn DataService<Customer>>,
    pub transactions: Arc<dyn DataService<Transaction>>,
    pub identity: Arc<dyn IdentityProvider>,
    pub events: EventBus,
    pub format: DisplayFormat,

    /// When false, guarded routes accept requests without a session
    pub auth_required: bool,

    /// Size of the dashboard's recent transactions card
    pub recent_limit: usize,
}
