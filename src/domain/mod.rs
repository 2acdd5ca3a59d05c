//! KYC records and the in-memory computations done over them

pub mod customer;
pub mod dashboard;
pub mod format;
pub mod transaction;

pub use customer::{Customer, CustomerDetail, CustomerInput, filter_customers};
pub use dashboard::{DashboardSummary, DayBucket, summarize};
pub use format::DisplayFormat;
pub use transaction::{
    Currency, Transaction, TransactionInput, TransactionType, TransactionView, UNKNOWN_CUSTOMER,
    join_customers, newest_first,
};
