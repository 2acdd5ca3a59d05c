//! Shared test harness for storage backend testing
//!
//! Provides record factories for [`Customer`] and [`Transaction`] plus the
//! `data_service_tests!` macro that runs the `DataService` contract against
//! any backend.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;

use chrono::{DateTime, Duration, TimeZone, Utc};
use kyc::domain::{Currency, Customer, Transaction, TransactionType};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Customer factories
// ---------------------------------------------------------------------------

/// Create a customer with a random ID; `nik` is padded to 16 digits
pub fn create_test_customer(nik: &str, full_name: &str) -> Customer {
    let now = Utc::now();
    Customer {
        id: Uuid::new_v4(),
        nik: format!("{:0>16}", nik),
        full_name: full_name.to_string(),
        address: "Jl. Asia Afrika No. 8, Bandung".to_string(),
        avatar_url: None,
        join_date: Some(now),
        id_photo: None,
        created_at: now,
        updated_at: now,
    }
}

/// Generate `n` customers with distinct names and NIKs
pub fn sample_customers(n: usize) -> Vec<Customer> {
    (0..n)
        .map(|i| create_test_customer(&i.to_string(), &format!("Customer {}", i)))
        .collect()
}

// ---------------------------------------------------------------------------
// Transaction factories
// ---------------------------------------------------------------------------

/// Fixed timestamp so equality survives storage round-trips at any precision
pub fn fixed_time(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 7, 30, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn create_test_transaction(
    customer_id: Uuid,
    kind: TransactionType,
    amount: f64,
    currency: Currency,
) -> Transaction {
    let at = fixed_time(15);
    Transaction {
        id: Uuid::new_v4(),
        customer_id,
        timestamp: at,
        kind,
        amount,
        currency,
        source: "BCA 1234567890".to_string(),
        destination: "Mandiri 0987654321".to_string(),
        created_at: at,
        updated_at: at,
    }
}

/// Generate `n` transactions for one customer, cycling through the types
pub fn sample_transactions(customer_id: Uuid, n: usize) -> Vec<Transaction> {
    let kinds = [
        TransactionType::Deposit,
        TransactionType::Withdrawal,
        TransactionType::Transfer,
    ];
    (0..n)
        .map(|i| {
            let mut tx = create_test_transaction(
                customer_id,
                kinds[i % kinds.len()],
                100_000.0 * (i as f64 + 1.0),
                Currency::Idr,
            );
            tx.timestamp = fixed_time(1) + Duration::hours(i as i64);
            tx
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Assertions helpers
// ---------------------------------------------------------------------------

/// Assert that a list contains exactly `n` records.
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}
