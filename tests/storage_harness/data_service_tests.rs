//! Macro-generated test suite for `DataService` contract validation.
//!
//! The `data_service_tests!` macro generates a test module that validates a
//! customer store and a transaction store against the full contract: CRUD
//! operations, equality search, edge cases and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use kyc::storage::InMemoryDataService;
//!
//! data_service_tests!(
//!     InMemoryDataService::<Customer>::new(),
//!     InMemoryDataService::<Transaction>::new()
//! );
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get` - create then retrieve, verify all fields
//! - `test_get_nonexistent` - get with random UUID returns None
//! - `test_list_empty` / `test_list_multiple`
//! - `test_update_existing` / `test_update_nonexistent`
//! - `test_delete_existing` / `test_delete_nonexistent`
//!
//! ## Search
//! - `test_search_by_customer_id` - the customer detail lookup
//! - `test_search_by_type` - enum fields match their wire name
//! - `test_search_by_nik`, `test_search_no_results`, `test_search_unknown_field`
//!
//! ## Edge Cases
//! - `test_transaction_round_trip` - enum and amount fields survive storage
//! - `test_concurrent_access` - parallel creates from spawned tasks

/// Generate a full `DataService` conformance test suite.
///
/// `$customers` and `$transactions` must evaluate to services implementing
/// `DataService<Customer>` and `DataService<Transaction>`. They are
/// re-evaluated for each test to ensure isolation. For the concurrent access
/// test, the customer service must also implement `Clone + 'static`.
#[macro_export]
macro_rules! data_service_tests {
    ($customers:expr, $transactions:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use kyc::core::{DataService, Entity};
            use kyc::domain::{Currency, TransactionType};
            use uuid::Uuid;

            // ==================================================================
            // CRUD - Create & Get
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $customers;
                let customer = create_test_customer("3273010101900001", "Budi Santoso");
                let original_id = customer.id;

                let created = service.create(customer.clone()).await.unwrap();
                assert_eq!(created.id(), original_id);
                assert_eq!(created.nik, "3273010101900001");
                assert_eq!(created.full_name, "Budi Santoso");

                let retrieved = service.get(&original_id).await.unwrap();
                assert!(retrieved.is_some(), "Customer should exist after create");
                assert_eq!(retrieved.unwrap(), customer);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $customers;

                let result = service.get(&Uuid::new_v4()).await.unwrap();
                assert!(
                    result.is_none(),
                    "Getting a nonexistent record should return None"
                );
            }

            // ==================================================================
            // CRUD - List
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let service = $transactions;

                let all = service.list().await.unwrap();
                assert!(all.is_empty(), "List on empty store should return empty vec");
            }

            #[tokio::test]
            async fn test_list_multiple() {
                let service = $customers;
                let batch = sample_customers(5);
                let expected_ids: Vec<Uuid> = batch.iter().map(|c| c.id).collect();

                for customer in batch {
                    service.create(customer).await.unwrap();
                }

                let all = service.list().await.unwrap();
                assert_count(&all, 5);

                let returned_ids: Vec<Uuid> = all.iter().map(|c| c.id()).collect();
                for id in &expected_ids {
                    assert!(
                        returned_ids.contains(id),
                        "Listed customers should contain id {}",
                        id
                    );
                }
            }

            // ==================================================================
            // CRUD - Update
            // ==================================================================

            #[tokio::test]
            async fn test_update_existing() {
                let service = $customers;
                let mut customer = create_test_customer("1", "Siti Aminah");
                let id = customer.id;

                service.create(customer.clone()).await.unwrap();

                customer.full_name = "Siti Aminah Putri".to_string();
                customer.address = "Jl. Braga No. 10, Bandung".to_string();

                let updated = service.update(&id, customer).await.unwrap();
                assert_eq!(updated.full_name, "Siti Aminah Putri");

                let retrieved = service.get(&id).await.unwrap().unwrap();
                assert_eq!(retrieved.full_name, "Siti Aminah Putri");
                assert_eq!(retrieved.address, "Jl. Braga No. 10, Bandung");
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $transactions;
                let tx = create_test_transaction(
                    Uuid::new_v4(),
                    TransactionType::Deposit,
                    1000.0,
                    Currency::Idr,
                );
                let id = tx.id;

                let result = service.update(&id, tx).await;
                assert!(
                    result.is_err(),
                    "Updating a nonexistent record should return an error"
                );
                assert!(service.get(&id).await.unwrap().is_none());
            }

            // ==================================================================
            // CRUD - Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $customers;
                let customer = create_test_customer("2", "Andi Wijaya");
                let id = customer.id;

                service.create(customer).await.unwrap();
                assert!(service.delete(&id).await.unwrap());

                assert!(service.get(&id).await.unwrap().is_none());
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $customers;

                let deleted = service.delete(&Uuid::new_v4()).await.unwrap();
                assert!(!deleted, "Deleting an unknown id should report false");
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_by_customer_id() {
                let service = $transactions;
                let owner = Uuid::new_v4();
                let other = Uuid::new_v4();

                for tx in sample_transactions(owner, 3) {
                    service.create(tx).await.unwrap();
                }
                for tx in sample_transactions(other, 2) {
                    service.create(tx).await.unwrap();
                }

                let found = service
                    .search("customer_id", &owner.to_string())
                    .await
                    .unwrap();
                assert_count(&found, 3);
                assert!(found.iter().all(|tx| tx.customer_id == owner));
            }

            #[tokio::test]
            async fn test_search_by_type() {
                let service = $transactions;
                for tx in sample_transactions(Uuid::new_v4(), 6) {
                    service.create(tx).await.unwrap();
                }

                let deposits = service.search("type", "Deposit").await.unwrap();
                assert_count(&deposits, 2);
                assert!(deposits.iter().all(|tx| tx.kind == TransactionType::Deposit));
            }

            #[tokio::test]
            async fn test_search_by_nik() {
                let service = $customers;
                let target = create_test_customer("3273010101900002", "Dewi Lestari");
                service.create(target.clone()).await.unwrap();
                service
                    .create(create_test_customer("3", "Rudi Hartono"))
                    .await
                    .unwrap();

                let found = service.search("nik", "3273010101900002").await.unwrap();
                assert_count(&found, 1);
                assert_eq!(found[0].id, target.id);
            }

            #[tokio::test]
            async fn test_search_no_results() {
                let service = $customers;
                service
                    .create(create_test_customer("4", "Joko Susilo"))
                    .await
                    .unwrap();

                let found = service.search("full_name", "Nobody").await.unwrap();
                assert!(found.is_empty());
            }

            #[tokio::test]
            async fn test_search_unknown_field() {
                let service = $customers;
                service
                    .create(create_test_customer("5", "Agus Salim"))
                    .await
                    .unwrap();

                let found = service.search("no_such_field", "x").await.unwrap();
                assert!(found.is_empty());
            }

            // ==================================================================
            // Edge cases
            // ==================================================================

            #[tokio::test]
            async fn test_transaction_round_trip() {
                let service = $transactions;
                let tx = create_test_transaction(
                    Uuid::new_v4(),
                    TransactionType::Transfer,
                    250.75,
                    Currency::Usd,
                );

                service.create(tx.clone()).await.unwrap();
                let stored = service.get(&tx.id).await.unwrap().unwrap();

                assert_eq!(stored.kind, TransactionType::Transfer);
                assert_eq!(stored.currency, Currency::Usd);
                assert!((stored.amount - 250.75).abs() < f64::EPSILON);
                assert_eq!(stored.timestamp, tx.timestamp);
                assert_eq!(stored.source, tx.source);
            }

            #[tokio::test]
            async fn test_concurrent_access() {
                let service = $customers;

                let mut handles = Vec::new();
                for customer in sample_customers(10) {
                    let service = service.clone();
                    handles.push(tokio::spawn(async move {
                        service.create(customer).await.unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                assert_count(&service.list().await.unwrap(), 10);
            }
        }
    };
}
