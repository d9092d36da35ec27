//! Macro-generated test suite for `OrderStore` contract validation.
//!
//! The `order_store_tests!` macro generates a test module that validates any
//! `OrderStore` implementation: id and timestamp assignment, lookups of
//! unknown ids, listing order, delete reporting, the amount bounds and
//! concurrent creates.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use orders::storage::InMemoryOrderStore;
//!
//! order_store_tests!(InMemoryOrderStore::new());
//! ```

/// Generate an `OrderStore` conformance test suite.
///
/// `$factory` is re-evaluated for each test. For the concurrent test the
/// returned store must also be `Clone + 'static` (shared state behind an Arc).
#[macro_export]
macro_rules! order_store_tests {
    ($factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use orders::core::error::PersistenceError;
            use orders::core::order::Amount;
            use orders::core::service::OrderStore;
            use uuid::Uuid;

            // ==================================================================
            // Create & Get
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let store = $factory;
                let before = chrono::Utc::now() - chrono::Duration::seconds(5);

                let created = store
                    .create(new_order("Alice", "Keyboard", 49_99))
                    .await
                    .unwrap();
                assert_eq!(created.customer_name, "Alice");
                assert_eq!(created.product, "Keyboard");
                assert_eq!(created.amount, Amount::from_cents(49_99));
                assert!(created.created_at >= before);

                let fetched = store.get_by_id(&created.id).await.unwrap();
                let fetched = fetched.expect("order should exist after create");
                assert_eq!(fetched.id, created.id);
                assert_eq!(fetched.customer_name, "Alice");
                assert_eq!(fetched.amount, Amount::from_cents(49_99));
            }

            #[tokio::test]
            async fn test_create_assigns_distinct_ids() {
                let store = $factory;
                let a = store.create(new_order("Alice", "Mouse", 10_00)).await.unwrap();
                let b = store.create(new_order("Alice", "Mouse", 10_00)).await.unwrap();
                assert_ne!(a.id, b.id, "identical payloads still get distinct ids");
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                let result = store.get_by_id(&Uuid::new_v4()).await.unwrap();
                assert!(result.is_none());
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_get_all_empty() {
                let store = $factory;
                assert!(store.get_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_get_all_most_recent_first() {
                let store = $factory;
                let mut ids = Vec::new();
                for name in ["First", "Second", "Third"] {
                    let created = store.create(new_order(name, "Lamp", 5_00)).await.unwrap();
                    ids.push(created.id);
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                }

                let all = store.get_all().await.unwrap();
                assert_eq!(all.len(), 3);
                assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
                assert_eq!(all[0].id, ids[2], "newest order should come first");
                assert_eq!(all[2].id, ids[0], "oldest order should come last");
            }

            // ==================================================================
            // Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let created = store.create(new_order("Bob", "Desk", 150_00)).await.unwrap();

                assert!(store.delete_by_id(&created.id).await.unwrap());
                assert!(store.get_by_id(&created.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                assert!(!store.delete_by_id(&Uuid::new_v4()).await.unwrap());
            }

            #[tokio::test]
            async fn test_delete_twice() {
                let store = $factory;
                let created = store.create(new_order("Bob", "Chair", 80_00)).await.unwrap();

                assert!(store.delete_by_id(&created.id).await.unwrap());
                assert!(!store.delete_by_id(&created.id).await.unwrap());
            }

            // ==================================================================
            // Constraints
            // ==================================================================

            #[tokio::test]
            async fn test_amount_below_minimum_rejected() {
                let store = $factory;
                let err = store
                    .create(new_order("Carol", "Pen", 0))
                    .await
                    .unwrap_err();

                assert!(
                    matches!(err, PersistenceError::ConstraintViolation { .. }),
                    "expected constraint violation, got {err:?}"
                );
                assert!(store.get_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_minimum_amount_accepted() {
                let store = $factory;
                let created = store.create(new_order("Carol", "Pen", 1)).await.unwrap();
                assert_eq!(created.amount, Amount::MIN);
            }

            #[tokio::test]
            async fn test_maximum_amount_accepted() {
                let store = $factory;
                let created = store
                    .create(new_order("Carol", "Yacht", Amount::MAX.cents()))
                    .await
                    .unwrap();
                assert_eq!(created.amount, Amount::MAX);

                let fetched = store.get_by_id(&created.id).await.unwrap().unwrap();
                assert_eq!(fetched.amount, Amount::MAX);
            }

            #[tokio::test]
            async fn test_amount_above_maximum_rejected() {
                let store = $factory;
                let err = store
                    .create(new_order("Carol", "Yacht", Amount::MAX.cents() + 1))
                    .await
                    .unwrap_err();

                assert!(
                    matches!(err, PersistenceError::ConstraintViolation { .. }),
                    "expected constraint violation, got {err:?}"
                );
                assert!(store.get_all().await.unwrap().is_empty());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates() {
                let store = $factory;

                let handles: Vec<_> = (0..8)
                    .map(|i| {
                        let store = store.clone();
                        tokio::spawn(async move {
                            store
                                .create(new_order(&format!("Customer {i}"), "Cable", 3_00))
                                .await
                        })
                    })
                    .collect();

                let results = tokio::time::timeout(
                    std::time::Duration::from_secs(30),
                    futures_util::future::join_all(handles),
                )
                .await
                .expect("Concurrent creates timed out after 30s, possible deadlock");

                let mut ids: Vec<Uuid> = results
                    .into_iter()
                    .map(|r| r.unwrap().unwrap().id)
                    .collect();
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), 8, "every concurrent create gets its own id");

                assert_eq!(store.get_all().await.unwrap().len(), 8);
            }
        }
    };
}
