//! Macro-generated test suite for `DataService<Category>` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use storefront::storage::InMemoryDataService;
//!
//! data_service_tests!(InMemoryDataService::<Category>::new());
//! ```
//!
//! # Generated Tests
//!
//! - `test_create_and_get`, `test_get_nonexistent`
//! - `test_list_multiple`
//! - `test_update_existing`, `test_update_nonexistent`
//! - `test_delete_existing`
//! - `test_search_string_field`, `test_search_boolean_field`,
//!   `test_search_integer_field`, `test_search_no_results`
//! - `test_create_duplicate_id`

/// Generate a `DataService<Category>` conformance test suite.
///
/// `$factory` is re-evaluated for each test and must yield an empty store.
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use storefront::core::entity::{Data, Entity};
            use storefront::core::service::DataService;
            use uuid::Uuid;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;
                let record = category("Winter Wear");
                let id = record.id;

                let created = service.create(record.clone()).await.unwrap();
                assert_eq!(created.id(), id);
                assert_eq!(created.name(), "Winter Wear");
                assert_eq!(created.entity_type(), "category");

                let fetched = service.get(&id).await.unwrap().unwrap();
                assert_eq!(fetched, record);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                assert!(service.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_multiple() {
                let service = $factory;
                for record in categories(&["A", "B", "C", "D", "E"]) {
                    service.create(record).await.unwrap();
                }
                assert_eq!(service.list().await.unwrap().len(), 5);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let mut record = service.create(category("Shoes")).await.unwrap();
                record.name = "Footwear".to_string();
                record.order = 3;

                service.update(&record.id, record.clone()).await.unwrap();
                let fetched = service.get(&record.id).await.unwrap().unwrap();
                assert_eq!(fetched.name, "Footwear");
                assert_eq!(fetched.order, 3);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let record = category("Ghost");
                assert!(service.update(&record.id, record.clone()).await.is_err());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                let record = service.create(category("Bags")).await.unwrap();
                service.delete(&record.id).await.unwrap();
                assert!(service.get(&record.id).await.unwrap().is_none());
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_string_field() {
                let service = $factory;
                for record in categories(&["Kids Wear", "Home Decor"]) {
                    service.create(record).await.unwrap();
                }
                let found = service.search("slug", "home-decor").await.unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].name, "Home Decor");
            }

            #[tokio::test]
            async fn test_search_boolean_field() {
                let service = $factory;
                let mut records = categories(&["Shown", "Hidden"]);
                records[1].is_active = false;
                for record in records {
                    service.create(record).await.unwrap();
                }
                let hidden = service.search("is_active", "false").await.unwrap();
                assert_eq!(hidden.len(), 1);
                assert_eq!(hidden[0].name, "Hidden");
            }

            #[tokio::test]
            async fn test_search_integer_field() {
                let service = $factory;
                let mut records = categories(&["One", "Two"]);
                records[0].order = 1;
                records[1].order = 2;
                for record in records {
                    service.create(record).await.unwrap();
                }
                let second = service.search("order", "2").await.unwrap();
                assert_eq!(second.len(), 1);
                assert_eq!(second[0].name, "Two");
            }

            #[tokio::test]
            async fn test_search_no_results() {
                let service = $factory;
                service.create(category("Toys")).await.unwrap();
                assert!(service.search("slug", "garden").await.unwrap().is_empty());
            }

            // ==================================================================
            // Edge cases
            // ==================================================================

            #[tokio::test]
            async fn test_create_duplicate_id() {
                let service = $factory;
                let record = category("Once");
                service.create(record.clone()).await.unwrap();
                assert!(service.create(record).await.is_err());
            }
        }
    };
}
