//! Macro-generated suite checking that `OrderedCollection<Category>` keeps a
//! dense `1..N` order on top of a given storage backend.
//!
//! # Usage
//!
//! ```rust,ignore
//! ordered_collection_tests!(InMemoryDataService::<Category>::new());
//! ```

/// Generate the ordering suite for a `DataService<Category>` factory.
#[macro_export]
macro_rules! ordered_collection_tests {
    ($factory:expr) => {
        mod ordered_collection_contract_tests {
            use super::*;
            use std::sync::Arc;
            use storefront::core::{DataService, EntityError, ShopError};
            use storefront::entities::Category;
            use storefront::ordering::OrderedCollection;
            use storefront::ordering::plan::is_dense;

            async fn collection_of(labels: &[&str]) -> OrderedCollection<Category> {
                let collection = OrderedCollection::new(Arc::new($factory));
                for record in categories(labels) {
                    collection.insert_at(record, None).await.unwrap();
                }
                collection
            }

            async fn id_of(collection: &OrderedCollection<Category>, name: &str) -> uuid::Uuid {
                collection
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .find(|r| r.name == name)
                    .unwrap()
                    .id
            }

            #[tokio::test]
            async fn test_appends_are_dense() {
                let collection = collection_of(&["A", "B", "C"]).await;
                let listed = collection.list().await.unwrap();
                assert_eq!(names(&listed), vec!["A", "B", "C"]);
                assert_eq!(positions(&listed), vec![1, 2, 3]);
            }

            #[tokio::test]
            async fn test_insert_in_the_middle_shifts_the_tail() {
                let collection = collection_of(&["A", "B", "C"]).await;
                let listed = collection
                    .insert_at(category("X"), Some(2))
                    .await
                    .unwrap();
                assert_eq!(names(&listed), vec!["A", "X", "B", "C"]);
                assert_eq!(positions(&listed), vec![1, 2, 3, 4]);
            }

            #[tokio::test]
            async fn test_insert_is_clamped() {
                let collection = collection_of(&["A", "B"]).await;

                let listed = collection
                    .insert_at(category("Far"), Some(99))
                    .await
                    .unwrap();
                assert_eq!(names(&listed), vec!["A", "B", "Far"]);

                let listed = collection
                    .insert_at(category("Neg"), Some(-4))
                    .await
                    .unwrap();
                assert_eq!(names(&listed), vec!["Neg", "A", "B", "Far"]);
                assert!(is_dense(&listed));
            }

            #[tokio::test]
            async fn test_move_last_to_second() {
                let collection = collection_of(&["A", "B", "C", "D"]).await;
                let d = id_of(&collection, "D").await;

                let listed = collection.move_to(&d, 2).await.unwrap();
                assert_eq!(names(&listed), vec!["A", "D", "B", "C"]);
                assert_eq!(positions(&listed), vec![1, 2, 3, 4]);
            }

            #[tokio::test]
            async fn test_move_first_down() {
                let collection = collection_of(&["A", "B", "C", "D"]).await;
                let a = id_of(&collection, "A").await;

                let listed = collection.move_to(&a, 3).await.unwrap();
                assert_eq!(names(&listed), vec!["B", "C", "A", "D"]);
            }

            #[tokio::test]
            async fn test_move_to_current_position_writes_nothing() {
                let collection = collection_of(&["A", "B", "C"]).await;
                let before = collection.list().await.unwrap();
                let b = before[1].id;

                let after = collection.move_to(&b, 2).await.unwrap();
                assert_eq!(before, after);
            }

            #[tokio::test]
            async fn test_move_unknown_id_is_not_found() {
                let collection = collection_of(&["A"]).await;
                let err = collection.move_to(&uuid::Uuid::new_v4(), 1).await.unwrap_err();
                assert!(matches!(err, ShopError::Entity(EntityError::NotFound { .. })));
            }

            #[tokio::test]
            async fn test_remove_closes_gap_and_reinsert_restores() {
                let collection = collection_of(&["A", "B", "C", "D"]).await;
                let original = collection.list().await.unwrap();
                let b = original[1].clone();

                let listed = collection.remove(&b.id).await.unwrap();
                assert_eq!(names(&listed), vec!["A", "C", "D"]);
                assert_eq!(positions(&listed), vec![1, 2, 3]);

                let listed = collection.insert_at(b.clone(), Some(2)).await.unwrap();
                assert_eq!(names(&listed), names(&original));
                assert_eq!(positions(&listed), vec![1, 2, 3, 4]);
            }

            #[tokio::test]
            async fn test_normalize_repairs_drift() {
                let collection = collection_of(&["A", "B", "C"]).await;
                let listed = collection.list().await.unwrap();

                let mut c = listed[2].clone();
                let id = c.id;
                c.order = 10;
                collection.store().update(&id, c).await.unwrap();

                let listed = collection.normalize().await.unwrap();
                assert_eq!(names(&listed), vec!["A", "B", "C"]);
                assert_eq!(positions(&listed), vec![1, 2, 3]);
            }

            #[tokio::test]
            async fn test_mixed_sequence_stays_dense() {
                let collection = collection_of(&["A", "B", "C", "D", "E"]).await;
                let c = id_of(&collection, "C").await;
                let e = id_of(&collection, "E").await;

                collection.move_to(&e, 1).await.unwrap();
                collection.remove(&c).await.unwrap();
                collection
                    .insert_at(category("F"), Some(3))
                    .await
                    .unwrap();
                let a = id_of(&collection, "A").await;
                let listed = collection.move_to(&a, 99).await.unwrap();

                assert!(is_dense(&listed));
                assert_eq!(names(&listed), vec!["E", "F", "B", "D", "A"]);
            }
        }
    };
}
