/// End-to-end tests for the vertex store
///
/// Exercises the full workflow — create, query by identifier set, update,
/// delete, transactions — against both storage backends.

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use vertexdb::{
    MemoryStorage, RocksDbStorage, SharedStorage, StorageError, VertexQuery, VertexStorage,
    VertexTransaction,
};

fn backends() -> Vec<(SharedStorage, Option<TempDir>)> {
    let temp_dir = TempDir::new().unwrap();
    let rocks = RocksDbStorage::new(temp_dir.path(), "test_graph").unwrap();
    vec![
        (Arc::new(MemoryStorage::new()) as SharedStorage, None),
        (Arc::new(rocks) as SharedStorage, Some(temp_dir)),
    ]
}

/// Create a vertex of type "foo", query by its returned id, assert exactly
/// one result with that label.
#[tokio::test]
async fn test_create_then_query_by_id() {
    for (storage, _temp) in backends() {
        let mut tx = storage.begin_transaction().await.unwrap();

        let created = tx.create_vertex("foo", json!({})).await.unwrap();
        let found = tx
            .get_vertices(&VertexQuery::vertices([created.id]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1, "expected exactly one result");
        assert_eq!(found[0].id, created.id);
        assert_eq!(found[0].label, "foo");

        tx.commit().await.unwrap();

        // Still there through a fresh transaction
        let tx = storage.begin_transaction().await.unwrap();
        let found = tx
            .get_vertices(&VertexQuery::vertices([created.id]))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, "foo");
    }
}

#[tokio::test]
async fn test_unknown_id_returns_empty() {
    for (storage, _temp) in backends() {
        let known = storage.create_vertex("Person", json!({})).await.unwrap();
        storage.delete_vertex(known.id).await.unwrap();

        let found = storage
            .get_vertices(&VertexQuery::vertices([known.id]))
            .await
            .unwrap();
        assert!(found.is_empty(), "absent id must be omitted, not an error");
    }
}

#[tokio::test]
async fn test_rollback_leaves_no_trace() {
    for (storage, _temp) in backends() {
        let mut tx = storage.begin_transaction().await.unwrap();
        let vertex = tx.create_vertex("Person", json!({})).await.unwrap();
        tx.rollback().await.unwrap();

        let tx = storage.begin_transaction().await.unwrap();
        let found = tx
            .get_vertices(&VertexQuery::vertices([vertex.id]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}

#[tokio::test]
async fn test_identifiers_distinct_across_transactions() {
    for (storage, _temp) in backends() {
        let mut ids = Vec::new();

        for _ in 0..3 {
            let mut tx = storage.begin_transaction().await.unwrap();
            ids.push(tx.create_vertex("Person", json!({})).await.unwrap().id);
            ids.push(tx.create_vertex("Person", json!({})).await.unwrap().id);
            tx.commit().await.unwrap();
        }

        // A rolled-back transaction's identifiers stay burned too
        let mut tx = storage.begin_transaction().await.unwrap();
        ids.push(tx.create_vertex("Person", json!({})).await.unwrap().id);
        tx.rollback().await.unwrap();

        let mut tx = storage.begin_transaction().await.unwrap();
        ids.push(tx.create_vertex("Person", json!({})).await.unwrap().id);
        tx.commit().await.unwrap();

        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len(), "identifiers must be pairwise distinct");
    }
}

#[tokio::test]
async fn test_crud_workflow() {
    for (storage, _temp) in backends() {
        let alice = storage
            .create_vertex("Person", json!({"name": "Alice", "age": 30}))
            .await
            .unwrap();
        let bob = storage
            .create_vertex("Person", json!({"name": "Bob"}))
            .await
            .unwrap();
        let acme = storage
            .create_vertex("Company", json!({"name": "ACME"}))
            .await
            .unwrap();

        let found = storage
            .get_vertices(&VertexQuery::vertices([alice.id, bob.id, acme.id]))
            .await
            .unwrap();
        assert_eq!(found.len(), 3);

        storage
            .update_vertex(alice.id, json!({"name": "Alice", "age": 31}))
            .await
            .unwrap();
        let updated = storage.get_vertex(alice.id).await.unwrap().unwrap();
        assert_eq!(updated.get_property("age"), Some(&json!(31)));

        storage.delete_vertex(bob.id).await.unwrap();
        let found = storage
            .get_vertices(&VertexQuery::vertices([alice.id, bob.id, acme.id]))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }
}

#[tokio::test]
async fn test_transactional_batch_is_atomic() {
    for (storage, _temp) in backends() {
        let mut tx = storage.begin_transaction().await.unwrap();
        let mut ids = Vec::new();
        for i in 0..10 {
            let vertex = tx
                .create_vertex("Person", json!({"seq": i}))
                .await
                .unwrap();
            ids.push(vertex.id);
        }

        // Nothing visible yet
        let found = storage
            .get_vertices(&VertexQuery::vertices(ids.clone()))
            .await
            .unwrap();
        assert!(found.is_empty());

        tx.commit().await.unwrap();

        // Everything visible at once
        let found = storage
            .get_vertices(&VertexQuery::vertices(ids))
            .await
            .unwrap();
        assert_eq!(found.len(), 10);
    }
}

#[tokio::test]
async fn test_malformed_label_is_rejected() {
    for (storage, _temp) in backends() {
        let mut tx = storage.begin_transaction().await.unwrap();

        for bad in ["", "white space", "semi;colon"] {
            let result = tx.create_vertex(bad, json!({})).await;
            assert!(
                matches!(result, Err(StorageError::InvalidLabel(_))),
                "label {bad:?} should be rejected"
            );
        }

        // The transaction stays usable after a rejected create
        let vertex = tx.create_vertex("ok-label", json!({})).await.unwrap();
        tx.commit().await.unwrap();
        assert!(storage.get_vertex(vertex.id).await.unwrap().is_some());
    }
}
