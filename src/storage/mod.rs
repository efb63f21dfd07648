/// Storage engine abstraction for the vertex store
///
/// This module provides the core storage interface and implementations:
/// - VertexStorage trait: abstract store operations
/// - MemoryStorage: in-memory backend with snapshot isolation
/// - RocksDbStorage: persistent backend
/// - IdAllocator: shared identifier generator

pub mod error;
pub mod id_alloc;
pub mod memory_store;
pub mod rocksdb_store;
pub mod transaction;

use crate::types::{Graphid, Vertex, VertexQuery};
use async_trait::async_trait;
pub use error::{StorageError, StorageResult};
pub use id_alloc::IdAllocator;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Vertex storage abstraction
///
/// Operations invoked directly on the store observe and mutate committed
/// state; each call is atomic on its own. Multi-operation atomicity and
/// isolation go through `begin_transaction`.
#[async_trait]
pub trait VertexStorage: Send + Sync {
    /// Get a vertex by ID
    ///
    /// Returns `Ok(None)` if no vertex with that ID exists.
    async fn get_vertex(&self, id: Graphid) -> StorageResult<Option<Vertex>>;

    /// Evaluate a vertex query against committed state
    ///
    /// For an identifier-set query, returns the stored vertices whose ID is
    /// in the set. IDs with no stored vertex are silently omitted; an
    /// absent ID is never an error.
    async fn get_vertices(&self, query: &VertexQuery) -> StorageResult<Vec<Vertex>>;

    /// Create a new vertex with a fresh identifier
    ///
    /// Fails with `StorageError::InvalidLabel` if the label is malformed.
    async fn create_vertex(&self, label: &str, properties: JsonValue) -> StorageResult<Vertex>;

    /// Replace a vertex's properties, preserving its label
    ///
    /// Fails with `StorageError::VertexNotFound` if the vertex does not
    /// exist.
    async fn update_vertex(&self, id: Graphid, properties: JsonValue) -> StorageResult<()>;

    /// Delete a vertex
    ///
    /// Deleting an absent vertex is a no-op, not an error. The identifier
    /// of a deleted vertex is never reassigned.
    async fn delete_vertex(&self, id: Graphid) -> StorageResult<()>;

    /// Begin a transaction
    async fn begin_transaction(&self) -> StorageResult<Box<dyn VertexTransaction>>;
}

/// Transaction interface for vertex operations
///
/// A transaction moves from open to either committed or rolled back; every
/// operation, reads included, fails with `StorageError::TransactionClosed`
/// once the transaction has completed. Mutations are buffered: they are
/// visible to this transaction's own reads immediately, to nobody else
/// until `commit` succeeds, and to nobody at all after `rollback`.
#[async_trait]
pub trait VertexTransaction: Send + Sync {
    /// Get a vertex by ID, observing this transaction's own writes
    async fn get_vertex(&self, id: Graphid) -> StorageResult<Option<Vertex>>;

    /// Evaluate a vertex query, observing this transaction's own writes
    async fn get_vertices(&self, query: &VertexQuery) -> StorageResult<Vec<Vertex>>;

    /// Create a vertex within this transaction
    async fn create_vertex(&mut self, label: &str, properties: JsonValue)
        -> StorageResult<Vertex>;

    /// Replace a vertex's properties within this transaction
    async fn update_vertex(&mut self, id: Graphid, properties: JsonValue) -> StorageResult<()>;

    /// Delete a vertex within this transaction
    async fn delete_vertex(&mut self, id: Graphid) -> StorageResult<()>;

    /// Commit: atomically publish all buffered mutations
    async fn commit(&mut self) -> StorageResult<()>;

    /// Rollback: discard all buffered mutations
    async fn rollback(&mut self) -> StorageResult<()>;
}

/// Shared storage handle
pub type SharedStorage = Arc<dyn VertexStorage>;
