/// Transaction implementation for RocksDB storage
///
/// Atomicity comes from batching all writes and committing them through a
/// single RocksDB WriteBatch. The buffered ops also serve as a read
/// overlay, so the transaction observes its own prior writes before they
/// are published.

use super::error::{StorageError, StorageResult};
use super::id_alloc::IdAllocator;
use super::VertexTransaction;
use crate::types::{Graphid, Label, Vertex, VertexQuery};
use async_trait::async_trait;
use rocksdb::{WriteBatch, DB};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Write operation for batching
#[derive(Debug, Clone)]
enum WriteOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// RocksDB transaction using WriteBatch
pub struct RocksDbTransaction {
    /// Reference to the database
    db: Arc<DB>,

    /// Graph name (namespace)
    graph_name: String,

    /// Shared identifier generator
    allocator: Arc<IdAllocator>,

    /// Batched write operations
    operations: Vec<WriteOp>,

    /// Labels this transaction allocated identifiers for; their watermarks
    /// are persisted at commit
    touched_labels: HashSet<String>,

    /// Transaction state
    committed: bool,
    rolled_back: bool,
}

impl RocksDbTransaction {
    /// Create a new transaction
    pub fn new(db: Arc<DB>, graph_name: String, allocator: Arc<IdAllocator>) -> Self {
        Self {
            db,
            graph_name,
            allocator,
            operations: Vec::new(),
            touched_labels: HashSet::new(),
            committed: false,
            rolled_back: false,
        }
    }

    /// Check transaction state
    fn check_state(&self) -> StorageResult<()> {
        if self.committed {
            return Err(StorageError::TransactionClosed("already committed"));
        }
        if self.rolled_back {
            return Err(StorageError::TransactionClosed("already rolled back"));
        }
        Ok(())
    }

    /// Add a put operation to the batch
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.operations.push(WriteOp::Put { key, value });
    }

    /// Make key for a vertex
    fn make_vertex_key(&self, id: Graphid) -> Vec<u8> {
        format!("v:{}:{}:{}", self.graph_name, id.labid(), id.locid()).into_bytes()
    }

    /// Make key for a label registry entry
    fn make_label_key(&self, label: &str) -> Vec<u8> {
        format!("l:{}:{}", self.graph_name, label).into_bytes()
    }

    /// Make key for a counter
    fn make_counter_key(&self, label: &str) -> Vec<u8> {
        format!("c:{}:{}", self.graph_name, label).into_bytes()
    }

    /// Read a raw value through this transaction's write set
    ///
    /// The op list is replayed in order so the last buffered write for a
    /// key wins; keys this transaction never wrote fall through to the
    /// database.
    fn read_overlay(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let mut buffered: Option<Option<&[u8]>> = None;

        for op in &self.operations {
            match op {
                WriteOp::Put { key: k, value } if k == key => buffered = Some(Some(value)),
                WriteOp::Delete { key: k } if k == key => buffered = Some(None),
                _ => {}
            }
        }

        match buffered {
            Some(value) => Ok(value.map(|v| v.to_vec())),
            None => Ok(self.db.get(key)?),
        }
    }
}

#[async_trait]
impl VertexTransaction for RocksDbTransaction {
    async fn get_vertex(&self, id: Graphid) -> StorageResult<Option<Vertex>> {
        self.check_state()?;

        let key = self.make_vertex_key(id);
        match self.read_overlay(&key)? {
            Some(bytes) => {
                let vertex: Vertex = serde_json::from_slice(&bytes)?;
                Ok(Some(vertex))
            }
            None => Ok(None),
        }
    }

    async fn get_vertices(&self, query: &VertexQuery) -> StorageResult<Vec<Vertex>> {
        self.check_state()?;

        let mut seen = HashSet::new();
        let mut vertices = Vec::new();

        for &id in query.ids() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(vertex) = self.get_vertex(id).await? {
                vertices.push(vertex);
            }
        }

        Ok(vertices)
    }

    async fn create_vertex(
        &mut self,
        label: &str,
        properties: JsonValue,
    ) -> StorageResult<Vertex> {
        self.check_state()?;

        let label = Label::new(label)?;
        let id = self.allocator.next(&label)?;
        let vertex = Vertex::new(id, label, properties);

        let key = self.make_vertex_key(id);
        let value = serde_json::to_vec(&vertex)?;
        self.put(key, value);
        self.touched_labels.insert(vertex.label.as_str().to_owned());

        Ok(vertex)
    }

    async fn update_vertex(&mut self, id: Graphid, properties: JsonValue) -> StorageResult<()> {
        self.check_state()?;

        let vertex = self
            .get_vertex(id)
            .await?
            .ok_or_else(|| StorageError::VertexNotFound(id.to_string()))?;

        let updated = Vertex::new(id, vertex.label, properties);
        let key = self.make_vertex_key(id);
        let value = serde_json::to_vec(&updated)?;
        self.put(key, value);

        Ok(())
    }

    async fn delete_vertex(&mut self, id: Graphid) -> StorageResult<()> {
        self.check_state()?;

        let key = self.make_vertex_key(id);
        self.operations.push(WriteOp::Delete { key });

        Ok(())
    }

    async fn commit(&mut self) -> StorageResult<()> {
        self.check_state()?;

        let mut batch = WriteBatch::default();

        // Persist watermarks for every label this transaction touched. The
        // allocator's current value is read at commit time, so values are
        // non-decreasing in commit order even under concurrency.
        for label in &self.touched_labels {
            if let Some((labid, locid)) = self.allocator.current(label) {
                batch.put(self.make_label_key(label), labid.to_le_bytes());
                batch.put(self.make_counter_key(label), locid.to_le_bytes());
            }
        }

        for op in &self.operations {
            match op {
                WriteOp::Put { key, value } => {
                    batch.put(key, value);
                }
                WriteOp::Delete { key } => {
                    batch.delete(key);
                }
            }
        }

        self.db.write(batch)?;

        self.committed = true;
        debug!(ops = self.operations.len(), "transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> StorageResult<()> {
        self.check_state()?;

        self.operations.clear();
        self.rolled_back = true;
        debug!("transaction rolled back");
        Ok(())
    }
}
