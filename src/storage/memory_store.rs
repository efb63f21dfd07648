/// In-memory vertex store
///
/// Committed state is a single immutable map behind an `Arc`; a transaction
/// captures that `Arc` when it begins and reads from it for its whole
/// lifetime, which is what makes the backend snapshot-isolated. Commits
/// take the write lock, apply the transaction's buffered ops to the latest
/// committed map, and publish the result — the write lock both serializes
/// and linearizes commits.

use super::error::{StorageError, StorageResult};
use super::id_alloc::IdAllocator;
use super::{VertexStorage, VertexTransaction};
use crate::types::{Graphid, Label, Vertex, VertexQuery};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

type VertexMap = HashMap<Graphid, Vertex>;

/// Committed state, shared between a store and its open transactions
struct Shared {
    /// Latest committed snapshot; replaced wholesale on commit
    committed: RwLock<Arc<VertexMap>>,
}

/// Buffered write operation
#[derive(Debug, Clone)]
enum WriteOp {
    Put { vertex: Vertex },
    Delete { id: Graphid },
}

/// In-memory vertex storage with snapshot isolation
pub struct MemoryStorage {
    shared: Arc<Shared>,
    allocator: Arc<IdAllocator>,
}

impl MemoryStorage {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        debug!("opening in-memory vertex store");
        Self {
            shared: Arc::new(Shared {
                committed: RwLock::new(Arc::new(HashMap::new())),
            }),
            allocator: Arc::new(IdAllocator::new()),
        }
    }

    /// Number of committed vertices
    pub fn len(&self) -> usize {
        self.shared.committed.read().len()
    }

    /// Whether the store holds no committed vertices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an identifier-set query against a lookup function
///
/// Set semantics: duplicate identifiers select a vertex at most once, and
/// identifiers with no stored vertex are silently skipped.
fn resolve_query<F>(query: &VertexQuery, mut lookup: F) -> Vec<Vertex>
where
    F: FnMut(Graphid) -> Option<Vertex>,
{
    let mut seen = HashSet::new();
    let mut vertices = Vec::new();

    for &id in query.ids() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(vertex) = lookup(id) {
            vertices.push(vertex);
        }
    }

    vertices
}

#[async_trait]
impl VertexStorage for MemoryStorage {
    async fn get_vertex(&self, id: Graphid) -> StorageResult<Option<Vertex>> {
        let snapshot = self.shared.committed.read().clone();
        Ok(snapshot.get(&id).cloned())
    }

    async fn get_vertices(&self, query: &VertexQuery) -> StorageResult<Vec<Vertex>> {
        let snapshot = self.shared.committed.read().clone();
        Ok(resolve_query(query, |id| snapshot.get(&id).cloned()))
    }

    async fn create_vertex(&self, label: &str, properties: JsonValue) -> StorageResult<Vertex> {
        let label = Label::new(label)?;
        let id = self.allocator.next(&label)?;
        let vertex = Vertex::new(id, label, properties);

        let mut guard = self.shared.committed.write();
        Arc::make_mut(&mut guard).insert(id, vertex.clone());
        debug!(%id, label = %vertex.label, "created vertex");

        Ok(vertex)
    }

    async fn update_vertex(&self, id: Graphid, properties: JsonValue) -> StorageResult<()> {
        let mut guard = self.shared.committed.write();
        let map = Arc::make_mut(&mut guard);

        match map.get_mut(&id) {
            Some(vertex) => {
                vertex.properties = properties;
                Ok(())
            }
            None => Err(StorageError::VertexNotFound(id.to_string())),
        }
    }

    async fn delete_vertex(&self, id: Graphid) -> StorageResult<()> {
        let mut guard = self.shared.committed.write();
        Arc::make_mut(&mut guard).remove(&id);
        Ok(())
    }

    async fn begin_transaction(&self) -> StorageResult<Box<dyn VertexTransaction>> {
        let snapshot = self.shared.committed.read().clone();
        Ok(Box::new(MemoryTransaction {
            shared: self.shared.clone(),
            allocator: self.allocator.clone(),
            snapshot,
            ops: Vec::new(),
            committed: false,
            rolled_back: false,
        }))
    }
}

/// Transaction over the in-memory store
///
/// Reads come from the snapshot taken at begin, overlaid with this
/// transaction's own buffered writes.
pub struct MemoryTransaction {
    shared: Arc<Shared>,
    allocator: Arc<IdAllocator>,
    snapshot: Arc<VertexMap>,
    ops: Vec<WriteOp>,
    committed: bool,
    rolled_back: bool,
}

impl MemoryTransaction {
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

    /// Read a vertex through this transaction's write set
    ///
    /// Replays the op list in order so the last buffered write for an
    /// identifier wins.
    fn read(&self, id: Graphid) -> Option<Vertex> {
        let mut result = self.snapshot.get(&id).cloned();

        for op in &self.ops {
            match op {
                WriteOp::Put { vertex } if vertex.id == id => result = Some(vertex.clone()),
                WriteOp::Delete { id: deleted } if *deleted == id => result = None,
                _ => {}
            }
        }

        result
    }
}

#[async_trait]
impl VertexTransaction for MemoryTransaction {
    async fn get_vertex(&self, id: Graphid) -> StorageResult<Option<Vertex>> {
        self.check_state()?;
        Ok(self.read(id))
    }

    async fn get_vertices(&self, query: &VertexQuery) -> StorageResult<Vec<Vertex>> {
        self.check_state()?;
        Ok(resolve_query(query, |id| self.read(id)))
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

        self.ops.push(WriteOp::Put {
            vertex: vertex.clone(),
        });

        Ok(vertex)
    }

    async fn update_vertex(&mut self, id: Graphid, properties: JsonValue) -> StorageResult<()> {
        self.check_state()?;

        let mut vertex = self
            .read(id)
            .ok_or_else(|| StorageError::VertexNotFound(id.to_string()))?;
        vertex.properties = properties;

        self.ops.push(WriteOp::Put { vertex });
        Ok(())
    }

    async fn delete_vertex(&mut self, id: Graphid) -> StorageResult<()> {
        self.check_state()?;
        self.ops.push(WriteOp::Delete { id });
        Ok(())
    }

    async fn commit(&mut self) -> StorageResult<()> {
        self.check_state()?;

        // Release our snapshot first: an uncontended commit can then mutate
        // the committed map in place instead of cloning it.
        self.snapshot = Arc::new(HashMap::new());

        let mut guard = self.shared.committed.write();
        let map = Arc::make_mut(&mut guard);

        for op in self.ops.drain(..) {
            match op {
                WriteOp::Put { vertex } => {
                    map.insert(vertex.id, vertex);
                }
                WriteOp::Delete { id } => {
                    map.remove(&id);
                }
            }
        }

        self.committed = true;
        debug!("transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> StorageResult<()> {
        self.check_state()?;

        self.ops.clear();
        self.rolled_back = true;
        debug!("transaction rolled back");
        Ok(())
    }
}
