/// RocksDB storage implementation
///
/// Key space design:
/// - Vertex:   v:{graph}:{labid}:{locid} → JSON
/// - Label:    l:{graph}:{name} → labid
/// - Counter:  c:{graph}:{label} → last issued locid
///
/// Label registry and counters are loaded into the shared `IdAllocator` at
/// open and written back with every commit, so identifiers stay unique
/// across restarts and are never reissued.

use super::error::{StorageError, StorageResult};
use super::id_alloc::IdAllocator;
use super::transaction::RocksDbTransaction;
use super::{VertexStorage, VertexTransaction};
use crate::types::{Graphid, Label, Vertex, VertexQuery};
use async_trait::async_trait;
use rocksdb::{Options, WriteBatch, DB};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

fn decode_u16(bytes: &[u8]) -> StorageResult<u16> {
    let arr: [u8; 2] = bytes
        .try_into()
        .map_err(|_| StorageError::InvalidState("malformed label id entry".into()))?;
    Ok(u16::from_le_bytes(arr))
}

fn decode_u64(bytes: &[u8]) -> StorageResult<u64> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorageError::InvalidState("malformed counter entry".into()))?;
    Ok(u64::from_le_bytes(arr))
}

/// RocksDB-backed vertex storage
pub struct RocksDbStorage {
    /// RocksDB database instance
    db: Arc<DB>,

    /// Graph name (namespace)
    graph_name: String,

    /// Shared identifier generator
    allocator: Arc<IdAllocator>,
}

impl RocksDbStorage {
    /// Open (or create) a RocksDB-backed store
    ///
    /// # Arguments
    /// * `path` - Path to the database directory
    /// * `graph_name` - Name of the graph (namespace)
    pub fn new<P: AsRef<Path>>(path: P, graph_name: impl Into<String>) -> StorageResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open(&opts, path)?;
        let graph_name = graph_name.into();

        let labels = Self::load_labels(&db, &graph_name)?;
        let counters = Self::load_counters(&db, &graph_name)?;
        debug!(graph = %graph_name, labels = labels.len(), "opened vertex store");

        Ok(Self {
            db: Arc::new(db),
            graph_name,
            allocator: Arc::new(IdAllocator::restore(labels, counters)),
        })
    }

    /// Load the persisted label registry
    fn load_labels(db: &DB, graph_name: &str) -> StorageResult<HashMap<String, u16>> {
        let prefix = format!("l:{}:", graph_name);
        let mut labels = HashMap::new();

        for item in db.prefix_iterator(prefix.as_bytes()) {
            let (key, value) = item?;
            let key_str = std::str::from_utf8(&key)?;

            let Some(name) = key_str.strip_prefix(&prefix) else {
                break;
            };
            labels.insert(name.to_string(), decode_u16(&value)?);
        }

        Ok(labels)
    }

    /// Load the persisted local-ID counters
    fn load_counters(db: &DB, graph_name: &str) -> StorageResult<HashMap<String, u64>> {
        let prefix = format!("c:{}:", graph_name);
        let mut counters = HashMap::new();

        for item in db.prefix_iterator(prefix.as_bytes()) {
            let (key, value) = item?;
            let key_str = std::str::from_utf8(&key)?;

            let Some(name) = key_str.strip_prefix(&prefix) else {
                break;
            };
            counters.insert(name.to_string(), decode_u64(&value)?);
        }

        Ok(counters)
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
}

#[async_trait]
impl VertexStorage for RocksDbStorage {
    async fn get_vertex(&self, id: Graphid) -> StorageResult<Option<Vertex>> {
        let key = self.make_vertex_key(id);

        match self.db.get(&key)? {
            Some(bytes) => {
                let vertex: Vertex = serde_json::from_slice(&bytes)?;
                Ok(Some(vertex))
            }
            None => Ok(None),
        }
    }

    async fn get_vertices(&self, query: &VertexQuery) -> StorageResult<Vec<Vertex>> {
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

    async fn create_vertex(&self, label: &str, properties: JsonValue) -> StorageResult<Vertex> {
        let label = Label::new(label)?;
        let id = self.allocator.next(&label)?;
        let vertex = Vertex::new(id, label, properties);

        // Vertex, label registry entry and counter watermark land together.
        let mut batch = WriteBatch::default();
        batch.put(self.make_vertex_key(id), serde_json::to_vec(&vertex)?);
        if let Some((labid, locid)) = self.allocator.current(vertex.label.as_str()) {
            batch.put(self.make_label_key(vertex.label.as_str()), labid.to_le_bytes());
            batch.put(self.make_counter_key(vertex.label.as_str()), locid.to_le_bytes());
        }
        self.db.write(batch)?;

        Ok(vertex)
    }

    async fn update_vertex(&self, id: Graphid, properties: JsonValue) -> StorageResult<()> {
        let vertex = self
            .get_vertex(id)
            .await?
            .ok_or_else(|| StorageError::VertexNotFound(id.to_string()))?;

        let updated = Vertex::new(id, vertex.label, properties);
        self.db
            .put(self.make_vertex_key(id), serde_json::to_vec(&updated)?)?;

        Ok(())
    }

    async fn delete_vertex(&self, id: Graphid) -> StorageResult<()> {
        self.db.delete(self.make_vertex_key(id))?;
        Ok(())
    }

    async fn begin_transaction(&self) -> StorageResult<Box<dyn VertexTransaction>> {
        Ok(Box::new(RocksDbTransaction::new(
            self.db.clone(),
            self.graph_name.clone(),
            self.allocator.clone(),
        )))
    }
}
