/// VertexDB
///
/// The vertex-management core of an embedded graph store: typed vertices
/// with unique identifiers, transactional access, and pluggable storage
/// backends.
///
/// # Architecture
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │                 VertexDB                         │
/// ├──────────────────────────────────────────────────┤
/// │  ┌────────────────────────────────┐              │
/// │  │   Transaction (buffered ops)   │              │
/// │  └────────────┬───────────────────┘              │
/// │               ↓                                   │
/// │  ┌────────────────────────────────┐              │
/// │  │   Vertex Store                 │              │
/// │  │   (Memory / RocksDB backend)   │              │
/// │  └────────────┬───────────────────┘              │
/// │               ↓                                   │
/// │  ┌────────────────────────────────┐              │
/// │  │   Identifier Generator         │              │
/// │  └────────────────────────────────┘              │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// # Modules
///
/// - `types`: Core data types (Graphid, Label, Vertex, VertexQuery)
/// - `storage`: Storage engine abstraction and backends

pub mod storage;
pub mod types;

// Re-export commonly used types
pub use types::{Graphid, GraphidError, Label, LabelError, Vertex, VertexQuery};

// Re-export storage types
pub use storage::memory_store::MemoryStorage;
pub use storage::rocksdb_store::RocksDbStorage;
pub use storage::{
    IdAllocator, SharedStorage, StorageError, StorageResult, VertexStorage, VertexTransaction,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
