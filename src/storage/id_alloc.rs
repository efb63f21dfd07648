/// Shared identifier generator
///
/// Every store owns exactly one `IdAllocator`, shared (via `Arc`) with all
/// of its transactions. Identifiers are handed out at `create_vertex` time
/// from a single mutex-guarded watermark, so two transactions can never
/// mint the same Graphid no matter how they interleave, and a rolled-back
/// transaction simply leaves a gap — identifiers are never reissued.

use super::error::{StorageError, StorageResult};
use crate::types::{Graphid, Label};
use parking_lot::Mutex;
use std::collections::HashMap;

struct AllocatorState {
    /// Label name -> label ID
    labels: HashMap<String, u16>,

    /// Next label ID; u32 so exhaustion of the 16-bit space is detectable
    next_labid: u32,

    /// Label name -> last issued local ID
    counters: HashMap<String, u64>,
}

/// Monotonic Graphid allocator
pub struct IdAllocator {
    state: Mutex<AllocatorState>,
}

impl IdAllocator {
    /// Create an allocator with no labels registered
    pub fn new() -> Self {
        Self::restore(HashMap::new(), HashMap::new())
    }

    /// Restore an allocator from persisted label and counter watermarks
    pub fn restore(labels: HashMap<String, u16>, counters: HashMap<String, u64>) -> Self {
        let next_labid = labels
            .values()
            .copied()
            .max()
            .map_or(1, |max| max as u32 + 1);

        Self {
            state: Mutex::new(AllocatorState {
                labels,
                next_labid,
                counters,
            }),
        }
    }

    /// Produce a fresh identifier for a vertex of the given label
    ///
    /// Registers the label if it has not been seen before. Fails with
    /// `StorageError::CounterOverflow` when either the label space or the
    /// label's 48-bit local ID space is exhausted.
    pub fn next(&self, label: &Label) -> StorageResult<Graphid> {
        let mut state = self.state.lock();

        let labid = match state.labels.get(label.as_str()).copied() {
            Some(labid) => labid,
            None => {
                if state.next_labid > u16::MAX as u32 {
                    return Err(StorageError::CounterOverflow(label.to_string()));
                }
                let labid = state.next_labid as u16;
                state.next_labid += 1;
                state.labels.insert(label.as_str().to_owned(), labid);
                labid
            }
        };

        let counter = state.counters.entry(label.as_str().to_owned()).or_insert(0);
        let locid = counter
            .checked_add(1)
            .filter(|&next| next <= Graphid::MAX_LOCID)
            .ok_or_else(|| StorageError::CounterOverflow(label.to_string()))?;
        *counter = locid;

        Graphid::new(labid, locid).map_err(|e| StorageError::InvalidState(e.to_string()))
    }

    /// Current watermark for a label: `(labid, last issued locid)`
    ///
    /// `None` if the label has never been seen. Used by persistent backends
    /// to write counter state at commit time.
    pub fn current(&self, label: &str) -> Option<(u16, u64)> {
        let state = self.state.lock();
        let labid = *state.labels.get(label)?;
        let locid = state.counters.get(label).copied().unwrap_or(0);
        Some((labid, locid))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn label(name: &str) -> Label {
        Label::new(name).unwrap()
    }

    #[test]
    fn test_sequential_ids_distinct() {
        let alloc = IdAllocator::new();
        let person = label("Person");

        let a = alloc.next(&person).unwrap();
        let b = alloc.next(&person).unwrap();

        assert_ne!(a, b);
        assert_eq!(a.labid(), b.labid());
        assert_eq!(a.locid(), 1);
        assert_eq!(b.locid(), 2);
    }

    #[test]
    fn test_labels_get_distinct_labids() {
        let alloc = IdAllocator::new();

        let a = alloc.next(&label("Person")).unwrap();
        let b = alloc.next(&label("Company")).unwrap();

        assert_ne!(a.labid(), b.labid());
        assert_eq!(a.locid(), 1);
        assert_eq!(b.locid(), 1);
    }

    #[test]
    fn test_restore_continues_watermark() {
        let labels = HashMap::from([("Person".to_string(), 3u16)]);
        let counters = HashMap::from([("Person".to_string(), 100u64)]);
        let alloc = IdAllocator::restore(labels, counters);

        let id = alloc.next(&label("Person")).unwrap();
        assert_eq!(id.labid(), 3);
        assert_eq!(id.locid(), 101);

        // A new label must not collide with the restored one
        let other = alloc.next(&label("Company")).unwrap();
        assert_eq!(other.labid(), 4);
    }

    #[test]
    fn test_concurrent_allocation_distinct() {
        let alloc = Arc::new(IdAllocator::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let alloc = alloc.clone();
            handles.push(std::thread::spawn(move || {
                let person = label("Person");
                (0..100)
                    .map(|_| alloc.next(&person).unwrap())
                    .collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 800);
    }

    #[test]
    fn test_current_watermark() {
        let alloc = IdAllocator::new();
        assert_eq!(alloc.current("Person"), None);

        let person = label("Person");
        alloc.next(&person).unwrap();
        alloc.next(&person).unwrap();

        assert_eq!(alloc.current("Person"), Some((1, 2)));
    }
}
