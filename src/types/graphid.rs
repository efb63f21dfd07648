use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error types for Graphid operations
#[derive(Error, Debug)]
pub enum GraphidError {
    #[error("Local ID {0} is out of range (max: 2^48 - 1)")]
    LocidOutOfRange(u64),
}

/// Graphid: 64-bit vertex identifier
///
/// Layout: `[16-bit label ID][48-bit local ID]`
///
/// Local IDs are allocated monotonically per label and never reissued, so a
/// Graphid is unique for the lifetime of the store that minted it — deleting
/// a vertex does not free its identifier for reuse.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Graphid(u64);

impl Graphid {
    /// Maximum value for local ID (2^48 - 1)
    pub const MAX_LOCID: u64 = 0x0000FFFFFFFFFFFF;

    /// Maximum value for label ID (2^16 - 1)
    pub const MAX_LABID: u16 = u16::MAX;

    /// Pack a label ID and local ID into a Graphid
    ///
    /// Fails with `GraphidError::LocidOutOfRange` if `locid` does not fit in
    /// 48 bits.
    pub fn new(labid: u16, locid: u64) -> Result<Self, GraphidError> {
        if locid > Self::MAX_LOCID {
            return Err(GraphidError::LocidOutOfRange(locid));
        }
        Ok(Self(((labid as u64) << 48) | locid))
    }

    /// Reconstruct a Graphid from its raw 64-bit value
    ///
    /// Performs no validation; intended for round-tripping values that came
    /// out of `as_raw`.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Raw 64-bit value
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    /// Label ID (high 16 bits)
    pub const fn labid(&self) -> u16 {
        (self.0 >> 48) as u16
    }

    /// Local ID (low 48 bits)
    pub const fn locid(&self) -> u64 {
        self.0 & Self::MAX_LOCID
    }
}

impl fmt::Display for Graphid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.labid(), self.locid())
    }
}

impl From<Graphid> for u64 {
    fn from(id: Graphid) -> u64 {
        id.0
    }
}

impl From<u64> for Graphid {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_unpack() {
        let id = Graphid::new(7, 42).unwrap();
        assert_eq!(id.labid(), 7);
        assert_eq!(id.locid(), 42);
    }

    #[test]
    fn test_max_values() {
        let id = Graphid::new(Graphid::MAX_LABID, Graphid::MAX_LOCID).unwrap();
        assert_eq!(id.labid(), Graphid::MAX_LABID);
        assert_eq!(id.locid(), Graphid::MAX_LOCID);
    }

    #[test]
    fn test_locid_out_of_range() {
        let result = Graphid::new(1, Graphid::MAX_LOCID + 1);
        assert!(matches!(result, Err(GraphidError::LocidOutOfRange(_))));
    }

    #[test]
    fn test_raw_round_trip() {
        let original = Graphid::new(5, 12345).unwrap();
        assert_eq!(Graphid::from_raw(original.as_raw()), original);
    }

    #[test]
    fn test_display() {
        let id = Graphid::new(10, 500).unwrap();
        assert_eq!(id.to_string(), "10.500");
    }

    #[test]
    fn test_bit_layout() {
        let labid: u16 = 0xABCD;
        let locid: u64 = 0x123456789ABC;
        let id = Graphid::new(labid, locid).unwrap();
        assert_eq!(id.as_raw(), ((labid as u64) << 48) | locid);
    }
}
