//! Process-wide identity generation
//!
//! Nodes, geometries and materials each draw integer ids from their own
//! monotonically increasing counter, and carry a random version-4 UUID.

use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;

/// Monotonic id source, one per identity domain
#[derive(Debug)]
pub struct IdCounter {
    next: AtomicU32,
}

impl IdCounter {
    /// Create a counter whose first id is 1
    pub const fn new() -> Self {
        Self { next: AtomicU32::new(1) }
    }

    /// Take the next id
    pub fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids handed to scene nodes
pub static OBJECT_IDS: IdCounter = IdCounter::new();

/// Ids handed to geometries
pub static GEOMETRY_IDS: IdCounter = IdCounter::new();

/// Ids handed to materials
pub static MATERIAL_IDS: IdCounter = IdCounter::new();

/// Generate an RFC 4122 version 4 UUID string (uppercase hex)
pub fn generate_uuid() -> String {
    let mut bytes: [u8; 16] = rand::thread_rng().gen();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let counter = IdCounter::new();
        let a = counter.next_id();
        let b = counter.next_id();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn test_uuid_format() {
        let uuid = generate_uuid();
        assert_eq!(uuid.len(), 36);
        let dashes: Vec<usize> = uuid.match_indices('-').map(|(i, _)| i).collect();
        assert_eq!(dashes, vec![8, 13, 18, 23]);
        assert_eq!(&uuid[14..15], "4");
        assert!(matches!(&uuid[19..20], "8" | "9" | "A" | "B"));
        assert_ne!(uuid, generate_uuid());
    }
}
