//! Property ID hashing.
//!
//! Property IDs in ID-named games are the IEEE CRC32 of the property name
//! followed by its hashable type name, seeded with `0xFFFFFFFF` and without
//! the final inversion. Type names are hashed the same way to scope name map
//! keys.

use crc32fast::Hasher;

/// Undo the final inversion `crc32fast` applies.
#[inline]
fn digest(hasher: Hasher) -> u32 {
    hasher.finalize() ^ 0xFFFF_FFFF
}

/// Hash a byte slice.
#[inline]
pub fn hash_bytes(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    digest(hasher)
}

/// Hash a string's UTF-8 bytes.
#[inline]
pub fn hash_str(s: &str) -> u32 {
    hash_bytes(s.as_bytes())
}

/// Calculate the property ID for a name and hashable type name.
#[inline]
pub fn property_id(name: &str, type_name: &str) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(type_name.as_bytes());
    digest(hasher)
}
