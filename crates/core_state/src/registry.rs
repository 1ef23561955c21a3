//! Keyed registries with caller-supplied hashing.
//!
//! One table structure serves both the window registry (integer keys) and
//! the application-name filter sets (string keys). The table never grows:
//! capacity is fixed at construction and callers size it for the expected
//! cardinality.

use std::fmt;

/// Identifier for an on-screen window, as reported by the window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash and equality behavior for a registry key type.
///
/// The registry fixes neither; each key type supplies its own pair.
/// `key_eq` must be consistent with `hash_key`: equal keys hash equally.
pub trait RegistryKey {
    /// Hash of the key. Only its residue modulo the bucket count is used.
    fn hash_key(&self) -> u64;

    /// Key equality under this registry's notion of identity.
    fn key_eq(&self, other: &Self) -> bool;
}

/// Window identifiers hash to their raw bits.
impl RegistryKey for WindowId {
    fn hash_key(&self) -> u64 {
        u64::from(self.0)
    }

    fn key_eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// Bernstein multiplicative hash over raw bytes.
fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &byte in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    hash
}

/// Strings hash byte-wise with the Bernstein multiplicative hash.
impl RegistryKey for String {
    fn hash_key(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }

    fn key_eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Fixed-capacity hash table with separate chaining.
///
/// Keys are unique within a registry: inserting an existing key replaces
/// the stored value in place and the size does not grow. Iteration yields
/// entries in unspecified order.
#[derive(Debug, Clone)]
pub struct Registry<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
}

impl<K: RegistryKey, V> Registry<K, V> {
    /// Allocate a bucket array of the requested capacity (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        Self { buckets, len: 0 }
    }

    fn bucket_of(&self, key: &K) -> usize {
        (key.hash_key() % self.buckets.len() as u64) as usize
    }

    /// Insert a key/value pair, returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_of(&key);
        let bucket = &mut self.buckets[index];
        for entry in bucket.iter_mut() {
            if entry.0.key_eq(&key) {
                return Some(std::mem::replace(&mut entry.1, value));
            }
        }
        bucket.push((key, value));
        self.len += 1;
        None
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(stored, _)| stored.key_eq(key))
            .map(|(_, value)| value)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_of(key);
        self.buckets[index]
            .iter_mut()
            .find(|(stored, _)| stored.key_eq(key))
            .map(|(_, value)| value)
    }

    /// Unlink the entry for `key` if present; a miss is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_of(key);
        let bucket = &mut self.buckets[index];
        let position = bucket.iter().position(|(stored, _)| stored.key_eq(key))?;
        self.len -= 1;
        Some(bucket.swap_remove(position).1)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Iterate over all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flatten().map(|(key, value)| (key, value))
    }

    /// Mutable iteration over all entries, in no particular order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.buckets
            .iter_mut()
            .flatten()
            .map(|(key, value)| (&*key, value))
    }
}

impl<V> Registry<String, V> {
    /// Borrowed-key lookup for string registries. Hashes the same way as
    /// the owned `String` key, so no allocation is needed to query.
    pub fn get_str(&self, key: &str) -> Option<&V> {
        let index = (hash_bytes(key.as_bytes()) % self.buckets.len() as u64) as usize;
        self.buckets[index]
            .iter()
            .find(|(stored, _)| stored.as_bytes() == key.as_bytes())
            .map(|(_, value)| value)
    }

    pub fn contains_str(&self, key: &str) -> bool {
        self.get_str(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_key() {
        let mut registry: Registry<WindowId, &str> = Registry::with_capacity(16);
        assert!(registry.insert(WindowId(7), "first").is_none());
        assert_eq!(registry.insert(WindowId(7), "second"), Some("first"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&WindowId(7)), Some(&"second"));
    }

    #[test]
    fn remove_is_noop_on_missing_key() {
        let mut registry: Registry<WindowId, u32> = Registry::with_capacity(16);
        registry.insert(WindowId(1), 10);
        assert!(registry.remove(&WindowId(2)).is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remove(&WindowId(1)), Some(10));
        assert!(registry.is_empty());
    }

    #[test]
    fn chained_bucket_keeps_keys_unique() {
        // Capacity 1 forces every key through the same chain.
        let mut registry: Registry<String, u32> = Registry::with_capacity(1);
        registry.insert("alpha".to_string(), 1);
        registry.insert("beta".to_string(), 2);
        registry.insert("gamma".to_string(), 3);
        registry.insert("beta".to_string(), 20);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get_str("beta"), Some(&20));
        assert_eq!(registry.get_str("alpha"), Some(&1));
        assert_eq!(registry.get_str("delta"), None);
    }

    #[test]
    fn iteration_yields_every_entry() {
        let mut registry: Registry<WindowId, u32> = Registry::with_capacity(8);
        for id in 0..20 {
            registry.insert(WindowId(id), id * 2);
        }
        let mut seen: Vec<u32> = registry.iter().map(|(key, _)| key.0).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut registry: Registry<WindowId, u32> = Registry::with_capacity(4);
        registry.insert(WindowId(1), 1);
        registry.insert(WindowId(2), 2);
        for (_, value) in registry.iter_mut() {
            *value += 100;
        }
        assert_eq!(registry.get(&WindowId(1)), Some(&101));
        assert_eq!(registry.get(&WindowId(2)), Some(&102));
    }

    #[test]
    fn string_lookup_matches_borrowed_and_owned() {
        let mut registry: Registry<String, ()> = Registry::with_capacity(64);
        registry.insert("Terminal".to_string(), ());
        assert!(registry.contains_str("Terminal"));
        assert!(registry.contains(&"Terminal".to_string()));
        assert!(!registry.contains_str("terminal"));
    }
}
