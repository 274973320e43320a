//! Fixed-shard map for concurrent per-key accumulation.
//!
//! Each shard is an ordered map behind its own mutex; a key lives in shard
//! `key mod shard_count`, so writers touching different shards never contend.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Integer keys that can be routed to a shard.
pub trait ShardKey: Copy + Ord {
    fn shard_hash(self) -> u64;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {
        $(impl ShardKey for $t {
            #[inline]
            fn shard_hash(self) -> u64 { self as u64 }
        })*
    };
}

impl_shard_key!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

pub struct ShardedMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V> ShardedMap<K, V> {
    /// A zero shard count is treated as one shard.
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        let idx = key.shard_hash() % self.shards.len() as u64;
        &self.shards[idx as usize]
    }

    /// Lock the owning shard and return the value for `key`, inserting a default first.
    /// The shard stays locked while the guard lives.
    pub fn entry(&self, key: K) -> MappedMutexGuard<'_, V>
    where
        V: Default,
    {
        MutexGuard::map(self.shard(key).lock(), |map| map.entry(key).or_default())
    }

    /// Entries across all shards. Locks each shard in turn.
    pub fn entry_count(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// Merge all shards into one ordered map.
    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        self.shards.into_iter().flat_map(Mutex::into_inner).collect()
    }
}
