use crate::models::pool::{PoolKey, RewardPool};
use alloy::primitives::Address;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// One pool plus its per-staker claim bookkeeping. Guarded by the pool's
/// own mutex so there is at most one in-flight mutation per pool while
/// distinct pools proceed in parallel.
#[derive(Debug, Default)]
pub(crate) struct PoolEntry {
    pub(crate) pool: RewardPool,
    /// Round of each staker's most recent claim against this pool;
    /// absent = never claimed. Monotonically non-decreasing per staker.
    pub(crate) last_round_claimed: HashMap<Address, u64>,
}

impl PoolEntry {
    pub(crate) fn has_claimed_in(&self, staker: Address, round: u64) -> bool {
        self.last_round_claimed.get(&staker).copied() == Some(round)
    }
}

/// Keyed pool storage. Entries are created zero-valued on first write
/// access and never removed; reads of absent pools do not materialize them.
#[derive(Default)]
pub(crate) struct PoolStore {
    pools: RwLock<HashMap<PoolKey, Arc<Mutex<PoolEntry>>>>,
}

impl PoolStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Get-or-insert-zero handle to the pool under `key`.
    pub(crate) async fn entry(&self, key: PoolKey) -> Arc<Mutex<PoolEntry>> {
        if let Some(entry) = self.pools.read().await.get(&key) {
            return entry.clone();
        }
        let mut pools = self.pools.write().await;
        pools.entry(key).or_default().clone()
    }

    /// Handle to an existing pool, without creating one.
    pub(crate) async fn get(&self, key: &PoolKey) -> Option<Arc<Mutex<PoolEntry>>> {
        self.pools.read().await.get(key).cloned()
    }

    /// Locks every distinct pool named in `keys`, acquiring in key order so
    /// concurrent batches over overlapping pool sets cannot deadlock.
    pub(crate) async fn lock_ordered(
        &self,
        keys: &[PoolKey],
    ) -> HashMap<PoolKey, OwnedMutexGuard<PoolEntry>> {
        let unique: BTreeSet<PoolKey> = keys.iter().copied().collect();
        let mut guards = HashMap::with_capacity(unique.len());
        for key in unique {
            let entry = self.entry(key).await;
            guards.insert(key, entry.lock_owned().await);
        }
        guards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn key(byte: u8) -> PoolKey {
        PoolKey {
            staked_contract: Address::repeat_byte(byte),
            sponsor: Address::repeat_byte(0xAA),
            token_address: Address::repeat_byte(0xBB),
        }
    }

    #[tokio::test]
    async fn test_entry_is_created_once_and_shared() {
        let store = PoolStore::new();
        let first = store.entry(key(1)).await;
        first.lock().await.pool.amount = U256::from(5);

        let second = store.entry(key(1)).await;
        assert_eq!(second.lock().await.pool.amount, U256::from(5));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_get_does_not_materialize_pools() {
        let store = PoolStore::new();
        assert!(store.get(&key(1)).await.is_none());
        store.entry(key(1)).await;
        assert!(store.get(&key(1)).await.is_some());
        assert!(store.get(&key(2)).await.is_none());
    }

    #[tokio::test]
    async fn test_lock_ordered_deduplicates_keys() {
        let store = PoolStore::new();
        let keys = vec![key(2), key(1), key(2), key(1)];
        let guards = store.lock_ordered(&keys).await;
        assert_eq!(guards.len(), 2);
        assert!(guards.contains_key(&key(1)));
        assert!(guards.contains_key(&key(2)));
    }
}
