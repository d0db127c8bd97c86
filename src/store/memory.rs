use crate::store::{GateStore, StoreResult};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// In-process gate store. Nothing survives a restart, so the cross-reload
/// guard degrades to the session guard; useful for tests and for embedders
/// that manage their own persistence.
#[derive(Default)]
pub struct MemoryGateStore {
    last_tracked: Mutex<Option<i64>>,
}

impl MemoryGateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self) -> MutexGuard<'_, Option<i64>> {
        self.last_tracked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl GateStore for MemoryGateStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn last_tracked(&self) -> StoreResult<Option<i64>> {
        Ok(*self.cell())
    }

    async fn set_last_tracked(&self, epoch_ms: i64) -> Result<()> {
        *self.cell() = Some(epoch_ms);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.cell() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let store = MemoryGateStore::new();
        assert!(store.last_tracked().await.unwrap().is_none());

        store.set_last_tracked(42).await.unwrap();
        assert_eq!(store.last_tracked().await.unwrap(), Some(42));

        store.clear().await.unwrap();
        assert!(store.last_tracked().await.unwrap().is_none());
    }
}
