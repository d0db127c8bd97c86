use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persisted gate value is not a decimal epoch-millisecond timestamp")]
    Corrupt,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable half of the tracking gate: a single epoch-millisecond cell
/// recording when this origin last dispatched a notification.
#[async_trait]
pub trait GateStore: Send + Sync {
    /// Initialize the store (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Read the last-tracked timestamp, if any.
    ///
    /// Returns `StoreError::Corrupt` when a value is present but does not
    /// parse as a decimal timestamp; callers decide whether that makes the
    /// visitor eligible again.
    async fn last_tracked(&self) -> StoreResult<Option<i64>>;

    /// Persist the last-tracked timestamp
    async fn set_last_tracked(&self, epoch_ms: i64) -> Result<()>;

    /// Remove the persisted timestamp (used by `beacon reset`)
    async fn clear(&self) -> Result<()>;
}
