//! Notification dispatch through an external email collaborator

pub mod emailjs;
pub mod message;

use anyhow::Result;
use async_trait::async_trait;

pub use emailjs::{EmailJsSink, EMAILJS_ENDPOINT};
pub use message::format_message;

/// Fire-and-forget delivery seam. Implementations report success or failure;
/// the caller logs failures and never retries.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, to_name: &str, message: &str) -> Result<()>;
}
