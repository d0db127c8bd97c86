//! Visitor notification with a two-guard tracking gate
//!
//! The gate combines an in-memory session flag with a persisted timestamp:
//! at most one dispatch attempt per notifier instance, and at most one per
//! store origin per rolling window. The persisted half is committed before
//! any network I/O, so the window holds even when collection or dispatch is
//! interrupted mid-flight.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::notify::{format_message, NotificationSink};
use crate::profile::{ClientSignals, GeoLookup, ProfileCollector};
use crate::store::{GateStore, StoreError};

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Best-effort, once-per-window visitor notifier.
///
/// The session flag lives on the instance, so the composition root decides
/// its lifetime; independent instances track independently.
pub struct VisitorNotifier {
    tracked: AtomicBool,
    store: Arc<dyn GateStore>,
    collector: ProfileCollector,
    sink: Arc<dyn NotificationSink>,
    window_ms: i64,
    recipient: String,
}

impl VisitorNotifier {
    pub fn new(
        store: Arc<dyn GateStore>,
        lookup: Arc<dyn GeoLookup>,
        sink: Arc<dyn NotificationSink>,
        window_hours: i64,
        recipient: String,
    ) -> Self {
        Self {
            tracked: AtomicBool::new(false),
            store,
            collector: ProfileCollector::new(lookup),
            sink,
            window_ms: window_hours * MILLIS_PER_HOUR,
            recipient,
        }
    }

    /// Perform one tracking attempt. Never fails: every internal error is
    /// caught here and logged, so tracking can never break the host
    /// application.
    pub async fn track_visitor(&self, signals: &ClientSignals) {
        if let Err(e) = self.try_track(signals).await {
            error!("visitor tracking failed: {e:#}");
        }
    }

    async fn try_track(&self, signals: &ClientSignals) -> anyhow::Result<()> {
        // Session guard: cheaper than the store read, and it covers rapid
        // re-invocations within one instance lifetime. The flag stays set
        // after this call no matter which path is taken below.
        if self.tracked.swap(true, Ordering::SeqCst) {
            debug!("visitor already tracked in this session");
            return Ok(());
        }

        let now = Utc::now().timestamp_millis();

        // Cross-restart guard. A corrupt persisted value makes the visitor
        // eligible again rather than wedging the gate shut forever.
        let last_tracked = match self.store.last_tracked().await {
            Ok(value) => value,
            Err(StoreError::Corrupt) => {
                warn!("persisted gate value is corrupt, treating visitor as eligible");
                None
            }
            Err(StoreError::Other(e)) => return Err(e),
        };

        if let Some(last) = last_tracked {
            if now - last < self.window_ms {
                debug!("visitor already tracked within the current window");
                return Ok(());
            }
        }

        // Invariant: the gate commit completes before the first network
        // request below. This is what bounds dispatches to one per window
        // even if collection or dispatch never finishes.
        self.store.set_last_tracked(now).await?;

        let profile = self.collector.collect(signals).await;
        debug!(?profile, "collected visitor profile");

        let message = format_message(&profile);
        match self.sink.send(&self.recipient, &message).await {
            Ok(()) => info!("visitor notification sent"),
            // A failed send is consumed for this window by design: the gate
            // is optimistic, not guaranteed-delivery. No retry, no rollback.
            Err(e) => warn!("failed to send visitor notification: {e:#}"),
        }

        Ok(())
    }
}
