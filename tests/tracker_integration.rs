//! End-to-end tracking scenario against the real SQLite gate store
//!
//! Exercises the full gate lifecycle: first-ever visit, same-session
//! re-invocation, and eligibility after the window expires.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use beacon::notify::NotificationSink;
use beacon::profile::collector::{GeoInfo, GeoLookup};
use beacon::profile::ClientSignals;
use beacon::store::{GateStore, SqliteGateStore};
use beacon::tracker::VisitorNotifier;

const WINDOW_HOURS: i64 = 24;
const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

struct StubLookup {
    calls: AtomicUsize,
}

#[async_trait]
impl GeoLookup for StubLookup {
    async fn lookup(&self) -> Result<GeoInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeoInfo {
            ip: Some("198.51.100.23".to_string()),
            city: Some("Porto".to_string()),
            region: Some("Porto".to_string()),
            country_name: Some("Portugal".to_string()),
            timezone: Some("Europe/Lisbon".to_string()),
            org: Some("Example Telecom".to_string()),
        })
    }
}

struct RecordingSink {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, _to_name: &str, message: &str) -> Result<()> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

fn signals() -> ClientSignals {
    ClientSignals {
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) \
            AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1"
            .to_string(),
        screen: Some((390, 844)),
        referrer: Some("https://news.example/".to_string()),
        language: Some("pt-PT".to_string()),
    }
}

fn build_notifier(
    store: Arc<dyn GateStore>,
    lookup: Arc<StubLookup>,
    sink: Arc<RecordingSink>,
) -> VisitorNotifier {
    VisitorNotifier::new(store, lookup, sink, WINDOW_HOURS, "Site owner".to_string())
}

#[tokio::test]
async fn test_full_gate_lifecycle() {
    let store = Arc::new(SqliteGateStore::new("sqlite::memory:").await.unwrap());
    store.init().await.unwrap();

    let lookup = Arc::new(StubLookup {
        calls: AtomicUsize::new(0),
    });
    let sink = Arc::new(RecordingSink {
        sent: Mutex::new(Vec::new()),
    });

    // First-ever visit: no persisted key, the gate passes
    let notifier = build_notifier(store.clone(), lookup.clone(), sink.clone());
    notifier.track_visitor(&signals()).await;

    assert_eq!(sink.sent.lock().unwrap().len(), 1);
    let first_stamp = store
        .last_tracked()
        .await
        .unwrap()
        .expect("gate key must be set after the first visit");

    {
        let sent = sink.sent.lock().unwrap();
        let body = &sent[0];
        assert!(body.contains("198.51.100.23"));
        assert!(body.contains("Porto"));
        assert!(body.contains("Mobile"));
        assert!(body.contains("Safari"));
        assert!(body.contains("390x844"));
        assert!(body.contains("https://news.example/"));
    }

    // Second call in the same session: no-op, no network traffic
    notifier.track_visitor(&signals()).await;
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    assert_eq!(sink.sent.lock().unwrap().len(), 1);

    // A fresh instance within the window is still gated by the store
    let second = build_notifier(store.clone(), lookup.clone(), sink.clone());
    second.track_visitor(&signals()).await;
    assert_eq!(sink.sent.lock().unwrap().len(), 1);
    assert_eq!(store.last_tracked().await.unwrap(), Some(first_stamp));

    // Simulate the next day by backdating the persisted timestamp
    let stale = Utc::now().timestamp_millis() - (WINDOW_HOURS + 1) * MILLIS_PER_HOUR;
    store.set_last_tracked(stale).await.unwrap();

    let next_day = build_notifier(store.clone(), lookup.clone(), sink.clone());
    next_day.track_visitor(&signals()).await;

    assert_eq!(sink.sent.lock().unwrap().len(), 2);
    let refreshed = store.last_tracked().await.unwrap().unwrap();
    assert!(refreshed > stale);
}

#[tokio::test]
async fn test_reset_reopens_the_gate() {
    let store = Arc::new(SqliteGateStore::new("sqlite::memory:").await.unwrap());
    store.init().await.unwrap();

    let lookup = Arc::new(StubLookup {
        calls: AtomicUsize::new(0),
    });
    let sink = Arc::new(RecordingSink {
        sent: Mutex::new(Vec::new()),
    });

    build_notifier(store.clone(), lookup.clone(), sink.clone())
        .track_visitor(&signals())
        .await;
    assert_eq!(sink.sent.lock().unwrap().len(), 1);

    // Clearing the gate (the CLI `reset` path) makes a new session eligible
    store.clear().await.unwrap();
    build_notifier(store.clone(), lookup.clone(), sink.clone())
        .track_visitor(&signals())
        .await;
    assert_eq!(sink.sent.lock().unwrap().len(), 2);
}
