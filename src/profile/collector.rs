use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Local, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::profile::models::{ClientSignals, VisitorProfile, DIRECT, IP_UNAVAILABLE, UNKNOWN};
use crate::profile::rules::{classify_browser, classify_device, classify_os};

/// Geolocation fields returned by the lookup collaborator. Field names match
/// the ipapi.co JSON response; all are optional so one missing field never
/// fails the whole lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoInfo {
    pub ip: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country_name: Option<String>,
    pub timezone: Option<String>,
    pub org: Option<String>,
}

/// External IP-geolocation lookup collaborator
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self) -> Result<GeoInfo>;
}

/// Lookup against an ipapi.co-compatible endpoint: one unauthenticated GET
/// returning a JSON object for the caller's own public IP.
pub struct IpApiLookup {
    client: reqwest::Client,
    endpoint: String,
}

impl IpApiLookup {
    pub fn new(endpoint: String) -> Result<Self> {
        // No explicit timeout: the component inherits whatever the HTTP
        // client defaults to, and every failure is recovered with sentinels.
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build geolocation HTTP client")?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl GeoLookup for IpApiLookup {
    async fn lookup(&self) -> Result<GeoInfo> {
        let info = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .context("geolocation request failed")?
            .error_for_status()
            .context("geolocation service returned an error status")?
            .json::<GeoInfo>()
            .await
            .context("geolocation response was not valid JSON")?;
        Ok(info)
    }
}

/// Assembles a [`VisitorProfile`] from local signals plus one geolocation
/// lookup. Collection never fails: a lookup error degrades the geolocation
/// fields to sentinels and every locally-derived field is still populated.
pub struct ProfileCollector {
    lookup: Arc<dyn GeoLookup>,
}

impl ProfileCollector {
    pub fn new(lookup: Arc<dyn GeoLookup>) -> Self {
        Self { lookup }
    }

    pub async fn collect(&self, signals: &ClientSignals) -> VisitorProfile {
        // "Unable to fetch" marks a failed lookup; a successful response
        // that merely omits the ip field degrades to "Unknown" like the
        // other geolocation fields.
        let (geo, ip_fallback) = match self.lookup.lookup().await {
            Ok(info) => (info, UNKNOWN),
            Err(e) => {
                warn!("geolocation lookup failed, using fallback fields: {e:#}");
                (GeoInfo::default(), IP_UNAVAILABLE)
            }
        };

        let now = Utc::now();

        VisitorProfile {
            ip: geo.ip.unwrap_or_else(|| ip_fallback.to_string()),
            city: geo.city.unwrap_or_else(|| UNKNOWN.to_string()),
            region: geo.region.unwrap_or_else(|| UNKNOWN.to_string()),
            country: geo.country_name.unwrap_or_else(|| UNKNOWN.to_string()),
            timezone: geo.timezone.unwrap_or_else(|| UNKNOWN.to_string()),
            isp: geo.org.unwrap_or_else(|| UNKNOWN.to_string()),

            browser: classify_browser(&signals.user_agent),
            os: classify_os(&signals.user_agent),
            device: classify_device(&signals.user_agent),

            screen_resolution: signals
                .screen
                .map(|(w, h)| format!("{}x{}", w, h))
                .unwrap_or_else(|| UNKNOWN.to_string()),

            visit_time: Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string(),
            timestamp: now.timestamp_millis(),

            referrer: signals
                .referrer
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DIRECT.to_string()),
            language: signals
                .language
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}
