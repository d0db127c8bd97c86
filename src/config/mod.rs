use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub geo: GeoConfig,
    /// None when the EmailJS tokens are not configured; tracking then fails
    /// at composition time rather than silently skipping dispatch.
    #[serde(default)]
    pub dispatch: Option<DispatchConfig>,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Rolling notification window in hours
    #[serde(default = "TrackingConfig::default_window_hours")]
    pub window_hours: i64,
}

impl TrackingConfig {
    const fn default_window_hours() -> i64 {
        24
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "sqlite" => StoreBackend::Sqlite,
            "memory" => StoreBackend::Memory,
            other => {
                tracing::warn!(
                    "Unknown STORE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, memory"
                );
                StoreBackend::Sqlite
            }
        };

        let store_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./beacon.db?mode=rwc".to_string());

        let geo_endpoint = std::env::var("GEO_ENDPOINT")
            .unwrap_or_else(|_| "https://ipapi.co/json/".to_string());

        // All three tokens must be present together; a partial set is a
        // configuration mistake, not a disabled feature.
        let service_id = std::env::var("EMAILJS_SERVICE_ID").ok();
        let template_id = std::env::var("EMAILJS_TEMPLATE_ID").ok();
        let public_key = std::env::var("EMAILJS_PUBLIC_KEY").ok();

        let dispatch = match (service_id, template_id, public_key) {
            (Some(service_id), Some(template_id), Some(public_key)) => {
                let recipient = std::env::var("NOTIFY_RECIPIENT")
                    .unwrap_or_else(|_| "Site owner".to_string());
                Some(DispatchConfig {
                    service_id,
                    template_id,
                    public_key,
                    recipient,
                })
            }
            (None, None, None) => None,
            _ => anyhow::bail!(
                "EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID and EMAILJS_PUBLIC_KEY must be set together"
            ),
        };

        let window_hours = std::env::var("TRACKING_WINDOW_HOURS")
            .ok()
            .map(|v| {
                v.parse::<i64>()
                    .context("TRACKING_WINDOW_HOURS must be an integer number of hours")
            })
            .transpose()?
            .unwrap_or_else(TrackingConfig::default_window_hours);

        anyhow::ensure!(
            window_hours > 0,
            "TRACKING_WINDOW_HOURS must be positive, got {window_hours}"
        );

        Ok(Config {
            store: StoreConfig {
                backend,
                url: store_url,
            },
            geo: GeoConfig {
                endpoint: geo_endpoint,
            },
            dispatch,
            tracking: TrackingConfig { window_hours },
        })
    }
}
