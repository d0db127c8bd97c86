//! Data models for visitor profiles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for geolocation fields when the lookup response omits them
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for the IP field when the lookup fails entirely
pub const IP_UNAVAILABLE: &str = "Unable to fetch";

/// Sentinel for an absent referrer
pub const DIRECT: &str = "Direct";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    InternetExplorer,
    Unknown,
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Safari => "Safari",
            Browser::Edge => "Microsoft Edge",
            Browser::Opera => "Opera",
            Browser::InternetExplorer => "Internet Explorer",
            Browser::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Unknown,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Os::Windows => "Windows",
            Os::MacOs => "MacOS",
            Os::Linux => "Linux",
            Os::Android => "Android",
            Os::Ios => "iOS",
            Os::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Device {
    Mobile,
    Tablet,
    Desktop,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Device::Mobile => "Mobile",
            Device::Tablet => "Tablet",
            Device::Desktop => "Desktop",
        };
        f.write_str(label)
    }
}

/// Browser-local signals supplied by the embedding caller. The library never
/// reads ambient global state for these.
#[derive(Debug, Clone, Default)]
pub struct ClientSignals {
    /// Raw user-agent string
    pub user_agent: String,

    /// Screen dimensions in pixels, if the caller knows them
    pub screen: Option<(u32, u32)>,

    /// Referring URL, if any
    pub referrer: Option<String>,

    /// BCP 47 language tag reported by the client
    pub language: Option<String>,
}

/// Everything captured about one qualifying visit. Assembled once per
/// tracking attempt and discarded after the notification attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorProfile {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub timezone: String,
    pub isp: String,

    pub browser: Browser,
    pub os: Os,
    pub device: Device,

    /// "WxH", or the unknown sentinel when the caller supplied no dimensions
    pub screen_resolution: String,

    /// Human-readable local capture time
    pub visit_time: String,

    /// Capture time in epoch milliseconds
    pub timestamp: i64,

    pub referrer: String,
    pub language: String,
}
