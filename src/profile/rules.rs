//! User-agent classification as priority-ordered rule lists
//!
//! User-agent strings of some browsers contain substrings of others (an
//! Opera UA carries "Chrome", legacy Edge carried "Chrome" and "Safari"), so
//! classification is first-match-wins over an explicitly ordered table
//! rather than nested conditionals. Reordering the tables changes results.

use regex::Regex;
use std::sync::LazyLock;

use crate::profile::models::{Browser, Device, Os};

/// Ordered browser rules: each entry is (needles, label); the first entry
/// with any case-sensitive substring hit wins.
const BROWSER_RULES: &[(&[&str], Browser)] = &[
    (&["Firefox"], Browser::Firefox),
    (&["Opera", "OPR"], Browser::Opera),
    (&["Trident"], Browser::InternetExplorer),
    (&["Edge"], Browser::Edge),
    (&["Chrome"], Browser::Chrome),
    (&["Safari"], Browser::Safari),
];

/// Ordered OS rules. "Win" before "Mac" before "Linux" before "Android"
/// mirrors the precedence the notification consumers expect.
const OS_RULES: &[(&str, Os)] = &[
    ("Win", Os::Windows),
    ("Mac", Os::MacOs),
    ("Linux", Os::Linux),
    ("Android", Os::Android),
    ("iOS", Os::Ios),
];

static TABLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)tablet|ipad|playbook|silk").expect("tablet pattern must compile")
});

// The `regex` crate has no look-around, so "android without 'mobi'" is a
// predicate pair instead of `android(?!.*mobi)`.
static ANDROID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)android").expect("android pattern must compile"));
static MOBI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mobi").expect("mobi pattern must compile"));

// Case-sensitive, as the source patterns were.
static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Mobile|Android|iP(hone|od)|IEMobile|BlackBerry|Kindle|Silk-Accelerated|(hpw|web)OS|Opera M(obi|ini)")
        .expect("mobile pattern must compile")
});

/// Classify the browser from a raw user-agent string
pub fn classify_browser(user_agent: &str) -> Browser {
    for (needles, browser) in BROWSER_RULES {
        if needles.iter().any(|needle| user_agent.contains(needle)) {
            return *browser;
        }
    }
    Browser::Unknown
}

/// Classify the operating system from a raw user-agent string
pub fn classify_os(user_agent: &str) -> Os {
    for (needle, os) in OS_RULES {
        if user_agent.contains(needle) {
            return *os;
        }
    }
    Os::Unknown
}

/// Classify the device class. The tablet test runs before the mobile test:
/// tablet user agents routinely match the mobile pattern too.
pub fn classify_device(user_agent: &str) -> Device {
    if TABLET_RE.is_match(user_agent)
        || (ANDROID_RE.is_match(user_agent) && !MOBI_RE.is_match(user_agent))
    {
        return Device::Tablet;
    }
    if MOBILE_RE.is_match(user_agent) {
        return Device::Mobile;
    }
    Device::Desktop
}
