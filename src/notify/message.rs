use crate::profile::VisitorProfile;

/// Render the notification body. Fixed prose with section headers; every
/// profile field appears, but the exact layout is not a contract consumers
/// may parse.
pub fn format_message(profile: &VisitorProfile) -> String {
    format!(
        "New visitor on your portfolio!\n\n\
         Location Information:\n\
         ---------------------\n\
         IP Address: {ip}\n\
         Location: {city}, {region}, {country}\n\
         Timezone: {timezone}\n\
         ISP: {isp}\n\n\
         Device Information:\n\
         -------------------\n\
         Device: {device}\n\
         Operating System: {os}\n\
         Browser: {browser}\n\
         Screen Resolution: {screen}\n\n\
         Visit Details:\n\
         --------------\n\
         Time: {time}\n\
         Referrer: {referrer}\n\
         Language: {language}\n\n\
         This is an automated notification from your visitor tracking system.",
        ip = profile.ip,
        city = profile.city,
        region = profile.region,
        country = profile.country,
        timezone = profile.timezone,
        isp = profile.isp,
        device = profile.device,
        os = profile.os,
        browser = profile.browser,
        screen = profile.screen_resolution,
        time = profile.visit_time,
        referrer = profile.referrer,
        language = profile.language,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::{Browser, Device, Os};

    fn sample_profile() -> VisitorProfile {
        VisitorProfile {
            ip: "203.0.113.7".to_string(),
            city: "Lisbon".to_string(),
            region: "Lisboa".to_string(),
            country: "Portugal".to_string(),
            timezone: "Europe/Lisbon".to_string(),
            isp: "Example Telecom".to_string(),
            browser: Browser::Edge,
            os: Os::Windows,
            device: Device::Desktop,
            screen_resolution: "1920x1080".to_string(),
            visit_time: "2026-08-24 10:15:00 WEST".to_string(),
            timestamp: 1_787_000_000_000,
            referrer: "https://example.com/".to_string(),
            language: "pt-PT".to_string(),
        }
    }

    #[test]
    fn test_message_carries_every_profile_field() {
        let message = format_message(&sample_profile());

        for expected in [
            "203.0.113.7",
            "Lisbon",
            "Lisboa",
            "Portugal",
            "Europe/Lisbon",
            "Example Telecom",
            "Microsoft Edge",
            "Windows",
            "Desktop",
            "1920x1080",
            "2026-08-24 10:15:00 WEST",
            "https://example.com/",
            "pt-PT",
        ] {
            assert!(message.contains(expected), "missing field value: {expected}");
        }
    }

    #[test]
    fn test_message_has_section_headers() {
        let message = format_message(&sample_profile());
        assert!(message.contains("Location Information:"));
        assert!(message.contains("Device Information:"));
        assert!(message.contains("Visit Details:"));
    }
}
