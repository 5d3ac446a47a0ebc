use chrono::DateTime;
use chrono_tz::Tz;

/// Timezones offered in the booking modal's selector.
pub const BOOKING_TIMEZONES: &[&str] = &[
    "Australia/Sydney",
    "Australia/Melbourne",
    "Australia/Brisbane",
    "Australia/Perth",
    "Australia/Adelaide",
    "Asia/Kolkata",
    "UTC",
];

/// Timezones offered as chat options when the assistant asks for one.
pub const CHAT_TIMEZONES: &[&str] = &[
    "Australia/Sydney",
    "Australia/Melbourne",
    "Australia/Brisbane",
    "Australia/Perth",
    "Asia/Kolkata",
    "UTC",
];

pub const FALLBACK_TIMEZONE: &str = "Australia/Sydney";

/// Read the browser's IANA timezone via `Intl`.
pub fn detect_timezone() -> String {
    let locales = js_sys::Array::new();
    let options = js_sys::Object::new();
    let resolved = js_sys::Intl::DateTimeFormat::new(&locales, &options).resolved_options();
    js_sys::Reflect::get(&resolved, &"timeZone".into())
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_else(|| {
            log::warn!("failed to read browser timezone, defaulting to UTC");
            String::from("UTC")
        })
}

/// The detected zone is kept only when it falls in the supported regional
/// group; everything else gets the fixed fallback.
pub fn default_timezone(detected: &str) -> String {
    if detected.starts_with("Australia/") {
        detected.to_string()
    } else {
        FALLBACK_TIMEZONE.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotLabel {
    pub date_label: String,
    pub time_label: String,
}

/// Format a UTC ISO-8601 slot for display in the given timezone. The ISO
/// string itself is never mutated; submissions always carry the original.
pub fn format_slot(iso: &str, timezone: &str) -> Option<SlotLabel> {
    let tz: Tz = timezone.parse().ok()?;
    let local = DateTime::parse_from_rfc3339(iso).ok()?.with_timezone(&tz);
    Some(SlotLabel {
        date_label: local.format("%a %-d %b").to_string(),
        time_label: local.format("%I:%M %P").to_string(),
    })
}

/// Combined date and time label, used when a chat slot option is echoed
/// back into the conversation.
pub fn format_slot_full(iso: &str, timezone: &str) -> Option<String> {
    format_slot(iso, timezone).map(|label| format!("{}, {}", label.date_label, label.time_label))
}

/// Group slots under their local date label, preserving first-seen date
/// order and server slot order within a date.
pub fn group_slots_by_date(slots: &[String], timezone: &str) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for slot in slots {
        let date_label = match format_slot(slot, timezone) {
            Some(label) => label.date_label,
            None => continue,
        };
        match grouped.iter_mut().find(|(label, _)| *label == date_label) {
            Some((_, group)) => group.push(slot.clone()),
            None => grouped.push((date_label, vec![slot.clone()])),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timezone_keeps_australian_zones() {
        assert_eq!(default_timezone("Australia/Perth"), "Australia/Perth");
        assert_eq!(default_timezone("Europe/Berlin"), "Australia/Sydney");
        assert_eq!(default_timezone(""), "Australia/Sydney");
    }

    #[test]
    fn formats_slot_in_originating_zone() {
        let label = format_slot("2025-06-01T09:00:00+10:00", "Australia/Sydney").unwrap();
        assert_eq!(label.date_label, "Sun 1 Jun");
        assert_eq!(label.time_label, "09:00 am");
    }

    #[test]
    fn same_instant_across_timezones() {
        // 2025-06-01T09:00:00+10:00 is 2025-05-31T23:00:00Z.
        let kolkata = format_slot("2025-06-01T09:00:00+10:00", "Asia/Kolkata").unwrap();
        assert_eq!(kolkata.date_label, "Sun 1 Jun");
        assert_eq!(kolkata.time_label, "04:30 am");

        let utc = format_slot("2025-06-01T09:00:00+10:00", "UTC").unwrap();
        assert_eq!(utc.date_label, "Sat 31 May");
        assert_eq!(utc.time_label, "11:00 pm");
    }

    #[test]
    fn rejects_unknown_zone_and_bad_iso() {
        assert!(format_slot("2025-06-01T09:00:00+10:00", "Nowhere/Else").is_none());
        assert!(format_slot("not-a-timestamp", "UTC").is_none());
    }

    #[test]
    fn groups_by_local_date_preserving_order() {
        let slots = vec![
            "2025-06-01T09:00:00+10:00".to_string(),
            "2025-06-02T09:00:00+10:00".to_string(),
            "2025-06-01T10:00:00+10:00".to_string(),
        ];
        let grouped = group_slots_by_date(&slots, "Australia/Sydney");
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "Sun 1 Jun");
        assert_eq!(
            grouped[0].1,
            vec![
                "2025-06-01T09:00:00+10:00".to_string(),
                "2025-06-01T10:00:00+10:00".to_string()
            ]
        );
        assert_eq!(grouped[1].0, "Mon 2 Jun");
    }
}
