//! Scheduling data embedded in assistant replies. The backend signals a
//! timezone request or bookable slots inside free text; replies are mined
//! for `YYYY-MM-DDTHH:mm:ss±HH:mm` timestamps and fixed marker phrases.
//! A structured `suggested_slots` field on the chat response, when the
//! backend sends one, takes precedence over text mining.

use once_cell::sync::Lazy;
use regex::Regex;

static ISO_SLOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{2}:\d{2}").unwrap()
});

static ISO_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}T").unwrap());

const TIMEZONE_MARKER: &str = "timezone";
const CONFIRMATION_MARKER: &str = "demo booked successfully";

/// All embedded ISO-8601 slot timestamps, in order of appearance.
pub fn extract_iso_slots(reply: &str) -> Vec<String> {
    ISO_SLOT_RE
        .find_iter(reply)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Remove every extracted timestamp from the displayed text.
pub fn strip_slots(reply: &str, slots: &[String]) -> String {
    let mut cleaned = reply.to_string();
    for slot in slots {
        cleaned = cleaned.replace(slot.as_str(), "");
    }
    cleaned.trim().to_string()
}

pub fn is_timezone_request(reply: &str) -> bool {
    reply.to_lowercase().contains(TIMEZONE_MARKER)
}

pub fn is_booking_confirmation(reply: &str) -> bool {
    reply.to_lowercase().contains(CONFIRMATION_MARKER)
}

/// Whether an option value is a raw ISO timestamp (redisplayed localized)
/// rather than a timezone name (displayed as-is).
pub fn is_iso_timestamp(value: &str) -> bool {
    ISO_PREFIX_RE.is_match(value)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatOptions {
    None,
    Timezones,
    Slots(Vec<String>),
}

impl ChatOptions {
    pub fn is_none(&self) -> bool {
        matches!(self, ChatOptions::None)
    }
}

/// Everything a turn needs to know about one assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatDirective {
    pub display_text: String,
    pub options: ChatOptions,
    pub booking_confirmed: bool,
}

pub fn inspect_reply(reply: &str, suggested_slots: &[String]) -> ChatDirective {
    let mined = extract_iso_slots(reply);
    let display_text = strip_slots(reply, &mined);

    let slots = if suggested_slots.is_empty() {
        mined
    } else {
        suggested_slots.to_vec()
    };

    let options = if is_timezone_request(reply) {
        ChatOptions::Timezones
    } else if !slots.is_empty() {
        ChatOptions::Slots(slots)
    } else {
        ChatOptions::None
    };

    ChatDirective {
        display_text,
        options,
        booking_confirmed: is_booking_confirmation(reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_exact_iso_substrings() {
        let reply = "Here are some times: 2025-06-01T09:00:00+10:00 and 2025-06-01T14:30:00-05:00.";
        assert_eq!(
            extract_iso_slots(reply),
            vec![
                "2025-06-01T09:00:00+10:00".to_string(),
                "2025-06-01T14:30:00-05:00".to_string()
            ]
        );
    }

    #[test]
    fn ignores_partial_timestamps() {
        assert!(extract_iso_slots("see you on 2025-06-01 at 09:00").is_empty());
        assert!(extract_iso_slots("2025-06-01T09:00:00Z").is_empty());
    }

    #[test]
    fn strips_all_slots_from_display_text() {
        let reply = "Pick one: 2025-06-01T09:00:00+10:00 or 2025-06-01T10:00:00+10:00";
        let slots = extract_iso_slots(reply);
        let cleaned = strip_slots(reply, &slots);
        assert_eq!(cleaned, "Pick one:  or");
        assert!(!cleaned.contains("2025"));
    }

    #[test]
    fn markers_match_case_insensitively() {
        assert!(is_timezone_request("What TimeZone are you in?"));
        assert!(!is_timezone_request("what time suits you?"));
        assert!(is_booking_confirmation("Your Demo Booked Successfully!"));
        assert!(!is_booking_confirmation("your demo is pending"));
    }

    #[test]
    fn timezone_request_wins_over_embedded_slots() {
        let reply = "Share your timezone first; e.g. 2025-06-01T09:00:00+10:00";
        let directive = inspect_reply(reply, &[]);
        assert_eq!(directive.options, ChatOptions::Timezones);
        assert!(!directive.display_text.contains("2025-06-01T09:00:00+10:00"));
    }

    #[test]
    fn slots_produce_slot_options() {
        let directive = inspect_reply("How about 2025-06-01T09:00:00+10:00?", &[]);
        assert_eq!(
            directive.options,
            ChatOptions::Slots(vec!["2025-06-01T09:00:00+10:00".to_string()])
        );
        assert_eq!(directive.display_text, "How about ?");
        assert!(!directive.booking_confirmed);
    }

    #[test]
    fn structured_slots_take_precedence_over_mining() {
        let suggested = vec!["2025-06-02T11:00:00+10:00".to_string()];
        let directive = inspect_reply("How about 2025-06-01T09:00:00+10:00?", &suggested);
        assert_eq!(directive.options, ChatOptions::Slots(suggested));
    }

    #[test]
    fn plain_reply_yields_no_options() {
        let directive = inspect_reply("We track parcels end to end.", &[]);
        assert!(directive.options.is_none());
        assert_eq!(directive.display_text, "We track parcels end to end.");
    }

    #[test]
    fn confirmation_sets_flag() {
        let directive = inspect_reply("Great news, demo booked successfully.", &[]);
        assert!(directive.booking_confirmed);
    }

    #[test]
    fn iso_timestamp_detection() {
        assert!(is_iso_timestamp("2025-06-01T09:00:00+10:00"));
        assert!(!is_iso_timestamp("Australia/Sydney"));
    }
}
