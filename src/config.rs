//! Backend endpoint configuration. Base URL and API key are supplied at
//! build time; without both the API client refuses to issue requests.

pub const BOOKING_AVAILABILITY: &str = "/api/v1/booking/availability";
pub const BOOKING_CREATE: &str = "/api/v1/booking";
pub const CHATBOT_CHAT: &str = "/api/v1/chatbot/chat";

pub fn get_backend_url() -> String {
    option_env!("API_BASE_URL").unwrap_or("").to_string()
}

pub fn get_api_key() -> String {
    option_env!("API_KEY").unwrap_or("").to_string()
}

pub fn is_configured() -> bool {
    !get_backend_url().is_empty() && !get_api_key().is_empty()
}
