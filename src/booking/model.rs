use serde::{Deserialize, Serialize};

/// One day of bookable slots as served by the availability endpoint.
/// Dates are unique within a response; slot order is the server's.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AvailabilityDay {
    pub date: String,
    pub available_slots: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Vec<AvailabilityDay>,
}

/// Payload for the booking-create endpoint. `booking_datetime` is always
/// the originally served UTC ISO string, never a localized rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRequest {
    pub name: String,
    pub business_name: String,
    pub work_email: String,
    pub contact_number: String,
    pub booking_datetime: String,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Mutable form draft. Lives only while the modal is open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.message.is_none()
    }
}

fn is_letters_and_spaces(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || value.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// Rules run in schema order and the last failing rule wins per field,
/// so an all-letters phone reports "Only numbers allowed" rather than the
/// length message.
fn field_error(checks: &[(bool, &str)]) -> Option<String> {
    checks
        .iter()
        .filter(|(failed, _)| *failed)
        .last()
        .map(|(_, message)| message.to_string())
}

pub fn validate(form: &DemoForm) -> FormErrors {
    let name_len = form.name.chars().count();
    let phone_len = form.phone.chars().count();
    let company_len = form.company.chars().count();

    FormErrors {
        name: field_error(&[
            (name_len < 2, "Name too short"),
            (name_len > 100, "Name too long"),
            (!is_letters_and_spaces(&form.name), "Only letters allowed"),
        ]),
        email: field_error(&[
            (!is_valid_email(&form.email), "Invalid email format"),
            (form.email.chars().count() > 255, "Email too long"),
        ]),
        phone: field_error(&[
            (phone_len < 6, "Invalid phone number"),
            (phone_len > 15, "Phone number too long"),
            (!is_digits(&form.phone), "Only numbers allowed"),
        ]),
        company: field_error(&[
            (company_len < 2, "Company name too short"),
            (company_len > 100, "Company name too long"),
        ]),
        message: field_error(&[(form.message.chars().count() > 500, "Message too long")]),
    }
}
