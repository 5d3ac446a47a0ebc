use std::rc::Rc;

use yew::Reducible;

use crate::booking::model::{validate, AvailabilityDay, BookingRequest, DemoForm, FormErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Date,
    Time,
    Form,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Company,
    Message,
}

/// The booking wizard as a plain state machine. The modal component only
/// renders this and forwards events into it.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingFlow {
    pub step: Step,
    pub availability: Vec<AvailabilityDay>,
    pub has_fetched: bool,
    pub loading: bool,
    pub timezone: String,
    pub country_code: String,
    pub selected_date: Option<String>,
    pub selected_slot: Option<String>,
    pub form: DemoForm,
    pub errors: FormErrors,
}

impl BookingFlow {
    pub fn new(timezone: String) -> Self {
        Self {
            step: Step::Date,
            availability: Vec::new(),
            has_fetched: false,
            loading: false,
            timezone,
            country_code: "+61".to_string(),
            selected_date: None,
            selected_slot: None,
            form: DemoForm::default(),
            errors: FormErrors::default(),
        }
    }

    /// The availability fetch runs once per modal lifecycle; reopening
    /// without a reset must not refetch.
    pub fn needs_fetch(&self) -> bool {
        !self.has_fetched && !self.loading
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    pub fn availability_loaded(&mut self, days: Vec<AvailabilityDay>) {
        self.availability = days;
        self.has_fetched = true;
        self.loading = false;
    }

    /// A failed fetch leaves the list empty and the guard unset, matching
    /// the silent-degradation policy.
    pub fn fetch_failed(&mut self) {
        self.loading = false;
    }

    pub fn select_date(&mut self, date: &str) {
        if self.step != Step::Date {
            return;
        }
        if self.availability.iter().any(|day| day.date == date) {
            self.selected_date = Some(date.to_string());
            self.step = Step::Time;
        }
    }

    pub fn slots_for_selected_date(&self) -> &[String] {
        self.selected_date
            .as_deref()
            .and_then(|date| {
                self.availability
                    .iter()
                    .find(|day| day.date == date)
                    .map(|day| day.available_slots.as_slice())
            })
            .unwrap_or(&[])
    }

    pub fn select_slot(&mut self, slot: &str) {
        if self.step != Step::Time {
            return;
        }
        if self.slots_for_selected_date().iter().any(|s| s == slot) {
            self.selected_slot = Some(slot.to_string());
            self.step = Step::Form;
        }
    }

    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Time => Step::Date,
            Step::Form => Step::Time,
            other => other,
        };
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.form.name = value,
            Field::Email => self.form.email = value,
            // Non-digit input is dropped as the user types.
            Field::Phone => self.form.phone = value.chars().filter(char::is_ascii_digit).collect(),
            Field::Company => self.form.company = value,
            Field::Message => self.form.message = value,
        }
    }

    /// Validate the draft and compose the submission payload. On failure
    /// the per-field errors are recorded and no payload is produced.
    pub fn try_submit(&mut self) -> Option<BookingRequest> {
        if self.step != Step::Form {
            return None;
        }
        let slot = self.selected_slot.clone()?;
        let errors = validate(&self.form);
        if !errors.is_empty() {
            self.errors = errors;
            return None;
        }
        self.errors = FormErrors::default();

        let message = self.form.message.trim();
        Some(BookingRequest {
            name: self.form.name.trim().to_string(),
            business_name: self.form.company.trim().to_string(),
            work_email: self.form.email.trim().to_lowercase(),
            contact_number: format!("{}{}", self.country_code, self.form.phone),
            booking_datetime: slot,
            timezone: self.timezone.clone(),
            message: (!message.is_empty()).then(|| message.to_string()),
        })
    }

    pub fn booked(&mut self) {
        self.step = Step::Success;
    }

    /// Full reset after the modal closes. Clears the fetch guard so the
    /// next open fetches fresh availability; timezone and country code are
    /// user preferences and survive.
    pub fn reset(&mut self) {
        let timezone = self.timezone.clone();
        let country_code = self.country_code.clone();
        *self = Self::new(timezone);
        self.country_code = country_code;
    }
}

pub enum BookingAction {
    BeginFetch,
    AvailabilityLoaded(Vec<AvailabilityDay>),
    FetchFailed,
    SelectDate(String),
    SelectSlot(String),
    Back,
    SetTimezone(String),
    SetCountryCode(String),
    SetField(Field, String),
    RecordErrors(FormErrors),
    Booked,
    Reset,
}

impl Reducible for BookingFlow {
    type Action = BookingAction;

    fn reduce(self: Rc<Self>, action: BookingAction) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            BookingAction::BeginFetch => next.begin_fetch(),
            BookingAction::AvailabilityLoaded(days) => next.availability_loaded(days),
            BookingAction::FetchFailed => next.fetch_failed(),
            BookingAction::SelectDate(date) => next.select_date(&date),
            BookingAction::SelectSlot(slot) => next.select_slot(&slot),
            BookingAction::Back => next.back(),
            BookingAction::SetTimezone(timezone) => next.timezone = timezone,
            BookingAction::SetCountryCode(code) => next.country_code = code,
            BookingAction::SetField(field, value) => next.set_field(field, value),
            BookingAction::RecordErrors(errors) => next.errors = errors,
            BookingAction::Booked => next.booked(),
            BookingAction::Reset => next.reset(),
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_day() -> Vec<AvailabilityDay> {
        vec![AvailabilityDay {
            date: "2025-06-01".to_string(),
            available_slots: vec!["2025-06-01T09:00:00+10:00".to_string()],
        }]
    }

    fn fill_valid_form(flow: &mut BookingFlow) {
        flow.set_field(Field::Name, "Jane Doe".to_string());
        flow.set_field(Field::Email, " Jane@Example.com ".to_string());
        flow.set_field(Field::Phone, "412345678".to_string());
        flow.set_field(Field::Company, "Acme Logistics".to_string());
    }

    #[test]
    fn happy_path_reaches_success() {
        let mut flow = BookingFlow::new("Australia/Sydney".to_string());
        assert!(flow.needs_fetch());
        flow.begin_fetch();
        flow.availability_loaded(one_day());

        flow.select_date("2025-06-01");
        assert_eq!(flow.step, Step::Time);
        assert_eq!(
            flow.slots_for_selected_date(),
            ["2025-06-01T09:00:00+10:00"]
        );

        flow.select_slot("2025-06-01T09:00:00+10:00");
        assert_eq!(flow.step, Step::Form);

        fill_valid_form(&mut flow);
        let payload = flow.try_submit().expect("valid form should submit");
        assert_eq!(payload.booking_datetime, "2025-06-01T09:00:00+10:00");
        assert_eq!(payload.work_email, "jane@example.com");
        assert_eq!(payload.contact_number, "+61412345678");
        assert_eq!(payload.timezone, "Australia/Sydney");
        assert_eq!(payload.message, None);

        flow.booked();
        assert_eq!(flow.step, Step::Success);
    }

    #[test]
    fn fetch_guard_holds_until_reset() {
        let mut flow = BookingFlow::new("Australia/Sydney".to_string());
        flow.begin_fetch();
        assert!(!flow.needs_fetch());
        flow.availability_loaded(one_day());
        // Reopening without closing must not refetch.
        assert!(!flow.needs_fetch());
        flow.reset();
        assert!(flow.needs_fetch());
        assert!(flow.availability.is_empty());
    }

    #[test]
    fn failed_fetch_leaves_list_empty_and_guard_unset() {
        let mut flow = BookingFlow::new("Australia/Sydney".to_string());
        flow.begin_fetch();
        flow.fetch_failed();
        assert!(flow.availability.is_empty());
        assert!(flow.needs_fetch());
    }

    #[test]
    fn invalid_phone_blocks_submission() {
        let mut flow = BookingFlow::new("Australia/Sydney".to_string());
        flow.availability_loaded(one_day());
        flow.select_date("2025-06-01");
        flow.select_slot("2025-06-01T09:00:00+10:00");
        fill_valid_form(&mut flow);
        flow.form.phone = "abc".to_string();

        assert_eq!(flow.try_submit(), None);
        assert_eq!(flow.errors.phone.as_deref(), Some("Only numbers allowed"));
        assert_eq!(flow.step, Step::Form);
    }

    #[test]
    fn phone_input_strips_non_digits() {
        let mut flow = BookingFlow::new("Australia/Sydney".to_string());
        flow.set_field(Field::Phone, "04-12 34a5".to_string());
        assert_eq!(flow.form.phone, "0412345");
    }

    #[test]
    fn back_walks_time_to_date_and_form_to_time() {
        let mut flow = BookingFlow::new("Australia/Sydney".to_string());
        flow.availability_loaded(one_day());
        flow.select_date("2025-06-01");
        flow.select_slot("2025-06-01T09:00:00+10:00");
        flow.back();
        assert_eq!(flow.step, Step::Time);
        flow.back();
        assert_eq!(flow.step, Step::Date);
        flow.back();
        assert_eq!(flow.step, Step::Date);
    }

    #[test]
    fn unknown_date_and_slot_are_ignored() {
        let mut flow = BookingFlow::new("Australia/Sydney".to_string());
        flow.availability_loaded(one_day());
        flow.select_date("2025-06-02");
        assert_eq!(flow.step, Step::Date);
        flow.select_date("2025-06-01");
        flow.select_slot("2025-06-01T10:00:00+10:00");
        assert_eq!(flow.step, Step::Time);
    }

    #[test]
    fn optional_message_is_trimmed_into_payload() {
        let mut flow = BookingFlow::new("Australia/Sydney".to_string());
        flow.availability_loaded(one_day());
        flow.select_date("2025-06-01");
        flow.select_slot("2025-06-01T09:00:00+10:00");
        fill_valid_form(&mut flow);
        flow.set_field(Field::Message, "  keen to see routing  ".to_string());
        let payload = flow.try_submit().unwrap();
        assert_eq!(payload.message.as_deref(), Some("keen to see routing"));
    }
}
