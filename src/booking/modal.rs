use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::booking::flow::{BookingAction, BookingFlow, Field, Step};
use crate::booking::model::{AvailabilityResponse, FormErrors};
use crate::config;
use crate::utils::api::ApiClient;
use crate::utils::time::{default_timezone, detect_timezone, format_slot, BOOKING_TIMEZONES};

const COUNTRY_CODES: &[(&str, &str)] = &[
    ("🇦🇺", "+61"),
    ("🇮🇳", "+91"),
    ("🇺🇸", "+1"),
    ("🇬🇧", "+44"),
];

/// Reset is deferred so the closing animation finishes before the wizard
/// snaps back to its first step.
const CLOSE_RESET_DELAY_MS: u32 = 300;

#[derive(Properties, PartialEq)]
pub struct BookDemoModalProps {
    pub open: bool,
    pub on_close: Callback<()>,
}

fn field_error(error: &Option<String>) -> Html {
    match error {
        Some(message) => html! { <p class="field-error">{ message }</p> },
        None => html! {},
    }
}

#[function_component]
pub fn BookDemoModal(props: &BookDemoModalProps) -> Html {
    let flow = use_reducer(|| BookingFlow::new(default_timezone(&detect_timezone())));
    let submitting = use_state(|| false);

    // Availability is fetched once per modal lifecycle; the guard resets
    // only after a close completes its deferred reset.
    {
        let flow = flow.clone();
        let has_fetched = flow.has_fetched;
        use_effect_with_deps(
            move |(open, _has_fetched)| {
                if *open && flow.needs_fetch() {
                    flow.dispatch(BookingAction::BeginFetch);
                    let flow = flow.clone();
                    spawn_local(async move {
                        match ApiClient::get(config::BOOKING_AVAILABILITY)
                            .send_json::<AvailabilityResponse>()
                            .await
                        {
                            Ok(response) if response.success => {
                                flow.dispatch(BookingAction::AvailabilityLoaded(response.data));
                            }
                            Ok(response) => {
                                log::warn!("availability request refused: {}", response.message);
                                flow.dispatch(BookingAction::FetchFailed);
                            }
                            Err(err) => {
                                log::error!("availability fetch failed: {}", err);
                                flow.dispatch(BookingAction::FetchFailed);
                            }
                        }
                    });
                }
                || ()
            },
            (props.open, has_fetched),
        );
    }

    let handle_close = {
        let flow = flow.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
            let flow = flow.clone();
            Timeout::new(CLOSE_RESET_DELAY_MS, move || {
                flow.dispatch(BookingAction::Reset);
            })
            .forget();
        })
    };

    let on_back = {
        let flow = flow.clone();
        Callback::from(move |_: MouseEvent| flow.dispatch(BookingAction::Back))
    };

    let on_timezone_change = {
        let flow = flow.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            flow.dispatch(BookingAction::SetTimezone(value));
        })
    };

    let on_country_change = {
        let flow = flow.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            flow.dispatch(BookingAction::SetCountryCode(value));
        })
    };

    let on_field = {
        let flow = flow.clone();
        move |field: Field| {
            let flow = flow.clone();
            Callback::from(move |e: InputEvent| {
                let value = e.target_unchecked_into::<HtmlInputElement>().value();
                flow.dispatch(BookingAction::SetField(field, value));
            })
        }
    };

    let on_message = {
        let flow = flow.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            flow.dispatch(BookingAction::SetField(Field::Message, value));
        })
    };

    let on_submit = {
        let flow = flow.clone();
        let submitting = submitting.clone();
        Callback::from(move |_: MouseEvent| {
            if *submitting {
                return;
            }
            let mut snapshot = (*flow).clone();
            match snapshot.try_submit() {
                Some(payload) => {
                    flow.dispatch(BookingAction::RecordErrors(FormErrors::default()));
                    submitting.set(true);
                    let flow = flow.clone();
                    let submitting = submitting.clone();
                    spawn_local(async move {
                        let request = match ApiClient::post(config::BOOKING_CREATE).json(&payload) {
                            Ok(request) => request,
                            Err(err) => {
                                log::error!("failed to encode booking request: {}", err);
                                submitting.set(false);
                                return;
                            }
                        };
                        match request.send_json::<serde_json::Value>().await {
                            Ok(_) => flow.dispatch(BookingAction::Booked),
                            Err(err) => log::error!("booking submission failed: {}", err),
                        }
                        submitting.set(false);
                    });
                }
                None => flow.dispatch(BookingAction::RecordErrors(snapshot.errors)),
            }
        })
    };

    if !props.open {
        return html! {};
    }

    let body = match flow.step {
        Step::Date => html! {
            <div class="booking-step">
                <h2 class="booking-title">{ "Select Date" }</h2>
                <p class="booking-subtitle">{ "Choose your timezone" }</p>
                <select class="booking-timezone" onchange={on_timezone_change}>
                    { for BOOKING_TIMEZONES.iter().map(|tz| html! {
                        <option value={*tz} selected={flow.timezone == *tz}>{ tz }</option>
                    }) }
                </select>
                if flow.loading {
                    <div class="booking-loading">{ "Loading available dates..." }</div>
                } else {
                    <div class="booking-dates">
                        { for flow.availability.iter().map(|day| {
                            let date_label = day
                                .available_slots
                                .first()
                                .and_then(|slot| format_slot(slot, &flow.timezone))
                                .map(|label| label.date_label)
                                .unwrap_or_else(|| day.date.clone());
                            let date = day.date.clone();
                            let flow = flow.clone();
                            html! {
                                <button
                                    key={day.date.clone()}
                                    class="booking-date"
                                    onclick={Callback::from(move |_| {
                                        flow.dispatch(BookingAction::SelectDate(date.clone()));
                                    })}
                                >
                                    <span>{ date_label }</span>
                                    <span class="booking-date-count">
                                        { format!("{} slots", day.available_slots.len()) }
                                    </span>
                                </button>
                            }
                        }) }
                    </div>
                }
            </div>
        },
        Step::Time => html! {
            <div class="booking-step">
                <h2 class="booking-title">{ "Select Time" }</h2>
                <div class="booking-times">
                    { for flow.slots_for_selected_date().iter().map(|slot| {
                        let time_label = format_slot(slot, &flow.timezone)
                            .map(|label| label.time_label)
                            .unwrap_or_else(|| slot.clone());
                        let slot = slot.clone();
                        let flow = flow.clone();
                        html! {
                            <button
                                key={slot.clone()}
                                class="booking-time"
                                onclick={Callback::from(move |_| {
                                    flow.dispatch(BookingAction::SelectSlot(slot.clone()));
                                })}
                            >
                                { time_label }
                            </button>
                        }
                    }) }
                </div>
                <button class="booking-back" onclick={on_back}>{ "Back" }</button>
            </div>
        },
        Step::Form => html! {
            <div class="booking-step">
                <h2 class="booking-title">{ "Complete Booking" }</h2>
                <div class="booking-form">
                    <input
                        type="text"
                        placeholder="Name"
                        value={flow.form.name.clone()}
                        oninput={on_field(Field::Name)}
                    />
                    { field_error(&flow.errors.name) }
                    <input
                        type="text"
                        placeholder="Business Name"
                        value={flow.form.company.clone()}
                        oninput={on_field(Field::Company)}
                    />
                    { field_error(&flow.errors.company) }
                    <input
                        type="email"
                        placeholder="Work Email"
                        value={flow.form.email.clone()}
                        oninput={on_field(Field::Email)}
                    />
                    { field_error(&flow.errors.email) }
                    <div class="booking-phone">
                        <select onchange={on_country_change}>
                            { for COUNTRY_CODES.iter().map(|(flag, code)| html! {
                                <option value={*code} selected={flow.country_code == *code}>
                                    { format!("{} {}", flag, code) }
                                </option>
                            }) }
                        </select>
                        <input
                            type="tel"
                            placeholder="Phone"
                            value={flow.form.phone.clone()}
                            oninput={on_field(Field::Phone)}
                        />
                    </div>
                    { field_error(&flow.errors.phone) }
                    <textarea
                        placeholder="Message (Optional)"
                        value={flow.form.message.clone()}
                        oninput={on_message}
                    />
                    { field_error(&flow.errors.message) }
                </div>
                <div class="booking-actions">
                    <button class="booking-back" onclick={on_back}>{ "Back" }</button>
                    <button class="booking-submit" disabled={*submitting} onclick={on_submit}>
                        { if *submitting { "Booking..." } else { "Confirm Booking" } }
                    </button>
                </div>
            </div>
        },
        Step::Success => html! {
            <div class="booking-step booking-success">
                <h2 class="booking-title">{ "Demo Booked Successfully!" }</h2>
                <p class="booking-subtitle">
                    { "We've sent a calendar invite to your email." }
                </p>
                <button class="booking-done" onclick={handle_close.clone()}>{ "Done" }</button>
            </div>
        },
    };

    html! {
        <div class="modal-overlay">
            <div class="modal booking-modal">
                <button class="modal-close" onclick={handle_close}>{ "×" }</button>
                { body }
            </div>
        </div>
    }
}
