use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::chat::extract::{inspect_reply, is_iso_timestamp, ChatOptions};
use crate::chat::session::ChatSession;
use crate::chat::state::{ChatAction, ChatState, Role};
use crate::config;
use crate::utils::api::ApiClient;
use crate::utils::storage::BrowserStorage;
use crate::utils::time::{
    detect_timezone, format_slot, format_slot_full, group_slots_by_date, CHAT_TIMEZONES,
};

#[derive(Serialize)]
struct ChatRequest {
    session_id: String,
    message: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[allow(dead_code)]
    session_id: String,
    reply: String,
    #[serde(default)]
    suggested_slots: Vec<String>,
}

const REVEAL_DELAY_MS: u32 = 10;
const RESET_DELAY_MS: u32 = 3_000;

/// One user turn: POST to the chat endpoint, reveal the reply character by
/// character, then surface any option buttons the reply asked for. A failed
/// call just stops the typing indicator; the conversation is left as-is.
async fn send_to_backend(
    message: String,
    session: ChatSession,
    state: UseReducerHandle<ChatState>,
    is_typing: UseStateHandle<bool>,
    reveal_cancelled: Rc<Cell<bool>>,
) {
    is_typing.set(true);

    let request = ChatRequest {
        session_id: session.ensure_id(),
        message,
    };

    let request = match ApiClient::post(config::CHATBOT_CHAT).json(&request) {
        Ok(request) => request,
        Err(err) => {
            log::error!("failed to encode chat request: {}", err);
            is_typing.set(false);
            return;
        }
    };

    match request.send_json::<ChatResponse>().await {
        Ok(response) => {
            let directive = inspect_reply(&response.reply, &response.suggested_slots);

            let id = Uuid::new_v4().to_string();
            state.dispatch(ChatAction::BeginAssistant(id.clone()));
            let mut revealed = String::new();
            for ch in directive.display_text.chars() {
                // The reveal stops when the conversation panel goes away.
                if reveal_cancelled.get() {
                    break;
                }
                TimeoutFuture::new(REVEAL_DELAY_MS).await;
                revealed.push(ch);
                state.dispatch(ChatAction::SetContent {
                    id: id.clone(),
                    content: revealed.clone(),
                });
            }

            state.dispatch(ChatAction::ApplyOptions(directive.options));

            if directive.booking_confirmed {
                session.clear();
                state.dispatch(ChatAction::EndBooking);
                let state = state.clone();
                Timeout::new(RESET_DELAY_MS, move || {
                    state.dispatch(ChatAction::ResetGreeting);
                })
                .forget();
            }
        }
        Err(err) => {
            log::error!("chat request failed: {}", err);
        }
    }

    is_typing.set(false);
}

#[function_component]
fn ChatPanel() -> Html {
    let state = use_reducer(ChatState::new);
    let input = use_state(String::new);
    let is_typing = use_state(|| false);
    let reveal_cancelled = use_state(|| Rc::new(Cell::new(false)));

    let session = ChatSession::new(Rc::new(BrowserStorage));
    let timezone = detect_timezone();

    {
        let flag = (*reveal_cancelled).clone();
        use_effect_with_deps(move |_| move || flag.set(true), ());
    }

    let send = {
        let session = session.clone();
        let state = state.clone();
        let is_typing = is_typing.clone();
        let reveal_cancelled = reveal_cancelled.clone();
        Callback::from(move |message: String| {
            spawn_local(send_to_backend(
                message,
                session.clone(),
                state.clone(),
                is_typing.clone(),
                (*reveal_cancelled).clone(),
            ));
        })
    };

    let onsubmit = {
        let input = input.clone();
        let state = state.clone();
        let is_typing = is_typing.clone();
        let send = send.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *is_typing {
                return;
            }
            let message = input.trim().to_string();
            if message.is_empty() {
                return;
            }
            state.dispatch(ChatAction::PushUser(message.clone()));
            state.dispatch(ChatAction::ClearOptions);
            input.set(String::new());
            send.emit(message);
        })
    };

    let oninput = {
        let input = input.clone();
        Callback::from(move |e: InputEvent| {
            let field: HtmlInputElement = e.target_unchecked_into();
            input.set(field.value());
        })
    };

    let on_option = {
        let state = state.clone();
        let is_typing = is_typing.clone();
        let send = send.clone();
        let timezone = timezone.clone();
        Callback::from(move |value: String| {
            if *is_typing {
                return;
            }
            // Slots are shown localized but sent back as the raw ISO value.
            let display = if is_iso_timestamp(&value) {
                format_slot_full(&value, &timezone).unwrap_or_else(|| value.clone())
            } else {
                value.clone()
            };
            state.dispatch(ChatAction::ClearOptions);
            state.dispatch(ChatAction::PushUser(display));
            send.emit(value);
        })
    };

    let on_cancel = {
        let state = state.clone();
        let session = session.clone();
        Callback::from(move |_| {
            session.clear();
            state.dispatch(ChatAction::Cancel);
        })
    };

    let options = match &state.options {
        ChatOptions::None => html! {},
        ChatOptions::Timezones => html! {
            <div class="chat-options">
                { for CHAT_TIMEZONES.iter().map(|tz| {
                    let on_option = on_option.clone();
                    let value = tz.to_string();
                    html! {
                        <button
                            class="chat-option"
                            onclick={Callback::from(move |_| on_option.emit(value.clone()))}
                        >
                            { tz }
                        </button>
                    }
                }) }
            </div>
        },
        ChatOptions::Slots(slots) => html! {
            <div class="chat-options">
                { for group_slots_by_date(slots, &timezone).into_iter().map(|(date_label, group)| html! {
                    <div class="chat-option-group">
                        <p class="chat-option-date">{ date_label }</p>
                        <div class="chat-option-slots">
                            { for group.into_iter().map(|slot| {
                                let on_option = on_option.clone();
                                let time_label = format_slot(&slot, &timezone)
                                    .map(|label| label.time_label)
                                    .unwrap_or_else(|| slot.clone());
                                let value = slot.clone();
                                html! {
                                    <button
                                        class="chat-option"
                                        onclick={Callback::from(move |_| on_option.emit(value.clone()))}
                                    >
                                        { time_label }
                                    </button>
                                }
                            }) }
                        </div>
                    </div>
                }) }
            </div>
        },
    };

    html! {
        <>
            <div class="chat-messages">
                { for state.messages.iter().map(|message| {
                    let class = match message.role {
                        Role::User => "chat-message user",
                        Role::Assistant => "chat-message assistant",
                    };
                    html! {
                        <div key={message.id.clone()} class={class}>
                            <div class="chat-bubble">{ &message.content }</div>
                        </div>
                    }
                }) }
                { options }
                if *is_typing {
                    <div class="chat-message assistant">
                        <div class="chat-bubble typing-indicator">
                            <span></span><span></span><span></span>
                        </div>
                    </div>
                }
            </div>
            if state.booking_active {
                <div class="chat-cancel">
                    <button class="chat-cancel-button" onclick={on_cancel}>
                        { "Cancel Booking" }
                    </button>
                </div>
            }
            <form class="chat-input" {onsubmit}>
                <input
                    type="text"
                    value={(*input).clone()}
                    {oninput}
                    placeholder="Ask about tracking, pricing, demo..."
                />
                <button type="submit">{ "Send" }</button>
            </form>
        </>
    }
}

/// Floating chat launcher. The conversation panel mounts lazily (5s after
/// page load or on first click) and unmounts on close, which also cancels
/// any in-flight reply reveal.
#[function_component]
pub fn AiChatWidget() -> Html {
    let is_open = use_state(|| false);
    let should_load = use_state(|| false);
    let show_tooltip = use_state(|| false);

    {
        let should_load = should_load.clone();
        use_effect_with_deps(
            move |_| {
                let timer = Timeout::new(5_000, move || should_load.set(true));
                move || drop(timer)
            },
            (),
        );
    }

    {
        let show_tooltip = show_tooltip.clone();
        use_effect_with_deps(
            move |(should_load, is_open)| {
                let timers = (*should_load && !*is_open).then(|| {
                    let show = {
                        let show_tooltip = show_tooltip.clone();
                        Timeout::new(1_000, move || show_tooltip.set(true))
                    };
                    let hide = {
                        let show_tooltip = show_tooltip.clone();
                        Timeout::new(6_000, move || show_tooltip.set(false))
                    };
                    (show, hide)
                });
                move || drop(timers)
            },
            (*should_load, *is_open),
        );
    }

    let on_toggle = {
        let is_open = is_open.clone();
        let should_load = should_load.clone();
        let show_tooltip = show_tooltip.clone();
        Callback::from(move |_| {
            should_load.set(true);
            show_tooltip.set(false);
            is_open.set(!*is_open);
        })
    };

    let on_close = {
        let is_open = is_open.clone();
        Callback::from(move |_| is_open.set(false))
    };

    if !*should_load {
        return html! {};
    }

    html! {
        <div class="chat-widget">
            if *show_tooltip && !*is_open {
                <div class="chat-tooltip">
                    <p class="chat-tooltip-title">{ "Need help?" }</p>
                    <p class="chat-tooltip-body">
                        { "Ask about tracking, pricing, or book a demo" }
                    </p>
                </div>
            }
            if *is_open {
                <div class="chat-window">
                    <div class="chat-header">
                        <div>
                            <h3>{ "OneTracker AI" }</h3>
                            <p>{ "Always here to help" }</p>
                        </div>
                        <button class="chat-close" onclick={on_close}>{ "×" }</button>
                    </div>
                    <ChatPanel />
                </div>
            }
            <button class="chat-launcher" onclick={on_toggle}>
                { if *is_open { "×" } else { "💬" } }
            </button>
        </div>
    }
}
