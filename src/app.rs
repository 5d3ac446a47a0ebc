use yew::prelude::*;

use crate::booking::modal::BookDemoModal;
use crate::chat::widget::AiChatWidget;

/// Minimal shell hosting the two interactive widgets. The marketing page
/// set, routing and visual design live outside this crate's scope.
#[function_component]
pub fn App() -> Html {
    let show_demo_modal = use_state(|| false);

    let open_modal = {
        let show_demo_modal = show_demo_modal.clone();
        Callback::from(move |_| show_demo_modal.set(true))
    };

    let close_modal = {
        let show_demo_modal = show_demo_modal.clone();
        Callback::from(move |_| show_demo_modal.set(false))
    };

    html! {
        <div class="app">
            <header class="site-header">
                <span class="brand">{ "OneTracker" }</span>
            </header>
            <main class="hero">
                <h1>{ "Logistics visibility, end to end" }</h1>
                <button class="cta" onclick={open_modal}>{ "Book a demo" }</button>
            </main>
            <BookDemoModal open={*show_demo_modal} on_close={close_modal} />
            <AiChatWidget />
        </div>
    }
}
