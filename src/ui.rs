use crate::config::transport_from_env;
use crate::document::PdfExtractor;
use crate::session::ChatSession;
use crate::views::ChatView;
use dioxus::prelude::*;
use std::sync::Arc;

const ALPHA_CSS: Asset = asset!("/assets/alpha.css");

#[component]
pub fn App() -> Element {
    let session =
        use_signal(|| ChatSession::new(transport_from_env(), Arc::new(PdfExtractor::new())));

    rsx! {
        document::Link { rel: "stylesheet", href: ALPHA_CSS }
        AppHeader { session }
        ChatView { session }
    }
}

#[component]
fn AppHeader(session: Signal<ChatSession>) -> Element {
    let mut session = session;
    let busy = session.read().in_flight();
    rsx! {
        div { class: "header",
            h1 { class: "wordmark", "ALPHA" }
            button {
                class: "btn",
                r#type: "button",
                disabled: busy,
                onclick: move |_| session.write().new_chat(),
                "New chat"
            }
        }
    }
}
