use crate::render::{format_message_timestamp, markdown_to_html};
use crate::session::ChatSession;
use crate::types::{Message, Origin};
use dioxus::events::Key;
use dioxus::prelude::*;

const TYPING_LABEL: &str = "AI is typing...";

#[component]
pub fn ChatView(session: Signal<ChatSession>) -> Element {
    let mut session = session;
    let mut draft = use_signal(String::new);
    let mut upload_notice = use_signal(|| Option::<String>::None);

    let mut send_message = move |text: String| {
        if session.read().in_flight() {
            return;
        }
        let pending = session.write().begin_send(&text);
        let Some(pending) = pending else {
            return;
        };
        draft.set(String::new());
        spawn(async move {
            let outcome = pending.resolve().await;
            session.write().finish_send(outcome);
        });
    };

    let on_file = move |evt: FormEvent| async move {
        let Some(engine) = evt.files() else {
            return;
        };
        let Some(name) = engine.files().into_iter().next() else {
            return;
        };
        let Some(bytes) = engine.read_file(&name).await else {
            upload_notice.set(Some(format!("Could not read {name}.")));
            return;
        };
        let extractor = session.read().extractor();
        match extractor.extract_text(&bytes).await {
            Ok(text) => {
                upload_notice.set(None);
                session.write().attach_document(text);
            }
            Err(err) => {
                tracing::warn!(file = %name, error = %err, "rejected upload");
                upload_notice.set(Some(err.to_string()));
            }
        }
    };

    let rows: Vec<(String, Message)> = session
        .read()
        .current_sequence()
        .iter()
        .map(|msg| (msg.id().to_string(), msg.clone()))
        .collect();
    let typing = session.read().in_flight();
    let has_document = session.read().has_pending_document();

    rsx! {
        div { class: "chat-panel",
            div { id: "chat-list", class: "chat-list",
                for (id, msg) in rows {
                    MessageBubble { key: "{id}", message: msg }
                }
                if typing {
                    div { class: "message-row assistant",
                        div { class: "bubble typing", "{TYPING_LABEL}" }
                    }
                }
            }

            div { class: "composer",
                label { class: "file-picker",
                    "Choose PDF"
                    input {
                        r#type: "file",
                        accept: "application/pdf",
                        disabled: typing,
                        onchange: on_file,
                    }
                }
                input {
                    r#type: "text",
                    placeholder: "Type your message and press Enter...",
                    value: "{draft}",
                    disabled: typing,
                    oninput: move |ev| draft.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter {
                            ev.prevent_default();
                            send_message(draft());
                        }
                    },
                }
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: typing,
                    onclick: move |_| send_message(draft()),
                    "Send"
                }
            }

            if has_document {
                div { class: "pending-doc", "PDF attached to your next message" }
            }
            if let Some(notice) = upload_notice() {
                div { class: "notice", "{notice}" }
            }
        }
    }
}

#[component]
fn MessageBubble(message: Message) -> Element {
    let side = message.origin().as_str();
    let content = message.content().to_string();
    let timestamp = format_message_timestamp(message.created_at());
    let is_assistant = matches!(message.origin(), Origin::Assistant);
    let content_html = if is_assistant {
        markdown_to_html(&content)
    } else {
        String::new()
    };

    rsx! {
        div { class: "message-row {side}",
            if is_assistant {
                div { class: "bubble assistant md", dangerous_inner_html: "{content_html}" }
            } else {
                div { class: "bubble user", "{content}" }
            }
            if let Some(ts) = timestamp {
                span { class: "message-timestamp", "{ts}" }
            }
        }
    }
}
