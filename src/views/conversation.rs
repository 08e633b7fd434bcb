use crate::markdown::{first_code_block, to_html};
use crate::poller::{Command, PollState};
use crate::reconcile::sort_chronologically;
use crate::settings::SettingsStore;
use crate::sink::format_create_time;
use crate::translate::wants_translation;
use crate::transliteration::{RomanizationMap, Segment};
use crate::types::{DisplayedMessage, Translation};
use crate::ui::DisplayState;
use dioxus::prelude::*;
use std::path::PathBuf;

#[component]
pub fn ConversationView(store: Signal<SettingsStore>) -> Element {
    let DisplayState {
        messages,
        mut error,
        conversation,
        state,
    } = use_context();
    let poller = use_coroutine_handle::<Command>();
    let mut chronological = use_signal(|| false);

    let settings = store.read().settings().clone();
    let show_translation = wants_translation(&settings);
    let maps_dir = store
        .read()
        .path()
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let mut shown = messages();
    if chronological() {
        sort_chronologically(&mut shown);
    }
    let heading = conversation().map(|(id, title)| {
        format!("{} · {}", title.as_deref().unwrap_or("New Conversation"), id)
    });
    let button_label = if state() == PollState::Idle {
        "Retrieve"
    } else {
        "Stop"
    };

    rsx! {
        div { class: "main-container",
            div { class: "toolbar",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: state() == PollState::LocatingConversation,
                    onclick: move |_| poller.send(Command::Toggle),
                    "{button_label}"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| poller.send(Command::Clear),
                    "Clear"
                }
                label { class: "status",
                    input {
                        r#type: "checkbox",
                        checked: chronological(),
                        onchange: move |ev| chronological.set(ev.checked()),
                    }
                    " by time"
                }
            }
            if let Some(message) = error() {
                div { class: "error-banner",
                    span { "Error: {message}" }
                    button { class: "action-btn", onclick: move |_| error.set(None), "Dismiss" }
                }
            }
            if let Some(heading) = heading {
                div { class: "conversation-meta", "{heading}" }
            }
            div { class: "chat-list",
                for message in shown {
                    MessageBubble {
                        key: "{message.id}",
                        message: message.clone(),
                        show_translation,
                        language: settings.selected_language.clone(),
                        maps_dir: maps_dir.clone(),
                    }
                }
            }
        }
    }
}

#[component]
fn MessageBubble(
    message: DisplayedMessage,
    show_translation: bool,
    language: String,
    maps_dir: PathBuf,
) -> Element {
    let mut segments = use_signal(|| Option::<Vec<Segment>>::None);
    let side = if message.is_user { "user" } else { "assistant" };
    let content_html = to_html(&message.text);
    let timestamp = format_create_time(message.create_time);
    let code = first_code_block(&message.text);
    let has_code = code.is_some();

    let romanize_text = message.text.clone();
    let on_romanize = move |_| {
        if segments.peek().is_some() {
            segments.set(None);
            return;
        }
        match RomanizationMap::for_language(&language, &maps_dir) {
            Ok(Some(map)) => segments.set(Some(map.segments(&romanize_text))),
            Ok(None) => tracing::info!("no romanization for {}", language),
            Err(err) => tracing::warn!("failed to load romanization map: {}", err),
        }
    };

    let on_copy_code = move |_| {
        let Some(block) = code.clone() else {
            return;
        };
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(err) = clipboard.set_text(block.code) {
                    tracing::warn!("failed to copy code: {}", err);
                }
            }
            Err(err) => tracing::warn!("clipboard unavailable: {}", err),
        }
    };

    rsx! {
        div { class: "message-row {side}",
            div { class: "message-stack",
                div { class: "bubble {side}",
                    if let Some(parts) = segments() {
                        div { class: "romanization",
                            for segment in parts {
                                if segment.reading.is_empty() {
                                    span { "{segment.text}" }
                                } else {
                                    ruby { "{segment.text}" rt { "{segment.reading}" } }
                                }
                            }
                        }
                    } else {
                        div { class: "md", dangerous_inner_html: "{content_html}" }
                    }
                }
                if show_translation && message.translation != Translation::Unavailable {
                    div { class: "translation", "{message.translation.label()}" }
                }
                div { class: "message-meta",
                    if let Some(ts) = timestamp {
                        span { "{ts}" }
                    }
                    button { class: "action-btn", onclick: on_romanize, "Romanize" }
                    if has_code {
                        button { class: "action-btn", title: "Copy code", onclick: on_copy_code, "Copy code" }
                    }
                }
            }
        }
    }
}
