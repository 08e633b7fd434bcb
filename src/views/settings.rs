use crate::poller::Command;
use crate::settings::{
    CUTOFF_RANGE, KEY_AUTH_TOKEN, KEY_CUTOFF, KEY_LANGUAGE, KEY_OPENAI_API_KEY,
    KEY_RETRIEVAL_SPEED, LANGUAGES, RETRIEVAL_SPEED_RANGE, Settings, SettingsStore,
};
use crate::theme::ThemeMode;
use crate::translate::language_name;
use dioxus::prelude::*;

fn update_draft(mut draft: Signal<Settings>, key: &str, value: String) {
    draft.with_mut(|settings| {
        if let Err(err) = settings.set(key, &value) {
            tracing::warn!("{}", err);
        }
    });
}

#[component]
pub fn SettingsView(store: Signal<SettingsStore>, theme: Signal<ThemeMode>) -> Element {
    let mut store = store;
    let mut theme = theme;
    let poller = use_coroutine_handle::<Command>();
    let draft = use_signal(|| store.peek().settings().clone());
    let mut status = use_signal(|| Option::<String>::None);

    let on_save = move |_| {
        let settings = draft();
        match store.with_mut(|store| store.save(settings.clone())) {
            Ok(()) => {
                tracing::info!("settings saved");
                poller.send(Command::UpdateSettings(settings));
                status.set(Some("Saved".to_string()));
            }
            Err(err) => {
                tracing::error!("failed to save settings: {}", err);
                status.set(Some(err.to_string()));
            }
        }
    };

    let current = draft();
    let path = store.read().path().display().to_string();
    let speed_label = format!("Retrieval speed: {:.2}s", current.retrieval_speed);
    let cutoff_label = format!(
        "Latest conversation cutoff: {:.0}s",
        current.latest_conversation_cutoff
    );
    let (speed_min, speed_max) = RETRIEVAL_SPEED_RANGE;
    let (cutoff_min, cutoff_max) = CUTOFF_RANGE;

    rsx! {
        div { class: "main-container",
            div { class: "settings-section",
                h3 { class: "section-title", "Account" }
                div { class: "field",
                    label { "Auth token" }
                    input {
                        r#type: "password",
                        placeholder: "Bearer token from the chat web app",
                        value: "{current.auth_token}",
                        oninput: move |ev| update_draft(draft, KEY_AUTH_TOKEN, ev.value()),
                    }
                }
                div { class: "field",
                    label { "OpenAI API key (translation)" }
                    input {
                        r#type: "password",
                        value: "{current.openai_api_key}",
                        oninput: move |ev| update_draft(draft, KEY_OPENAI_API_KEY, ev.value()),
                    }
                }
            }
            div { class: "settings-section",
                h3 { class: "section-title", "Polling" }
                div { class: "field",
                    label { "{speed_label}" }
                    input {
                        r#type: "range",
                        min: "{speed_min}",
                        max: "{speed_max}",
                        step: "0.25",
                        value: "{current.retrieval_speed}",
                        oninput: move |ev| update_draft(draft, KEY_RETRIEVAL_SPEED, ev.value()),
                    }
                }
                div { class: "field",
                    label { "{cutoff_label}" }
                    input {
                        r#type: "range",
                        min: "{cutoff_min}",
                        max: "{cutoff_max}",
                        step: "1",
                        value: "{current.latest_conversation_cutoff}",
                        oninput: move |ev| update_draft(draft, KEY_CUTOFF, ev.value()),
                    }
                }
            }
            div { class: "settings-section",
                h3 { class: "section-title", "Language" }
                div { class: "field",
                    select {
                        value: "{current.selected_language}",
                        onchange: move |ev| update_draft(draft, KEY_LANGUAGE, ev.value()),
                        for code in LANGUAGES {
                            option {
                                value: "{code}",
                                selected: *code == current.selected_language,
                                "{language_name(code)}"
                            }
                        }
                    }
                }
            }
            div { class: "settings-section",
                h3 { class: "section-title", "Display" }
                div { class: "theme-toggle",
                    for mode in [ThemeMode::Dark, ThemeMode::Light] {
                        button {
                            class: format_args!(
                                "btn theme-option {}",
                                if theme() == mode { "active" } else { "" }
                            ),
                            r#type: "button",
                            onclick: move |_| theme.set(mode),
                            "{mode.label()}"
                        }
                    }
                }
            }
            div { class: "toolbar",
                button { class: "btn btn-primary", r#type: "button", onclick: on_save, "Save" }
                if let Some(message) = status() {
                    span { class: "status", "{message}" }
                }
            }
            p { class: "text-muted", "Stored in {path}" }
        }
    }
}
