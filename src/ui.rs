use crate::api::ChatGptClient;
use crate::error::PollError;
use crate::poller::{Command, PollState, Poller};
use crate::settings::SettingsStore;
use crate::sink::DisplaySink;
use crate::theme::{BASE_CSS, ThemeMode, theme_css};
use crate::translate::OpenAiTranslator;
use crate::types::{DisplayedMessage, Translation};
use crate::views::{ConversationView, SettingsView};
use dioxus::prelude::*;
use futures::channel::mpsc::UnboundedReceiver;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTab {
    Conversation,
    Settings,
}

/// Everything the poller shows, as signals the views subscribe to.
#[derive(Clone, Copy, PartialEq)]
pub struct DisplayState {
    pub messages: Signal<Vec<DisplayedMessage>>,
    pub error: Signal<Option<String>>,
    pub conversation: Signal<Option<(String, Option<String>)>>,
    pub state: Signal<PollState>,
}

impl DisplayState {
    fn new() -> Self {
        Self {
            messages: Signal::new(Vec::new()),
            error: Signal::new(None),
            conversation: Signal::new(None),
            state: Signal::new(PollState::Idle),
        }
    }
}

struct SignalSink {
    display: DisplayState,
}

impl DisplaySink for SignalSink {
    fn append(&mut self, messages: &[DisplayedMessage]) {
        self.display
            .messages
            .with_mut(|shown| shown.extend_from_slice(messages));
    }

    fn clear(&mut self) {
        self.display.messages.set(Vec::new());
    }

    fn report_error(&mut self, error: &PollError) {
        self.display.error.set(Some(error.to_string()));
    }

    fn attached(&mut self, conversation_id: &str, title: Option<&str>) {
        self.display
            .conversation
            .set(Some((conversation_id.to_string(), title.map(str::to_string))));
    }

    fn translated(&mut self, message_id: &str, translation: &Translation) {
        self.display.messages.with_mut(|shown| {
            if let Some(message) = shown.iter_mut().find(|m| m.id == message_id) {
                message.translation = translation.clone();
            }
        });
    }

    fn state_changed(&mut self, state: PollState) {
        if state != PollState::Idle {
            self.display.error.set(None);
        }
        self.display.state.set(state);
    }
}

#[component]
pub fn App() -> Element {
    let store = use_signal(consume_context::<SettingsStore>);
    let active_tab = use_signal(|| AppTab::Conversation);
    let theme = use_signal(ThemeMode::default);
    let display = use_context_provider(DisplayState::new);

    use_coroutine(move |commands: UnboundedReceiver<Command>| {
        let settings = store.peek().settings().clone();
        let mut error = display.error;
        async move {
            let client = match ChatGptClient::from_env() {
                Ok(client) => client,
                Err(err) => {
                    tracing::error!("failed to create HTTP client: {}", err);
                    error.set(Some(err.to_string()));
                    return;
                }
            };
            tracing::info!("polling {}", client.base_url());
            let mut poller = Poller::new(client, SignalSink { display }, settings)
                .with_translator(OpenAiTranslator::default());
            poller.run(commands).await;
        }
    });

    rsx! {
        style { dangerous_inner_html: "{BASE_CSS}" }
        style { dangerous_inner_html: "{theme_css(theme())}" }
        AppHeader { active_tab, state: (display.state)() }
        div { class: "tab-panels",
            TabPanel {
                active_tab,
                tab: AppTab::Conversation,
                children: rsx!( ConversationView { store } ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Settings,
                children: rsx!( SettingsView { store, theme } ),
            }
        }
    }
}

#[component]
fn AppHeader(active_tab: Signal<AppTab>, state: PollState) -> Element {
    rsx! {
        div { class: "header",
            div { class: "tabs",
                TabButton { active_tab, tab: AppTab::Conversation, label: "Conversation" }
                TabButton { active_tab, tab: AppTab::Settings, label: "Settings" }
            }
            span { class: "status", "{state.label()}" }
        }
    }
}

#[component]
fn TabPanel(active_tab: Signal<AppTab>, tab: AppTab, children: Element) -> Element {
    let is_active = active_tab() == tab;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        div {
            class: format_args!("tab-panel {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            {children}
        }
    }
}

#[component]
fn TabButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab {
        "tab active"
    } else {
        "tab"
    };
    rsx! {
        h1 {
            class: class,
            onclick: move |_| active_tab.set(tab),
            "{label}"
        }
    }
}
