#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }
}

pub fn theme_css(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Dark => DARK_THEME,
        ThemeMode::Light => LIGHT_THEME,
    }
}

/// Layout shared by both themes; colours come from the theme variables.
pub const BASE_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, "Segoe UI", "PingFang SC", sans-serif; }
.header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1rem; border-bottom: 1px solid var(--color-input-border); }
.tabs { display: flex; gap: 1rem; }
.tab { font-size: 1rem; margin: 0; cursor: pointer; color: var(--color-text-muted); }
.tab.active { color: var(--color-text-primary); text-decoration: underline; }
.tab-panel { display: none; }
.tab-panel.active { display: block; }
.main-container { padding: 1rem; }
.toolbar { display: flex; gap: 0.5rem; align-items: center; margin-bottom: 0.75rem; }
.status { color: var(--color-text-muted); font-size: 0.85rem; }
.conversation-meta { color: var(--color-timestamp); font-size: 0.8rem; margin-bottom: 0.75rem; }
.error-banner { border: 1px solid var(--color-error); color: var(--color-error); padding: 0.5rem 0.75rem; margin-bottom: 0.75rem; display: flex; justify-content: space-between; }
.chat-list { display: flex; flex-direction: column; gap: 0.75rem; }
.message-row { display: flex; }
.message-row.user { justify-content: flex-end; }
.message-stack { max-width: 80%; }
.bubble { padding: 0.5rem 0.75rem; border-radius: 0.5rem; border: 1px solid var(--color-input-border); }
.bubble.user { background: var(--color-chat-user-bg); color: var(--color-chat-user-text); }
.bubble.assistant { background: var(--color-chat-assistant-bg); color: var(--color-chat-assistant-text); }
.translation { color: var(--color-text-muted); font-size: 0.85rem; margin-top: 0.25rem; }
.romanization ruby rt { font-size: 0.6rem; color: var(--color-text-muted); }
.message-meta { display: flex; gap: 0.5rem; font-size: 0.75rem; color: var(--color-timestamp); margin-top: 0.25rem; }
.action-btn { background: none; border: none; color: var(--color-text-muted); cursor: pointer; padding: 0; font-size: 0.75rem; }
.btn { border: 1px solid var(--color-border); background: transparent; padding: 0.35rem 0.9rem; cursor: pointer; }
.btn-primary { background: var(--color-text-primary); color: var(--color-bg-primary); }
.settings-section { margin-bottom: 1.25rem; }
.section-title { margin: 0 0 0.5rem; font-size: 0.95rem; }
.field { display: flex; flex-direction: column; gap: 0.25rem; margin-bottom: 0.75rem; }
.field input, .field select { background: var(--color-input-bg); color: var(--color-text-primary); border: 1px solid var(--color-input-border); padding: 0.35rem; }
.theme-toggle { display: flex; gap: 0.5rem; }
.theme-option.active { background: var(--color-surface-muted); }
.text-muted { color: var(--color-text-muted); }
"#;

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #000000;
    --color-text-primary: #ffffff;
    --color-text-muted: #cfcfcf;
    --color-border: #ffffff;
    --color-surface-muted: #111111;
    --color-input-border: #2a2a2a;
    --color-input-bg: #000000;
    --color-chat-user-bg: #ffffff;
    --color-chat-user-text: #000000;
    --color-chat-assistant-bg: #000000;
    --color-chat-assistant-text: #ffffff;
    --color-timestamp: #9b9b9b;
    --color-error: #ff3509;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-text-primary: #000000;
    --color-text-muted: #4a4a4a;
    --color-border: #000000;
    --color-surface-muted: #e6e6e6;
    --color-input-border: #c2c2c2;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #111111;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #ffffff;
    --color-chat-assistant-text: #000000;
    --color-timestamp: #606060;
    --color-error: #c62800;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;
