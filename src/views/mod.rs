pub mod conversation;
pub mod settings;

pub use conversation::ConversationView;
pub use settings::SettingsView;
